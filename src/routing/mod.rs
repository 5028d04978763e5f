// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Route Authorization
//!
//! [`decide`] maps a route's [`RouteRequirement`], the current [`Session`]
//! and the [`PendingRedirect`] to a [`Decision`]. Rules are evaluated in
//! order and the first match wins:
//!
//! | # | Condition | Decision |
//! |---|-----------|----------|
//! | 1 | pending path set, authenticated | redirect to pending path (consumed) |
//! | 2 | route requires auth, anonymous | remember target, redirect to login |
//! | 3 | route requires a role, session role differs | redirect to home |
//! | 4 | route is guest-only, authenticated | redirect to role home |
//! | 5 | target is home, authenticated with a role | redirect to role home |
//! | 6 | otherwise | permit |
//!
//! The order matters: 1 before 2 preserves deep links across login, and 3
//! before 4/5 keeps wrong-role users from bouncing between role homes.

pub mod navigator;
pub mod table;

pub use navigator::{NavigationError, Navigator, MAX_REDIRECTS};
pub use table::RouteTable;

use crate::auth::Role;
use crate::session::Session;

/// Access requirements attached to a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteRequirement {
    pub requires_auth: bool,
    pub requires_guest: bool,
    pub required_role: Option<Role>,
}

impl RouteRequirement {
    /// Open to everyone.
    pub const fn public() -> Self {
        Self {
            requires_auth: false,
            requires_guest: false,
            required_role: None,
        }
    }

    /// Any logged-in user.
    pub const fn authenticated() -> Self {
        Self {
            requires_auth: true,
            requires_guest: false,
            required_role: None,
        }
    }

    /// Logged-in users are sent to their landing page instead.
    pub const fn guest_only() -> Self {
        Self {
            requires_auth: false,
            requires_guest: true,
            required_role: None,
        }
    }

    /// Logged-in users holding `role`.
    pub const fn role(role: Role) -> Self {
        Self {
            requires_auth: true,
            requires_guest: false,
            required_role: Some(role),
        }
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Permit,
    RedirectTo(String),
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Permit => f.write_str("permit"),
            Decision::RedirectTo(path) => write!(f, "redirect to {path}"),
        }
    }
}

/// Destination remembered while an anonymous user is sent to log in.
///
/// Read once: the first authenticated navigation consumes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingRedirect {
    path: Option<String>,
}

impl PendingRedirect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: impl Into<String>) {
        self.path = Some(path.into());
    }

    pub fn take(&mut self) -> Option<String> {
        self.path.take()
    }

    pub fn peek(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_none()
    }
}

/// Well-known navigation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePaths {
    pub login: String,
    pub home: String,
    pub buyer_home: String,
    pub seller_home: String,
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            home: "/".to_string(),
            buyer_home: "/buyer".to_string(),
            seller_home: "/seller".to_string(),
        }
    }
}

impl RoutePaths {
    pub fn with_login(mut self, path: impl Into<String>) -> Self {
        self.login = path.into();
        self
    }

    pub fn with_home(mut self, path: impl Into<String>) -> Self {
        self.home = path.into();
        self
    }

    pub fn with_role_home(mut self, role: Role, path: impl Into<String>) -> Self {
        match role {
            Role::Buyer => self.buyer_home = path.into(),
            Role::Seller => self.seller_home = path.into(),
        }
        self
    }

    /// Landing page for `role`, or the generic home when unset.
    pub fn role_home(&self, role: Option<Role>) -> &str {
        match role {
            Some(Role::Buyer) => &self.buyer_home,
            Some(Role::Seller) => &self.seller_home,
            None => &self.home,
        }
    }
}

/// Decide whether `target` may be entered.
///
/// Mutates `pending` only under rules 1 (consume) and 2 (record).
pub fn decide(
    requirement: &RouteRequirement,
    session: &Session,
    pending: &mut PendingRedirect,
    target: &str,
    paths: &RoutePaths,
) -> Decision {
    let (rule, decision) = evaluate(requirement, session, pending, target, paths);
    tracing::debug!(
        path = target,
        rule,
        decision = %decision,
        role = ?session.role,
        "Route decision"
    );
    decision
}

fn evaluate(
    requirement: &RouteRequirement,
    session: &Session,
    pending: &mut PendingRedirect,
    target: &str,
    paths: &RoutePaths,
) -> (u8, Decision) {
    let authenticated = session.token.is_some();

    if authenticated {
        if let Some(path) = pending.take() {
            return (1, Decision::RedirectTo(path));
        }
    }

    if requirement.requires_auth && !authenticated {
        pending.set(target);
        return (2, Decision::RedirectTo(paths.login.clone()));
    }

    if let Some(required) = requirement.required_role {
        if session.role != Some(required) {
            return (3, Decision::RedirectTo(paths.home.clone()));
        }
    }

    if requirement.requires_guest && authenticated {
        return (4, Decision::RedirectTo(paths.role_home(session.role).to_string()));
    }

    if authenticated && session.role.is_some() && same_path(target, &paths.home) {
        return (5, Decision::RedirectTo(paths.role_home(session.role).to_string()));
    }

    (6, Decision::Permit)
}

/// Strip the query string, fragment and trailing slashes.
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn same_path(a: &str, b: &str) -> bool {
    normalize_path(a) == normalize_path(b)
}
