// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path pattern → [`RouteRequirement`] lookup.
//!
//! Static paths resolve through a map. Patterns with `:param` segments are
//! matched in registration order afterwards. Unknown paths are public.
//! Aliases redirect one static path to another before any requirement is
//! consulted.

use std::collections::HashMap;

use super::{normalize_path, RouteRequirement};
use crate::auth::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
}

#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    fn parse(pattern: &str) -> Self {
        let segments = split(pattern)
            .map(|s| {
                if s.starts_with(':') {
                    Segment::Param
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    fn is_static(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Literal(_)))
    }

    fn matches(&self, path: &str) -> bool {
        let mut parts = split(path);
        for segment in &self.segments {
            match (segment, parts.next()) {
                (Segment::Literal(expected), Some(actual)) if expected == actual => {}
                (Segment::Param, Some(_)) => {}
                _ => return false,
            }
        }
        parts.next().is_none()
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    normalize_path(path).split('/').filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    /// Normalized static path → requirement
    exact: HashMap<String, RouteRequirement>,
    /// Parameterized patterns, first match wins
    patterns: Vec<(Pattern, RouteRequirement)>,
    /// Normalized path → redirect target
    aliases: HashMap<String, String>,
    fallback: RouteRequirement,
}

impl RouteTable {
    /// Empty table; every path is public.
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes of the marketplace front-end.
    pub fn marketplace() -> Self {
        Self::new()
            .route("/", RouteRequirement::public())
            .route("/login", RouteRequirement::guest_only())
            .alias("/register", "/register/buyer")
            .route("/register/buyer", RouteRequirement::guest_only())
            .route("/register/seller", RouteRequirement::guest_only())
            .route("/buyer", RouteRequirement::role(Role::Buyer))
            .route("/seller", RouteRequirement::role(Role::Seller))
            .route("/settings", RouteRequirement::authenticated())
            .route("/favorites", RouteRequirement::authenticated())
            .route("/search", RouteRequirement::public())
            .route("/popular", RouteRequirement::public())
            .route("/product/:id", RouteRequirement::public())
            .route("/success/:id", RouteRequirement::public())
            .route("/order-success", RouteRequirement::public())
    }

    /// Register `pattern`. A static pattern registered twice is replaced.
    pub fn route(mut self, pattern: &str, requirement: RouteRequirement) -> Self {
        let pattern = Pattern::parse(pattern);
        if pattern.is_static() {
            self.exact
                .insert(normalize_path(&pattern.source).to_string(), requirement);
        } else {
            self.patterns.push((pattern, requirement));
        }
        self
    }

    /// Redirect `from` to `to` unconditionally.
    pub fn alias(mut self, from: &str, to: impl Into<String>) -> Self {
        self.aliases
            .insert(normalize_path(from).to_string(), to.into());
        self
    }

    /// Redirect target if `path` is an alias.
    pub fn alias_for(&self, path: &str) -> Option<&str> {
        self.aliases.get(normalize_path(path)).map(String::as_str)
    }

    /// Requirement for paths no pattern matches.
    pub fn with_fallback(mut self, requirement: RouteRequirement) -> Self {
        self.fallback = requirement;
        self
    }

    pub fn requirement(&self, path: &str) -> RouteRequirement {
        if let Some(req) = self.exact.get(normalize_path(path)) {
            return *req;
        }
        self.patterns
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(_, req)| *req)
            .unwrap_or(self.fallback)
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered patterns, static ones first.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.exact
            .keys()
            .map(String::as_str)
            .chain(self.patterns.iter().map(|(p, _)| p.source.as_str()))
    }
}
