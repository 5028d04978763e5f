// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use super::{decide, Decision, PendingRedirect, RoutePaths, RouteTable};
use crate::auth::Bootstrapped;
use crate::state::SessionContext;
use crate::storage::KeyValueStore;

/// Upper bound on redirects followed by [`Navigator::resolve`].
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("redirect loop starting at {start} (last hop {last})")]
    RedirectLoop { start: String, last: String },
}

/// Navigation layer: evaluates routes against the live session.
///
/// Owns the pending redirect, so it survives between navigations but never
/// outlives the process.
pub struct Navigator<S> {
    session: SessionContext<S>,
    table: RouteTable,
    paths: RoutePaths,
    pending: PendingRedirect,
}

impl<S: KeyValueStore> Navigator<S> {
    /// Requires proof that startup validation finished.
    pub fn new(
        _ready: &Bootstrapped,
        session: SessionContext<S>,
        table: RouteTable,
        paths: RoutePaths,
    ) -> Self {
        Self {
            session,
            table,
            paths,
            pending: PendingRedirect::new(),
        }
    }

    pub fn paths(&self) -> &RoutePaths {
        &self.paths
    }

    pub fn pending(&self) -> &PendingRedirect {
        &self.pending
    }

    /// Decide a single navigation to `target`.
    pub async fn navigate(&mut self, target: &str) -> Decision {
        if let Some(to) = self.table.alias_for(target) {
            tracing::debug!(path = target, to, "Route alias");
            return Decision::RedirectTo(to.to_string());
        }
        let requirement = self.table.requirement(target);
        let session = self.session.snapshot().await;
        decide(&requirement, &session, &mut self.pending, target, &self.paths)
    }

    /// Follow redirects from `target` to the page that is finally shown.
    pub async fn resolve(&mut self, target: &str) -> Result<String, NavigationError> {
        let mut current = target.to_string();
        for _ in 0..=MAX_REDIRECTS {
            match self.navigate(&current).await {
                Decision::Permit => return Ok(current),
                Decision::RedirectTo(next) => current = next,
            }
        }

        tracing::warn!(start = target, last = %current, "Redirect loop detected");
        Err(NavigationError::RedirectLoop {
            start: target.to_string(),
            last: current,
        })
    }
}
