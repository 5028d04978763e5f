// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Marketplace Session - client-side session and route authorization
//!
//! Owns who is logged in, keeps that belief durable across restarts and
//! decides every navigation attempt against it.
//!
//! ## Modules
//!
//! - `api` - Remote authentication endpoints (reqwest)
//! - `auth` - Token claims, roles and the auth service
//! - `routing` - Route table, authorization decisions and navigation
//! - `session` - Session state and its store
//! - `storage` - Durable key-value storage (redb)
//!
//! ## Startup
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use marketplace_session::{
//!     api::HttpAuthApi, auth::AuthService, config::ClientConfig,
//!     routing::{Navigator, RouteTable}, state::SessionContext, storage::RedbStore,
//! };
//!
//! let config = ClientConfig::from_env()?;
//! let storage = RedbStore::open(&config.session_db_path)?;
//! let api = HttpAuthApi::new(config.api_url.as_str(), config.http_timeout)?;
//! let auth = AuthService::new(api, SessionContext::new(storage))
//!     .with_bootstrap_timeout(config.bootstrap_timeout);
//!
//! let ready = auth.bootstrap().await;
//! let mut nav = Navigator::new(&ready, auth.session().clone(), RouteTable::marketplace(), config.paths);
//! let page = nav.resolve("/buyer").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod logging;
pub mod models;
pub mod routing;
pub mod session;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;
