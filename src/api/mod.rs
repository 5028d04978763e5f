// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Remote Authentication API
//!
//! HTTP contract consumed by the session core:
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | `POST` | `auth/login/` | `{email, password}` | `{access, refresh?}` |
//! | `POST` | `auth/register/` | `{username, email, password, role?}` | `{token, user}` |
//! | `GET` | `users/me/` | bearer token | `User` |
//!
//! Paths are relative to the configured base URL.

use std::future::Future;

use crate::models::{Credentials, LoginResponse, RegisterResponse, Registration, User};

pub mod http;

pub use http::HttpAuthApi;

/// Transport-level failure talking to the remote API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response was invalid: {0}")]
    InvalidResponse(String),

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Remote authentication endpoints.
pub trait AuthApi {
    /// `POST auth/login/`
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>>;

    /// `POST auth/register/`
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<RegisterResponse, ApiError>>;

    /// `GET users/me/` presenting `token` as bearer credential.
    fn current_user(&self, token: &str) -> impl Future<Output = Result<User, ApiError>>;
}
