// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use crate::api::ApiError;
use crate::storage::StorageError;

/// Failure to read identity claims out of a bearer token.
///
/// Always recovered locally: a token that does not decode is discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Token does not have exactly three dot-separated segments
    #[error("token must have 3 segments, found {found}")]
    SegmentCount { found: usize },

    /// Claims segment is not valid base64url
    #[error("claims segment is not valid base64url")]
    Base64,

    /// Claims segment is not a JSON object of the expected shape
    #[error("claims payload is not valid JSON: {0}")]
    Json(String),

    /// A required claim is absent or empty
    #[error("claim `{0}` is missing")]
    MissingClaim(&'static str),

    /// The role claim names no known role
    #[error("claim `role` has unknown value {0:?}")]
    UnknownRole(String),
}

/// Authentication error type.
///
/// Every failure of login, registration or profile refresh is reported
/// through this type. None of them terminate the host process.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Server refused the submitted credentials
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Server answered with a non-success status
    #[error("server rejected the request with HTTP {status}")]
    Rejected { status: u16 },

    /// Request never produced a response
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded its deadline
    #[error("request timed out")]
    Timeout,

    /// Response body did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Issued token carried unusable claims
    #[error("issued token is unusable: {0}")]
    Token(#[from] DecodeError),

    /// Durable session storage failed
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Get the stable error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Rejected { .. } => "rejected",
            AuthError::Network(_) => "network_error",
            AuthError::Timeout => "timeout",
            AuthError::MalformedResponse(_) => "malformed_response",
            AuthError::Token(_) => "malformed_token",
            AuthError::Storage(_) => "storage_error",
        }
    }

    /// Whether the server actively refused the session, as opposed to being unreachable.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials | AuthError::Rejected { .. })
    }
}

impl From<ApiError> for AuthError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Status { status, .. } => AuthError::Rejected { status },
            ApiError::Timeout => AuthError::Timeout,
            ApiError::Network(msg) | ApiError::InvalidUrl(msg) => AuthError::Network(msg),
            ApiError::InvalidResponse(msg) => AuthError::MalformedResponse(msg),
        }
    }
}
