// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Client-side authentication for the marketplace.
//!
//! ## Auth Flow
//!
//! 1. User submits credentials; [`AuthService`] posts them to the API
//! 2. API returns a bearer token (`access`)
//! 3. Client:
//!    - Decodes the claims segment (no signature check)
//!    - Extracts:
//!      - `user_id` → canonical subject id
//!      - `role` → `buyer` or `seller`
//!    - Persists token, role and subject id as one durable write
//!    - Fetches `/users/me/` to hydrate the full profile
//!
//! ## Failure Policy
//!
//! - Tokens whose claims do not decode are discarded, never half-kept
//! - Any failed profile fetch clears the session (fail closed)
//! - Logout never contacts the server

pub mod claims;
pub mod error;
pub mod roles;
pub mod service;

pub use claims::{decode_claims, SubjectId, TokenClaims};
pub use error::{AuthError, DecodeError};
pub use roles::Role;
pub use service::{AuthService, Bootstrapped};
