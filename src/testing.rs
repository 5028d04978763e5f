// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::api::{ApiError, AuthApi};
use crate::auth::{Role, SubjectId};
use crate::models::{Credentials, LoginResponse, RegisterResponse, Registration, User};
use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// Base64url (unpadded) encoding of a token segment.
pub fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Unsigned token carrying `claims_json` as its claims segment.
pub fn token_with_claims(claims_json: &str) -> String {
    let header = encode_segment(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = encode_segment(claims_json.as_bytes());
    // Signature doesn't matter; claims are never verified client-side
    format!("{header}.{claims}.fake_signature")
}

/// Unsigned token for `user_id` with `role`.
pub fn token_for(user_id: &str, role: &str) -> String {
    token_with_claims(&format!(
        r#"{{"token_type":"access","exp":9999999999,"user_id":"{user_id}","role":"{role}"}}"#
    ))
}

pub fn sample_user(id: &str, role: Role) -> User {
    User {
        id: SubjectId::new(id),
        username: format!("user-{id}"),
        email: format!("{id}@example.com"),
        role,
        avatar: None,
        bio: None,
        phone: None,
        website: None,
        rating: None,
        reviews_count: None,
        sales_count: None,
    }
}

/// Storage that fails every operation.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("disk detached".to_string()))
    }

    fn set_many(&self, _entries: &[(&str, &str)]) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk detached".to_string()))
    }

    fn remove_many(&self, _keys: &[&str]) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk detached".to_string()))
    }
}

/// Scripted [`AuthApi`]: each call pops the next queued reply.
///
/// A call with nothing queued fails with a network error.
#[derive(Default)]
pub struct FakeApi {
    pub logins: RefCell<VecDeque<Result<LoginResponse, ApiError>>>,
    pub registrations: RefCell<VecDeque<Result<RegisterResponse, ApiError>>>,
    pub profiles: RefCell<VecDeque<Result<User, ApiError>>>,
    /// Tokens presented to `current_user`, in call order
    pub presented_tokens: RefCell<Vec<String>>,
    /// Delay applied to `current_user`
    pub profile_delay: Option<std::time::Duration>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login_ok(self, token: String) -> Self {
        self.logins.borrow_mut().push_back(Ok(LoginResponse {
            access: token,
            refresh: Some("refresh".to_string()),
        }));
        self
    }

    pub fn login_err(self, err: ApiError) -> Self {
        self.logins.borrow_mut().push_back(Err(err));
        self
    }

    pub fn register_ok(self, token: String, user: User) -> Self {
        self.registrations
            .borrow_mut()
            .push_back(Ok(RegisterResponse { token, user }));
        self
    }

    pub fn register_err(self, err: ApiError) -> Self {
        self.registrations.borrow_mut().push_back(Err(err));
        self
    }

    pub fn profile_ok(self, user: User) -> Self {
        self.profiles.borrow_mut().push_back(Ok(user));
        self
    }

    pub fn profile_err(self, err: ApiError) -> Self {
        self.profiles.borrow_mut().push_back(Err(err));
        self
    }

    pub fn with_profile_delay(mut self, delay: std::time::Duration) -> Self {
        self.profile_delay = Some(delay);
        self
    }

    pub fn profile_calls(&self) -> usize {
        self.presented_tokens.borrow().len()
    }
}

fn unscripted() -> ApiError {
    ApiError::Network("no scripted reply".to_string())
}

impl AuthApi for FakeApi {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.logins.borrow_mut().pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn register(&self, _registration: &Registration) -> Result<RegisterResponse, ApiError> {
        self.registrations
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        self.presented_tokens.borrow_mut().push(token.to_string());
        if let Some(delay) = self.profile_delay {
            tokio::time::sleep(delay).await;
        }
        self.profiles.borrow_mut().pop_front().unwrap_or_else(|| Err(unscripted()))
    }
}
