// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::{Deserialize, Serialize};

use crate::auth::{Role, SubjectId};

/// Full user profile as returned by `GET /users/me/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: SubjectId,
    /// Display name
    #[serde(default)]
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Average review score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_count: Option<u32>,
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_count: Option<u32>,
}

impl UserPatch {
    /// Merge present fields into `user`.
    pub fn apply(self, user: &mut User) {
        if let Some(v) = self.username {
            user.username = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.role {
            user.role = v;
        }
        if self.avatar.is_some() {
            user.avatar = self.avatar;
        }
        if self.bio.is_some() {
            user.bio = self.bio;
        }
        if self.phone.is_some() {
            user.phone = self.phone;
        }
        if self.website.is_some() {
            user.website = self.website;
        }
        if self.rating.is_some() {
            user.rating = self.rating;
        }
        if self.reviews_count.is_some() {
            user.reviews_count = self.reviews_count;
        }
        if self.sales_count.is_some() {
            user.sales_count = self.sales_count;
        }
    }
}

/// Login form submitted to `POST /auth/login/`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration form submitted to `POST /auth/register/`.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Requested role; the server defaults it when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Body of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    /// Issued by the server but not used by the session core
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Body of a successful registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_user;

    #[test]
    fn user_accepts_minimal_profile() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","email":"a@example.com","role":"buyer","avatar":null}"#,
        )
        .unwrap();
        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.username, "");
        assert_eq!(user.avatar, None);
    }

    #[test]
    fn user_accepts_numeric_id() {
        let user: User =
            serde_json::from_str(r#"{"id":5,"email":"a@example.com","role":"seller"}"#).unwrap();
        assert_eq!(user.id.as_str(), "5");
    }

    #[test]
    fn user_rejects_unknown_role() {
        let result = serde_json::from_str::<User>(r#"{"id":"u1","email":"a@b.c","role":""}"#);
        assert!(result.is_err());
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut user = sample_user("u1", Role::Buyer);
        user.bio = Some("old".to_string());

        UserPatch {
            avatar: Some("https://cdn.example.com/a.png".to_string()),
            rating: Some(4.5),
            ..Default::default()
        }
        .apply(&mut user);

        assert_eq!(user.avatar.as_deref(), Some("https://cdn.example.com/a.png"));
        assert_eq!(user.bio.as_deref(), Some("old"));
        assert_eq!(user.rating, Some(4.5));
        assert_eq!(user.role, Role::Buyer);
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::new("a@example.com", "hunter2");
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("a@example.com"));
    }

    #[test]
    fn registration_omits_absent_role() {
        let reg = Registration {
            username: "alice".to_string(),
            email: "a@example.com".to_string(),
            password: "pw".to_string(),
            role: None,
        };
        let json = serde_json::to_value(&reg).unwrap();
        assert!(json.get("role").is_none());
    }
}
