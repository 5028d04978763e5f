// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token claims.
//!
//! The claims segment is read WITHOUT signature or expiry verification.
//! The result steers role-based navigation only; the server stays
//! authoritative for every privileged request.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DecodeError;
use super::roles::Role;

/// Canonical user identifier (the `user_id` claim).
///
/// The marketplace issues UUIDs, older tokens carry integers; both are kept
/// in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SubjectId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawSubject::deserialize(deserializer)? {
            RawSubject::Text(s) => SubjectId(s),
            RawSubject::Number(n) => SubjectId(n.to_string()),
        })
    }
}

/// Claims as they appear on the wire. Every field is optional so that a
/// missing claim is reported as [`DecodeError::MissingClaim`] rather than a
/// generic JSON error.
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    user_id: Option<SubjectId>,
    #[serde(default)]
    role: Option<String>,
    /// Expiration timestamp
    #[serde(default)]
    exp: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSubject {
    Text(String),
    Number(u64),
}

/// Identity claims extracted from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (`user_id` claim)
    pub subject_id: SubjectId,

    /// Marketplace role (`role` claim)
    pub role: Role,

    /// Advisory expiry (`exp` claim); never enforced client-side
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenClaims {
    fn from_raw(raw: RawClaims) -> Result<Self, DecodeError> {
        let subject_id = raw
            .user_id
            .filter(|id| !id.0.trim().is_empty())
            .ok_or(DecodeError::MissingClaim("user_id"))?;

        let role = match raw.role {
            Some(r) if !r.trim().is_empty() => {
                Role::from_str(&r).ok_or(DecodeError::UnknownRole(r))?
            }
            _ => return Err(DecodeError::MissingClaim("role")),
        };

        Ok(Self {
            subject_id,
            role,
            expires_at: raw.exp.and_then(|exp| DateTime::from_timestamp(exp, 0)),
        })
    }
}

/// Decode the claims segment of `token`.
///
/// Accepts padded and unpadded base64url. Never panics.
pub fn decode_claims(token: &str) -> Result<TokenClaims, DecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::SegmentCount {
            found: segments.len(),
        });
    }

    let payload = Base64UrlUnpadded::decode_vec(segments[1].trim_end_matches('='))
        .map_err(|_| DecodeError::Base64)?;

    let raw: RawClaims =
        serde_json::from_slice(&payload).map_err(|e| DecodeError::Json(e.to_string()))?;

    TokenClaims::from_raw(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{encode_segment, token_with_claims};

    #[test]
    fn decodes_uuid_subject_and_role() {
        let token = token_with_claims(
            r#"{"user_id":"6f1c2a9e-0b7d-4c1e-9f55-1a2b3c4d5e6f","role":"seller","exp":1700003600}"#,
        );
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.subject_id.as_str(), "6f1c2a9e-0b7d-4c1e-9f55-1a2b3c4d5e6f");
        assert_eq!(claims.role, Role::Seller);
        assert_eq!(claims.expires_at.unwrap().timestamp(), 1700003600);
    }

    #[test]
    fn decodes_numeric_subject() {
        let token = token_with_claims(r#"{"user_id":42,"role":"buyer"}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.subject_id, SubjectId::new("42"));
        assert_eq!(claims.expires_at, None);
    }

    #[test]
    fn accepts_padded_segment() {
        let payload = br#"{"user_id":"u1","role":"buyer"}"#;
        let padded = base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE, payload);
        assert!(padded.ends_with('='));
        let token = format!("h.{padded}.s");
        assert_eq!(decode_claims(&token).unwrap().role, Role::Buyer);
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert_eq!(
            decode_claims("not-a-token"),
            Err(DecodeError::SegmentCount { found: 1 })
        );
        assert_eq!(
            decode_claims("a.b.c.d"),
            Err(DecodeError::SegmentCount { found: 4 })
        );
        assert_eq!(decode_claims(""), Err(DecodeError::SegmentCount { found: 1 }));
    }

    #[test]
    fn rejects_invalid_alphabet() {
        assert_eq!(decode_claims("h.***.s"), Err(DecodeError::Base64));
    }

    #[test]
    fn rejects_non_json_payload() {
        let token = format!("h.{}.s", encode_segment(b"not json"));
        assert!(matches!(decode_claims(&token), Err(DecodeError::Json(_))));
    }

    #[test]
    fn rejects_missing_claims() {
        let token = token_with_claims(r#"{"role":"buyer"}"#);
        assert_eq!(decode_claims(&token), Err(DecodeError::MissingClaim("user_id")));

        let token = token_with_claims(r#"{"user_id":"u1"}"#);
        assert_eq!(decode_claims(&token), Err(DecodeError::MissingClaim("role")));

        let token = token_with_claims(r#"{"user_id":"u1","role":""}"#);
        assert_eq!(decode_claims(&token), Err(DecodeError::MissingClaim("role")));
    }

    #[test]
    fn rejects_unknown_role() {
        let token = token_with_claims(r#"{"user_id":"u1","role":"admin"}"#);
        assert_eq!(
            decode_claims(&token),
            Err(DecodeError::UnknownRole("admin".to_string()))
        );
    }
}
