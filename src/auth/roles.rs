// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Marketplace roles.

use serde::{Deserialize, Serialize};

/// Marketplace roles carried in token claims and user profiles.
///
/// ## Roles
///
/// - `Buyer` - purchases digital goods, lands on the buyer dashboard
/// - `Seller` - lists digital goods, lands on the seller dashboard
///
/// Roles are disjoint: neither role implies the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Purchasing user
    Buyer,
    /// Listing user
    Seller,
}

impl Role {
    /// Every role, in a stable order.
    pub const ALL: [Role; 2] = [Role::Buyer, Role::Seller];

    /// Parse role from string (case-insensitive, surrounding whitespace ignored).
    /// Used when reading claims and durable storage.
    pub fn from_str(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "buyer" => Some(Role::Buyer),
            "seller" => Some(Role::Seller),
            _ => None,
        }
    }

    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_parses_correctly() {
        assert_eq!(Role::from_str("buyer"), Some(Role::Buyer));
        assert_eq!(Role::from_str("SELLER"), Some(Role::Seller));
        assert_eq!(Role::from_str(" Buyer "), Some(Role::Buyer));
        assert_eq!(Role::from_str(""), None);
        assert_eq!(Role::from_str("admin"), None);
    }

    #[test]
    fn display_matches_storage_form() {
        for role in Role::ALL {
            assert_eq!(Role::from_str(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Seller).unwrap(), r#""seller""#);
        let role: Role = serde_json::from_str(r#""buyer""#).unwrap();
        assert_eq!(role, Role::Buyer);
    }
}
