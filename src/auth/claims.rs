// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// Claims carried by an access token.
///
/// Wire names follow the token format issued at login:
/// `{"authorized": true, "exp": <unix seconds>, "userID": <id>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Always `true` for tokens issued by this service
    pub authorized: bool,

    /// Expiration timestamp (Unix seconds)
    pub exp: i64,

    /// Subject identity
    #[serde(rename = "userID")]
    pub user_id: UserId,
}

/// Authenticated caller, extracted from a verified token.
///
/// This is the value the auth gate attaches to request extensions and the
/// type handlers receive through the [`Auth`](super::Auth) extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Token subject
    pub user_id: UserId,

    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_use_wire_names() {
        let claims = TokenClaims {
            authorized: true,
            exp: 1700003600,
            user_id: 42,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["authorized"], true);
        assert_eq!(json["exp"], 1700003600);
        assert_eq!(json["userID"], 42);
    }

    #[test]
    fn from_claims_extracts_subject() {
        let user = AuthenticatedUser::from_claims(TokenClaims {
            authorized: true,
            exp: 1700003600,
            user_id: 7,
        });
        assert_eq!(user.user_id, 7);
        assert_eq!(user.expires_at, 1700003600);
    }

    #[test]
    fn claims_without_subject_do_not_parse() {
        let result = serde_json::from_str::<TokenClaims>(r#"{"authorized":true,"exp":1}"#);
        assert!(result.is_err());
    }
}
