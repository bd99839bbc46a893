// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token codec: issues and verifies HMAC-signed access tokens.
//!
//! Tokens are compact JWS strings carrying [`TokenClaims`]. There is no
//! server-side session table and no early revocation; the fixed lifetime is
//! the only expiry mechanism.
//!
//! ```rust,ignore
//! let codec = TokenCodec::new(b"secret");
//! let token = codec.issue(42)?;
//! assert_eq!(codec.verify(&token)?.user_id, 42);
//! ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};

use super::{claims::TokenClaims, AuthError, AuthenticatedUser};
use crate::models::UserId;

/// Lifetime of an issued token.
pub const TOKEN_LIFETIME_HOURS: i64 = 6;

/// Algorithm used when issuing.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted when verifying (the HMAC family only).
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Issues and verifies tokens with a single shared secret.
///
/// Built once at startup from configuration and shared read-only.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `subject`, valid for [`TOKEN_LIFETIME_HOURS`].
    pub fn issue(&self, subject: UserId) -> Result<String, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`.
    fn issue_at(&self, subject: UserId, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims {
            authorized: true,
            exp: (issued_at + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
            user_id: subject,
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify a token and return the caller it identifies.
    ///
    /// # Errors
    /// - `AuthError::InvalidToken`: malformed, non-HMAC algorithm, bad
    ///   signature, expired, or not marked authorized
    /// - `AuthError::MalformedClaims`: verified, but the claims lack the
    ///   expected shape
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::InvalidToken)?;
        if !ACCEPTED_ALGORITHMS.contains(&header.alg) {
            return Err(AuthError::InvalidToken);
        }

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                    AuthError::MalformedClaims
                }
                _ => AuthError::InvalidToken,
            })?;

        if !token_data.claims.authorized {
            return Err(AuthError::InvalidToken);
        }

        Ok(AuthenticatedUser::from_claims(token_data.claims))
    }
}

/// Pull the credential out of an `Authorization` header value.
///
/// The value must split on whitespace into exactly `<scheme> <credential>`;
/// anything else yields an empty credential, which [`TokenCodec::verify`]
/// rejects.
pub fn extract_credential(header_value: &str) -> &str {
    let mut parts = header_value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(credential), None) => credential,
        _ => "",
    }
}
