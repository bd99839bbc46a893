// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Authentication error type.
///
/// Every variant is terminal for the request that produced it.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No (or an empty) authorization header present
    #[error("authorization header is required")]
    MissingAuthHeader,
    /// Malformed, wrongly signed, wrong algorithm or expired token
    #[error("invalid token")]
    InvalidToken,
    /// Signature is valid but the expected claims are absent
    #[error("token claims are malformed")]
    MalformedClaims,
    /// Authenticated, but not allowed to act on this resource
    #[error("forbidden")]
    Forbidden,
    /// Login with an unknown email or a wrong password
    #[error("invalid email or password")]
    InvalidCredentials,
    /// Signing or hashing backend failure
    #[error("internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::MalformedClaims => "malformed_claims",
            AuthError::Forbidden => "forbidden",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidToken
            | AuthError::MalformedClaims
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
