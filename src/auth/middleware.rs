// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for Axum.
//!
//! [`require_authenticated`] wraps a route: it verifies the bearer token
//! before the handler runs, short-circuits with 401 on failure, and on
//! success stores the [`AuthenticatedUser`] in request extensions for the
//! [`Auth`](super::Auth) extractor.
//!
//! ```rust,ignore
//! let route = get(handler).route_layer(axum::middleware::from_fn_with_state(
//!     state.clone(),
//!     require_authenticated,
//! ));
//! ```
//!
//! The gate only authenticates. Ownership of the targeted resource is
//! checked by the handler (see [`require_ownership`](super::require_ownership)).

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{token::extract_credential, AuthError, AuthenticatedUser, TokenCodec};
use crate::state::AppState;

/// Authentication middleware function.
pub async fn require_authenticated(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state.tokens) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                error_code = e.error_code(),
                path = %request.uri().path(),
                "Request rejected by auth gate"
            );
            e.into_response()
        }
    }
}

/// Verify the `Authorization` header and return the caller.
///
/// A missing or blank header is [`AuthError::MissingAuthHeader`]; any other
/// value goes through credential extraction and token verification.
pub fn authenticate(headers: &HeaderMap, codec: &TokenCodec) -> Result<AuthenticatedUser, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    if header.trim().is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }

    codec.verify(extract_credential(header))
}
