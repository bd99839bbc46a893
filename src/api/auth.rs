// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.
//!
//! Exchanges e-mail and password for a bearer token, returned in the
//! `Authorization` response header.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderName, StatusCode},
    Json,
};

use crate::{
    auth::{
        password::{verify_dummy, verify_password},
        AuthError,
    },
    error::ApiError,
    models::LoginRequest,
    state::AppState,
    storage::UserRepository,
};

/// Log in with e-mail and password.
///
/// An unknown e-mail and a wrong password produce the same response, and
/// both pay for one Argon2 verification.
///
/// The `Authorization` response header carries `Bearer <token>` rather than
/// the bare token, so clients can echo it back unchanged on later requests.
/// This differs from the older wire format, which sent the token alone.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 204, description = "Logged in; token in the Authorization header",
            headers(("Authorization" = String, description = "Bearer <token>"))),
        (status = 401, description = "Invalid email or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, [(HeaderName, String); 1]), ApiError> {
    let Json(request) = payload?;

    let repo = UserRepository::new(&state.db);
    let Some(user) = repo.find_by_email(&request.email)? else {
        verify_dummy(&request.password);
        return Err(AuthError::InvalidCredentials.into());
    };

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok((StatusCode::NO_CONTENT, [(AUTHORIZATION, format!("Bearer {token}"))]))
}
