// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints.
//!
//! Creation is public. Everything else sits behind the auth gate, and
//! update/delete additionally require the caller to own the account.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::parse_user_id;
use crate::{
    auth::{
        password::{hash_password, verify_password},
        require_ownership, Auth,
    },
    error::ApiError,
    models::{ChangePasswordRequest, CreateUserRequest, JsonResponse, UpdateUserRequest, User},
    state::AppState,
    storage::UserRepository,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of name or username.
    pub q: Option<String>,
}

#[utoipa::path(
    post,
    path = "/user",
    request_body = CreateUserRequest,
    tag = "Users",
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Missing or invalid field"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JsonResponse<User>>), ApiError> {
    let Json(request) = payload?;
    let profile = request.prepare()?;
    let password_hash = hash_password(&request.password)?;

    let user = UserRepository::new(&state.db).create(&profile, password_hash)?;
    tracing::info!(user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(JsonResponse::data(user.into()))))
}

#[utoipa::path(
    get,
    path = "/users",
    params(SearchQuery),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [User]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_users(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<JsonResponse<Vec<User>>>, ApiError> {
    let users = UserRepository::new(&state.db).search(params.q.as_deref().unwrap_or_default())?;
    Ok(Json(JsonResponse::data(
        users.into_iter().map(User::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    params(("id" = u64, Path, description = "User id")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = User),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn get_user(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonResponse<User>>, ApiError> {
    let id = parse_user_id(&id)?;
    let user = UserRepository::new(&state.db)
        .get(id)?
        .ok_or_else(|| ApiError::not_found(format!("User {id} not found")))?;
    Ok(Json(JsonResponse::data(user.into())))
}

/// Replace the caller's own profile.
///
/// Ownership is checked before the body is looked at or storage touched.
#[utoipa::path(
    put,
    path = "/user/{id}",
    params(("id" = u64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Profile updated"),
        (status = 400, description = "Missing or invalid field"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Not the account owner"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn update_user(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_user_id(&id)?;
    require_ownership(id, user.user_id)?;

    let Json(request) = payload?;
    let profile = request.prepare()?;
    UserRepository::new(&state.db).update_profile(id, &profile)?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/user/{id}",
    params(("id" = u64, Path, description = "User id")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Account and its follow edges deleted"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn delete_user(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_user_id(&id)?;
    require_ownership(id, user.user_id)?;

    UserRepository::new(&state.db).delete(id)?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/user/change-password",
    request_body = ChangePasswordRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "New password missing"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Current password is wrong"),
    )
)]
pub async fn change_password(
    Auth(user): Auth,
    State(state): State<AppState>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<JsonResponse<()>>, ApiError> {
    let Json(request) = payload?;
    if request.new_password.is_empty() {
        return Err(ApiError::bad_request("field newPassword is required"));
    }

    let repo = UserRepository::new(&state.db);
    let stored = repo
        .get(user.user_id)?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", user.user_id)))?;

    if !verify_password(&request.password, &stored.password_hash)? {
        return Err(ApiError::forbidden("invalid password"));
    }

    repo.update_password(user.user_id, hash_password(&request.new_password)?)?;
    tracing::info!(user_id = user.user_id, "Password changed");

    Ok(Json(JsonResponse::message("success")))
}
