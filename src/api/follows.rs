// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Follow relationship endpoints.
//!
//! The caller is always the follower; the path names the other party.

use axum::{
    extract::{Path, State},
    Json,
};

use super::parse_user_id;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{FollowResult, JsonResponse, UserSummary},
    state::AppState,
    storage::{FollowError, FollowOutcome, FollowRepository},
};

impl From<FollowOutcome> for FollowResult {
    fn from(outcome: FollowOutcome) -> Self {
        match outcome {
            FollowOutcome::Created(edge_id) => Self {
                edge_id: Some(edge_id),
                created: true,
            },
            FollowOutcome::AlreadyFollowing => Self {
                edge_id: None,
                created: false,
            },
        }
    }
}

/// Follow a user. Following someone already followed is a no-op.
#[utoipa::path(
    get,
    path = "/user/{id}/follow",
    params(("id" = u64, Path, description = "User to follow")),
    tag = "Follows",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Now following", body = FollowResult),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Cannot follow yourself"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn follow_user(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonResponse<FollowResult>>, ApiError> {
    let followee_id = parse_user_id(&id)?;
    let outcome = FollowRepository::new(&state.db).follow(user.user_id, followee_id)?;
    if let FollowOutcome::Created(edge_id) = outcome {
        tracing::info!(follower_id = user.user_id, followee_id, edge_id, "Follow edge created");
    }

    Ok(Json(JsonResponse::success(outcome.into())))
}

/// Stop following a user. Unfollowing someone not followed succeeds.
#[utoipa::path(
    get,
    path = "/user/{id}/unfollow",
    params(("id" = u64, Path, description = "User to stop following")),
    tag = "Follows",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "No longer following"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Cannot unfollow yourself"),
    )
)]
pub async fn unfollow_user(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonResponse<()>>, ApiError> {
    let followee_id = parse_user_id(&id)?;

    FollowRepository::new(&state.db)
        .unfollow(user.user_id, followee_id)
        .map_err(|e| match e {
            FollowError::SelfFollow => ApiError::forbidden("you cannot stop following yourself"),
            other => other.into(),
        })?;

    Ok(Json(JsonResponse::message("success")))
}

/// Users that `id` follows.
#[utoipa::path(
    get,
    path = "/user/{id}/followed",
    params(("id" = u64, Path, description = "User id")),
    tag = "Follows",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [UserSummary]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_followed(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonResponse<Vec<UserSummary>>>, ApiError> {
    let user_id = parse_user_id(&id)?;
    let users = FollowRepository::new(&state.db).list_following(user_id)?;
    Ok(Json(JsonResponse::data(users)))
}

/// Users that follow `id`.
#[utoipa::path(
    get,
    path = "/user/{id}/followers",
    params(("id" = u64, Path, description = "User id")),
    tag = "Follows",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [UserSummary]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_followers(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonResponse<Vec<UserSummary>>>, ApiError> {
    let user_id = parse_user_id(&id)?;
    let users = FollowRepository::new(&state.db).list_followers(user_id)?;
    Ok(Json(JsonResponse::data(users)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{AuthenticatedUser, TokenCodec},
        models::{Profile, UserId},
        storage::{SocialDatabase, UserRepository},
    };
    use axum::http::StatusCode;
    use tempfile::TempDir;

    fn create_test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = SocialDatabase::open(&temp_dir.path().join("social.redb")).unwrap();
        (AppState::new(db, TokenCodec::new(b"follows-test")), temp_dir)
    }

    fn seed(state: &AppState, name: &str) -> UserId {
        let profile = Profile::prepare(
            name,
            &name.to_lowercase(),
            &format!("{}@example.com", name.to_lowercase()),
        )
        .unwrap();
        UserRepository::new(&state.db)
            .create(&profile, "hash".into())
            .unwrap()
            .id
    }

    fn auth(user_id: UserId) -> Auth {
        Auth(AuthenticatedUser {
            user_id,
            expires_at: 0,
        })
    }

    #[tokio::test]
    async fn follow_then_list_both_directions() {
        let (state, _temp_dir) = create_test_state();
        let ada = seed(&state, "Ada");
        let grace = seed(&state, "Grace");

        let Json(body) = follow_user(auth(ada), State(state.clone()), Path(grace.to_string()))
            .await
            .unwrap();
        assert_eq!(body.message.as_deref(), Some("success"));
        assert!(body.data.unwrap().created);

        let Json(followed) = list_followed(auth(ada), State(state.clone()), Path(ada.to_string()))
            .await
            .unwrap();
        let followed = followed.data.unwrap();
        assert_eq!(followed.len(), 1);
        assert_eq!(followed[0].username, "grace");

        let Json(followers) =
            list_followers(auth(ada), State(state.clone()), Path(grace.to_string()))
                .await
                .unwrap();
        assert_eq!(followers.data.unwrap()[0].username, "ada");
    }

    #[tokio::test]
    async fn repeated_follow_is_idempotent() {
        let (state, _temp_dir) = create_test_state();
        let ada = seed(&state, "Ada");
        let grace = seed(&state, "Grace");

        follow_user(auth(ada), State(state.clone()), Path(grace.to_string()))
            .await
            .unwrap();
        let Json(second) = follow_user(auth(ada), State(state.clone()), Path(grace.to_string()))
            .await
            .unwrap();
        assert_eq!(
            second.data.unwrap(),
            FollowResult {
                edge_id: None,
                created: false
            }
        );

        let followers = FollowRepository::new(&state.db).list_followers(grace).unwrap();
        assert_eq!(followers.len(), 1);
    }

    #[tokio::test]
    async fn self_follow_and_unfollow_are_forbidden() {
        let (state, _temp_dir) = create_test_state();
        let ada = seed(&state, "Ada");

        let err = follow_user(auth(ada), State(state.clone()), Path(ada.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "you cannot follow yourself");

        let err = unfollow_user(auth(ada), State(state.clone()), Path(ada.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "you cannot stop following yourself");

        assert!(!FollowRepository::new(&state.db).is_following(ada, ada).unwrap());
    }

    #[tokio::test]
    async fn follow_unknown_user_is_not_found() {
        let (state, _temp_dir) = create_test_state();
        let ada = seed(&state, "Ada");

        let err = follow_user(auth(ada), State(state), Path("404".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "User 404 not found");
    }

    #[tokio::test]
    async fn deleted_follower_cannot_follow() {
        let (state, _temp_dir) = create_test_state();
        let ada = seed(&state, "Ada");
        let grace = seed(&state, "Grace");
        UserRepository::new(&state.db).delete(ada).unwrap();

        let err = follow_user(auth(ada), State(state.clone()), Path(grace.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, format!("User {ada} not found"));
        assert!(FollowRepository::new(&state.db)
            .list_followers(grace)
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn unfollow_is_idempotent() {
        let (state, _temp_dir) = create_test_state();
        let ada = seed(&state, "Ada");
        let grace = seed(&state, "Grace");

        follow_user(auth(ada), State(state.clone()), Path(grace.to_string()))
            .await
            .unwrap();
        for _ in 0..2 {
            let Json(body) = unfollow_user(auth(ada), State(state.clone()), Path(grace.to_string()))
                .await
                .unwrap();
            assert_eq!(body.message.as_deref(), Some("success"));
        }
        assert!(!FollowRepository::new(&state.db).is_following(ada, grace).unwrap());
    }

    #[tokio::test]
    async fn lists_for_unknown_user_are_empty() {
        let (state, _temp_dir) = create_test_state();

        let Json(body) = list_followed(auth(1), State(state.clone()), Path("77".into()))
            .await
            .unwrap();
        assert!(body.data.unwrap().is_empty());

        let Json(body) = list_followers(auth(1), State(state), Path("77".into()))
            .await
            .unwrap();
        assert!(body.data.unwrap().is_empty());
    }
}
