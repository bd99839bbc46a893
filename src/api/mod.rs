// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::JsonRejection,
    middleware::from_fn_with_state,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_authenticated,
    error::ApiError,
    models::{
        ChangePasswordRequest, CreateUserRequest, FollowResult, LoginRequest, UpdateUserRequest,
        User, UserId, UserSummary,
    },
    state::AppState,
};

pub mod auth;
pub mod follows;
pub mod health;
pub mod users;

/// One entry of the route table.
///
/// `requires_auth` decides whether the authentication gate wraps the route.
pub struct RouteDef {
    pub path: &'static str,
    pub method: MethodRouter<AppState>,
    pub requires_auth: bool,
}

impl RouteDef {
    fn public(path: &'static str, method: MethodRouter<AppState>) -> Self {
        Self {
            path,
            method,
            requires_auth: false,
        }
    }

    fn protected(path: &'static str, method: MethodRouter<AppState>) -> Self {
        Self {
            path,
            method,
            requires_auth: true,
        }
    }
}

/// Every route the service exposes.
pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef::public("/health", get(health::health)),
        RouteDef::public("/login", post(auth::login)),
        RouteDef::public("/user", post(users::create_user)),
        RouteDef::protected("/users", get(users::list_users)),
        RouteDef::protected("/user/change-password", post(users::change_password)),
        RouteDef::protected(
            "/user/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        ),
        RouteDef::protected("/user/{id}/follow", get(follows::follow_user)),
        RouteDef::protected("/user/{id}/unfollow", get(follows::unfollow_user)),
        RouteDef::protected("/user/{id}/followed", get(follows::list_followed)),
        RouteDef::protected("/user/{id}/followers", get(follows::list_followers)),
    ]
}

pub fn router(state: AppState) -> Router {
    let mut api_routes = Router::new();
    for route in routes() {
        let method = if route.requires_auth {
            route
                .method
                .route_layer(from_fn_with_state(state.clone(), require_authenticated))
        } else {
            route.method
        };
        api_routes = api_routes.route(route.path, method);
    }

    Router::new()
        .merge(api_routes.with_state(state))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Parse the `{id}` path segment.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid user id: {raw}")))
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login,
        users::create_user,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::change_password,
        follows::follow_user,
        follows::unfollow_user,
        follows::list_followed,
        follows::list_followers
    ),
    components(
        schemas(
            User,
            UserSummary,
            FollowResult,
            CreateUserRequest,
            UpdateUserRequest,
            LoginRequest,
            ChangePasswordRequest,
            health::HealthResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Login and token issuance"),
        (name = "Users", description = "Account management"),
        (name = "Follows", description = "Follow relationships")
    )
)]
struct ApiDoc;
