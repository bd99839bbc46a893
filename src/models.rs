// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. Types that
//! appear in the OpenAPI document derive `ToSchema`; the generic envelope
//! is documented through its payload type instead.
//!
//! ## Model Categories
//!
//! - **Identity**: [`UserId`] and [`EdgeId`]
//! - **Users**: full profile view, follow-list summary, create/update bodies
//! - **Auth**: login and password change bodies
//! - **Envelope**: the `{message, data}` wrapper around successful responses

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

// =============================================================================
// Identity
// =============================================================================

/// Account identity, assigned by storage at creation and never reused.
pub type UserId = u64;

/// Identifier of a stored follow edge.
pub type EdgeId = u64;

// =============================================================================
// User Models
// =============================================================================

/// Public view of an account (never carries the password hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Projection used in follow lists: no email, no password.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserSummary {
    pub name: String,
    pub username: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for `PUT /user/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Editable profile fields after trimming and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub username: String,
    pub email: String,
}

static EMAIL_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

impl Profile {
    /// Trim the raw fields and check they are present and well formed.
    pub fn prepare(name: &str, username: &str, email: &str) -> Result<Self, ApiError> {
        let profile = Self {
            name: name.trim().to_string(),
            username: username.trim().to_string(),
            email: email.trim().to_string(),
        };

        if profile.name.is_empty() {
            return Err(ApiError::bad_request("field name is required"));
        }
        if profile.username.is_empty() {
            return Err(ApiError::bad_request("field username is required"));
        }
        if profile.email.is_empty() {
            return Err(ApiError::bad_request("field email is required"));
        }
        if !EMAIL_FORMAT.is_match(&profile.email) {
            return Err(ApiError::bad_request("invalid e-mail format"));
        }

        Ok(profile)
    }
}

impl CreateUserRequest {
    /// Validate the body, returning the prepared profile.
    ///
    /// The password is only checked for presence.
    pub fn prepare(&self) -> Result<Profile, ApiError> {
        let profile = Profile::prepare(&self.name, &self.username, &self.email)?;
        if self.password.is_empty() {
            return Err(ApiError::bad_request("field password is required"));
        }
        Ok(profile)
    }
}

impl UpdateUserRequest {
    pub fn prepare(&self) -> Result<Profile, ApiError> {
        Profile::prepare(&self.name, &self.username, &self.email)
    }
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request body for `POST /login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for `POST /user/change-password`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "newPassword", alias = "new_password")]
    pub new_password: String,
}

// =============================================================================
// Follow Models
// =============================================================================

/// Result of a follow request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FollowResult {
    /// Id of the newly stored edge, absent when the edge already existed.
    #[serde(rename = "edgeId", skip_serializing_if = "Option::is_none")]
    pub edge_id: Option<EdgeId>,
    /// Whether this request created the edge.
    pub created: bool,
}

// =============================================================================
// Response Envelope
// =============================================================================

/// Envelope for successful JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> JsonResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            message: None,
            data: Some(data),
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            message: Some("success".to_string()),
            data: Some(data),
        }
    }
}

impl JsonResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            data: None,
        }
    }
}
