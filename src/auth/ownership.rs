// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership checks for mutations on a user's own resource.
//!
//! Runs inside handlers, after the auth gate, and before any storage write.

use super::AuthError;
use crate::models::UserId;

/// Allow the request only when the resource identity equals the caller.
pub fn require_ownership(resource_id: UserId, subject: UserId) -> Result<(), AuthError> {
    if resource_id == subject {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
