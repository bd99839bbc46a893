// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the social database.
//!
//! Each repository borrows the [`SocialDatabase`](super::SocialDatabase) and
//! exposes the operations for one entity type.

pub mod follows;
pub mod users;

pub use follows::{FollowError, FollowOutcome, FollowRepository};
pub use users::{StoredUser, UserRepository};
