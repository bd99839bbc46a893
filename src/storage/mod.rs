// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for accounts and the follow graph, using an embedded
//! redb database file under `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   social.redb
//!     users        id → StoredUser (JSON)
//!     user_emails  email → id
//!     followers    (user_id, follower_id) → edge id
//!     following    (follower_id, user_id) → edge id
//!     sequences    name → last id
//! ```
//!
//! Every operation opens its own short-lived transaction; nothing is held
//! across requests.

pub mod database;
pub mod repository;

pub use database::{SocialDatabase, StorageError, StorageResult};
pub use repository::{FollowError, FollowOutcome, FollowRepository, StoredUser, UserRepository};
