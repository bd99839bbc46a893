// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Follow relationship engine.
//!
//! Maintains the directed "follows" graph. Edges live in two tables written
//! together: `followers` keyed `(user_id, follower_id)` and `following` keyed
//! `(follower_id, user_id)`, so both directions are prefix range scans.
//!
//! Follow and unfollow are idempotent: re-following is a no-op and removing
//! an absent edge succeeds. A user can never follow themselves.

use redb::{ReadableTable, WriteTransaction};

use super::super::database::{
    next_sequence, SocialDatabase, EDGE_ID_SEQUENCE, FOLLOWERS, FOLLOWING, USERS,
};
use super::super::{StorageError, StorageResult};
use super::users::StoredUser;
use crate::models::{EdgeId, UserId, UserSummary};

/// Errors from the follow engine.
#[derive(Debug, thiserror::Error)]
pub enum FollowError {
    #[error("a user cannot follow themselves")]
    SelfFollow,

    /// Either side of the edge has no account, e.g. it was deleted while
    /// its token is still valid.
    #[error("user {0} not found")]
    UnknownUser(UserId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcome of a follow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    /// A new edge was stored.
    Created(EdgeId),
    /// The edge already existed; nothing was written.
    AlreadyFollowing,
}

/// Repository for follow graph operations.
pub struct FollowRepository<'a> {
    db: &'a SocialDatabase,
}

impl<'a> FollowRepository<'a> {
    pub fn new(db: &'a SocialDatabase) -> Self {
        Self { db }
    }

    /// Make `follower_id` follow `followee_id`.
    ///
    /// Both accounts are checked, and the edge looked up and inserted, in one
    /// write transaction. Concurrent duplicate requests store a single edge,
    /// and an edge never outlives a concurrently deleted account.
    pub fn follow(
        &self,
        follower_id: UserId,
        followee_id: UserId,
    ) -> Result<FollowOutcome, FollowError> {
        if follower_id == followee_id {
            return Err(FollowError::SelfFollow);
        }
        self.insert_edge(follower_id, followee_id)
    }

    /// Remove the edge `follower_id → followee_id` if present.
    pub fn unfollow(&self, follower_id: UserId, followee_id: UserId) -> Result<(), FollowError> {
        if follower_id == followee_id {
            return Err(FollowError::SelfFollow);
        }
        Ok(self.remove_edge(follower_id, followee_id)?)
    }

    /// Whether the edge `follower_id → followee_id` exists.
    #[cfg(test)]
    pub(crate) fn is_following(&self, follower_id: UserId, followee_id: UserId) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(FOLLOWERS)?;
        Ok(table.get((followee_id, follower_id))?.is_some())
    }

    /// Users that `user_id` follows, in storage order.
    ///
    /// Unknown users and users without edges yield an empty list.
    pub fn list_following(&self, user_id: UserId) -> StorageResult<Vec<UserSummary>> {
        self.list_neighbours(FollowDirection::Following, user_id)
    }

    /// Users that follow `user_id`, in storage order.
    pub fn list_followers(&self, user_id: UserId) -> StorageResult<Vec<UserSummary>> {
        self.list_neighbours(FollowDirection::Followers, user_id)
    }

    fn insert_edge(
        &self,
        follower_id: UserId,
        followee_id: UserId,
    ) -> Result<FollowOutcome, FollowError> {
        let write_txn = self.db.begin_write()?;
        if let Some(missing) = first_missing_user(&write_txn, [follower_id, followee_id])? {
            write_txn.abort().map_err(StorageError::from)?;
            return Err(FollowError::UnknownUser(missing));
        }

        let outcome = stage_edge(&write_txn, follower_id, followee_id)?;
        if outcome == FollowOutcome::AlreadyFollowing {
            write_txn.abort().map_err(StorageError::from)?;
        } else {
            write_txn.commit().map_err(StorageError::from)?;
            tracing::debug!(follower_id, followee_id, "Follow edge created");
        }

        Ok(outcome)
    }

    fn remove_edge(&self, follower_id: UserId, followee_id: UserId) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut followers = write_txn.open_table(FOLLOWERS)?;
            let mut following = write_txn.open_table(FOLLOWING)?;
            followers.remove((followee_id, follower_id))?;
            following.remove((follower_id, followee_id))?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn list_neighbours(
        &self,
        direction: FollowDirection,
        user_id: UserId,
    ) -> StorageResult<Vec<UserSummary>> {
        let read_txn = self.db.begin_read()?;
        let edges = read_txn.open_table(direction.table())?;
        let users = read_txn.open_table(USERS)?;

        let mut summaries = Vec::new();
        for entry in edges.range((user_id, 0)..=(user_id, u64::MAX))? {
            let (key, _) = entry?;
            let (_, other_id) = key.value();
            // Edges are removed with their accounts, so a miss here is a
            // concurrent delete; skip it.
            if let Some(value) = users.get(other_id)? {
                let user: StoredUser = serde_json::from_slice(value.value())?;
                summaries.push(user.into());
            }
        }

        Ok(summaries)
    }
}

/// First id in `ids` without a row in `users`.
fn first_missing_user(
    write_txn: &WriteTransaction,
    ids: [UserId; 2],
) -> StorageResult<Option<UserId>> {
    let users = write_txn.open_table(USERS)?;
    for id in ids {
        if users.get(id)?.is_none() {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

/// Insert the edge unless it exists. The caller commits or aborts.
fn stage_edge(
    write_txn: &WriteTransaction,
    follower_id: UserId,
    followee_id: UserId,
) -> StorageResult<FollowOutcome> {
    let mut followers = write_txn.open_table(FOLLOWERS)?;
    if followers.get((followee_id, follower_id))?.is_some() {
        return Ok(FollowOutcome::AlreadyFollowing);
    }

    let edge_id = next_sequence(write_txn, EDGE_ID_SEQUENCE)?;
    let mut following = write_txn.open_table(FOLLOWING)?;
    followers.insert((followee_id, follower_id), edge_id)?;
    following.insert((follower_id, followee_id), edge_id)?;
    Ok(FollowOutcome::Created(edge_id))
}

/// Which side of the edge a listing walks from.
#[derive(Debug, Clone, Copy)]
enum FollowDirection {
    /// Keyed by follower: yields followees.
    Following,
    /// Keyed by followee: yields followers.
    Followers,
}

impl FollowDirection {
    fn table(self) -> redb::TableDefinition<'static, (u64, u64), u64> {
        match self {
            FollowDirection::Following => FOLLOWING,
            FollowDirection::Followers => FOLLOWERS,
        }
    }
}
