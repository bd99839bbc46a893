// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account repository (the credential store).
//!
//! Accounts are stored as JSON rows in the `users` table with a unique
//! lowercase-email index. Deleting an account also removes every follow edge
//! it takes part in, inside the same write transaction.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{
    next_sequence, SocialDatabase, FOLLOWERS, FOLLOWING, USERS, USER_EMAILS, USER_ID_SEQUENCE,
};
use super::super::{StorageError, StorageResult};
use crate::models::{Profile, User, UserId, UserSummary};

/// Account row as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string, never serialized to API responses.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredUser> for User {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

impl From<StoredUser> for UserSummary {
    fn from(user: StoredUser) -> Self {
        Self {
            name: user.name,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Key used in the email index.
fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Repository for account operations.
pub struct UserRepository<'a> {
    db: &'a SocialDatabase,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a SocialDatabase) -> Self {
        Self { db }
    }

    /// Create an account, assigning the next user id.
    ///
    /// # Errors
    /// `StorageError::AlreadyExists` if the email is already registered.
    pub fn create(&self, profile: &Profile, password_hash: String) -> StorageResult<StoredUser> {
        let key = email_key(&profile.email);

        let write_txn = self.db.begin_write()?;
        let user = {
            let mut emails = write_txn.open_table(USER_EMAILS)?;
            if emails.get(key.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!("Email {}", profile.email)));
            }

            let id = next_sequence(&write_txn, USER_ID_SEQUENCE)?;
            let user = StoredUser {
                id,
                name: profile.name.clone(),
                username: profile.username.clone(),
                email: profile.email.clone(),
                password_hash,
                created_at: Utc::now(),
            };

            let json = serde_json::to_vec(&user)?;
            let mut users = write_txn.open_table(USERS)?;
            users.insert(id, json.as_slice())?;
            emails.insert(key.as_str(), id)?;
            user
        };
        write_txn.commit()?;

        Ok(user)
    }

    /// Look up an account by id.
    pub fn get(&self, id: UserId) -> StorageResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up an account by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        let key = email_key(email);
        let read_txn = self.db.begin_read()?;
        let emails = read_txn.open_table(USER_EMAILS)?;
        let Some(id) = emails.get(key.as_str())?.map(|v| v.value()) else {
            return Ok(None);
        };

        let users = read_txn.open_table(USERS)?;
        match users.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List accounts whose name or username contains `query`
    /// (case-insensitive). An empty query matches everyone.
    pub fn search(&self, query: &str) -> StorageResult<Vec<StoredUser>> {
        let needle = query.trim().to_lowercase();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        let mut users = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let user: StoredUser = serde_json::from_slice(value.value())?;
            if user.name.to_lowercase().contains(&needle)
                || user.username.to_lowercase().contains(&needle)
            {
                users.push(user);
            }
        }

        Ok(users)
    }

    /// Replace the editable profile fields of an account.
    ///
    /// # Errors
    /// - `StorageError::NotFound` if the account does not exist
    /// - `StorageError::AlreadyExists` if the new email belongs to another account
    pub fn update_profile(&self, id: UserId, profile: &Profile) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            let existing_bytes = users
                .get(id)?
                .map(|v| v.value().to_vec())
                .ok_or_else(|| StorageError::NotFound(format!("User {id}")))?;
            let mut user: StoredUser = serde_json::from_slice(&existing_bytes)?;

            let old_key = email_key(&user.email);
            let new_key = email_key(&profile.email);
            if old_key != new_key {
                let mut emails = write_txn.open_table(USER_EMAILS)?;
                let owner = emails.get(new_key.as_str())?.map(|v| v.value());
                if owner.is_some_and(|owner| owner != id) {
                    return Err(StorageError::AlreadyExists(format!("Email {}", profile.email)));
                }
                emails.remove(old_key.as_str())?;
                emails.insert(new_key.as_str(), id)?;
            }

            user.name = profile.name.clone();
            user.username = profile.username.clone();
            user.email = profile.email.clone();

            let json = serde_json::to_vec(&user)?;
            users.insert(id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Replace the stored password hash.
    pub fn update_password(&self, id: UserId, password_hash: String) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            let existing_bytes = users
                .get(id)?
                .map(|v| v.value().to_vec())
                .ok_or_else(|| StorageError::NotFound(format!("User {id}")))?;
            let mut user: StoredUser = serde_json::from_slice(&existing_bytes)?;
            user.password_hash = password_hash;

            let json = serde_json::to_vec(&user)?;
            users.insert(id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete an account, its email index entry and all of its follow edges.
    pub fn delete(&self, id: UserId) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            let removed = users
                .remove(id)?
                .map(|v| v.value().to_vec())
                .ok_or_else(|| StorageError::NotFound(format!("User {id}")))?;
            let user: StoredUser = serde_json::from_slice(&removed)?;

            let mut emails = write_txn.open_table(USER_EMAILS)?;
            emails.remove(email_key(&user.email).as_str())?;

            let mut followers = write_txn.open_table(FOLLOWERS)?;
            let mut following = write_txn.open_table(FOLLOWING)?;

            let follower_ids = followers
                .range((id, 0)..=(id, u64::MAX))?
                .map(|entry| entry.map(|(key, _)| key.value().1))
                .collect::<Result<Vec<_>, _>>()?;
            for follower_id in follower_ids {
                followers.remove((id, follower_id))?;
                following.remove((follower_id, id))?;
            }

            let followee_ids = following
                .range((id, 0)..=(id, u64::MAX))?
                .map(|entry| entry.map(|(key, _)| key.value().1))
                .collect::<Result<Vec<_>, _>>()?;
            for followee_id in followee_ids {
                following.remove((id, followee_id))?;
                followers.remove((followee_id, id))?;
            }
        }
        write_txn.commit()?;

        tracing::info!(user_id = id, "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::temp_db;
    use crate::storage::FollowRepository;

    fn profile(name: &str, email: &str) -> Profile {
        Profile {
            name: name.to_string(),
            username: name.to_lowercase(),
            email: email.to_string(),
        }
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        let ada = repo.create(&profile("Ada", "ada@example.com"), "h1".into()).unwrap();
        let bob = repo.create(&profile("Bob", "bob@example.com"), "h2".into()).unwrap();

        assert_eq!(ada.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(repo.get(ada.id).unwrap(), Some(ada));
    }

    #[test]
    fn create_rejects_duplicate_email_case_insensitively() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        repo.create(&profile("Ada", "ada@example.com"), "h".into()).unwrap();
        let result = repo.create(&profile("Imposter", "ADA@example.com"), "h".into());

        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        assert_eq!(repo.search("").unwrap().len(), 1);
    }

    #[test]
    fn find_by_email_returns_password_hash() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);
        repo.create(&profile("Ada", "ada@example.com"), "$argon2id$x".into()).unwrap();

        let found = repo.find_by_email(" Ada@Example.com ").unwrap().unwrap();
        assert_eq!(found.password_hash, "$argon2id$x");
        assert!(repo.find_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn search_matches_name_or_username() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);
        repo.create(&profile("Ada Lovelace", "ada@example.com"), "h".into()).unwrap();
        repo.create(
            &Profile {
                name: "Bob".into(),
                username: "builder".into(),
                email: "bob@example.com".into(),
            },
            "h".into(),
        )
        .unwrap();

        let by_name = repo.search("LOVE").unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Ada Lovelace");

        let by_username = repo.search("build").unwrap();
        assert_eq!(by_username.len(), 1);
        assert_eq!(by_username[0].name, "Bob");

        assert_eq!(repo.search("").unwrap().len(), 2);
        assert!(repo.search("zzz").unwrap().is_empty());
    }

    #[test]
    fn update_profile_moves_email_index() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);
        let ada = repo.create(&profile("Ada", "ada@example.com"), "h".into()).unwrap();

        repo.update_profile(ada.id, &profile("Ada L", "lovelace@example.com"))
            .unwrap();

        assert!(repo.find_by_email("ada@example.com").unwrap().is_none());
        let updated = repo.find_by_email("lovelace@example.com").unwrap().unwrap();
        assert_eq!(updated.name, "Ada L");
        assert_eq!(updated.password_hash, "h");
        assert_eq!(updated.created_at, ada.created_at);
    }

    #[test]
    fn update_profile_rejects_taken_email() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);
        let ada = repo.create(&profile("Ada", "ada@example.com"), "h".into()).unwrap();
        repo.create(&profile("Bob", "bob@example.com"), "h".into()).unwrap();

        let result = repo.update_profile(ada.id, &profile("Ada", "bob@example.com"));
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

        let unchanged = repo.get(ada.id).unwrap().unwrap();
        assert_eq!(unchanged.email, "ada@example.com");
    }

    #[test]
    fn update_missing_user_is_not_found() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        let result = repo.update_profile(42, &profile("Ghost", "ghost@example.com"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
        let result = repo.update_password(42, "h".into());
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn update_password_replaces_hash() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);
        let ada = repo.create(&profile("Ada", "ada@example.com"), "old".into()).unwrap();

        repo.update_password(ada.id, "new".into()).unwrap();
        assert_eq!(repo.get(ada.id).unwrap().unwrap().password_hash, "new");
    }

    #[test]
    fn delete_removes_account_and_edges() {
        let (db, _dir) = temp_db();
        let users = UserRepository::new(&db);
        let follows = FollowRepository::new(&db);

        let ada = users.create(&profile("Ada", "ada@example.com"), "h".into()).unwrap();
        let bob = users.create(&profile("Bob", "bob@example.com"), "h".into()).unwrap();
        let cat = users.create(&profile("Cat", "cat@example.com"), "h".into()).unwrap();

        follows.follow(ada.id, bob.id).unwrap();
        follows.follow(bob.id, ada.id).unwrap();
        follows.follow(cat.id, bob.id).unwrap();

        users.delete(bob.id).unwrap();

        assert!(users.get(bob.id).unwrap().is_none());
        assert!(users.find_by_email("bob@example.com").unwrap().is_none());
        assert!(follows.list_following(ada.id).unwrap().is_empty());
        assert!(follows.list_followers(ada.id).unwrap().is_empty());
        assert!(follows.list_following(cat.id).unwrap().is_empty());
        assert!(!follows.is_following(ada.id, bob.id).unwrap());

        // Email can be reused after deletion
        users.create(&profile("Bob", "bob@example.com"), "h".into()).unwrap();
    }

    #[test]
    fn delete_missing_user_is_not_found() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);
        assert!(matches!(repo.delete(7), Err(StorageError::NotFound(_))));
    }
}
