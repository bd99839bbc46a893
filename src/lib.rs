// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Social - follow-graph backend
//!
//! HTTP service for accounts, bearer-token login and a directed "follows"
//! graph between users.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and route table (Axum)
//! - `auth` - Token codec, authentication gate and ownership checks
//! - `config` - Environment configuration
//! - `storage` - Embedded database, account and follow repositories

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
