// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::storage::SocialDatabase;

/// Shared, read-only handles passed to every request.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SocialDatabase>,
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(db: SocialDatabase, tokens: TokenCodec) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
        }
    }
}
