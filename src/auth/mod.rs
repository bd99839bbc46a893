// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication for the social API.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with e-mail and password
//! 2. Server answers with `Authorization: Bearer <token>`
//! 3. Client sends that header on every protected request
//! 4. Server:
//!    - Splits the header into `<scheme> <credential>`
//!    - Verifies the HMAC signature and expiry of the credential
//!    - Extracts `userID` → canonical `user_id`
//!
//! ## Security
//!
//! - Only HMAC algorithms are accepted; any other `alg` is rejected
//! - Tokens live six hours, with no clock-skew leeway
//! - Mutations on a user resource also require the caller to own it

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod token;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_authenticated;
pub use ownership::require_ownership;
pub use token::TokenCodec;
