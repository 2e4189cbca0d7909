// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Auth0 access-token checks for the drink API.
//!
//! ## Auth Flow
//!
//! 1. Frontend authenticates the user with Auth0 and gets an access token
//! 2. Frontend sends `Authorization: Bearer <access token>`
//! 3. Server:
//!    - Extracts the token from the header
//!    - Reads the token's `kid` and fetches the Auth0 JWKS
//!    - Verifies the RS256 signature, audience, issuer and expiry
//!    - Checks the route's permission against the `permissions` claim
//!
//! ## Security
//!
//! - Every write route and `/drinks-detail` requires a permission
//! - JWKS is fetched over HTTPS on every check unless a cache TTL is configured
//! - Clock skew tolerance defaults to zero
//! - Guarded handlers never run on a failed check

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use claims::DecodedClaims;
pub use error::{AuthError, GateError, HeaderProblem};
pub use extractor::Authorized;
pub use gate::AuthorizationGate;
pub use jwks::{CachedKeySet, KeySet, KeySetProvider, RemoteKeySet};
pub use permissions::Permission;
pub use verifier::TokenVerifier;
