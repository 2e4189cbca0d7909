// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coffee Shop - Drink Menu Service
//!
//! A REST resource server for a coffee shop menu. Reads of the public menu
//! are open; recipe details and every change require an Auth0 access token
//! carrying the matching permission.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer-token authorization (Auth0 JWT, JWKS)
//! - `storage` - Drink catalog (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_support;
