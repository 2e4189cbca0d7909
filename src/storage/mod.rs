// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for the drink catalog, an embedded redb file under
//! `DATABASE_PATH` (see [`crate::config`]).

pub mod drinks;

pub use drinks::{DrinkStore, StoreError, StoreResult};
