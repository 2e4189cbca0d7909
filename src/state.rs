// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::AuthorizationGate;
use crate::storage::DrinkStore;

#[derive(Clone)]
pub struct AppState {
    pub drinks: Arc<DrinkStore>,
    pub gate: Arc<AuthorizationGate>,
}

impl AppState {
    pub fn new(drinks: DrinkStore, gate: AuthorizationGate) -> Self {
        Self {
            drinks: Arc::new(drinks),
            gate: Arc::new(gate),
        }
    }

    /// In-memory store behind a gate trusting the test signing key.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(
            DrinkStore::in_memory().expect("in-memory drink store"),
            crate::test_support::gate(),
        )
    }
}
