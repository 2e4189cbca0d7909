// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decoded access-token claims.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `aud` claim; Auth0 sends a list when the token is also valid for userinfo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(aud) => aud == audience,
            Audience::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

/// Claims of a verified access token.
///
/// Audience, issuer and expiry are checked during verification; a value of
/// this type only exists for a token that passed those checks. `permissions`
/// stays optional because its absence is reported separately
/// (see [`super::permissions::check_permissions`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedClaims {
    /// Subject (Auth0 user id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Audience
    pub aud: Audience,

    /// Issuer (`https://<domain>/`)
    pub iss: String,

    /// Expiration timestamp
    pub exp: i64,

    /// RBAC permissions granted by the authority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,

    /// Every other claim, as sent
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
