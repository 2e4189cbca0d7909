// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access-token verification against the authority's key set.
//!
//! Stages run in a fixed order and stop at the first failure:
//!
//! 1. read the unverified header and its `kid` ([`UnverifiedToken::parse`])
//! 2. pick the matching key from the [`KeySet`]
//! 3. check the RS256 signature
//! 4. check expiry, then audience, then issuer

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;

use super::claims::Audience;
use super::jwks::KeySet;
use super::{AuthError, DecodedClaims};

/// The only accepted signing algorithm.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// Issuer expected from a trust authority domain.
pub fn issuer_for_domain(domain: &str) -> String {
    format!("https://{domain}/")
}

/// A token whose header has been read but whose signature has not been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedToken<'a> {
    raw: &'a str,
    key_id: String,
}

impl<'a> UnverifiedToken<'a> {
    /// Read the token header and require a key id.
    pub fn parse(raw: &'a str) -> Result<Self, AuthError> {
        let header = decode_header(raw).map_err(|_| AuthError::MalformedToken)?;
        let key_id = header.kid.ok_or(AuthError::MalformedToken)?;
        Ok(Self { raw, key_id })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

/// Verifies tokens for one audience and one issuer.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    audience: String,
    issuer: String,
    /// Clock skew tolerance in seconds, applied to `exp`.
    leeway: u64,
}

impl TokenVerifier {
    pub fn new(domain: &str, audience: impl Into<String>, clock_skew: Duration) -> Self {
        Self {
            audience: audience.into(),
            issuer: issuer_for_domain(domain),
            leeway: clock_skew.as_secs(),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Verify a raw token against `keys` at the current time.
    pub fn verify(&self, raw: &str, keys: &KeySet) -> Result<DecodedClaims, AuthError> {
        let token = UnverifiedToken::parse(raw)?;
        self.verify_at(&token, keys, chrono::Utc::now().timestamp())
    }

    /// Verify an already-parsed token at the current time.
    pub fn verify_parsed(
        &self,
        token: &UnverifiedToken<'_>,
        keys: &KeySet,
    ) -> Result<DecodedClaims, AuthError> {
        self.verify_at(token, keys, chrono::Utc::now().timestamp())
    }

    /// Verify with an explicit "now" (Unix seconds).
    ///
    /// A token is expired once `now >= exp + leeway`: with no leeway a token
    /// whose `exp` equals `now` is already rejected.
    pub fn verify_at(
        &self,
        token: &UnverifiedToken<'_>,
        keys: &KeySet,
        now: i64,
    ) -> Result<DecodedClaims, AuthError> {
        let key = keys.find(&token.key_id).ok_or(AuthError::KeyNotFound)?;

        let decoding_key = DecodingKey::from_rsa_components(&key.modulus, &key.exponent)
            .map_err(|_| AuthError::UnparseableToken)?;

        let payload = decode::<Value>(token.raw, &decoding_key, &signature_only())
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::UnparseableToken,
            })?
            .claims;

        let exp = payload
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(AuthError::IncorrectClaims)?;
        let leeway = i64::try_from(self.leeway).unwrap_or(i64::MAX);
        if now >= exp.saturating_add(leeway) {
            return Err(AuthError::ExpiredToken);
        }

        let audience_ok = payload
            .get("aud")
            .and_then(|aud| Audience::deserialize(aud).ok())
            .is_some_and(|aud| aud.contains(&self.audience));
        if !audience_ok {
            return Err(AuthError::IncorrectClaims);
        }

        if payload.get("iss").and_then(Value::as_str) != Some(self.issuer.as_str()) {
            return Err(AuthError::IncorrectClaims);
        }

        serde_json::from_value(payload).map_err(|_| AuthError::UnparseableToken)
    }
}

/// Signature and algorithm only; registered claims are checked in
/// [`TokenVerifier::verify_at`] so expiry comes before audience and issuer.
fn signature_only() -> Validation {
    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation
}
