// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests: an RSA key pair standing in for the
//! authority's signing key, token minting, and stub key-set providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand::rngs::OsRng;
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde_json::{json, Value};

use crate::auth::jwks::{KeySet, KeySetError, KeySetProvider, SigningKey};
use crate::auth::{AuthorizationGate, TokenVerifier};

pub const DOMAIN: &str = "coffeeshop-test.auth0.com";
pub const AUDIENCE: &str = "https://coffeeshop.com";
pub const KID: &str = "test-key-1";

struct TestKey {
    pem: String,
    jwk: SigningKey,
}

fn generate_key(kid: &str) -> TestKey {
    let private_key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
    let public_key = private_key.to_public_key();
    let pem = private_key.to_pkcs1_pem(LineEnding::LF).unwrap().to_string();

    TestKey {
        pem,
        jwk: SigningKey {
            key_id: kid.to_string(),
            key_type: "RSA".to_string(),
            usage: "sig".to_string(),
            modulus: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
            exponent: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
        },
    }
}

static SIGNING_KEY: LazyLock<TestKey> = LazyLock::new(|| generate_key(KID));
// Same kid, different key material.
static IMPOSTER_KEY: LazyLock<TestKey> = LazyLock::new(|| generate_key(KID));

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Key set published by the test authority.
pub fn key_set() -> KeySet {
    KeySet::new(vec![SIGNING_KEY.jwk.clone()])
}

/// Key set whose `KID` entry does not match the signing key.
pub fn other_key_set() -> KeySet {
    KeySet::new(vec![IMPOSTER_KEY.jwk.clone()])
}

/// Valid claims for the test authority, expiring in an hour.
pub fn claims_json(permissions: &[&str]) -> Value {
    json!({
        "iss": format!("https://{DOMAIN}/"),
        "sub": "auth0|barista",
        "aud": AUDIENCE,
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

/// RS256 token signed with the test authority's key.
pub fn sign(claims: &Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(SIGNING_KEY.pem.as_bytes()).unwrap();
    encode(&header, claims, &key).unwrap()
}

/// HS256 token with a shared secret, for algorithm-confusion checks.
pub fn sign_hs256(claims: &Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(kid.to_string());
    encode(&header, claims, &EncodingKey::from_secret(b"not-a-public-key")).unwrap()
}

/// Structurally valid token with a signature nobody produced.
pub fn forged_token(header: &Value, claims: &Value) -> String {
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string()),
        URL_SAFE_NO_PAD.encode([0u8; 256]),
    )
}

/// Provider returning a fixed key set and counting calls.
pub struct StaticKeySet {
    keys: KeySet,
    pub calls: AtomicUsize,
}

impl StaticKeySet {
    pub fn new(keys: KeySet) -> Self {
        Self {
            keys,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeySetProvider for StaticKeySet {
    async fn key_set(&self) -> Result<KeySet, KeySetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.keys.clone())
    }
}

/// Provider that always fails like an unreachable authority.
pub struct UnreachableKeySet;

#[async_trait]
impl KeySetProvider for UnreachableKeySet {
    async fn key_set(&self) -> Result<KeySet, KeySetError> {
        Err(KeySetError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
    }
}

/// Gate wired to the test authority.
pub fn gate() -> AuthorizationGate {
    gate_with(Arc::new(StaticKeySet::new(key_set())))
}

pub fn gate_with(provider: Arc<dyn KeySetProvider>) -> AuthorizationGate {
    AuthorizationGate::new(provider, TokenVerifier::new(DOMAIN, AUDIENCE, Duration::ZERO))
}
