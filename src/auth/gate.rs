// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authorization gate: header → token → verified claims → permission.

use std::future::Future;
use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::extractor::extract_bearer_token;
use super::jwks::KeySetProvider;
use super::permissions::check_permissions;
use super::verifier::{TokenVerifier, UnverifiedToken};
use super::{AuthError, DecodedClaims, GateError};

/// Composes extraction, verification and the permission check.
///
/// Holds no per-request state; the key set is asked for on every call.
#[derive(Clone)]
pub struct AuthorizationGate {
    key_sets: Arc<dyn KeySetProvider>,
    verifier: TokenVerifier,
}

impl AuthorizationGate {
    pub fn new(key_sets: Arc<dyn KeySetProvider>, verifier: TokenVerifier) -> Self {
        Self { key_sets, verifier }
    }

    pub fn key_sets(&self) -> &Arc<dyn KeySetProvider> {
        &self.key_sets
    }

    /// Authorize a request carrying `headers` for `required_permission`.
    ///
    /// An empty permission still needs a valid, verified token.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        required_permission: &str,
    ) -> Result<DecodedClaims, GateError> {
        let result = self.run(headers, required_permission).await;
        if let Err(GateError::Denied(e)) = &result {
            tracing::debug!(
                permission = required_permission,
                code = e.error_code(),
                "Request denied"
            );
        }
        result
    }

    /// Run `operation` with the claims only if the request is authorized.
    pub async fn guard<T, F, Fut>(
        &self,
        headers: &HeaderMap,
        required_permission: &str,
        operation: F,
    ) -> Result<T, GateError>
    where
        F: FnOnce(DecodedClaims) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(headers, required_permission).await?;
        Ok(operation(claims).await)
    }

    async fn run(
        &self,
        headers: &HeaderMap,
        required_permission: &str,
    ) -> Result<DecodedClaims, GateError> {
        let header = match headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                AuthError::MalformedHeader(super::HeaderProblem::Unreadable)
            })?),
            None => None,
        };
        let raw = extract_bearer_token(header)?;

        // Junk tokens are refused before any outbound call.
        let token = UnverifiedToken::parse(raw)?;

        let keys = self.key_sets.key_set().await.inspect_err(|e| {
            tracing::warn!(error = %e, "JWKS fetch failed");
        })?;

        let claims = self.verifier.verify_parsed(&token, &keys)?;
        check_permissions(required_permission, &claims)?;
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use axum::http::HeaderValue;
    use serde_json::json;

    use crate::auth::HeaderProblem;
    use crate::test_support::{
        claims_json, forged_token, gate, gate_with, key_set, sign, StaticKeySet,
        UnreachableKeySet, KID,
    };

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn bearer(token: &str) -> HeaderMap {
        headers(&format!("Bearer {token}"))
    }

    fn denied(result: Result<DecodedClaims, GateError>) -> AuthError {
        result
            .unwrap_err()
            .auth_error()
            .expect("expected an authorization refusal")
    }

    #[tokio::test]
    async fn missing_header_is_rejected_for_any_permission() {
        let gate = gate();
        for permission in ["", "get:drinks-detail", "post:drinks"] {
            assert_eq!(
                denied(gate.authorize(&HeaderMap::new(), permission).await),
                AuthError::MissingHeader
            );
        }
    }

    #[tokio::test]
    async fn valid_token_with_permission_is_authorized() {
        let token = sign(&claims_json(&["get:drinks-detail", "post:drinks"]), KID);
        let claims = gate()
            .authorize(&bearer(&token), "post:drinks")
            .await
            .unwrap();
        assert_eq!(
            claims.permissions,
            Some(vec!["get:drinks-detail".to_string(), "post:drinks".to_string()])
        );
    }

    #[tokio::test]
    async fn authorize_is_idempotent() {
        let gate = gate();
        let token = sign(&claims_json(&["get:drinks-detail"]), KID);

        let first = gate.authorize(&bearer(&token), "get:drinks-detail").await.unwrap();
        let second = gate.authorize(&bearer(&token), "get:drinks-detail").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unsigned_token_is_invalid_signature() {
        let token = forged_token(
            &json!({"alg": "RS256", "typ": "JWT", "kid": KID}),
            &claims_json(&["post:drinks"]),
        );
        let err = gate().authorize(&bearer(&token), "post:drinks").await.unwrap_err();
        assert_eq!(err.auth_error(), Some(AuthError::InvalidSignature));
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn token_without_scheme_is_malformed_header() {
        let err = gate().authorize(&headers("abc.def.ghi"), "").await.unwrap_err();
        assert_eq!(
            err.auth_error(),
            Some(AuthError::MalformedHeader(HeaderProblem::TokenNotFound))
        );
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_bearer_token_is_malformed_token() {
        // Built directly: header parsers strip trailing whitespace.
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        let err = gate().authorize(&map, "").await.unwrap_err();
        assert_eq!(err.auth_error(), Some(AuthError::MalformedToken));
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_audience_is_incorrect_claims() {
        let mut claims = claims_json(&["get:drinks-detail"]);
        claims["aud"] = json!("https://wrong.com");
        let token = sign(&claims, KID);
        let err = gate().authorize(&bearer(&token), "get:drinks-detail").await.unwrap_err();
        assert_eq!(err.auth_error(), Some(AuthError::IncorrectClaims));
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_permission_is_forbidden() {
        let token = sign(&claims_json(&["get:drinks-detail"]), KID);
        let err = gate().authorize(&bearer(&token), "post:drinks").await.unwrap_err();
        assert_eq!(err.auth_error(), Some(AuthError::Forbidden));
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_permissions_claim_wins_over_empty_requirement() {
        let mut claims = claims_json(&[]);
        claims.as_object_mut().unwrap().remove("permissions");
        let token = sign(&claims, KID);
        let gate = gate();

        for permission in ["", "post:drinks"] {
            assert_eq!(
                denied(gate.authorize(&bearer(&token), permission).await),
                AuthError::MissingClaims
            );
        }
    }

    #[tokio::test]
    async fn empty_requirement_still_verifies_token() {
        let gate = gate();

        let ok = sign(&claims_json(&[]), KID);
        assert!(gate.authorize(&bearer(&ok), "").await.is_ok());

        let mut expired = claims_json(&[]);
        expired["exp"] = json!(crate::test_support::now() - 60);
        let expired = sign(&expired, KID);
        assert_eq!(
            denied(gate.authorize(&bearer(&expired), "").await),
            AuthError::ExpiredToken
        );
    }

    #[tokio::test]
    async fn key_set_failure_is_infrastructure_error() {
        let gate = gate_with(Arc::new(UnreachableKeySet));
        let token = sign(&claims_json(&["post:drinks"]), KID);

        let err = gate.authorize(&bearer(&token), "post:drinks").await.unwrap_err();
        assert!(matches!(err, GateError::KeySet(_)));
        assert!(err.auth_error().is_none());
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn header_errors_skip_key_set_fetch() {
        let provider = Arc::new(StaticKeySet::new(key_set()));
        let gate = gate_with(provider.clone());

        let _ = gate.authorize(&HeaderMap::new(), "").await;
        let _ = gate.authorize(&headers("Basic dXNlcjpwYXNz"), "").await;
        let _ = gate.authorize(&bearer("not-a-jwt"), "").await;
        assert_eq!(provider.calls(), 0);

        let token = sign(&claims_json(&[]), KID);
        gate.authorize(&bearer(&token), "").await.unwrap();
        gate.authorize(&bearer(&token), "").await.unwrap();
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn guard_runs_operation_only_when_authorized() {
        let gate = gate();
        let flag = AtomicBool::new(false);
        let ran = &flag;

        let token = sign(&claims_json(&["get:drinks-detail"]), KID);
        let result = gate
            .guard(&bearer(&token), "delete:drinks", move |_claims| async move {
                ran.store(true, Ordering::SeqCst);
            })
            .await;
        assert!(result.is_err());
        assert!(!ran.load(Ordering::SeqCst));

        let sub = gate
            .guard(&bearer(&token), "get:drinks-detail", move |claims| async move {
                ran.store(true, Ordering::SeqCst);
                claims.sub
            })
            .await
            .unwrap();
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(sub.as_deref(), Some("auth0|barista"));
    }
}
