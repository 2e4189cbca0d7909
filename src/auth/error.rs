// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.
//!
//! [`AuthError`] covers every way a request can be refused (401/403).
//! [`GateError`] adds the one failure that is not a refusal: the signing
//! keys could not be fetched, which surfaces as a 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::jwks::KeySetError;
use crate::error::ApiError;

/// Why an `Authorization` header was rejected as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProblem {
    /// Only one part, no scheme in front of the token
    TokenNotFound,
    /// More than `<scheme> <token>`
    TooManyParts,
    /// Scheme other than `Bearer`
    WrongScheme,
    /// Header bytes are not visible ASCII
    Unreadable,
}

/// Authorization failure.
///
/// Created where the failure is detected and handed to the boundary
/// untouched; nothing in the gate retries or rewrites these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingHeader,
    /// Authorization header is not `Bearer <token>`
    MalformedHeader(HeaderProblem),
    /// Token header unreadable or carries no key id
    MalformedToken,
    /// No key in the key set matches the token's key id
    KeyNotFound,
    /// Token signature does not verify
    InvalidSignature,
    /// Audience or issuer mismatch, or a required claim is missing
    IncorrectClaims,
    /// Token has expired
    ExpiredToken,
    /// Any other decode failure
    UnparseableToken,
    /// Token carries no `permissions` claim
    MissingClaims,
    /// Required permission not granted
    Forbidden,
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: u16,
    message: String,
    code: &'static str,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::MalformedHeader(_) => "invalid_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::KeyNotFound => "key_not_found",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::IncorrectClaims => "incorrect_claims",
            AuthError::ExpiredToken => "token_expired",
            AuthError::UnparseableToken => "unparseable_token",
            AuthError::MissingClaims => "invalid_claims",
            AuthError::Forbidden => "unauthorized",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedHeader(_)
            | AuthError::MalformedToken
            | AuthError::IncorrectClaims
            | AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::KeyNotFound
            | AuthError::InvalidSignature
            | AuthError::UnparseableToken
            | AuthError::MissingClaims
            | AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "Authorization header is expected"),
            AuthError::MalformedHeader(HeaderProblem::TokenNotFound) => {
                write!(f, "Token not found")
            }
            AuthError::MalformedHeader(HeaderProblem::TooManyParts) => {
                write!(f, "Authorization header malformed")
            }
            AuthError::MalformedHeader(HeaderProblem::WrongScheme) => {
                write!(f, "Authorization header must start with \"Bearer\"")
            }
            AuthError::MalformedHeader(HeaderProblem::Unreadable) => {
                write!(f, "Authorization header is not valid text")
            }
            AuthError::MalformedToken => write!(f, "Token header is missing a key id"),
            AuthError::KeyNotFound => write!(f, "Unable to find appropriate key"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::IncorrectClaims => {
                write!(f, "Incorrect claims. Please check the audience and the issuer")
            }
            AuthError::ExpiredToken => write!(f, "Token expired"),
            AuthError::UnparseableToken => write!(f, "Unable to parse authentication token"),
            AuthError::MissingClaims => write!(f, "Permissions not included in token"),
            AuthError::Forbidden => write!(f, "Permission not found"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
            code: self.error_code(),
        });
        (status, body).into_response()
    }
}

/// Outcome of a failed pass through the authorization gate.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The request was refused.
    #[error(transparent)]
    Denied(#[from] AuthError),

    /// No decision could be made because the signing keys were unavailable.
    #[error("signing keys unavailable: {0}")]
    KeySet(#[from] KeySetError),
}

impl GateError {
    /// The refusal, if this is one.
    pub fn auth_error(&self) -> Option<AuthError> {
        match self {
            GateError::Denied(e) => Some(*e),
            GateError::KeySet(_) => None,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::Denied(e) => e.status_code(),
            GateError::KeySet(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        match self {
            GateError::Denied(e) => e.into_response(),
            GateError::KeySet(e) => {
                tracing::error!(error = %e, "Cannot authorize request without signing keys");
                ApiError::internal().into_response()
            }
        }
    }
}
