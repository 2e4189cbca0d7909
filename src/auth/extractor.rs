// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-token extraction and the Axum extractor for guarded handlers.
//!
//! Use the `Authorized<P>` extractor in handlers to require permission `P`:
//!
//! ```rust,ignore
//! async fn create_drink(
//!     Authorized { claims, .. }: Authorized<PostDrinks>,
//!     State(state): State<AppState>,
//! ) -> impl IntoResponse {
//!     // only reached with a verified token granting `post:drinks`
//! }
//! ```

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::permissions::Permission;
use super::{AuthError, DecodedClaims, GateError, HeaderProblem};
use crate::state::AppState;

/// Pull the token out of an `Authorization` header value.
///
/// Runs of whitespace separate parts. A lone scheme followed by whitespace
/// (`"Bearer "`) yields an empty token that the verifier then refuses.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header
        .filter(|h| !h.trim().is_empty())
        .ok_or(AuthError::MissingHeader)?;

    let mut parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() == 1 && header.ends_with(char::is_whitespace) {
        parts.push("");
    }
    match parts.as_slice() {
        [_] => Err(AuthError::MalformedHeader(HeaderProblem::TokenNotFound)),
        [scheme, token] => {
            if scheme.eq_ignore_ascii_case("bearer") {
                Ok(*token)
            } else {
                Err(AuthError::MalformedHeader(HeaderProblem::WrongScheme))
            }
        }
        _ => Err(AuthError::MalformedHeader(HeaderProblem::TooManyParts)),
    }
}

/// Extractor for requests authorized for permission `P`.
///
/// The handler body only runs when the gate accepted the request; the
/// verified claims are handed over in `claims`.
///
/// # Example
///
/// ```rust,ignore
/// async fn drinks_detail(
///     Authorized { claims, .. }: Authorized<GetDrinksDetail>,
/// ) -> Json<DrinksResponse> {
///     // claims.permissions contains "get:drinks-detail"
/// }
/// ```
pub struct Authorized<P: Permission> {
    pub claims: DecodedClaims,
    pub permission: PhantomData<P>,
}

impl<P: Permission> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = GateError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = state.gate.authorize(&parts.headers, P::NAME).await?;
        Ok(Authorized {
            claims,
            permission: PhantomData,
        })
    }
}
