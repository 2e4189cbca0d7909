// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RBAC permissions for authorization.
//!
//! ## Permissions
//!
//! - `get:drinks-detail` - Read the full recipe of every drink (barista)
//! - `post:drinks` - Add drinks to the menu (manager)
//! - `patch:drinks` - Edit drinks (manager)
//! - `delete:drinks` - Remove drinks (manager)

use super::{AuthError, DecodedClaims};

/// A permission string a route requires, named at the type level.
pub trait Permission: Send + Sync + 'static {
    /// Permission string as issued by the authority; empty means none required.
    const NAME: &'static str;
}

/// `get:drinks-detail`
pub struct GetDrinksDetail;

impl Permission for GetDrinksDetail {
    const NAME: &'static str = "get:drinks-detail";
}

/// `post:drinks`
pub struct PostDrinks;

impl Permission for PostDrinks {
    const NAME: &'static str = "post:drinks";
}

/// `patch:drinks`
pub struct PatchDrinks;

impl Permission for PatchDrinks {
    const NAME: &'static str = "patch:drinks";
}

/// `delete:drinks`
pub struct DeleteDrinks;

impl Permission for DeleteDrinks {
    const NAME: &'static str = "delete:drinks";
}

/// Check that `claims` grant `required`.
///
/// A token without a `permissions` claim is rejected even when nothing is
/// required: it points at an authority that is not issuing RBAC data. An
/// empty `required` is otherwise always satisfied.
pub fn check_permissions<'a>(
    required: &str,
    claims: &'a DecodedClaims,
) -> Result<&'a [String], AuthError> {
    let Some(granted) = claims.permissions.as_deref() else {
        return Err(AuthError::MissingClaims);
    };

    if required.is_empty() || granted.iter().any(|p| p == required) {
        Ok(granted)
    } else {
        Err(AuthError::Forbidden)
    }
}
