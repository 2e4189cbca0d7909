// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drink menu endpoints.
//!
//! The public menu is open to everyone; every other route requires the
//! matching Auth0 permission via [`Authorized`].

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    Json,
};

use crate::{
    auth::{
        permissions::{DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks},
        Authorized,
    },
    error::ApiError,
    models::{
        CreateDrinkRequest, DeleteDrinkResponse, DrinkSummariesResponse, DrinksResponse,
        UpdateDrinkRequest,
    },
    state::AppState,
};

fn drink_id(path: Result<Path<u64>, PathRejection>) -> Result<u64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::not_found("Drink not found"))
}

/// List the menu without recipes.
#[utoipa::path(
    get,
    path = "/drinks",
    tag = "Drinks",
    responses(
        (status = 200, description = "Drinks in short form", body = DrinkSummariesResponse)
    )
)]
pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinkSummariesResponse>, ApiError> {
    let drinks = state.drinks.list()?;
    Ok(Json(DrinkSummariesResponse {
        success: true,
        drinks: drinks.iter().map(|d| d.short()).collect(),
    }))
}

/// List the menu with full recipes.
#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = "Drinks",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Drinks in long form", body = DrinksResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 403, description = "Token lacks get:drinks-detail")
    )
)]
pub async fn list_drink_details(
    _auth: Authorized<GetDrinksDetail>,
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse>, ApiError> {
    Ok(Json(DrinksResponse::new(state.drinks.list()?)))
}

/// Add a drink to the menu.
#[utoipa::path(
    post,
    path = "/drinks",
    tag = "Drinks",
    security(("bearer" = [])),
    request_body = CreateDrinkRequest,
    responses(
        (status = 200, description = "Created drink", body = DrinksResponse),
        (status = 400, description = "Missing title or recipe"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 403, description = "Token lacks post:drinks"),
        (status = 422, description = "Title already on the menu")
    )
)]
pub async fn create_drink(
    Authorized { claims, .. }: Authorized<PostDrinks>,
    State(state): State<AppState>,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected drink body");
        ApiError::bad_request("Bad Request")
    })?;

    let drink = state
        .drinks
        .create(request.title, request.recipe.into_ingredients())?;
    tracing::info!(id = drink.id, sub = ?claims.sub, "Drink created");

    Ok(Json(DrinksResponse::new(vec![drink])))
}

/// Change a drink's title or recipe.
#[utoipa::path(
    patch,
    path = "/drinks/{drink_id}",
    tag = "Drinks",
    security(("bearer" = [])),
    params(("drink_id" = u64, Path, description = "Drink id")),
    request_body = UpdateDrinkRequest,
    responses(
        (status = 200, description = "Updated drink", body = DrinksResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 403, description = "Token lacks patch:drinks"),
        (status = 404, description = "Drink not found"),
        (status = 422, description = "Unreadable body or title already on the menu")
    )
)]
pub async fn update_drink(
    Authorized { claims, .. }: Authorized<PatchDrinks>,
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse>, ApiError> {
    let id = drink_id(path)?;
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected drink update body");
        ApiError::unprocessable("unprocessable")
    })?;

    let drink = state.drinks.update(
        id,
        request.title,
        request.recipe.map(|r| r.into_ingredients()),
    )?;
    tracing::info!(id, sub = ?claims.sub, "Drink updated");

    Ok(Json(DrinksResponse::new(vec![drink])))
}

/// Remove a drink from the menu.
#[utoipa::path(
    delete,
    path = "/drinks/{drink_id}",
    tag = "Drinks",
    security(("bearer" = [])),
    params(("drink_id" = u64, Path, description = "Drink id")),
    responses(
        (status = 200, description = "Id of the deleted drink", body = DeleteDrinkResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 403, description = "Token lacks delete:drinks"),
        (status = 404, description = "Drink not found")
    )
)]
pub async fn delete_drink(
    Authorized { claims, .. }: Authorized<DeleteDrinks>,
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<DeleteDrinkResponse>, ApiError> {
    let id = drink_id(path)?;
    state.drinks.delete(id)?;
    tracing::info!(id, sub = ?claims.sub, "Drink deleted");

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: id,
    }))
}
