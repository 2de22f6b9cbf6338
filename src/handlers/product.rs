// src/handlers/product.rs
use axum::{extract::State, http::StatusCode, Json};
use http::header::LOCATION;
use tracing::instrument;

use crate::dtos::product::ProductRequest;
use crate::error::AppError;
use crate::extractors::{IdPath, ValidatedJson};
use crate::models::product::Product;
use crate::routes::products::product_location;
use crate::state::AppState;

// GET /products - List all products
#[instrument(skip(state))]
pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.products.list().await?;
    Ok(Json(products))
}

// GET /products/{id} - Get single product
#[instrument(skip(state))]
pub async fn get_product(
    IdPath(id): IdPath,
    State(state): State<AppState>,
) -> Result<Json<Product>, AppError> {
    let product = state.products.get(id).await?;
    Ok(Json(product))
}

// POST /products - Create new product
#[instrument(skip(state, input))]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ProductRequest>,
) -> Result<(StatusCode, [(http::HeaderName, String); 1], Json<Product>), AppError> {
    let product = state.products.create(input).await?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, product_location(product.id))],
        Json(product),
    ))
}

// PUT /products/{id} - Replace name, price and stock
#[instrument(skip(state, input))]
pub async fn update_product(
    IdPath(id): IdPath,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ProductRequest>,
) -> Result<Json<Product>, AppError> {
    let product = state.products.update(id, input).await?;
    Ok(Json(product))
}

// DELETE /products/{id} - Delete product
#[instrument(skip(state))]
pub async fn delete_product(
    IdPath(id): IdPath,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
