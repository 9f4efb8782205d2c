//! Merchandise listing and admin CRUD.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{Result, StagedoorError};
use crate::store::{Product, ProductPatch};

use super::AppState;

pub async fn list_products(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Product>>> {
    let products = state.store.products().await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product = state
        .store
        .product(&id)
        .await?
        .ok_or(StagedoorError::NotFound)?;
    Ok(Json(product))
}

/// A price must be a finite, non-negative dollar amount before it can be
/// turned into provider cents at checkout.
fn ensure_valid_price(product: &Product) -> Result<()> {
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(StagedoorError::InvalidJson);
    }
    Ok(())
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Product>)> {
    let product: Product =
        serde_json::from_slice(&body).map_err(|_| StagedoorError::InvalidJson)?;
    ensure_valid_price(&product)?;
    let created = state.store.create_product(product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Product>> {
    let patch: ProductPatch =
        serde_json::from_slice(&body).map_err(|_| StagedoorError::InvalidJson)?;

    let mut product = state
        .store
        .product(&id)
        .await?
        .ok_or(StagedoorError::NotFound)?;
    product.apply(patch);
    ensure_valid_price(&product)?;

    let updated = state.store.update_product(product).await?;
    Ok(Json(updated))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.store.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
