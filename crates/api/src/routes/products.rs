//! Product route handlers.
//!
//! Creating a product writes its initial tag associations; updating one
//! reconciles them against the submitted `tagIds` (see
//! [`crate::services::reconcile`]).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use storehouse_core::ProductId;

use crate::db::{ProductRepository, ProductTagRepository};
use crate::error::{AppError, Result};
use crate::models::{CreateProduct, MessageResponse, ProductDetails, UpdateProduct};
use crate::services::reconcile_product_tags;
use crate::state::AppState;

const NOT_FOUND: &str = "Product not found";

/// List all products with category, tags and join rows.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductDetails>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Show one product with category, tags and join rows.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetails>> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

/// Create a product and associate the tags listed in `tagIds`.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProduct>,
) -> Result<(StatusCode, Json<ProductDetails>)> {
    let product = ProductRepository::new(state.pool()).create(&body).await?;
    tracing::info!(
        product_id = %product.product.id,
        tags = product.tags.len(),
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product's fields, then make its tags match `tagIds`.
///
/// A missing `tagIds` is treated as an empty list.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProduct>,
) -> Result<Json<MessageResponse>> {
    if !ProductRepository::new(state.pool()).update(id, &body).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    let store = ProductTagRepository::new(state.pool());
    let outcome = reconcile_product_tags(&store, id, body.tag_ids()).await?;
    tracing::info!(
        product_id = %id,
        added = outcome.added,
        removed = outcome.removed,
        "Product updated"
    );

    Ok(Json(MessageResponse::new("Product updated successfully")))
}

/// Delete a product and its tag associations.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    if !ProductRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    tracing::info!(product_id = %id, "Product deleted");
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
