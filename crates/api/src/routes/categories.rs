//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use storehouse_core::CategoryId;

use crate::db::CategoryRepository;
use crate::error::{AppError, Result};
use crate::models::{Category, CategoryWithProducts, CreateCategory, MessageResponse, UpdateCategory};
use crate::state::AppState;

const NOT_FOUND: &str = "Category not found";

/// List all categories with their products.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<CategoryWithProducts>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// Show one category with its products.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<CategoryWithProducts>> {
    CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

/// Create a category.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateCategory>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = CategoryRepository::new(state.pool()).create(&body).await?;
    tracing::info!(category_id = %category.id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(body): Json<UpdateCategory>,
) -> Result<Json<MessageResponse>> {
    if !CategoryRepository::new(state.pool()).update(id, &body).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(MessageResponse::new("Category updated successfully")))
}

/// Delete a category.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<MessageResponse>> {
    if !CategoryRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    tracing::info!(category_id = %id, "Category deleted");
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
