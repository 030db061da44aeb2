//! Tag route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use storehouse_core::TagId;

use crate::db::TagRepository;
use crate::error::{AppError, Result};
use crate::models::{CreateTag, MessageResponse, Tag, TagWithProducts, UpdateTag};
use crate::state::AppState;

const NOT_FOUND: &str = "Tag not found";

/// List all tags with their products.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<TagWithProducts>>> {
    let tags = TagRepository::new(state.pool()).list().await?;
    Ok(Json(tags))
}

/// Show one tag with its products.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<TagId>,
) -> Result<Json<TagWithProducts>> {
    TagRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

/// Create a tag.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateTag>,
) -> Result<(StatusCode, Json<Tag>)> {
    let tag = TagRepository::new(state.pool()).create(&body).await?;
    tracing::info!(tag_id = %tag.id, "Tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Update a tag.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<TagId>,
    Json(body): Json<UpdateTag>,
) -> Result<Json<MessageResponse>> {
    if !TagRepository::new(state.pool()).update(id, &body).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(MessageResponse::new("Tag updated successfully")))
}

/// Delete a tag.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<TagId>,
) -> Result<Json<MessageResponse>> {
    if !TagRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    tracing::info!(tag_id = %id, "Tag deleted");
    Ok(Json(MessageResponse::new("Tag deleted successfully")))
}
