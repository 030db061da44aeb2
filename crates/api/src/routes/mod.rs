//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (database)
//!
//! # Categories
//! GET    /api/categories         - List categories with their products
//! GET    /api/categories/{id}    - One category with its products
//! POST   /api/categories         - Create a category
//! PUT    /api/categories/{id}    - Update a category
//! DELETE /api/categories/{id}    - Delete a category
//!
//! # Tags
//! GET    /api/tags               - List tags with their products
//! GET    /api/tags/{id}          - One tag with its products
//! POST   /api/tags               - Create a tag
//! PUT    /api/tags/{id}          - Update a tag
//! DELETE /api/tags/{id}          - Delete a tag
//!
//! # Products
//! GET    /api/products           - List products with category and tags
//! GET    /api/products/{id}      - One product with category and tags
//! POST   /api/products           - Create a product (optional `tagIds`)
//! PUT    /api/products/{id}      - Update a product and reconcile its tags
//! DELETE /api/products/{id}      - Delete a product
//! ```

pub mod categories;
pub mod health;
pub mod products;
pub mod tags;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/{id}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::destroy),
        )
}

/// Create the tag routes router.
pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::index).post(tags::create))
        .route(
            "/{id}",
            get(tags::show).put(tags::update).delete(tags::destroy),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/categories", category_routes())
        .nest("/api/tags", tag_routes())
        .nest("/api/products", product_routes())
}
