//! Domain models and request/response payloads.
//!
//! Row types derive `sqlx::FromRow` and serialize with camelCase keys.
//! The `*With*`/`*Details` types carry eagerly loaded relations.

pub mod category;
pub mod product;
pub mod tag;

use serde::{Deserialize, Serialize};

pub use category::{Category, CategoryWithProducts, CreateCategory, UpdateCategory};
pub use product::{CreateProduct, Product, ProductDetails, UpdateProduct};
pub use tag::{CreateTag, Tag, TagWithProducts, UpdateTag};

/// A `{"message": "..."}` body used for acknowledgements and errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
