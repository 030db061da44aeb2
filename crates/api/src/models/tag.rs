//! Tag domain types.

use serde::{Deserialize, Serialize};

use storehouse_core::TagId;

use super::Product;

/// A product tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// A tag together with the products carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagWithProducts {
    #[serde(flatten)]
    pub tag: Tag,
    pub products: Vec<Product>,
}

/// Payload for `POST /api/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
}

/// Payload for `PUT /api/tags/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTag {
    #[serde(default)]
    pub name: Option<String>,
}
