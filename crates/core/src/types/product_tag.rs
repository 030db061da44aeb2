//! The product/tag join row.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, ProductTagId, TagId};

/// One association between a product and a tag.
///
/// Rows are never addressed by clients directly; they are written in bulk
/// when a product is created and reconciled when its tag list changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductTag {
    pub id: ProductTagId,
    pub product_id: ProductId,
    pub tag_id: TagId,
}
