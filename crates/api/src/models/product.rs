//! Product domain types.

use serde::{Deserialize, Deserializer, Serialize};

use storehouse_core::{CategoryId, Price, ProductId, ProductTag, TagId};

use super::{Category, Tag};

/// Stock level assumed when a create payload leaves it out.
pub const DEFAULT_STOCK: i32 = 10;

/// A product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub stock: i32,
    pub category_id: Option<CategoryId>,
}

/// A product with its category, tags and raw join rows attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub product_tags: Vec<ProductTag>,
}

/// Payload for `POST /api/products`.
///
/// ```json
/// { "name": "Basketball", "price": "200.00", "stock": 3, "tagIds": [1, 2, 3, 4] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    pub price: Price,
    #[serde(default = "default_stock")]
    pub stock: i32,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub tag_ids: Option<Vec<TagId>>,
}

impl CreateProduct {
    /// Tags to associate with the new product (empty when omitted).
    #[must_use]
    pub fn tag_ids(&self) -> &[TagId] {
        self.tag_ids.as_deref().unwrap_or_default()
    }
}

/// Payload for `PUT /api/products/{id}`.
///
/// Scalar fields that are omitted keep their stored value. `categoryId` may
/// also be `null`, which detaches the product from its category. `tagIds` is
/// the complete desired tag list: omitting it (or sending `null`) is the same as
/// sending `[]` and removes every tag from the product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub stock: Option<i32>,
    /// `None` when absent, `Some(None)` when sent as `null`.
    #[serde(default, deserialize_with = "present")]
    pub category_id: Option<Option<CategoryId>>,
    #[serde(default)]
    pub tag_ids: Option<Vec<TagId>>,
}

/// Wrap any present value (including `null`) in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UpdateProduct {
    /// The desired tag list (empty when omitted).
    #[must_use]
    pub fn tag_ids(&self) -> &[TagId] {
        self.tag_ids.as_deref().unwrap_or_default()
    }
}

const fn default_stock() -> i32 {
    DEFAULT_STOCK
}
