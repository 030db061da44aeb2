//! Product repository.
//!
//! Reads always return [`ProductDetails`]: the product row plus its category,
//! its tags and the raw `product_tag` rows, loaded with one query per relation
//! rather than one per product.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use storehouse_core::{CategoryId, ProductId, ProductTag, TagDiff, TagId};

use super::RepositoryError;
use super::product_tags::insert_product_tags;
use crate::models::{Category, CreateProduct, Product, ProductDetails, Tag, UpdateProduct};

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product with its relations attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<ProductDetails>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, price, stock, category_id
            FROM product
            ORDER BY id
            ",
        )
        .fetch_all(&mut *conn)
        .await?;

        load_details(&mut conn, products).await
    }

    /// Get a product by ID with its relations attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductDetails>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, price, stock, category_id
            FROM product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        match product {
            Some(product) => Ok(load_details(&mut conn, vec![product]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Create a product and associate it with `input.tag_ids`.
    ///
    /// The product row and its tag rows are written in one transaction, so an
    /// unknown tag id leaves no half-created product behind. Repeated tag ids
    /// produce a single association.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the category or a tag does not
    /// exist, or a value is rejected by the schema.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip_all, fields(tags = input.tag_ids().len()))]
    pub async fn create(&self, input: &CreateProduct) -> Result<ProductDetails, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO product (name, price, stock, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, stock, category_id
            ",
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        let product_id = product.id;
        let tag_ids = TagDiff::compute(&[], input.tag_ids()).to_add;
        insert_product_tags(&mut *tx, product_id, &tag_ids).await?;

        let details = load_details(&mut tx, vec![product]).await?.pop();
        tx.commit().await?;

        debug!(product_id = %product_id, "Created product");
        details.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("product {product_id} missing after insert"))
        })
    }

    /// Update a product's scalar fields. Tags are reconciled separately.
    ///
    /// An explicit `categoryId: null` clears the category; an absent one keeps it.
    ///
    /// Returns `false` if no product has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the category does not exist or
    /// a value is rejected by the schema.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn update(&self, id: ProductId, input: &UpdateProduct) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE product
            SET name = COALESCE($2, name),
                price = COALESCE($3, price),
                stock = COALESCE($4, stock),
                category_id = CASE WHEN $5 THEN $6 ELSE category_id END
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id.is_some())
        .bind(input.category_id.flatten())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a product. Its `product_tag` rows are removed by the foreign key cascade.
    ///
    /// Returns `false` if no product has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Attach category, tags and join rows to each product.
async fn load_details(
    conn: &mut PgConnection,
    products: Vec<Product>,
) -> Result<Vec<ProductDetails>, RepositoryError> {
    let product_ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
    let category_ids: Vec<CategoryId> = products.iter().filter_map(|p| p.category_id).collect();

    let categories: HashMap<CategoryId, Category> = sqlx::query_as::<_, Category>(
        r"
        SELECT id, name
        FROM category
        WHERE id = ANY($1)
        ",
    )
    .bind(&category_ids)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|category| (category.id, category))
    .collect();

    let product_tags = sqlx::query_as::<_, ProductTag>(
        r"
        SELECT id, product_id, tag_id
        FROM product_tag
        WHERE product_id = ANY($1)
        ORDER BY id
        ",
    )
    .bind(&product_ids)
    .fetch_all(&mut *conn)
    .await?;

    let tag_ids: Vec<TagId> = product_tags.iter().map(|pt| pt.tag_id).collect();
    let tags: HashMap<TagId, Tag> = sqlx::query_as::<_, Tag>(
        r"
        SELECT id, name
        FROM tag
        WHERE id = ANY($1)
        ",
    )
    .bind(&tag_ids)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|tag| (tag.id, tag))
    .collect();

    let mut rows_by_product: HashMap<ProductId, Vec<ProductTag>> = HashMap::new();
    for row in product_tags {
        rows_by_product.entry(row.product_id).or_default().push(row);
    }

    Ok(products
        .into_iter()
        .map(|product| {
            let product_tags = rows_by_product.remove(&product.id).unwrap_or_default();

            let mut product_tag_ids: Vec<TagId> = Vec::with_capacity(product_tags.len());
            for row in &product_tags {
                if !product_tag_ids.contains(&row.tag_id) {
                    product_tag_ids.push(row.tag_id);
                }
            }

            ProductDetails {
                category: product
                    .category_id
                    .and_then(|id| categories.get(&id).cloned()),
                tags: product_tag_ids
                    .iter()
                    .filter_map(|id| tags.get(id).cloned())
                    .collect(),
                product_tags,
                product,
            }
        })
        .collect())
}
