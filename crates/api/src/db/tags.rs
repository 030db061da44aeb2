//! Tag repository.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{debug, instrument};

use storehouse_core::TagId;

use super::RepositoryError;
use crate::models::{CreateTag, Product, Tag, TagWithProducts, UpdateTag};

/// A product row joined through `product_tag`, tagged with the tag it came from.
#[derive(sqlx::FromRow)]
struct TaggedProductRow {
    tag_id: TagId,
    #[sqlx(flatten)]
    product: Product,
}

/// Repository for tag database operations.
pub struct TagRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepository<'a> {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every tag with the products carrying it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<TagWithProducts>, RepositoryError> {
        let tags = sqlx::query_as::<_, Tag>(
            r"
            SELECT id, name
            FROM tag
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        self.attach_products(tags).await
    }

    /// Get a tag by ID with the products carrying it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip_all, fields(tag_id = %id))]
    pub async fn get(&self, id: TagId) -> Result<Option<TagWithProducts>, RepositoryError> {
        let tag = sqlx::query_as::<_, Tag>(
            r"
            SELECT id, name
            FROM tag
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match tag {
            Some(tag) => Ok(self.attach_products(vec![tag]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Create a new tag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the name is rejected by the schema.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip_all)]
    pub async fn create(&self, input: &CreateTag) -> Result<Tag, RepositoryError> {
        let tag = sqlx::query_as::<_, Tag>(
            r"
            INSERT INTO tag (name)
            VALUES ($1)
            RETURNING id, name
            ",
        )
        .bind(&input.name)
        .fetch_one(self.pool)
        .await?;

        debug!(tag_id = %tag.id, "Created tag");
        Ok(tag)
    }

    /// Update a tag's fields.
    ///
    /// Returns `false` if no tag has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the new values are rejected by the schema.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip_all, fields(tag_id = %id))]
    pub async fn update(&self, id: TagId, input: &UpdateTag) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE tag
            SET name = COALESCE($2, name)
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(input.name.as_deref())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a tag together with its product associations.
    ///
    /// Returns `false` if no tag has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip_all, fields(tag_id = %id))]
    pub async fn delete(&self, id: TagId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM tag WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn attach_products(&self, tags: Vec<Tag>) -> Result<Vec<TagWithProducts>, RepositoryError> {
        let ids: Vec<TagId> = tags.iter().map(|t| t.id).collect();

        let rows = sqlx::query_as::<_, TaggedProductRow>(
            r"
            SELECT DISTINCT pt.tag_id, p.id, p.name, p.price, p.stock, p.category_id
            FROM product_tag pt
            JOIN product p ON p.id = pt.product_id
            WHERE pt.tag_id = ANY($1)
            ORDER BY pt.tag_id, p.id
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_tag: HashMap<TagId, Vec<Product>> = HashMap::new();
        for row in rows {
            by_tag.entry(row.tag_id).or_default().push(row.product);
        }

        Ok(tags
            .into_iter()
            .map(|tag| TagWithProducts {
                products: by_tag.remove(&tag.id).unwrap_or_default(),
                tag,
            })
            .collect())
    }
}
