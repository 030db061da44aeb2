//! Product/tag join rows.
//!
//! The bulk insert is exposed as a free function over any executor so product
//! creation can run it inside its own transaction.

use sqlx::{PgExecutor, PgPool};
use tracing::{debug, instrument};

use storehouse_core::{ProductId, ProductTag, ProductTagId, TagId};

use super::RepositoryError;
use crate::services::reconcile::ProductTagStore;

/// Insert one `product_tag` row per tag id, in the given order.
///
/// # Errors
///
/// Returns `RepositoryError::Constraint` if a tag or the product does not exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert_product_tags<'e, E>(
    executor: E,
    product_id: ProductId,
    tag_ids: &[TagId],
) -> Result<u64, RepositoryError>
where
    E: PgExecutor<'e>,
{
    if tag_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        r"
        INSERT INTO product_tag (product_id, tag_id)
        SELECT $1, t.tag_id
        FROM UNNEST($2::int4[]) WITH ORDINALITY AS t(tag_id, ord)
        ORDER BY t.ord
        ",
    )
    .bind(product_id)
    .bind(tag_ids)
    .execute(executor)
    .await?;

    debug!(
        product_id = %product_id,
        inserted = result.rows_affected(),
        "Inserted product tags"
    );
    Ok(result.rows_affected())
}

/// Repository for `product_tag` rows.
pub struct ProductTagRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductTagRepository<'a> {
    /// Create a new product tag repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl ProductTagStore for ProductTagRepository<'_> {
    #[instrument(skip_all, fields(product_id = %product_id))]
    async fn find_by_product(&self, product_id: ProductId) -> Result<Vec<ProductTag>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductTag>(
            r"
            SELECT id, product_id, tag_id
            FROM product_tag
            WHERE product_id = $1
            ORDER BY id
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    #[instrument(skip_all, fields(product_id = %product_id, count = tag_ids.len()))]
    async fn insert_many(&self, product_id: ProductId, tag_ids: &[TagId]) -> Result<u64, RepositoryError> {
        insert_product_tags(self.pool, product_id, tag_ids).await
    }

    #[instrument(skip_all, fields(count = ids.len()))]
    async fn delete_by_ids(&self, ids: &[ProductTagId]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM product_tag WHERE id = ANY($1)")
            .bind(ids)
            .execute(self.pool)
            .await?;

        debug!(deleted = result.rows_affected(), "Deleted product tags");
        Ok(result.rows_affected())
    }
}
