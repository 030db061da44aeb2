//! Category repository.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{debug, instrument};

use storehouse_core::CategoryId;

use super::RepositoryError;
use crate::models::{Category, CategoryWithProducts, CreateCategory, Product, UpdateCategory};

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every category with its products attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<CategoryWithProducts>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name
            FROM category
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        self.attach_products(categories).await
    }

    /// Get a category by ID with its products attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip_all, fields(category_id = %id))]
    pub async fn get(&self, id: CategoryId) -> Result<Option<CategoryWithProducts>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name
            FROM category
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match category {
            Some(category) => Ok(self.attach_products(vec![category]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Create a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the name is rejected by the schema.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip_all)]
    pub async fn create(&self, input: &CreateCategory) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO category (name)
            VALUES ($1)
            RETURNING id, name
            ",
        )
        .bind(&input.name)
        .fetch_one(self.pool)
        .await?;

        debug!(category_id = %category.id, "Created category");
        Ok(category)
    }

    /// Update a category's fields.
    ///
    /// Returns `false` if no category has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the new values are rejected by the schema.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip_all, fields(category_id = %id))]
    pub async fn update(&self, id: CategoryId, input: &UpdateCategory) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE category
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

    /// Delete a category. Its products are kept with `category_id` cleared.
    ///
    /// Returns `false` if no category has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip_all, fields(category_id = %id))]
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Load the products of all `categories` in one query and group them.
    async fn attach_products(
        &self,
        categories: Vec<Category>,
    ) -> Result<Vec<CategoryWithProducts>, RepositoryError> {
        let ids: Vec<CategoryId> = categories.iter().map(|c| c.id).collect();

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, price, stock, category_id
            FROM product
            WHERE category_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_category: HashMap<CategoryId, Vec<Product>> = HashMap::new();
        for product in products {
            if let Some(category_id) = product.category_id {
                by_category.entry(category_id).or_default().push(product);
            }
        }

        Ok(categories
            .into_iter()
            .map(|category| CategoryWithProducts {
                products: by_category.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect())
    }
}
