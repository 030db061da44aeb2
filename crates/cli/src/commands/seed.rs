//! Seed the catalog with sample data.
//!
//! Rows are written through the API repositories, so seeded products get their
//! tag associations exactly the way `POST /api/products` creates them.

use tracing::info;

use storehouse_api::db::{CategoryRepository, ProductRepository, TagRepository};
use storehouse_api::models::{CreateCategory, CreateProduct, CreateTag};
use storehouse_core::{CategoryId, Price, TagId};

use super::connect;

const CATEGORIES: &[&str] = &["Shirts", "Shorts", "Music", "Hats", "Shoes"];

const TAGS: &[&str] = &[
    "rock music",
    "pop music",
    "blue",
    "red",
    "green",
    "white",
    "gold",
    "pop culture",
];

/// A sample product. `category` and `tags` index into [`CATEGORIES`] and
/// [`TAGS`].
struct SeedProduct {
    name: &'static str,
    price_cents: i64,
    stock: i32,
    category: usize,
    tags: &'static [usize],
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Plain T-Shirt",
        price_cents: 1499,
        stock: 14,
        category: 0,
        tags: &[5, 6, 7],
    },
    SeedProduct {
        name: "Running Sneakers",
        price_cents: 9000,
        stock: 25,
        category: 4,
        tags: &[5],
    },
    SeedProduct {
        name: "Branded Baseball Hat",
        price_cents: 2299,
        stock: 12,
        category: 3,
        tags: &[0, 2, 3, 4],
    },
    SeedProduct {
        name: "Top 40 Music Compilation Vinyl Record",
        price_cents: 1299,
        stock: 50,
        category: 2,
        tags: &[0, 1, 7],
    },
    SeedProduct {
        name: "Cargo Shorts",
        price_cents: 2999,
        stock: 22,
        category: 1,
        tags: &[2],
    },
];

/// Seed categories, tags and products.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run(reset: bool) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    if reset {
        sqlx::query("TRUNCATE product_tag, product, tag, category RESTART IDENTITY CASCADE")
            .execute(&pool)
            .await?;
        info!("Cleared catalog tables");
    }

    let categories = CategoryRepository::new(&pool);
    let mut category_ids: Vec<CategoryId> = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        let category = categories
            .create(&CreateCategory {
                name: (*name).to_string(),
            })
            .await?;
        category_ids.push(category.id);
    }
    info!(count = category_ids.len(), "Seeded categories");

    let tags = TagRepository::new(&pool);
    let mut tag_ids: Vec<TagId> = Vec::with_capacity(TAGS.len());
    for name in TAGS {
        let tag = tags
            .create(&CreateTag {
                name: (*name).to_string(),
            })
            .await?;
        tag_ids.push(tag.id);
    }
    info!(count = tag_ids.len(), "Seeded tags");

    let products = ProductRepository::new(&pool);
    for seed in PRODUCTS {
        let input = CreateProduct {
            name: seed.name.to_string(),
            price: Price::from_cents(seed.price_cents)?,
            stock: seed.stock,
            category_id: Some(
                *category_ids
                    .get(seed.category)
                    .ok_or("seed product has an unknown category")?,
            ),
            tag_ids: Some(
                seed.tags
                    .iter()
                    .map(|&i| tag_ids.get(i).copied().ok_or("seed product has an unknown tag"))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };
        let product = products.create(&input).await?;
        info!(product_id = %product.product.id, name = seed.name, "Seeded product");
    }

    info!(products = PRODUCTS.len(), "Seeding complete!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_products_reference_known_rows() {
        for product in PRODUCTS {
            assert!(product.category < CATEGORIES.len(), "{}", product.name);
            assert!(
                product.tags.iter().all(|&tag| tag < TAGS.len()),
                "{}",
                product.name
            );
            assert!(Price::from_cents(product.price_cents).is_ok());
        }
    }
}
