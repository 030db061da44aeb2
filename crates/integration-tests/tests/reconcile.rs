//! Tag reconciliation through the public service API, with an in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::Barrier;

use storehouse_api::db::RepositoryError;
use storehouse_api::services::{ProductTagStore, ReconcileError, reconcile_product_tags};
use storehouse_core::{ProductId, ProductTag, ProductTagId, TagId};

/// Join rows for every product, keyed by a growing id.
#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<ProductTag>>,
    next_id: Mutex<i32>,
    fail_delete: bool,
}

impl MemoryStore {
    fn seed(&self, product_id: ProductId, tag_ids: &[i32]) {
        let tag_ids: Vec<TagId> = tag_ids.iter().copied().map(TagId::new).collect();
        self.push(product_id, &tag_ids);
    }

    fn push(&self, product_id: ProductId, tag_ids: &[TagId]) {
        let mut rows = self.rows.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();
        for &tag_id in tag_ids {
            *next_id += 1;
            rows.push(ProductTag {
                id: ProductTagId::new(*next_id),
                product_id,
                tag_id,
            });
        }
    }

    fn tags_of(&self, product_id: ProductId) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.product_id == product_id)
            .map(|row| row.tag_id.as_i32())
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl ProductTagStore for MemoryStore {
    async fn find_by_product(&self, product_id: ProductId) -> Result<Vec<ProductTag>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.product_id == product_id)
            .copied()
            .collect())
    }

    async fn insert_many(&self, product_id: ProductId, tag_ids: &[TagId]) -> Result<u64, RepositoryError> {
        self.push(product_id, tag_ids);
        Ok(tag_ids.len() as u64)
    }

    async fn delete_by_ids(&self, ids: &[ProductTagId]) -> Result<u64, RepositoryError> {
        if self.fail_delete {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| !ids.contains(&row.id));
        Ok((before - rows.len()) as u64)
    }
}

fn tags(ids: &[i32]) -> Vec<TagId> {
    ids.iter().copied().map(TagId::new).collect()
}

#[tokio::test]
async fn test_result_matches_desired_set() {
    let cases: &[(&[i32], &[i32])] = &[
        (&[], &[1, 2, 3]),
        (&[1, 2, 3], &[]),
        (&[1, 2], &[2, 3]),
        (&[1, 2, 3], &[3, 2, 1]),
        (&[4], &[4, 4, 5, 5]),
        (&[1, 1, 2], &[1]),
    ];

    for (index, &(current, desired)) in cases.iter().enumerate() {
        let store = MemoryStore::default();
        let product = ProductId::new(i32::try_from(index).unwrap() + 1);
        store.seed(product, current);

        reconcile_product_tags(&store, product, &tags(desired))
            .await
            .unwrap();

        let mut expected = desired.to_vec();
        expected.sort_unstable();
        expected.dedup();
        assert_eq!(store.tags_of(product), expected, "{current:?} -> {desired:?}");
    }
}

#[tokio::test]
async fn test_other_products_are_untouched() {
    let store = MemoryStore::default();
    let (shirt, hat) = (ProductId::new(1), ProductId::new(2));
    store.seed(shirt, &[1, 2]);
    store.seed(hat, &[1, 2]);

    reconcile_product_tags(&store, shirt, &tags(&[3])).await.unwrap();

    assert_eq!(store.tags_of(shirt), vec![3]);
    assert_eq!(store.tags_of(hat), vec![1, 2]);
}

#[tokio::test]
async fn test_repeating_an_update_changes_nothing() {
    let store = MemoryStore::default();
    let product = ProductId::new(1);
    store.seed(product, &[1, 2]);

    let first = reconcile_product_tags(&store, product, &tags(&[2, 3]))
        .await
        .unwrap();
    let second = reconcile_product_tags(&store, product, &tags(&[2, 3]))
        .await
        .unwrap();

    assert_eq!((first.added, first.removed), (1, 1));
    assert_eq!((second.added, second.removed), (0, 0));
}

#[tokio::test]
async fn test_failed_delete_keeps_inserts() {
    let store = MemoryStore {
        fail_delete: true,
        ..MemoryStore::default()
    };
    let product = ProductId::new(1);
    store.seed(product, &[1]);

    let err = reconcile_product_tags(&store, product, &tags(&[2]))
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcileError::Delete(_)));
    assert!(!err.is_client_error());
    assert_eq!(store.tags_of(product), vec![1, 2]);
}

/// Store whose insert and delete each wait until the other has started.
struct RendezvousStore {
    inner: MemoryStore,
    barrier: Barrier,
}

impl ProductTagStore for RendezvousStore {
    async fn find_by_product(&self, product_id: ProductId) -> Result<Vec<ProductTag>, RepositoryError> {
        self.inner.find_by_product(product_id).await
    }

    async fn insert_many(&self, product_id: ProductId, tag_ids: &[TagId]) -> Result<u64, RepositoryError> {
        self.barrier.wait().await;
        self.inner.insert_many(product_id, tag_ids).await
    }

    async fn delete_by_ids(&self, ids: &[ProductTagId]) -> Result<u64, RepositoryError> {
        self.barrier.wait().await;
        self.inner.delete_by_ids(ids).await
    }
}

#[tokio::test]
async fn test_insert_and_delete_run_concurrently() {
    let store = RendezvousStore {
        inner: MemoryStore::default(),
        barrier: Barrier::new(2),
    };
    let product = ProductId::new(1);
    store.inner.seed(product, &[1]);

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        reconcile_product_tags(&store, product, &tags(&[2])),
    )
    .await
    .expect("insert and delete should be in flight together")
    .unwrap();

    assert_eq!((outcome.added, outcome.removed), (1, 1));
    assert_eq!(store.inner.tags_of(product), vec![2]);
}
