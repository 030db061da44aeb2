//! Product tag reconciliation.
//!
//! Brings a product's `product_tag` rows in line with a client-submitted tag
//! list using the fewest inserts and deletes. The diff itself comes from
//! [`TagDiff`]; this module loads the current rows, then dispatches the
//! insert and the delete concurrently and waits for both.
//!
//! There is no compensation between the two halves: if one fails after the
//! other succeeded, the successful half stays applied and the returned
//! [`ReconcileError`] says which half failed. Sending the same tag list again
//! completes the reconciliation.

use std::future::Future;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use storehouse_core::{ProductId, ProductTag, ProductTagId, TagDiff, TagId};

use crate::db::RepositoryError;

/// Storage for product/tag join rows.
///
/// Implemented by [`crate::db::ProductTagRepository`] for `PostgreSQL`.
pub trait ProductTagStore: Send + Sync {
    /// All join rows for one product.
    fn find_by_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Vec<ProductTag>, RepositoryError>> + Send;

    /// Insert one join row per tag id, returning how many were written.
    fn insert_many(
        &self,
        product_id: ProductId,
        tag_ids: &[TagId],
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    /// Delete join rows by primary key, returning how many were removed.
    fn delete_by_ids(
        &self,
        ids: &[ProductTagId],
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;
}

/// What a reconciliation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Join rows inserted.
    pub added: u64,
    /// Join rows deleted.
    pub removed: u64,
}

/// Failure while reconciling a product's tags.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The current rows could not be read; nothing was changed.
    #[error("failed to load product tags: {0}")]
    Load(#[source] RepositoryError),

    /// The insert failed; any deletes were applied.
    #[error("failed to insert product tags: {0}")]
    Insert(#[source] RepositoryError),

    /// The delete failed; any inserts were applied.
    #[error("failed to delete product tags: {0}")]
    Delete(#[source] RepositoryError),

    /// Both halves failed; nothing was changed.
    #[error("failed to insert product tags ({insert}) and to delete product tags ({delete})")]
    Both {
        insert: RepositoryError,
        delete: RepositoryError,
    },
}

impl ReconcileError {
    /// Returns `true` if every failure was caused by the submitted data
    /// (for example a tag id that does not exist).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        match self {
            Self::Load(err) | Self::Insert(err) | Self::Delete(err) => err.is_client_error(),
            Self::Both { insert, delete } => insert.is_client_error() && delete.is_client_error(),
        }
    }
}

/// Make the tags of `product_id` equal to the set of `desired` tag ids.
///
/// The product is assumed to exist. An empty `desired` list removes every
/// tag. When the rows already match, no insert or delete is issued.
///
/// # Errors
///
/// Returns `ReconcileError` naming the step that failed.
#[instrument(skip_all, fields(product_id = %product_id, desired = desired.len()))]
pub async fn reconcile_product_tags<S: ProductTagStore>(
    store: &S,
    product_id: ProductId,
    desired: &[TagId],
) -> Result<ReconcileOutcome, ReconcileError> {
    let current = store
        .find_by_product(product_id)
        .await
        .map_err(ReconcileError::Load)?;

    let diff = TagDiff::compute(&current, desired);
    if diff.is_empty() {
        debug!("Product tags already up to date");
        return Ok(ReconcileOutcome::default());
    }

    let insert = async {
        if diff.to_add.is_empty() {
            Ok(0)
        } else {
            store.insert_many(product_id, &diff.to_add).await
        }
    };
    let delete = async {
        if diff.to_remove.is_empty() {
            Ok(0)
        } else {
            store.delete_by_ids(&diff.to_remove).await
        }
    };

    match tokio::join!(insert, delete) {
        (Ok(added), Ok(removed)) => {
            debug!(added, removed, "Reconciled product tags");
            Ok(ReconcileOutcome { added, removed })
        }
        (Err(err), Ok(removed)) => {
            warn!(removed, error = %err, "Product tag insert failed, deletes were applied");
            Err(ReconcileError::Insert(err))
        }
        (Ok(added), Err(err)) => {
            warn!(added, error = %err, "Product tag delete failed, inserts were applied");
            Err(ReconcileError::Delete(err))
        }
        (Err(insert), Err(delete)) => Err(ReconcileError::Both { insert, delete }),
    }
}
