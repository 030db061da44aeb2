//! Business logic that spans more than one repository call.

pub mod reconcile;

pub use reconcile::{ProductTagStore, ReconcileError, ReconcileOutcome, reconcile_product_tags};
