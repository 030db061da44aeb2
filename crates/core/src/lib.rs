//! Storehouse Core - Shared types library.
//!
//! This crate provides common types used across all Storehouse components:
//! - `api` - JSON CRUD server for categories, products and tags
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used
//! anywhere. The optional `postgres` feature adds `sqlx` encode/decode impls.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices, plus the
//!   product/tag join row
//! - [`reconcile`] - Diff between a product's current and desired tags

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod reconcile;
pub mod types;

pub use reconcile::TagDiff;
pub use types::*;
