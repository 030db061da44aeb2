//! Core types for Storehouse.
//!
//! This module provides type-safe wrappers for catalog domain concepts.

pub mod id;
pub mod price;
pub mod product_tag;

pub use id::*;
pub use price::{Price, PriceError};
pub use product_tag::ProductTag;
