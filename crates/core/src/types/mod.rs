//! Core types for Stocklink.
//!
//! This module provides type-safe wrappers for the identifiers that cross
//! the two vendor platforms, and the catalog item shapes the fetchers
//! produce.

pub mod id;
pub mod item;

pub use id::*;
pub use item::*;
