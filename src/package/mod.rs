//! Canonical package model.
//!
//! This module turns the query layer's raw records into deduplicated,
//! multi-arch-aware packages with a deterministic display order.

mod canonical;
mod evr;
mod normalize;

pub use canonical::{CanonicalPackage, Variant};
pub use evr::{Evr, rpmvercmp};
pub use normalize::normalize;
