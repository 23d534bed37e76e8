//! Application layer - use cases that coordinate the aggregation pipeline.
//!
//! This layer wires the query adapter into the pure transformation stages
//! and hands the finished site model to the renderer.

mod generate;

pub use generate::{Config, DEFAULT_RECENTS, Filters, GenerateAction};
