//! # kdsearch
//!
//! `kdsearch` answers exact "which other vector is closest to this one?" queries
//! over a fixed collection of high-dimensional feature vectors. It can be used
//! from Rust or compiled to WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Balanced k-d tree**: median partitioning with axis cycling keeps the height at `ceil(log2(n + 1))`
//!   for any input order.
//! - **Exact search**: squared-distance branch pruning, with self-exclusion so a member of the
//!   indexed set finds its nearest *other* point.
//! - **Lock-free reads**: a built index is immutable; batch queries run in parallel with rayon and
//!   a [`Catalog`] swaps in rebuilt indexes atomically.
//! - **WASM-first**: `NearestIndex` exposes the catalog to JavaScript through `wasm-bindgen`.
//!
//! ## Main Interface
//!
//! [`build_index`], [`query_nearest`] and [`destroy_index`] operate on an [`Index`] built from
//! [`Point`]s. [`load_points`] reads the comma-separated vector dump produced by the feature
//! extractor, and [`Catalog`] maps query ids to search responses.

mod builder;
mod catalog;
mod config;
mod error;
mod index;
mod ingest;
mod point;
mod search;
mod tree;
mod wasm;

pub use builder::build_tree;
pub use catalog::Catalog;
pub use catalog::SearchResponse;
pub use catalog::Snapshot;
pub use config::BuildStrategy;
pub use config::Config;
pub use config::IndexConfig;
pub use config::IngestConfig;
pub use config::DEFAULT_DIMENSION;
pub use config::DEFAULT_LIMIT;
pub use error::Error;
pub use error::Result;
pub use index::build_index;
pub use index::destroy_index;
pub use index::query_nearest;
pub use index::Index;
pub use index::Match;
pub use ingest::load_points;
pub use ingest::parse_points;
pub use point::distance_squared;
pub use point::Point;
pub use search::Nearest;
pub use tree::KdNode;
pub use tree::KdTree;
pub use tree::NodeId;
pub use tree::NodePreview;
pub use wasm::NearestIndex;
