//! # kdthree
//!
//! `kdthree` is a Rust library implementing a balanced static 3D k-d tree
//! for axis-aligned box range queries, designed to be used in Rust as well
//! as compiled to WebAssembly (WASM). It targets simulation workloads where
//! the points move every iteration: the tree is rebuilt from scratch each
//! step and queried many times between rebuilds, so node storage and result
//! buffers are both built for reuse.
//!
//! ## Features
//!
//! - **Arena-backed nodes**: a tree over `n` points provisions exactly
//!   `2n - 1` node slots in one contiguous allocation, reused across
//!   rebuilds while the point count is stable.
//! - **Pruning box search**: the traversal tracks the domain of every
//!   subtree, prunes branches that cannot intersect the query and reports
//!   branches wholesale when the query encloses their domain.
//! - **Reusable result buffers**: [`SearchHits`] keeps its allocation
//!   across searches, with pull-style consumption, rewind and sort.
//! - **WASM-ready**: a `wasm-bindgen` wrapper exposes the index to
//!   JavaScript and TypeScript.
//!
//! ## Example
//!
//! ```
//! use kdthree::{KdTree, SearchHits};
//!
//! let x = vec![0.0, 1.0, 0.0, 1.0];
//! let y = vec![0.0, 0.0, 1.0, 1.0];
//! let z = vec![0.0, 0.0, 0.0, 0.0];
//!
//! let mut tree = KdTree::new();
//! let mut hits = SearchHits::new();
//!
//! tree.build(&x, &y, &z);
//! tree.search_cube(0.0, 0.0, 0.0, 0.5, &mut hits);
//! assert_eq!(hits.as_slice(), &[0]);
//! ```
//!
//! ## Main Interface
//!
//! The primary entry point is the [`KdTree`] struct; searches fill a
//! caller-owned [`SearchHits`]. JavaScript callers go through
//! [`SearchIndex`] instead, which owns both halves of that pair.

mod arena;
mod bounds;
mod iter;
mod search;
mod tree;
mod wasm;

pub use bounds::Axis;
pub use bounds::Space;
pub use iter::SearchHits;
pub use tree::DataPoint;
pub use tree::KdTree;
pub use wasm::SearchIndex;
