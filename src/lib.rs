//! # btree-index
//!
//! An in-memory ordered index of `i64` keys backed by a B-tree with a
//! configurable minimum degree `t`.
//!
//! Every node other than the root holds between `t - 1` and `2t - 1` keys and
//! all leaves share one depth. Insertion splits full nodes on the way down and
//! deletion tops up minimal nodes on the way down, so both finish in a single
//! root-to-leaf pass.
//!
//! ## Example
//!
//! ```rust
//! use btree_index::BTree;
//!
//! let mut tree = BTree::new(2).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key);
//! }
//!
//! assert!(tree.search(12));
//! assert_eq!(tree.keys(), vec![5, 6, 7, 10, 12, 17, 20, 30]);
//!
//! tree.delete(12);
//! assert!(!tree.search(12));
//! assert!(tree.validate().is_ok());
//! ```

mod node;
mod render;
pub mod script;
mod tree;
mod validate;

pub use tree::BTree;
pub use validate::{NodePath, Violation};

// =============================================================================
// Configuration
// =============================================================================

/// Smallest legal minimum degree (a 2-3-4 tree).
pub const SMALLEST_MIN_DEGREE: usize = 2;
/// Minimum degree used by [`BTree::default`].
pub const DEFAULT_MIN_DEGREE: usize = 2;

// =============================================================================
// Errors
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid minimum degree {min_degree}: must be at least 2 and 2t must fit in usize")]
    InvalidConfiguration { min_degree: usize },
}

#[cfg(test)]
mod proptests;
