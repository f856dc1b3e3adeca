use std::mem;

use tracing::{debug, trace};

use crate::node::Node;
use crate::{Error, DEFAULT_MIN_DEGREE, SMALLEST_MIN_DEGREE};

/// An ordered set of `i64` keys stored in a B-tree of minimum degree `t`.
///
/// Every node other than the root holds between `t - 1` and `2t - 1` keys, and
/// all leaves sit at the same depth. The root may hold zero keys, which is how
/// an empty tree is represented.
#[derive(Clone, Debug)]
pub struct BTree {
    pub(crate) min_degree: usize,
    pub(crate) root: Node,
    pub(crate) len: usize,
}

impl BTree {
    /// Creates an empty tree with minimum degree `min_degree`.
    ///
    /// Fails with [`Error::InvalidConfiguration`] if `min_degree < 2` or if
    /// `2 * min_degree` does not fit in a `usize`.
    pub fn new(min_degree: usize) -> Result<Self, Error> {
        if min_degree < SMALLEST_MIN_DEGREE || min_degree.checked_mul(2).is_none() {
            return Err(Error::InvalidConfiguration { min_degree });
        }
        debug!(target: "btree_index::tree", min_degree, "created tree");
        Ok(Self::empty(min_degree))
    }

    fn empty(min_degree: usize) -> Self {
        Self {
            min_degree,
            root: Node::leaf(Vec::new()),
            len: 0,
        }
    }

    #[inline]
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, counting the root. An empty tree has height 1.
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Returns `true` if `key` is present.
    pub fn search(&self, key: i64) -> bool {
        self.root.contains(key)
    }

    /// Adds `key`, returning `false` if it was already present.
    pub fn insert(&mut self, key: i64) -> bool {
        if self.search(key) {
            return false;
        }

        let t = self.min_degree;
        if self.root.is_full(t) {
            // Grow: the old root becomes the only child of a fresh root and is
            // split immediately, so descent never enters a full node.
            let old_root = mem::replace(&mut self.root, Node::internal(Vec::new(), Vec::new()));
            self.root.children.push(old_root);
            self.root.split_child(0, t);
            trace!(target: "btree_index::tree", height = self.height(), "root split");
        }
        self.root.insert_non_full(key, t);
        self.len += 1;
        true
    }

    /// Removes `key`, returning `false` if it was absent.
    pub fn delete(&mut self, key: i64) -> bool {
        if !self.search(key) {
            return false;
        }

        let removed = self.root.delete(key, self.min_degree);
        debug_assert!(removed, "search found the key but delete did not");

        if self.root.keys.is_empty() && !self.root.leaf {
            self.root = self
                .root
                .children
                .pop()
                .expect("keyless internal root has exactly one child");
            trace!(target: "btree_index::tree", height = self.height(), "root collapsed");
        }
        self.len -= 1;
        true
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect_keys(&mut out);
        out
    }
}

impl Default for BTree {
    fn default() -> Self {
        Self::empty(DEFAULT_MIN_DEGREE)
    }
}

impl Extend<i64> for BTree {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
