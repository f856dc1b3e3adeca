//! Node-level B-tree algorithms.
//!
//! Every routine here operates on a parent and its direct children. Deciding
//! when the root itself grows or collapses is left to [`crate::BTree`].

use std::mem;

use tracing::trace;

/// A single B-tree node.
///
/// Children are owned by value, so a node is reachable from exactly one parent.
/// For internal nodes `children.len() == keys.len() + 1`; leaves have none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) keys: Vec<i64>,
    pub(crate) leaf: bool,
    pub(crate) children: Vec<Node>,
}

impl Node {
    pub(crate) fn leaf(keys: Vec<i64>) -> Self {
        Self {
            keys,
            leaf: true,
            children: Vec::new(),
        }
    }

    pub(crate) fn internal(keys: Vec<i64>, children: Vec<Node>) -> Self {
        Self {
            keys,
            leaf: false,
            children,
        }
    }

    /// Holds the maximum `2t - 1` keys.
    #[inline]
    pub(crate) fn is_full(&self, t: usize) -> bool {
        self.keys.len() == 2 * t - 1
    }

    /// Can give up a key and still hold at least `t - 1`.
    #[inline]
    pub(crate) fn has_spare_key(&self, t: usize) -> bool {
        self.keys.len() >= t
    }

    /// Number of levels from this node down to its leaves.
    pub(crate) fn height(&self) -> usize {
        let mut node = self;
        let mut height = 1;
        while !node.leaf {
            node = &node.children[0];
            height += 1;
        }
        height
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub(crate) fn contains(&self, key: i64) -> bool {
        match self.keys.binary_search(&key) {
            Ok(_) => true,
            Err(_) if self.leaf => false,
            Err(idx) => self.children[idx].contains(key),
        }
    }

    fn min_key(&self) -> i64 {
        let mut node = self;
        while !node.leaf {
            node = &node.children[0];
        }
        *node.keys.first().expect("non-root leaf holds at least t-1 keys")
    }

    fn max_key(&self) -> i64 {
        let mut node = self;
        while !node.leaf {
            node = node.children.last().expect("internal node has children");
        }
        *node.keys.last().expect("non-root leaf holds at least t-1 keys")
    }

    /// Appends the keys of this subtree to `out` in ascending order.
    pub(crate) fn collect_keys(&self, out: &mut Vec<i64>) {
        if self.leaf {
            out.extend_from_slice(&self.keys);
            return;
        }
        for (child, &key) in self.children.iter().zip(&self.keys) {
            child.collect_keys(out);
            out.push(key);
        }
        if let Some(last) = self.children.last() {
            last.collect_keys(out);
        }
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Splits the full child at `idx` around its median.
    ///
    /// ```text
    ///            [ ... 40 ... ]                 [ ... 20  40 ... ]
    ///                 |              =>                /   \
    ///          [ 10  20  30 ]                      [ 10 ]   [ 30 ]
    /// ```
    ///
    /// The child keeps its first `t - 1` keys (and first `t` children), a new
    /// right sibling takes the last `t - 1` keys (and last `t` children), and the
    /// median moves up into `self.keys[idx]`.
    pub(crate) fn split_child(&mut self, idx: usize, t: usize) {
        let child = &mut self.children[idx];
        debug_assert!(child.is_full(t), "only a full child can be split");

        let right_keys = child.keys.split_off(t);
        let median = child.keys.pop().expect("full child has a median key");
        let right_children = if child.leaf {
            Vec::new()
        } else {
            child.children.split_off(t)
        };
        let sibling = Node {
            keys: right_keys,
            leaf: child.leaf,
            children: right_children,
        };

        trace!(
            target: "btree_index::node",
            median,
            left = child.keys.len(),
            right = sibling.keys.len(),
            "split child"
        );

        self.keys.insert(idx, median);
        self.children.insert(idx + 1, sibling);
    }

    /// Makes sure the child at `idx` is not full before descending into it for
    /// `key`, returning the index to descend into afterwards.
    pub(crate) fn split_for_descent(&mut self, idx: usize, key: i64, t: usize) -> usize {
        if !self.children[idx].is_full(t) {
            return idx;
        }
        self.split_child(idx, t);
        if key > self.keys[idx] {
            idx + 1
        } else {
            idx
        }
    }

    /// Inserts `key` into a subtree whose root is known not to be full.
    pub(crate) fn insert_non_full(&mut self, key: i64, t: usize) {
        let idx = match self.keys.binary_search(&key) {
            Ok(_) => return,
            Err(idx) => idx,
        };
        if self.leaf {
            self.keys.insert(idx, key);
            return;
        }
        let idx = self.split_for_descent(idx, key, t);
        self.children[idx].insert_non_full(key, t);
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Removes `key` from this subtree. Every node visited below the caller
    /// holds at least `t` keys before the descent continues.
    pub(crate) fn delete(&mut self, key: i64, t: usize) -> bool {
        match self.keys.binary_search(&key) {
            Ok(idx) if self.leaf => {
                self.keys.remove(idx);
                true
            }
            Ok(idx) => {
                self.delete_from_internal(idx, t);
                true
            }
            Err(_) if self.leaf => false,
            Err(idx) => {
                let idx = if self.children[idx].has_spare_key(t) {
                    idx
                } else {
                    self.ensure_child_has_spare(idx, t)
                };
                self.children[idx].delete(key, t)
            }
        }
    }

    /// Removes `self.keys[idx]` from an internal node.
    fn delete_from_internal(&mut self, idx: usize, t: usize) {
        let key = self.keys[idx];
        if self.children[idx].has_spare_key(t) {
            let predecessor = self.children[idx].max_key();
            self.keys[idx] = predecessor;
            self.children[idx].delete(predecessor, t);
        } else if self.children[idx + 1].has_spare_key(t) {
            let successor = self.children[idx + 1].min_key();
            self.keys[idx] = successor;
            self.children[idx + 1].delete(successor, t);
        } else {
            self.merge_children(idx);
            self.children[idx].delete(key, t);
        }
    }

    /// Brings the child at `idx` (holding `t - 1` keys) up to at least `t` keys
    /// and returns the index to descend into.
    ///
    /// Tries, in order: borrowing from the left sibling, borrowing from the right
    /// sibling, merging with the right sibling, and, for the last child only,
    /// merging into the left sibling. The last case shifts the index left by one.
    pub(crate) fn ensure_child_has_spare(&mut self, idx: usize, t: usize) -> usize {
        let has_right = idx + 1 < self.children.len();
        if idx > 0 && self.children[idx - 1].has_spare_key(t) {
            self.borrow_from_left(idx);
            idx
        } else if has_right && self.children[idx + 1].has_spare_key(t) {
            self.borrow_from_right(idx);
            idx
        } else if has_right {
            self.merge_children(idx);
            idx
        } else {
            self.merge_children(idx - 1);
            idx - 1
        }
    }

    /// Rotates one key from the left sibling of `children[idx]` through the
    /// separator `keys[idx - 1]`.
    pub(crate) fn borrow_from_left(&mut self, idx: usize) {
        let (before, rest) = self.children.split_at_mut(idx);
        let sibling = &mut before[idx - 1];
        let child = &mut rest[0];

        let raised = sibling.keys.pop().expect("left sibling has a spare key");
        let lowered = mem::replace(&mut self.keys[idx - 1], raised);
        child.keys.insert(0, lowered);
        if !child.leaf {
            let moved = sibling
                .children
                .pop()
                .expect("internal sibling has children");
            child.children.insert(0, moved);
        }

        trace!(target: "btree_index::node", idx, separator = raised, "borrowed from left sibling");
    }

    /// Rotates one key from the right sibling of `children[idx]` through the
    /// separator `keys[idx]`.
    pub(crate) fn borrow_from_right(&mut self, idx: usize) {
        let (upto, rest) = self.children.split_at_mut(idx + 1);
        let child = &mut upto[idx];
        let sibling = &mut rest[0];

        let raised = sibling.keys.remove(0);
        let lowered = mem::replace(&mut self.keys[idx], raised);
        child.keys.push(lowered);
        if !child.leaf {
            let moved = sibling.children.remove(0);
            child.children.push(moved);
        }

        trace!(target: "btree_index::node", idx, separator = raised, "borrowed from right sibling");
    }

    /// Folds `keys[idx]` and `children[idx + 1]` into `children[idx]`.
    ///
    /// ```text
    ///        [ ... 20 ... ]
    ///             /  \             =>     [ ... ... ]
    ///       [ 10 ]    [ 30 ]                   |
    ///                                     [ 10  20  30 ]
    /// ```
    pub(crate) fn merge_children(&mut self, idx: usize) {
        let separator = self.keys.remove(idx);
        let right = self.children.remove(idx + 1);
        let left = &mut self.children[idx];

        left.keys.push(separator);
        left.keys.extend(right.keys);
        left.children.extend(right.children);

        trace!(
            target: "btree_index::node",
            idx,
            separator,
            merged = left.keys.len(),
            "merged children"
        );
    }
}
