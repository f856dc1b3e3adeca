//! Structural invariant checking.
//!
//! Used by tests and the driver's `--validate` mode; mutations never call it.

use std::fmt;

use thiserror::Error;

use crate::node::Node;
use crate::BTree;

/// Location of a node as the child indices taken from the root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    fn child(&self, idx: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(idx);
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for idx in &self.0 {
            write!(f, "/{idx}")?;
        }
        Ok(())
    }
}

/// The first broken invariant found by [`BTree::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("node {path} holds {count} keys, below the minimum {min}")]
    TooFewKeys {
        path: NodePath,
        count: usize,
        min: usize,
    },
    #[error("node {path} holds {count} keys, above the maximum {max}")]
    TooManyKeys {
        path: NodePath,
        count: usize,
        max: usize,
    },
    #[error("keys of node {path} are not strictly increasing at index {index}: {previous} then {next}")]
    KeysNotIncreasing {
        path: NodePath,
        index: usize,
        previous: i64,
        next: i64,
    },
    #[error("key {key} in node {path} is not greater than the lower bound {bound}")]
    KeyBelowBound { path: NodePath, key: i64, bound: i64 },
    #[error("key {key} in node {path} is not less than the upper bound {bound}")]
    KeyAboveBound { path: NodePath, key: i64, bound: i64 },
    #[error("leaf {path} has {count} children")]
    LeafHasChildren { path: NodePath, count: usize },
    #[error("internal node {path} has {children} children for {keys} keys (expected {})", .keys + 1)]
    ChildCountMismatch {
        path: NodePath,
        keys: usize,
        children: usize,
    },
    #[error("root has no keys but is not a leaf")]
    KeylessInternalRoot,
    #[error("leaf {path} is at depth {depth}, other leaves are at depth {expected}")]
    UnevenLeafDepth {
        path: NodePath,
        depth: usize,
        expected: usize,
    },
    #[error("tree reports {reported} keys but holds {actual}")]
    LengthMismatch { reported: usize, actual: usize },
}

struct Checker {
    t: usize,
    leaf_depth: Option<usize>,
    seen: usize,
}

impl Checker {
    fn visit(
        &mut self,
        node: &Node,
        path: &NodePath,
        lower: Option<i64>,
        upper: Option<i64>,
        depth: usize,
    ) -> Result<(), Violation> {
        let count = node.keys.len();
        let max = 2 * self.t - 1;
        if count > max {
            return Err(Violation::TooManyKeys {
                path: path.clone(),
                count,
                max,
            });
        }
        // The root may shrink to zero keys.
        let is_root = depth == 0;
        if !is_root && count < self.t - 1 {
            return Err(Violation::TooFewKeys {
                path: path.clone(),
                count,
                min: self.t - 1,
            });
        }
        if is_root && count == 0 && !node.leaf {
            return Err(Violation::KeylessInternalRoot);
        }

        for (index, pair) in node.keys.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(Violation::KeysNotIncreasing {
                    path: path.clone(),
                    index: index + 1,
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }

        for &key in &node.keys {
            if let Some(bound) = lower.filter(|&bound| key <= bound) {
                return Err(Violation::KeyBelowBound {
                    path: path.clone(),
                    key,
                    bound,
                });
            }
            if let Some(bound) = upper.filter(|&bound| key >= bound) {
                return Err(Violation::KeyAboveBound {
                    path: path.clone(),
                    key,
                    bound,
                });
            }
        }
        self.seen += count;

        if node.leaf {
            if !node.children.is_empty() {
                return Err(Violation::LeafHasChildren {
                    path: path.clone(),
                    count: node.children.len(),
                });
            }
            match self.leaf_depth {
                None => self.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(Violation::UnevenLeafDepth {
                        path: path.clone(),
                        depth,
                        expected,
                    });
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if node.children.len() != count + 1 {
            return Err(Violation::ChildCountMismatch {
                path: path.clone(),
                keys: count,
                children: node.children.len(),
            });
        }

        // children[i] lies strictly between keys[i - 1] and keys[i].
        for (i, child) in node.children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { Some(node.keys[i - 1]) };
            let child_upper = if i == count { upper } else { Some(node.keys[i]) };
            self.visit(child, &path.child(i), child_lower, child_upper, depth + 1)?;
        }
        Ok(())
    }
}

impl BTree {
    /// Walks the whole tree and reports the first broken invariant.
    ///
    /// Checks key-count bounds (the root is exempt from the lower bound), strict
    /// key ordering, key ranges inherited from ancestors, child counts, uniform
    /// leaf depth and the cached length.
    pub fn validate(&self) -> Result<(), Violation> {
        let mut checker = Checker {
            t: self.min_degree,
            leaf_depth: None,
            seen: 0,
        };
        checker.visit(&self.root, &NodePath::root(), None, None, 0)?;

        if checker.seen != self.len {
            return Err(Violation::LengthMismatch {
                reported: self.len,
                actual: checker.seen,
            });
        }
        Ok(())
    }
}
