use std::collections::VecDeque;
use std::fmt;

use crate::node::Node;
use crate::BTree;

/// Renders the tree breadth-first, one line per level.
///
/// Nodes on the same level are separated by two spaces and printed as their key
/// lists:
///
/// ```text
/// [4]
/// [2]  [6, 8]
/// [1]  [3]  [5]  [7]  [9, 10]
/// ```
impl fmt::Display for BTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut queue: VecDeque<(&Node, usize)> = VecDeque::from([(&self.root, 0)]);
        let mut level = 0;
        let mut first_in_level = true;

        while let Some((node, depth)) = queue.pop_front() {
            if depth != level {
                f.write_str("\n")?;
                level = depth;
            } else if !first_in_level {
                f.write_str("  ")?;
            }
            first_in_level = false;

            write!(f, "{:?}", node.keys)?;
            if !node.leaf {
                queue.extend(node.children.iter().map(|child| (child, depth + 1)));
            }
        }
        Ok(())
    }
}
