//! Tree traversal utilities for the reply forest
//!
//! All walks are iterative with an explicit stack so deeply nested threads
//! cannot overflow the call stack.

use std::collections::HashSet;
use std::fmt::Write;

use super::container::{NodeId, ThreadForest};

/// Count the strict descendants of a node (the node itself is excluded).
pub fn count_descendants(forest: &ThreadForest, id: NodeId) -> usize {
    let mut count = 0;
    let mut stack: Vec<NodeId> = forest.children(id).to_vec();

    while let Some(current) = stack.pop() {
        count += 1;
        stack.extend_from_slice(forest.children(current));
    }

    count
}

/// Collect a subtree in depth-first, left-to-right order with depths.
///
/// The starting node is reported at `starting_depth`.
pub fn collect_subtree(
    forest: &ThreadForest,
    id: NodeId,
    starting_depth: usize,
) -> Vec<(NodeId, usize)> {
    let mut collected = Vec::new();
    let mut stack = vec![(id, starting_depth)];

    while let Some((current, depth)) = stack.pop() {
        collected.push((current, depth));

        // Reverse so children are visited in insertion order
        for child in forest.children(current).iter().rev() {
            stack.push((*child, depth + 1));
        }
    }

    collected
}

/// Walk parent links from `id` up to the root.
///
/// Returns `None` if a node repeats on the way up, which would mean the
/// forest contains a cycle, or if the walk ends somewhere other than the root.
pub fn path_to_root(forest: &ThreadForest, id: NodeId) -> Option<Vec<NodeId>> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut current = Some(id);

    while let Some(node) = current {
        if !visited.insert(node) {
            return None;
        }
        path.push(node);
        current = forest.parent(node);
    }

    (path.last() == Some(&ThreadForest::ROOT)).then_some(path)
}

/// Render the forest as an indented ASCII tree of node names and subjects.
pub fn render_ascii(forest: &ThreadForest) -> String {
    let mut out = String::new();

    for (id, depth) in collect_subtree(forest, ThreadForest::ROOT, 0) {
        let node = forest.node(id);
        if depth == 0 {
            let _ = writeln!(out, "{}", node.name);
            continue;
        }

        let indent = "    ".repeat(depth - 1);
        let _ = writeln!(out, "{indent}|-- {} {}", node.name, node.subject());
    }

    out
}
