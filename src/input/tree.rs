use crate::input::node::{DerivationNode, NodeKind};

/// A mutable derivation tree with a forward/back cursor (§4.6).
///
/// Nodes live in an arena (`Vec<DerivationNode>`); `parent` links are plain
/// indices rather than weak/strong pointers, which sidesteps ownership
/// cycles entirely (§9). `current` designates where the next child attaches.
#[derive(Debug, Clone)]
pub struct DerivationTree {
    nodes: Vec<DerivationNode>,
    current: usize,
}

impl DerivationTree {
    /// The root is a structural sentinel — it is never itself part of a
    /// witnessed derivation, only its descendants are.
    pub fn new() -> Self {
        Self {
            nodes: vec![DerivationNode { kind: NodeKind::Variable, value: String::new(), parent: None, children: Vec::new() }],
            current: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn set_current(&mut self, index: usize) {
        self.current = index;
    }

    pub fn root(&self) -> &DerivationNode {
        &self.nodes[0]
    }

    pub fn node(&self, index: usize) -> &DerivationNode {
        &self.nodes[index]
    }

    /// Creates a child under `current` and returns its index, without moving
    /// the cursor.
    pub fn add(&mut self, kind: NodeKind, value: impl Into<String>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(DerivationNode { kind, value: value.into(), parent: Some(self.current), children: Vec::new() });
        self.nodes[self.current].children.push(index);
        index
    }

    /// `add`, then moves `current` to the newly added node.
    pub fn add_and_forward(&mut self, kind: NodeKind, value: impl Into<String>) -> usize {
        let index = self.add(kind, value);
        self.current = index;
        index
    }

    /// Moves `current` to its parent. No-op at the root.
    pub fn back(&mut self) {
        if let Some(parent) = self.nodes[self.current].parent {
            self.current = parent;
        }
    }

    /// Copies every child of `other`'s root (and their whole subtrees) into
    /// this tree as children of `current`. Used to graft the winning
    /// alternative's side-tree into the enclosing tree (§4.5) — the copy is
    /// bounded by the size of the single winning subtree, not the whole
    /// committed tree, so this stays cheap relative to a full deep-copy per
    /// attempt.
    pub fn graft_root_children(&mut self, other: &DerivationTree) {
        let target = self.current;
        for &child in &other.nodes[0].children {
            self.copy_subtree(other, child, target);
        }
    }

    fn copy_subtree(&mut self, other: &DerivationTree, other_index: usize, new_parent: usize) -> usize {
        let source = &other.nodes[other_index];
        let index = self.nodes.len();
        self.nodes.push(DerivationNode {
            kind: source.kind,
            value: source.value.clone(),
            parent: Some(new_parent),
            children: Vec::new(),
        });
        self.nodes[new_parent].children.push(index);

        let source_children = other.nodes[other_index].children.clone();
        for child in source_children {
            self.copy_subtree(other, child, index);
        }

        index
    }

    /// Collects the literal text at every `Value` leaf, left to right — the
    /// witnessed input reconstructed from the derivation.
    pub fn leaves(&self) -> String {
        let mut out = String::new();
        self.collect_leaves(0, &mut out);
        out
    }

    fn collect_leaves(&self, index: usize, out: &mut String) {
        let node = &self.nodes[index];
        if node.kind == NodeKind::Value && node.children.is_empty() {
            out.push_str(&node.value);
        }
        for &child in &node.children {
            self.collect_leaves(child, out);
        }
    }
}

impl Default for DerivationTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_forward_moves_the_cursor() {
        let mut tree = DerivationTree::new();
        tree.add_and_forward(NodeKind::Variable, "<digit>");
        assert_eq!(tree.node(tree.current()).value, "<digit>");
        tree.back();
        assert_eq!(tree.current(), 0);
    }

    #[test]
    fn graft_copies_the_whole_subtree() {
        let mut winner = DerivationTree::new();
        winner.add_and_forward(NodeKind::Variable, "<a>");
        winner.add(NodeKind::Value, "x");
        winner.back();

        let mut enclosing = DerivationTree::new();
        enclosing.graft_root_children(&winner);

        assert_eq!(enclosing.leaves(), "x");
    }

    #[test]
    fn reset_discards_all_nodes() {
        let mut tree = DerivationTree::new();
        tree.add_and_forward(NodeKind::Variable, "<a>");
        tree.add(NodeKind::Value, "x");
        tree.reset();
        assert_eq!(tree.current(), 0);
        assert!(tree.root().children.is_empty());
    }
}
