/// Tags a derivation node as a rule expansion or a matched/emitted literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Variable,
    Value,
}

/// A node in a `DerivationTree`'s arena. `parent` is a back-reference index
/// only — ownership flows root-to-leaf through `children` (§3, §9).
#[derive(Debug, Clone)]
pub struct DerivationNode {
    pub kind: NodeKind,
    pub value: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}
