//! Literal-prefix analysis: the bytes every match must start with.

use crate::ast::Node;

/// \return the case-sensitive literal prefix of the pattern, as UTF-8
/// bytes. Empty when the pattern has no usable prefix. The matcher may skip
/// ahead to the next occurrence of these bytes before attempting a match.
pub fn literal_prefix(node: &Node) -> Vec<u8> {
    let mut out = String::new();
    collect(node, &mut out);
    out.into_bytes()
}

/// Append the leading literal chars of \p node to \p out.
/// \return whether the node is entirely literal, in which case a following
/// sibling may extend the prefix further.
fn collect(node: &Node, out: &mut String) -> bool {
    match node {
        Node::Empty => true,
        Node::Literal { runes, fold: false } => {
            out.extend(runes.iter());
            true
        }
        // The walk stops at case-folded literals: the prefix search is
        // case-sensitive.
        Node::Literal { fold: true, .. } => false,
        Node::Cat(nodes) => nodes.iter().all(|n| collect(n, out)),
        // Capture groups are transparent: they record positions but consume
        // exactly what their body consumes.
        Node::Capture { body, .. } => collect(body, out),
        _ => false,
    }
}
