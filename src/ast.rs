//! Syntax tree for a parsed pattern.

use crate::charclasses::ClassContents;

/// A repetition count, like /x{3,5}?/.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quantifier {
    /// Minimum number of iterations, inclusive.
    pub min: usize,

    /// Maximum number of iterations, inclusive; None means unbounded.
    pub max: Option<usize>,

    /// Whether the longer repetition is preferred.
    pub greedy: bool,
}

/// The zero-width conditions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssertionKind {
    /// ^. Under multiline, also matches after a newline.
    StartText { multiline: bool },

    /// $. Under multiline, also matches before a newline.
    EndText { multiline: bool },

    /// \b.
    WordBoundary,

    /// \B.
    NotWordBoundary,

    /// \A: the start of the string, regardless of multiline.
    StringStart,

    /// \Z: the end of the string, or just before a final newline.
    StringEnd,

    /// \z: the end of the string, absolutely.
    AbsoluteEnd,
}

/// The node types of the syntax tree.
#[derive(Debug, PartialEq, Eq)]
pub enum Node {
    /// Matches the empty string.
    Empty,

    /// A sequence of chars to match literally.
    /// If fold is set, the comparison is case-insensitive.
    Literal { runes: Vec<char>, fold: bool },

    /// A character class like [a-z] or \d.
    Class(ClassContents),

    /// Children matched one after another.
    Cat(Vec<Node>),

    /// Branches tried in order; the first that leads to an overall match
    /// wins.
    Alt(Vec<Node>),

    /// A repetition of the body.
    Quant { body: Box<Node>, quant: Quantifier },

    /// A capturing group. Indices are 1-based and dense in source order;
    /// index 0 is reserved for the whole match.
    Capture {
        body: Box<Node>,
        index: usize,
        name: Option<Box<str>>,
    },

    /// A zero-width assertion.
    Assert(AssertionKind),

    /// A lookaround: (?=..), (?!..), (?<=..) or (?<!..).
    Lookaround {
        body: Box<Node>,
        negate: bool,
        behind: bool,
    },

    /// A backreference \1..\9, by 1-based capture index.
    /// If fold is set, the captured text is re-matched case-insensitively.
    Backref { group: usize, fold: bool },
}

impl Node {
    /// Wrap a list of nodes as a catenation, avoiding needless nesting.
    pub fn cat(mut nodes: Vec<Node>) -> Node {
        match nodes.len() {
            0 => Node::Empty,
            1 => nodes.pop().unwrap(),
            _ => Node::Cat(nodes),
        }
    }
}

/// Collect the names of capture groups, ordered by index.
/// Slot 0 is the unnamed whole match; unnamed groups get an empty string.
pub fn collect_group_names(root: &Node, group_count: usize) -> Box<[Box<str>]> {
    fn walk(node: &Node, names: &mut [Box<str>]) {
        match node {
            Node::Empty
            | Node::Literal { .. }
            | Node::Class(..)
            | Node::Assert(..)
            | Node::Backref { .. } => {}
            Node::Cat(nodes) | Node::Alt(nodes) => {
                for n in nodes {
                    walk(n, names);
                }
            }
            Node::Quant { body, .. } | Node::Lookaround { body, .. } => walk(body, names),
            Node::Capture { body, index, name } => {
                if let Some(name) = name {
                    names[*index] = name.clone();
                }
                walk(body, names);
            }
        }
    }
    let mut names = vec![Box::<str>::default(); group_count + 1];
    walk(root, &mut names);
    names.into_boxed_slice()
}
