//! Bytecode instructions for a compiled pattern.

use crate::ast::AssertionKind;
use crate::charclasses::ClassContents;
use memchr::memmem::Finder;
use std::collections::HashMap;
use std::fmt;

/// An instruction pointer.
pub type Pc = usize;

/// The list of bytecode instructions.
#[derive(Debug, Clone)]
pub enum Insn {
    /// The match was successful; the current position is its end.
    Match,

    /// Consume a single char equal to `c`, case-insensitively if `fold`.
    Char { c: char, fold: bool },

    /// Consume a single char matching the class.
    Class(ClassContents),

    /// Set the PC to a new value.
    Jump { target: Pc },

    /// Try `primary` first; if its subtree fails, resume at `secondary`.
    /// Branch order encodes greediness.
    Split { primary: Pc, secondary: Pc },

    /// Record the current position into a capture register.
    Save { slot: usize },

    /// A zero-width test of the current position.
    Assert(AssertionKind),

    /// Run the sub-program as a lookaround, consuming nothing.
    Lookaround {
        prog: Box<Program>,
        negate: bool,
        behind: bool,
    },

    /// Re-match the text captured by a group. An unset group matches the
    /// empty string. Compares case-insensitively if `fold`.
    Backref { group: usize, fold: bool },
}

/// A compiled program: instructions, entry point, and side tables.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Sequence of instructions.
    pub insns: Vec<Insn>,

    /// Entry PC.
    pub start: Pc,

    /// Number of capture groups, including the implicit group 0.
    /// The register array has twice this many slots.
    pub captures: usize,

    /// Searcher for the literal prefix every match must start with, if the
    /// pattern has one. Only populated on top-level programs.
    pub prefix: Option<Finder<'static>>,

    /// For each lookbehind instruction whose body has a fixed width, the
    /// width in runes, keyed by the instruction's PC.
    pub behind_lens: HashMap<Pc, usize>,
}

/// A compiled pattern: the program plus the capture-group metadata the
/// matcher reports alongside each match.
#[derive(Debug, Clone)]
pub struct CompiledRegex {
    pub prog: Program,

    /// Capture group names ordered by index. Slot 0 is the unnamed whole
    /// match; unnamed groups hold an empty string.
    pub group_names: Box<[Box<str>]>,
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Insn::Match => write!(f, "match"),
            Insn::Char { c, fold } => {
                write!(f, "char {:?}{}", c, if *fold { " fold" } else { "" })
            }
            Insn::Class(cc) => {
                write!(f, "class {}{} ranges", if cc.negate { "^" } else { "" }, cc.ranges.len())
            }
            Insn::Jump { target } => write!(f, "jmp {}", target),
            Insn::Split { primary, secondary } => write!(f, "split {}, {}", primary, secondary),
            Insn::Save { slot } => write!(f, "save {}", slot),
            Insn::Assert(kind) => write!(f, "assert {:?}", kind),
            Insn::Lookaround { negate, behind, .. } => {
                write!(f, "look{}{}", if *behind { "behind" } else { "ahead" }, if *negate { " neg" } else { "" })
            }
            Insn::Backref { group, fold } => {
                write!(f, "backref {}{}", group, if *fold { " fold" } else { "" })
            }
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (pc, insn) in self.insns.iter().enumerate() {
            writeln!(f, "{:3}: {}", pc, insn)?;
        }
        Ok(())
    }
}
