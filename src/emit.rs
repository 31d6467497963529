//! Compiler back-end: lowers the syntax tree to a Program.

use crate::ast::{self, Node, Quantifier};
use crate::insn::{CompiledRegex, Insn, Pc, Program};
use crate::parse::ParsedPattern;
use crate::prefix;
use memchr::memmem::Finder;
use std::collections::HashMap;

/// Type which wraps up the context needed to emit a Program.
struct Emitter {
    insns: Vec<Insn>,

    /// Total number of capture groups including the implicit group 0.
    /// Shared with sub-programs so Save slots stay in range everywhere.
    captures: usize,
}

impl Emitter {
    /// Emit an instruction, returning its PC.
    fn emit(&mut self, insn: Insn) -> Pc {
        self.insns.push(insn);
        self.insns.len() - 1
    }

    /// \return the PC of the next instruction to be emitted.
    fn next_pc(&self) -> Pc {
        self.insns.len()
    }

    /// Fix up a Split emitted with placeholder targets.
    fn patch_split(&mut self, at: Pc, primary: Pc, secondary: Pc) {
        match &mut self.insns[at] {
            Insn::Split {
                primary: p,
                secondary: s,
            } => {
                *p = primary;
                *s = secondary;
            }
            other => panic!("expected Split at {}, found {}", at, other),
        }
    }

    /// Fix up a Jump emitted with a placeholder target.
    fn patch_jump(&mut self, at: Pc, target: Pc) {
        match &mut self.insns[at] {
            Insn::Jump { target: t } => *t = target,
            other => panic!("expected Jump at {}, found {}", at, other),
        }
    }

    /// Emit instructions corresponding to a given node.
    fn emit_node(&mut self, node: &Node) {
        match node {
            Node::Empty => {}
            Node::Literal { runes, fold } => {
                for &c in runes {
                    self.emit(Insn::Char { c, fold: *fold });
                }
            }
            Node::Class(cc) => {
                self.emit(Insn::Class(cc.clone()));
            }
            Node::Cat(nodes) => {
                for n in nodes {
                    self.emit_node(n);
                }
            }
            Node::Alt(branches) => self.emit_alt(branches),
            Node::Quant { body, quant } => self.emit_quant(body, *quant),
            Node::Capture { body, index, .. } => {
                self.emit(Insn::Save { slot: 2 * index });
                self.emit_node(body);
                self.emit(Insn::Save {
                    slot: 2 * index + 1,
                });
            }
            Node::Assert(kind) => {
                self.emit(Insn::Assert(*kind));
            }
            Node::Lookaround {
                body,
                negate,
                behind,
            } => {
                let prog = compile_program(body, self.captures);
                self.emit(Insn::Lookaround {
                    prog: Box::new(prog),
                    negate: *negate,
                    behind: *behind,
                });
            }
            &Node::Backref { group, fold } => {
                self.emit(Insn::Backref { group, fold });
            }
        }
    }

    /// Alternation emits a Split whose primary target is the first branch;
    /// each branch ends with a Jump past the whole alternation.
    fn emit_alt(&mut self, branches: &[Node]) {
        if branches.len() == 1 {
            return self.emit_node(&branches[0]);
        }
        let split = self.emit(Insn::Split {
            primary: 0,
            secondary: 0,
        });
        let left = self.next_pc();
        self.emit_node(&branches[0]);
        let jump = self.emit(Insn::Jump { target: 0 });
        let right = self.next_pc();
        self.emit_alt(&branches[1..]);
        let end = self.next_pc();
        self.patch_split(split, left, right);
        self.patch_jump(jump, end);
    }

    fn emit_quant(&mut self, body: &Node, quant: Quantifier) {
        match (quant.min, quant.max) {
            (0, None) => self.emit_star(body, quant.greedy),
            (1, None) => self.emit_plus(body, quant.greedy),
            (0, Some(1)) => self.emit_opt(body, quant.greedy),
            (min, max) => {
                // X{n,m}: n mandatory copies, then (m - n) optional ones,
                // or a trailing star when there is no maximum.
                for _ in 0..min {
                    self.emit_node(body);
                }
                match max {
                    None => self.emit_star(body, quant.greedy),
                    Some(max) => {
                        for _ in min..max {
                            self.emit_opt(body, quant.greedy);
                        }
                    }
                }
            }
        }
    }

    /// X*: `L: Split(body, end); body: <X>; Jump L; end:`.
    /// Non-greedy swaps the Split targets.
    fn emit_star(&mut self, body: &Node, greedy: bool) {
        let split = self.emit(Insn::Split {
            primary: 0,
            secondary: 0,
        });
        let body_pc = self.next_pc();
        self.emit_node(body);
        self.emit(Insn::Jump { target: split });
        let end = self.next_pc();
        if greedy {
            self.patch_split(split, body_pc, end);
        } else {
            self.patch_split(split, end, body_pc);
        }
    }

    /// X+: `body: <X>; Split(body, end); end:`.
    fn emit_plus(&mut self, body: &Node, greedy: bool) {
        let body_pc = self.next_pc();
        self.emit_node(body);
        let split = self.emit(Insn::Split {
            primary: 0,
            secondary: 0,
        });
        let end = self.next_pc();
        if greedy {
            self.patch_split(split, body_pc, end);
        } else {
            self.patch_split(split, end, body_pc);
        }
    }

    /// X?: `Split(body, end); body: <X>; end:`.
    fn emit_opt(&mut self, body: &Node, greedy: bool) {
        let split = self.emit(Insn::Split {
            primary: 0,
            secondary: 0,
        });
        let body_pc = self.next_pc();
        self.emit_node(body);
        let end = self.next_pc();
        if greedy {
            self.patch_split(split, body_pc, end);
        } else {
            self.patch_split(split, end, body_pc);
        }
    }
}

/// Compile a node to a Program framed as `Save(0) <body> Save(1) Match`,
/// assigning the whole-match span to group 0. Used for the top-level
/// pattern and, recursively, for every lookaround body.
fn compile_program(node: &Node, captures: usize) -> Program {
    let mut e = Emitter {
        insns: Vec::new(),
        captures,
    };
    e.emit(Insn::Save { slot: 0 });
    e.emit_node(node);
    e.emit(Insn::Save { slot: 1 });
    e.emit(Insn::Match);
    let behind_lens = compute_behind_lens(&e.insns);
    Program {
        insns: e.insns,
        start: 0,
        captures,
        prefix: None,
        behind_lens,
    }
}

/// Record, for every lookbehind instruction whose body has a fixed width,
/// that width in runes.
fn compute_behind_lens(insns: &[Insn]) -> HashMap<Pc, usize> {
    let mut lens = HashMap::new();
    for (pc, insn) in insns.iter().enumerate() {
        if let Insn::Lookaround {
            prog,
            behind: true,
            ..
        } = insn
        {
            let mut fuel = prog.insns.len().saturating_mul(4).max(64);
            if let Some(len) = fixed_width(&prog.insns, prog.start, 0, &mut fuel) {
                lens.insert(pc, len);
            }
        }
    }
    lens
}

/// Simulate instruction widths from \p pc. Char and Class consume one rune;
/// Save, Assert and Lookaround consume nothing; Split requires both
/// successors to agree. None means the width is variable or unknown.
/// Fuel bounds the traversal so loops report as variable.
fn fixed_width(insns: &[Insn], pc: Pc, acc: usize, fuel: &mut usize) -> Option<usize> {
    if *fuel == 0 {
        return None;
    }
    *fuel -= 1;
    match insns.get(pc)? {
        Insn::Match => Some(acc),
        Insn::Char { .. } | Insn::Class(..) => fixed_width(insns, pc + 1, acc + 1, fuel),
        Insn::Save { .. } | Insn::Assert(..) | Insn::Lookaround { .. } => {
            fixed_width(insns, pc + 1, acc, fuel)
        }
        Insn::Jump { target } => fixed_width(insns, *target, acc, fuel),
        Insn::Split { primary, secondary } => {
            let a = fixed_width(insns, *primary, acc, fuel)?;
            let b = fixed_width(insns, *secondary, acc, fuel)?;
            (a == b).then_some(a)
        }
        Insn::Backref { .. } => None,
    }
}

/// Compile a parsed pattern into an executable CompiledRegex, including the
/// literal-prefix side table and the capture-group name list.
pub(crate) fn emit(parsed: &ParsedPattern) -> CompiledRegex {
    let mut prog = compile_program(&parsed.node, parsed.group_count + 1);
    let prefix_bytes = prefix::literal_prefix(&parsed.node);
    if !prefix_bytes.is_empty() {
        prog.prefix = Some(Finder::new(&prefix_bytes).into_owned());
    }
    CompiledRegex {
        prog,
        group_names: ast::collect_group_names(&parsed.node, parsed.group_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Flags;
    use crate::parse;

    fn compile(pattern: &str) -> Program {
        emit(&parse::try_parse(pattern, Flags::default()).unwrap()).prog
    }

    /// Find the lookbehind instructions and their recorded widths.
    fn behind_widths(prog: &Program) -> Vec<Option<usize>> {
        prog.insns
            .iter()
            .enumerate()
            .filter_map(|(pc, insn)| match insn {
                Insn::Lookaround { behind: true, .. } => {
                    Some(prog.behind_lens.get(&pc).copied())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn program_frame() {
        let prog = compile("a");
        assert!(matches!(prog.insns[0], Insn::Save { slot: 0 }));
        assert!(matches!(prog.insns.last(), Some(Insn::Match)));
        assert_eq!(prog.captures, 1);
    }

    #[test]
    fn capture_count_includes_nested_and_lookaround_groups() {
        let prog = compile("(a)(?:b)(?=(c))");
        assert_eq!(prog.captures, 3);
    }

    #[test]
    fn prefix_finder() {
        assert!(compile("abc+").prefix.is_some());
        assert!(compile("[ab]c").prefix.is_none());
        assert!(compile("(?i)abc").prefix.is_none());
    }

    #[test]
    fn fixed_lookbehind_widths() {
        assert_eq!(behind_widths(&compile("(?<=abc)x")), vec![Some(3)]);
        assert_eq!(behind_widths(&compile(r"(?<=\d\d)x")), vec![Some(2)]);
        // Both alternatives have width 2.
        assert_eq!(behind_widths(&compile("(?<=ab|cd)x")), vec![Some(2)]);
        // Assertions and captures are zero-width.
        assert_eq!(behind_widths(&compile(r"(?<=^(ab))x")), vec![Some(2)]);
    }

    #[test]
    fn variable_lookbehind_widths() {
        assert_eq!(behind_widths(&compile("(?<=a+)x")), vec![None]);
        assert_eq!(behind_widths(&compile("(?<=a|bc)x")), vec![None]);
        assert_eq!(behind_widths(&compile("(?<=a{2,3})x")), vec![None]);
    }

    #[test]
    fn bounded_repetition_shapes() {
        // a{3} is three chars plus the frame: Save, a, a, a, Save, Match.
        let prog = compile("a{3}");
        let chars = prog
            .insns
            .iter()
            .filter(|i| matches!(i, Insn::Char { .. }))
            .count();
        assert_eq!(chars, 3);

        // a{2,4} adds two optional copies, each guarded by a Split.
        let prog = compile("a{2,4}");
        let splits = prog
            .insns
            .iter()
            .filter(|i| matches!(i, Insn::Split { .. }))
            .count();
        assert_eq!(splits, 2);
    }

    #[test]
    fn greediness_is_branch_order() {
        let greedy = compile("a*");
        let lazy = compile("a*?");
        let split_of = |prog: &Program| {
            prog.insns
                .iter()
                .find_map(|i| match i {
                    &Insn::Split { primary, secondary } => Some((primary, secondary)),
                    _ => None,
                })
                .unwrap()
        };
        let (gp, gs) = split_of(&greedy);
        let (lp, ls) = split_of(&lazy);
        // The greedy primary is the lazy secondary and vice versa.
        assert_eq!(gp, ls);
        assert_eq!(gs, lp);
    }
}
