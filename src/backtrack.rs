//! Classical backtracking execution engine.

use crate::api::Match;
use crate::ast::AssertionKind;
use crate::charclasses;
use crate::exec;
use crate::folds;
use crate::input::{Input, StrInput};
use crate::insn::{CompiledRegex, Insn, Pc, Program};
use smallvec::{smallvec, SmallVec};

/// Capture registers for one attempt: slot 2i holds the start of group i,
/// slot 2i+1 its end. None marks a register not written in this attempt.
pub(crate) type CaptureList = SmallVec<[Option<usize>; 8]>;

/// Ceiling on VM dispatches per attempt. Exceeding it abandons the attempt
/// as a silent non-match, bounding runaway backtracking on pathological
/// patterns like nested quantifiers.
pub(crate) const STEP_LIMIT: usize = 1_000_000;

/// One match attempt: a depth-first search over the program. Alternatives
/// are kept as saved `(pc, pos, caps)` continuations on an explicit stack,
/// so attempt depth never consumes host stack. Each Split snapshots the
/// capture registers into the saved continuation, so an abandoned branch
/// can never leak a capture.
pub(crate) struct Vm<'r, I> {
    prog: &'r Program,
    input: &'r I,
    steps: usize,
}

impl<'r, I: Input> Vm<'r, I> {
    pub(crate) fn new(prog: &'r Program, input: &'r I) -> Self {
        Self {
            prog,
            input,
            steps: 0,
        }
    }

    /// Attempt to match at \p pos.
    /// \return the end position and the capture registers on success.
    pub(crate) fn run(&mut self, pos: usize) -> Option<(usize, CaptureList)> {
        let mut caps: CaptureList = smallvec![None; 2 * self.prog.captures];
        let end = self.thread(self.prog.start, pos, &mut caps)?;
        Some((end, caps))
    }

    /// Execute the search from \p pc at \p pos.
    /// \return the position where Match was reached, or None if the search
    /// is exhausted.
    fn thread(&mut self, mut pc: Pc, mut pos: usize, caps: &mut CaptureList) -> Option<usize> {
        let prog = self.prog;

        // Saved alternatives, deepest last. A Split pushes its secondary
        // target here with a snapshot of the registers; a failed
        // instruction pops the most recent and resumes there.
        let mut stack: Vec<(Pc, usize, CaptureList)> = Vec::new();

        'nextinsn: loop {
            self.steps += 1;
            if self.steps > STEP_LIMIT {
                return None;
            }

            // Advance to the next instruction, or resume the most recent
            // saved alternative.
            macro_rules! next_or_backtrack {
                ($e:expr) => {
                    if $e {
                        pc += 1;
                    } else {
                        match stack.pop() {
                            Some((saved_pc, saved_pos, saved_caps)) => {
                                pc = saved_pc;
                                pos = saved_pos;
                                *caps = saved_caps;
                            }
                            None => return None,
                        }
                    }
                    continue 'nextinsn;
                };
            }

            match &prog.insns[pc] {
                Insn::Match => return Some(pos),

                &Insn::Char { c, fold } => {
                    let matched = match self.input.step(pos) {
                        Some((r, w)) => {
                            let eq = if fold {
                                folds::fold_cycle(r).any(|fc| fc == c)
                            } else {
                                r == c
                            };
                            if eq {
                                pos += w;
                            }
                            eq
                        }
                        None => false,
                    };
                    next_or_backtrack!(matched);
                }

                Insn::Class(cc) => {
                    let matched = match self.input.step(pos) {
                        Some((r, w)) => {
                            let contained = cc.matches(r);
                            if contained {
                                pos += w;
                            }
                            contained
                        }
                        None => false,
                    };
                    next_or_backtrack!(matched);
                }

                &Insn::Jump { target } => {
                    pc = target;
                }

                &Insn::Split { primary, secondary } => {
                    // The primary branch continues with the live registers;
                    // the secondary resumes from a snapshot untouched by
                    // anything the abandoned branch wrote.
                    stack.push((secondary, pos, caps.clone()));
                    pc = primary;
                }

                &Insn::Save { slot } => {
                    caps[slot] = Some(pos);
                    pc += 1;
                }

                Insn::Assert(kind) => {
                    next_or_backtrack!(self.check_assertion(*kind, pos));
                }

                Insn::Lookaround {
                    prog: sub,
                    negate,
                    behind,
                } => {
                    // A lookaround consumes nothing; only pc advances.
                    let matched = self.lookaround_matches(sub, *behind, pc, pos);
                    next_or_backtrack!(matched != *negate);
                }

                &Insn::Backref { group, fold } => {
                    let matched = match self.match_backref(caps, group, fold, pos) {
                        Some(end) => {
                            pos = end;
                            true
                        }
                        None => false,
                    };
                    next_or_backtrack!(matched);
                }
            }
        }
    }

    fn check_assertion(&self, kind: AssertionKind, pos: usize) -> bool {
        match kind {
            AssertionKind::StartText { multiline } => {
                pos == 0 || (multiline && matches!(self.input.context(pos), Some(('\n', _))))
            }
            AssertionKind::EndText { multiline } => match self.input.step(pos) {
                None => true,
                Some(('\n', _)) if multiline => true,
                _ => false,
            },
            AssertionKind::WordBoundary | AssertionKind::NotWordBoundary => {
                let before = self
                    .input
                    .context(pos)
                    .is_some_and(|(c, _)| charclasses::is_word_char(c));
                let after = self
                    .input
                    .step(pos)
                    .is_some_and(|(c, _)| charclasses::is_word_char(c));
                (before != after) != (kind == AssertionKind::NotWordBoundary)
            }
            AssertionKind::StringStart => pos == 0,
            AssertionKind::StringEnd => match self.input.step(pos) {
                None => true,
                Some(('\n', w)) => self.input.step(pos + w).is_none(),
                _ => false,
            },
            AssertionKind::AbsoluteEnd => self.input.step(pos).is_none(),
        }
    }

    /// Run a lookaround's sub-program in a fresh VM: the outer attempt's
    /// captures must not leak in, nor the inner ones out.
    fn lookaround_matches(&self, sub: &Program, behind: bool, pc: Pc, pos: usize) -> bool {
        if !behind {
            return Vm::new(sub, self.input).run(pos).is_some();
        }
        if let Some(&width) = self.prog.behind_lens.get(&pc) {
            // Fixed-width body: the only viable start is `width` runes back.
            return match rewind(self.input, pos, width) {
                Some(start) => Vm::new(sub, self.input)
                    .run(start)
                    .is_some_and(|(end, _)| end == pos),
                None => false,
            };
        }
        // Variable-width body: accept any start whose sub-match ends here.
        let mut start = 0;
        loop {
            if Vm::new(sub, self.input)
                .run(start)
                .is_some_and(|(end, _)| end == pos)
            {
                return true;
            }
            match self.input.advance(start) {
                Some(next) if next <= pos => start = next,
                _ => return false,
            }
        }
    }

    /// Re-match the text captured by \p group at \p pos.
    /// \return the new position, or None on mismatch.
    fn match_backref(
        &self,
        caps: &CaptureList,
        group: usize,
        fold: bool,
        mut pos: usize,
    ) -> Option<usize> {
        let slots = (
            caps.get(2 * group).copied().flatten(),
            caps.get(2 * group + 1).copied().flatten(),
        );
        let (start, end) = match slots {
            (Some(s), Some(e)) if s <= e => (s, e),
            // A group that has not participated in the match compares as
            // the empty string.
            _ => return Some(pos),
        };
        let mut at = start;
        while at < end {
            let (want, ww) = self.input.step(at)?;
            let (have, hw) = self.input.step(pos)?;
            let ok = if fold {
                folds::fold_equals(want, have)
            } else {
                want == have
            };
            if !ok {
                return None;
            }
            at += ww;
            pos += hw;
        }
        Some(pos)
    }
}

/// Step back \p runes runes from \p pos.
/// \return the resulting position, or None if the input is too short.
fn rewind<I: Input>(input: &I, mut pos: usize, runes: usize) -> Option<usize> {
    for _ in 0..runes {
        let (_, w) = input.context(pos)?;
        pos -= w;
    }
    Some(pos)
}

/// Scans a haystack for successive non-overlapping matches.
#[derive(Debug)]
pub struct Searcher<'r, 't> {
    re: &'r CompiledRegex,
    input: StrInput<'t>,
}

impl<'r, 't> Searcher<'r, 't> {
    pub(crate) fn new(re: &'r CompiledRegex, text: &'t str) -> Self {
        Self {
            re,
            input: StrInput::new(text),
        }
    }

    fn successful_match(&self, start: usize, end: usize, caps: &CaptureList) -> Match {
        let captures = (1..self.re.prog.captures)
            .map(|i| match (caps[2 * i], caps[2 * i + 1]) {
                (Some(s), Some(e)) if s <= e => Some(s..e),
                _ => None,
            })
            .collect();
        Match {
            range: start..end,
            captures,
            group_names: self.re.group_names.clone(),
        }
    }
}

impl exec::MatchProducer for Searcher<'_, '_> {
    /// Attempt candidate start positions from \p pos onward, one rune at a
    /// time, skipping ahead to the literal prefix when one is known.
    fn next_match(&mut self, pos: usize, next_start: &mut Option<usize>) -> Option<Match> {
        let mut pos = pos;
        if pos > self.input.len() {
            return None;
        }
        loop {
            let start = match &self.re.prog.prefix {
                Some(finder) => self.input.find_literal(finder, pos)?,
                None => pos,
            };
            let mut vm = Vm::new(&self.re.prog, &self.input);
            if let Some((end, caps)) = vm.run(start) {
                // A zero-width match must advance by a rune before the next
                // attempt, or iteration would never progress.
                *next_start = if end > start {
                    Some(end)
                } else {
                    self.input.advance(start)
                };
                return Some(self.successful_match(start, end, &caps));
            }
            pos = self.input.advance(start)?;
        }
    }
}
