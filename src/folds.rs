//! Unicode simple case folding, expressed as fold cycles.
//!
//! Two chars are equivalent under folding if they belong to the same cycle.
//! Most cycles have two members (an upper and a lower case form) and are
//! derived from the one-to-one case mappings; the exceptions with extra
//! members or cross-block members live in the orbit table below.

/// Fold orbits: equivalence classes that the plain one-to-one case mappings
/// do not fully connect. Each orbit lists its members in ascending order;
/// stepping moves to the next member, wrapping at the end.
const ORBITS: &[&[char]] = &[
    // K, k, Kelvin sign
    &['K', 'k', '\u{212A}'],
    // S, s, long s
    &['S', 's', '\u{17F}'],
    // A-with-ring, a-with-ring, Angstrom sign
    &['\u{C5}', '\u{E5}', '\u{212B}'],
    // sharp s, capital sharp s
    &['\u{DF}', '\u{1E9E}'],
    // micro sign, capital mu, small mu
    &['\u{B5}', '\u{39C}', '\u{3BC}'],
    // the Latin digraphs with a titlecase form
    &['\u{1C4}', '\u{1C5}', '\u{1C6}'],
    &['\u{1C7}', '\u{1C8}', '\u{1C9}'],
    &['\u{1CA}', '\u{1CB}', '\u{1CC}'],
    &['\u{1F1}', '\u{1F2}', '\u{1F3}'],
    // combining iota, capital iota, small iota, prosgegrammeni
    &['\u{345}', '\u{399}', '\u{3B9}', '\u{1FBE}'],
    // Greek letters with symbol variants
    &['\u{392}', '\u{3B2}', '\u{3D0}'],
    &['\u{395}', '\u{3B5}', '\u{3F5}'],
    &['\u{398}', '\u{3B8}', '\u{3D1}', '\u{3F4}'],
    &['\u{39A}', '\u{3BA}', '\u{3F0}'],
    &['\u{3A0}', '\u{3C0}', '\u{3D6}'],
    &['\u{3A1}', '\u{3C1}', '\u{3F1}'],
    // capital sigma, final sigma, small sigma
    &['\u{3A3}', '\u{3C2}', '\u{3C3}'],
    &['\u{3A6}', '\u{3C6}', '\u{3D5}'],
    // capital omega, small omega, ohm sign
    &['\u{3A9}', '\u{3C9}', '\u{2126}'],
    // S-with-dot-above, s-with-dot-above, long s with dot above
    &['\u{1E60}', '\u{1E61}', '\u{1E9B}'],
];

/// \return the one-char lowercase mapping of \p c, or None if the mapping
/// expands to multiple chars.
fn single_lower(c: char) -> Option<char> {
    let mut it = c.to_lowercase();
    match (it.next(), it.next()) {
        (Some(l), None) => Some(l),
        _ => None,
    }
}

/// \return the one-char uppercase mapping of \p c, or None if the mapping
/// expands to multiple chars.
fn single_upper(c: char) -> Option<char> {
    let mut it = c.to_uppercase();
    match (it.next(), it.next()) {
        (Some(u), None) => Some(u),
        _ => None,
    }
}

/// \return the successor of \p c in its fold cycle.
/// Chars that do not participate in folding return themselves.
pub fn next_fold(c: char) -> char {
    for orbit in ORBITS {
        if let Some(idx) = orbit.iter().position(|&oc| oc == c) {
            return orbit[(idx + 1) % orbit.len()];
        }
    }
    match single_lower(c) {
        Some(l) if l != c => l,
        _ => match single_upper(c) {
            Some(u) if u != c => u,
            _ => c,
        },
    }
}

/// An iterator over the fold cycle of a char, starting with the char itself.
#[derive(Debug, Clone)]
pub struct FoldCycle {
    start: char,
    next: Option<char>,
    emitted: u8,
}

// Orbits never exceed four members; the cap guards against a mapping that
// fails to cycle back to its start.
const MAX_ORBIT: u8 = 4;

impl Iterator for FoldCycle {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let cur = self.next?;
        self.emitted += 1;
        let succ = next_fold(cur);
        self.next = if succ == self.start || succ == cur || self.emitted >= MAX_ORBIT {
            None
        } else {
            Some(succ)
        };
        Some(cur)
    }
}

/// \return an iterator over the fold cycle of \p c, beginning at \p c.
pub fn fold_cycle(c: char) -> FoldCycle {
    FoldCycle {
        start: c,
        next: Some(c),
        emitted: 0,
    }
}

/// \return whether \p c1 and \p c2 fold to the same equivalence class.
#[inline]
pub fn fold_equals(c1: char, c2: char) -> bool {
    c1 == c2 || fold_cycle(c1).any(|fc| fc == c2)
}
