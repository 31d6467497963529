use crate::backtrack::Searcher;
use crate::emit;
use crate::exec;
use crate::insn::CompiledRegex;
use crate::parse;

use core::{fmt, str::FromStr};

pub use crate::parse::Error;

/// Flags used to control pattern compilation.
/// The default flags are case-sensitive, not-multiline, not-dotall.
#[derive(Debug, Copy, Clone, Default)]
pub struct Flags {
    /// If set, match case-insensitively.
    /// Equivalent to the in-pattern (?i) flag.
    pub icase: bool,

    /// If set, ^ and $ also match at line boundaries, not just the input
    /// boundaries. Equivalent to the in-pattern (?m) flag.
    pub multiline: bool,

    /// If set, . matches newlines as well as any other character.
    /// Equivalent to the in-pattern (?s) flag.
    pub dot_all: bool,
}

impl Flags {
    /// Construct a Flags from an iterator of chars.
    /// 'i' means case-insensitive, 'm' means multiline, 's' means dotall.
    /// Other letters are silently skipped.
    #[inline]
    pub fn new<T: Iterator<Item = char>>(chars: T) -> Self {
        let mut result = Self::default();
        for c in chars {
            match c {
                'i' => result.icase = true,
                'm' => result.multiline = true,
                's' => result.dot_all = true,
                _ => {
                    // Silently skip unsupported flags.
                }
            }
        }
        result
    }
}

impl From<&str> for Flags {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s.chars())
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.icase {
            f.write_str("i")?;
        }
        if self.multiline {
            f.write_str("m")?;
        }
        if self.dot_all {
            f.write_str("s")?;
        }
        Ok(())
    }
}

/// Range is used to express the extent of a match, as byte indexes into the
/// input string.
pub type Range = core::ops::Range<usize>;

/// An iterator type which yields the `Match`es found in a string.
pub type Matches<'r, 't> = exec::Matches<Searcher<'r, 't>>;

/// A Match represents a portion of a string which was found to match a
/// Regex.
#[derive(Debug, Clone)]
pub struct Match {
    /// The total range of the match. Note this may be empty, if the regex
    /// matched an empty string.
    pub range: Range,

    /// The capture groups. This has length equal to the number of capturing
    /// groups in the regex, not counting the whole match. For each capture,
    /// if the value is None, that group did not participate in the match
    /// (for example, it was in a not-taken branch of an alternation).
    pub captures: Vec<Option<Range>>,

    // Capture group names, ordered by index. Slot 0 is the unnamed whole
    // match; unnamed groups hold an empty string.
    pub(crate) group_names: Box<[Box<str>]>,
}

impl Match {
    /// Access a group by index. Index 0 is the total match, index 1 is the
    /// first capture group.
    #[inline]
    pub fn group(&self, idx: usize) -> Option<Range> {
        if idx == 0 {
            Some(self.range.clone())
        } else {
            self.captures[idx - 1].clone()
        }
    }

    /// Access a named group by name.
    #[inline]
    pub fn named_group(&self, name: &str) -> Option<Range> {
        // Empty strings are the sentinel for unnamed groups.
        if name.is_empty() {
            return None;
        }
        let idx = self.group_names.iter().position(|n| n.as_ref() == name)?;
        self.captures[idx - 1].clone()
    }

    /// Return an iterator over the named groups of a Match.
    #[inline]
    pub fn named_groups(&self) -> NamedGroups {
        NamedGroups::new(self)
    }

    /// Returns the range over the starting and ending byte offsets of the
    /// match in the haystack.
    #[inline]
    pub fn range(&self) -> Range {
        self.range.clone()
    }

    /// Returns the starting byte offset of the match in the haystack.
    #[inline]
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// Returns the ending byte offset of the match in the haystack.
    #[inline]
    pub fn end(&self) -> usize {
        self.range.end
    }

    /// Return an iterator over a Match. The first returned value is the
    /// total match, and subsequent values are the capture groups.
    #[inline]
    pub fn groups(&self) -> Groups {
        Groups::new(self)
    }
}

/// An iterator over the capture groups of a [`Match`].
///
/// This struct is created by the [`groups`](Match::groups) method.
#[derive(Clone)]
pub struct Groups<'m> {
    mat: &'m Match,
    i: usize,
    max: usize,
}

impl<'m> Groups<'m> {
    #[inline]
    fn new(mat: &'m Match) -> Self {
        Self {
            mat,
            i: 0,
            max: mat.captures.len() + 1,
        }
    }
}

impl Iterator for Groups<'_> {
    type Item = Option<Range>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let i = self.i;
        if i < self.max {
            self.i += 1;
            Some(self.mat.group(i))
        } else {
            None
        }
    }
}

/// An iterator over the named capture groups of a [`Match`].
///
/// This struct is created by the [`named_groups`](Match::named_groups)
/// method.
#[derive(Clone)]
pub struct NamedGroups<'m> {
    mat: &'m Match,
    next_idx: usize,
}

impl<'m> NamedGroups<'m> {
    #[inline]
    fn new(mat: &'m Match) -> Self {
        // Slot 0 is the whole match and never named.
        Self { mat, next_idx: 1 }
    }
}

impl<'m> Iterator for NamedGroups<'m> {
    type Item = (&'m str, Option<Range>);

    fn next(&mut self) -> Option<Self::Item> {
        let names = &self.mat.group_names;
        let mut idx = self.next_idx;
        while idx < names.len() && names[idx].is_empty() {
            idx += 1;
        }
        if idx >= names.len() {
            return None;
        }
        self.next_idx = idx + 1;
        Some((names[idx].as_ref(), self.mat.captures[idx - 1].clone()))
    }
}

/// A Regex is the compiled version of a pattern.
#[derive(Debug, Clone)]
pub struct Regex {
    cr: CompiledRegex,
}

impl From<CompiledRegex> for Regex {
    fn from(cr: CompiledRegex) -> Self {
        Self { cr }
    }
}

impl Regex {
    /// Construct a regex by parsing `pattern` using the default flags.
    /// An Error may be returned if the syntax is invalid.
    /// Note that compilation is comparatively expensive; prefer to cache a
    /// Regex which is intended to be used more than once.
    #[inline]
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Self::with_flags(pattern, Flags::default())
    }

    /// Construct a regex by parsing `pattern` with `flags`.
    /// An Error may be returned if the syntax is invalid.
    #[inline]
    pub fn with_flags<F>(pattern: &str, flags: F) -> Result<Regex, Error>
    where
        F: Into<Flags>,
    {
        let parsed = parse::try_parse(pattern, flags.into())?;
        Ok(Regex {
            cr: emit::emit(&parsed),
        })
    }

    /// \return whether `text` contains any match.
    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Searches `text` to find the first match.
    #[inline]
    pub fn find(&self, text: &str) -> Option<Match> {
        self.find_iter(text).next()
    }

    /// Searches `text`, returning an iterator over non-overlapping matches.
    /// Note that the resulting iterator borrows both the regex as `'r` and
    /// the input string as `'t`.
    #[inline]
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        self.find_from(text, 0)
    }

    /// Returns an iterator over matches found in `text` starting at byte
    /// index `start`. Note this may be different from passing a sliced
    /// `text` in the case of lookbehind assertions.
    /// Example:
    ///
    ///  ```rust
    ///   use recoil::Regex;
    ///   let text = "xyxy";
    ///   let re = Regex::new(r"(?<=x)y").unwrap();
    ///   let t1 = re.find(&text[1..]).unwrap().range();
    ///   assert!(t1 == (2..3));
    ///   let t2 = re.find_from(text, 1).next().unwrap().range();
    ///   assert!(t2 == (1..2));
    ///   ```
    #[inline]
    pub fn find_from<'r, 't>(&'r self, text: &'t str, start: usize) -> Matches<'r, 't> {
        exec::Matches::new(Searcher::new(&self.cr, text), start)
    }

    /// \return the number of capture groups, including the implicit group 0
    /// for the whole match.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.cr.prog.captures
    }

    /// \return the capture group names, ordered by index. Index 0 is the
    /// unnamed whole match; unnamed groups yield an empty string.
    #[inline]
    pub fn group_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.cr.group_names.iter().map(|n| n.as_ref())
    }

    /// \return the index of the named group `name`, or None if the pattern
    /// has no group with that name.
    #[inline]
    pub fn group_index(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.cr.group_names.iter().position(|n| n.as_ref() == name)
    }
}

impl FromStr for Regex {
    type Err = Error;

    /// Attempts to parse a string into a regular expression
    #[inline]
    fn from_str(s: &str) -> Result<Self, Error> {
        Self::new(s)
    }
}
