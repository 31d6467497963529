//! Shared helpers for the integration tests.

use recoil::{Match, Regex};

/// Test that \p pattern fails to parse with default flags.
pub fn test_parse_fails(pattern: &str) {
    let res = Regex::new(pattern);
    assert!(res.is_err(), "Pattern should not have parsed: {}", pattern);
}

/// Format a Match by inserting commas between all capture groups.
pub fn format_match(m: &Match, input: &str) -> String {
    let mut result = input[m.range()].to_string();
    for cg in m.captures.iter() {
        result.push(',');
        if let Some(cg) = cg {
            result.push_str(&input[cg.clone()]);
        }
    }
    result
}

pub trait StringTestHelpers {
    /// "Fluent" style helper for testing that a String is equal to a str.
    fn test_eq(&self, s: &str);
}

impl StringTestHelpers for String {
    fn test_eq(&self, rhs: &str) {
        assert_eq!(self.as_str(), rhs)
    }
}

pub trait VecTestHelpers {
    /// "Fluent" style helper for testing that a Vec<&str> is equal to a
    /// Vec<&str>.
    fn test_eq(&self, rhs: Vec<&str>);
}

impl VecTestHelpers for Vec<&str> {
    fn test_eq(&self, rhs: Vec<&str>) {
        assert_eq!(*self, rhs)
    }
}

/// A compiled regex wrapped with test conveniences.
#[derive(Debug, Clone)]
pub struct TestCompiledRegex {
    re: Regex,
}

impl TestCompiledRegex {
    /// Search for self in \p input, returning the first Match, or None.
    pub fn find(&self, input: &str) -> Option<Match> {
        self.re.find(input)
    }

    /// Search for self in \p input, formatting the first match and its
    /// capture groups. Panics if there is no match.
    #[track_caller]
    pub fn match1f(&self, input: &str) -> String {
        match self.find(input) {
            Some(m) => format_match(&m, input),
            None => panic!("Failed to match {:?}", input),
        }
    }

    /// Search for self in \p input, returning the text of all matches.
    pub fn match_all<'t>(&self, input: &'t str) -> Vec<&'t str> {
        self.re
            .find_iter(input)
            .map(|m| &input[m.range()])
            .collect()
    }

    /// Search for self in \p input from \p start, returning all match
    /// ranges.
    pub fn match_all_from(&self, input: &str, start: usize) -> Vec<recoil::Range> {
        self.re
            .find_from(input, start)
            .map(|m| m.range())
            .collect()
    }

    /// Test that self matches \p input somewhere.
    #[track_caller]
    pub fn test_succeeds(&self, input: &str) {
        assert!(
            self.re.is_match(input),
            "Pattern should have matched {:?}",
            input
        );
    }

    /// Test that self does not match \p input anywhere.
    #[track_caller]
    pub fn test_fails(&self, input: &str) {
        assert!(
            !self.re.is_match(input),
            "Pattern should not have matched {:?}",
            input
        );
    }

    /// Access the underlying Regex.
    pub fn re(&self) -> &Regex {
        &self.re
    }
}

/// Compile \p pattern with default flags, panicking on error.
#[track_caller]
pub fn compile(pattern: &str) -> TestCompiledRegex {
    compilef(pattern, "")
}

/// Compile \p pattern with \p flags, panicking on error.
#[track_caller]
pub fn compilef(pattern: &str, flags: &str) -> TestCompiledRegex {
    match Regex::with_flags(pattern, flags) {
        Ok(re) => TestCompiledRegex { re },
        Err(err) => panic!("Failed to compile {:?}: {}", pattern, err),
    }
}
