// Work around dead code warnings: rust-lang issue #46379
pub mod common;

use common::*;
use recoil::Regex;

#[test]
fn test_empty_string_matching() {
    let cases = [
        ("", true),
        ("a?", true),
        ("a*", true),
        ("a+", false),
        ("()", true),
        ("(?:)", true),
        ("^$", true),
        // Word boundaries require a word char on one side.
        (r"\b\b", false),
        ("(?=a)", false),
        ("(?!a)", true),
    ];
    for (pattern, want) in cases {
        let got = compile(pattern).find("").is_some();
        assert_eq!(got, want, "pattern {:?} on empty string", pattern);
    }
}

#[test]
fn test_empty_alternation_branches() {
    compile("a||b").test_succeeds("");
    compile("a||b").test_succeeds("x");
    compile("|a").match1f("a").test_eq("");
}

#[test]
fn test_consecutive_word_boundaries() {
    compile(r"\b").test_fails("");
    compile(r"\b\b\b\b").test_fails("");
    compile(r"\b").test_succeeds("a");
    compile(r"\b\b").test_succeeds("a");
    compile(r"\b\b\b\b").test_succeeds("a");
    compile(r"\b\b").test_succeeds("ab");
}

#[test]
fn test_zero_width_assertion_positions() {
    let m = compile("^(?=hello)").find("hello world").unwrap();
    assert_eq!(m.range(), 0..0);

    let m = compile("(?<=world)$").find("hello world").unwrap();
    assert_eq!(m.range(), 11..11);

    // \b finds every boundary: |hello| |world|.
    let boundaries: Vec<usize> = Regex::new(r"\b")
        .unwrap()
        .find_iter("hello world")
        .map(|m| m.start())
        .collect();
    assert_eq!(boundaries, vec![0, 5, 6, 11]);
}

#[test]
fn test_long_input_with_prefix() {
    let haystack = "x".repeat(100_000) + "needle";
    let re = compile("needle");
    re.test_succeeds(&haystack);
    let m = re.find(&haystack).unwrap();
    assert_eq!(m.range(), 100_000..100_006);
}

#[test]
fn test_large_alternation() {
    let pattern = (0..100)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join("|");
    let re = compile(&pattern);
    re.test_succeeds("word0");
    re.test_succeeds("word50");
    re.test_succeeds("word99");
    re.test_fails("wordx");
}

#[test]
fn test_deeply_nested_groups() {
    let depth = 20;
    let pattern = "(".repeat(depth) + "a" + &")".repeat(depth);
    let re = compile(&pattern);
    let m = re.find("a").unwrap();
    assert_eq!(m.captures.len(), depth);
    assert!(m.captures.iter().all(|c| *c == Some(0..1)));
}

#[test]
fn test_large_bounded_quantifier() {
    let re = compile("a{1000}");
    re.test_succeeds(&"a".repeat(1000));
    re.test_fails(&"a".repeat(999));
}

#[test]
fn test_character_class_with_many_members() {
    let re = compile(r#"[a-zA-Z0-9_!@#$%^&*()\-+={}\[\]:;"'<>,.?/\\|`~]"#);
    for c in "abcXYZ123!@#[]\\`".chars() {
        re.test_succeeds(&c.to_string());
    }
    re.test_fails(" ");
}

#[test]
fn test_multiple_backreferences() {
    let re = compile(r"(.)(.)(.)(.)\4\3\2\1");
    re.test_succeeds("abcddcba");
    re.test_fails("abcdabcd");
}

#[test]
fn test_quantified_groups_with_backrefs() {
    // The backreference sees the most recent iteration's capture.
    compile(r"(a|b)+\1").test_succeeds("abb");
    compile(r"(\d)+x\1").test_succeeds("123x3");
    compile(r"(\d)+x\1").test_fails("123x1");
}
