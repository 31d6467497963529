// Work around dead code warnings: rust-lang issue #46379
pub mod common;

use common::*;

#[test]
fn test_simple_literals() {
    compile("abc").test_succeeds("abc");
    compile("abc").test_succeeds("xabcy");
    compile("abc").test_fails("ab");
    compile("a.c").test_succeeds("abc");
    compile("a.c").test_succeeds("axc");
    compile("a.c").test_fails("ac");
}

#[test]
fn test_alternation() {
    compile("a|b").test_succeeds("a");
    compile("a|b").test_succeeds("b");
    compile("a|b").test_fails("c");
    compile("foo|bar").test_succeeds("foo");
    compile("foo|bar").test_succeeds("bar");
    compile("foo|bar").test_fails("baz");
    // First viable branch wins.
    compile("a|ab").match1f("ab").test_eq("a");
}

#[test]
fn test_quantifiers() {
    compile("a*").test_succeeds("");
    compile("a*").test_succeeds("aaaa");
    compile("a+").test_succeeds("a");
    compile("a+").test_fails("");
    compile("a?").test_succeeds("");
    compile("a?").test_succeeds("a");
    compile("ab*c").match1f("abbbc").test_eq("abbbc");
    compile("ab+c").test_fails("ac");
}

#[test]
fn test_bounded_quantifiers() {
    compile("a{3}").test_succeeds("aaa");
    compile("a{3}").test_fails("aa");
    compile("a{2,}").test_fails("a");
    compile("a{2,}").match1f("aaaa").test_eq("aaaa");
    compile("a{0,2}").test_succeeds("");
    compile("\\d{2,3}")
        .match_all("1 12 123 1234")
        .test_eq(vec!["12", "123", "123"]);
}

#[test]
fn test_greedy_vs_nongreedy() {
    // Greedy selects the longest admissible length, non-greedy the
    // shortest, anchored identically.
    let m = compile("a{2,4}").find("aaaaa").unwrap();
    assert_eq!(m.range(), 0..4);
    let m = compile("a{2,4}?").find("aaaaa").unwrap();
    assert_eq!(m.range(), 0..2);

    compile("<.*>").match1f("<a><b>").test_eq("<a><b>");
    compile("<.*?>").match1f("<a><b>").test_eq("<a>");
}

#[test]
fn test_char_classes() {
    compile("[a-z]").test_succeeds("a");
    compile("[a-z]").test_fails("A");
    compile("[^a-z]").test_succeeds("A");
    compile("[^a-z]").test_fails("a");
    compile("[a-z0-9_]+").match1f("Hello_world9!").test_eq("ello_world9");
    // Literal ] and - placements.
    compile("[]a]").test_succeeds("]");
    compile("[a-]").test_succeeds("-");
    compile("[-a]").test_succeeds("-");
    // Escapes inside classes.
    compile("[\\t\\n]").test_succeeds("\t");
    compile("[\\d]+").match1f("ab123cd").test_eq("123");
    compile("[\\w.-]+").match1f("api.github.com!").test_eq("api.github.com");
}

#[test]
fn test_escape_classes() {
    compile("\\d+").match1f("abc123def").test_eq("123");
    compile("\\D+").match1f("123abc456").test_eq("abc");
    compile("\\w+").match_all("hello world foo").test_eq(vec!["hello", "world", "foo"]);
    compile("\\W").test_fails("abc_123");
    compile("\\s+").match1f("a \t b").test_eq(" \t ");
    compile("\\S+").match1f("  abc  ").test_eq("abc");
}

#[test]
fn test_dot_excludes_newline() {
    compile("a.b").test_fails("a\nb");
    compile(".").test_fails("\n");
    compile(".+").match1f("one\ntwo").test_eq("one");
}

#[test]
fn test_unicode_literals() {
    compile("中文").test_succeeds("用中文写");
    compile("é+").match1f("caféé!").test_eq("éé");
    let m = compile("中").find("用中文").unwrap();
    // Matches lie on rune boundaries.
    assert_eq!(m.range(), 3..6);
}

#[test]
fn test_empty_pattern() {
    let m = compile("").find("abc").unwrap();
    assert_eq!(m.range(), 0..0);
    compile("").test_succeeds("");
}

#[test]
fn test_pathological_pattern_hits_step_ceiling() {
    // Exponential backtracking is cut off and reported as a non-match.
    compile("(a+)+b").test_fails(&"a".repeat(20));
}

#[test]
fn test_literal_prefix_scan() {
    // Patterns with a literal head exercise the prefix-skip path.
    compile("abc\\d+").match1f("xx abc12 yy").test_eq("abc12");
    compile("needle").test_fails(&"hay".repeat(1000));
    let m = compile("ab+c").find("ababbbc abc").unwrap();
    assert_eq!(m.range(), 2..7);
}

#[test]
fn test_determinism() {
    // Identical regex and input give identical results, repeatedly.
    let re = compile("(a+)(b*)");
    let first = re.match1f("xaabbby");
    for _ in 0..10 {
        re.match1f("xaabbby").test_eq(&first);
    }
}
