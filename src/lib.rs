/*!

# recoil — a backtracking regular expression engine

This crate provides a regular expression engine which targets PCRE-style
syntax, including features beyond classical regular languages: lookahead and
lookbehind assertions, backreferences, and named capture groups.

# Example: test if a string contains a match

```rust
use recoil::Regex;
let re = Regex::new(r"\d{4}").unwrap();
assert!(re.is_match("2020-20-05"));
```

# Example: iterating over matches

Here we use a backreference to find doubled characters:

```rust
use recoil::Regex;
let re = Regex::new(r"(\w)\1").unwrap();
let text = "Frankly, Miss Piggy, I don't give a hoot!";
let doubled: Vec<&str> = re.find_iter(text).map(|m| &text[m.range()]).collect();
assert_eq!(doubled, vec!["ss", "gg", "oo"]);
```

# Example: using capture groups

Capture groups are available in the `Match` object produced by a successful
match. A capture group is a range of byte indexes into the original string.

```rust
use recoil::Regex;
let re = Regex::new(r"(?P<year>\d{4})-(\d{2})").unwrap();
let text = "Launched 2015-08.";
let m = re.find(text).unwrap();
assert_eq!(&text[m.named_group("year").unwrap()], "2015");
assert_eq!(&text[m.group(2).unwrap()], "08");
```

# Supported syntax

Alternation, concatenation, and the quantifiers `*`, `+`, `?`, `{n}`,
`{n,}`, `{n,m}`, each with a non-greedy `?` suffix; character classes with
ranges and negation; `.`; the escapes `\d \D \w \W \s \S` (ASCII-oriented)
and `\n \t \r \f \v`; the assertions `^ $ \b \B \A \Z \z`; capturing groups
`(..)`, non-capturing groups `(?:..)`, named groups `(?P<name>..)`;
lookahead `(?=..)`, `(?!..)` and lookbehind `(?<=..)`, `(?<!..)`;
backreferences `\1`..`\9`; and the inline flags `(?i)`, `(?m)`, `(?s)`,
scoped as `(?flags:..)` or negated as `(?-flags)`.

Case-insensitive matching uses Unicode simple case folding, so for example
`(?i)k` matches the Kelvin sign:

```rust
use recoil::Regex;
let re = Regex::with_flags("k", "i").unwrap();
assert!(re.is_match("\u{212A}"));
```

# Architecture

recoil has a parser producing a syntax tree, a compiler which lowers the
tree to a flat bytecode program (analyzing literal prefixes and fixed
lookbehind widths along the way), and a recursive backtracking interpreter.
Matching is unanchored: the matcher tries successive start positions,
skipping ahead with a fast literal search when the pattern begins with
literal text.

Because the engine backtracks, it supports backreferences and arbitrary
lookarounds, but does not provide linear-time guarantees; a step ceiling
bounds pathological patterns by treating them as non-matches.

*/

#![warn(clippy::all)]

pub use crate::api::*;

mod api;
mod ast;
mod backtrack;
mod charclasses;
mod emit;
mod exec;
mod folds;
mod input;
mod insn;
mod parse;
mod prefix;
