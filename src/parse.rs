//! Parser from pattern text to the syntax tree.

use crate::api::Flags;
use crate::ast::{AssertionKind, Node, Quantifier};
use crate::charclasses::{self, ClassContents, RuneRange};
use std::collections::HashMap;
use std::fmt;

/// Represents an error encountered during pattern compilation.
/// The text contains a human-readable message; the position, when present,
/// is a byte offset into the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub text: String,
    pub position: Option<usize>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{} (at offset {})", self.text, pos),
            None => f.write_str(&self.text),
        }
    }
}

impl std::error::Error for Error {}

/// The flag set in effect at a point in the pattern.
/// (?i), (?m) and (?s) groups mutate it as parsing proceeds.
#[derive(Debug, Copy, Clone, Default)]
struct ParseFlags {
    icase: bool,
    multiline: bool,
    dot_all: bool,
}

impl From<Flags> for ParseFlags {
    fn from(f: Flags) -> Self {
        ParseFlags {
            icase: f.icase,
            multiline: f.multiline,
            dot_all: f.dot_all,
        }
    }
}

/// The result of a successful parse.
#[derive(Debug)]
pub(crate) struct ParsedPattern {
    pub node: Node,

    /// Number of capturing groups, not counting the implicit group 0.
    pub group_count: usize,
}

/// \return whether \p c may start a capture group name.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// \return whether \p c may continue a capture group name.
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Represents the state used to parse a pattern.
struct Parser<'p> {
    /// The pattern text.
    pattern: &'p str,

    /// Current byte offset into the pattern.
    pos: usize,

    /// Scoped flags.
    flags: ParseFlags,

    /// Number of capturing groups seen so far.
    group_count: usize,

    /// Names of named groups, for duplicate detection.
    names: HashMap<String, usize>,

    /// Largest backreference index encountered.
    max_backref: usize,
}

impl<'p> Parser<'p> {
    fn error<S: ToString, T>(&self, text: S) -> Result<T, Error> {
        Err(Error {
            text: text.to_string(),
            position: Some(self.pos),
        })
    }

    /// \return the remaining pattern text.
    fn rest(&self) -> &'p str {
        &self.pattern[self.pos..]
    }

    /// Peek at the next character.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek at the character after the next one.
    fn peek2(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// Consume and return the next character.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// If the next character is \p c, consume it and return true.
    fn try_consume(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn try_parse(&mut self) -> Result<ParsedPattern, Error> {
        let node = self.parse_alternation()?;
        match self.peek() {
            Some(')') => self.error("unmatched closing parenthesis"),
            Some(c) => self.error(format!("unexpected character {:?}", c)),
            None => self.finalize(node),
        }
    }

    /// expression = term ('|' term)*
    fn parse_alternation(&mut self) -> Result<Node, Error> {
        let mut branches = vec![self.parse_term()?];
        while self.try_consume('|') {
            branches.push(self.parse_term()?);
        }
        Ok(if branches.len() == 1 {
            branches.pop().unwrap()
        } else {
            Node::Alt(branches)
        })
    }

    /// term = factor*
    fn parse_term(&mut self) -> Result<Node, Error> {
        let mut nodes = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            nodes.push(self.parse_factor()?);
        }
        Ok(Node::cat(nodes))
    }

    /// factor = atom quantifier?
    fn parse_factor(&mut self) -> Result<Node, Error> {
        let atom = self.parse_atom()?;
        match self.try_parse_quantifier()? {
            Some(quant) => Ok(Node::Quant {
                body: Box::new(atom),
                quant,
            }),
            None => Ok(atom),
        }
    }

    fn try_parse_quantifier(&mut self) -> Result<Option<Quantifier>, Error> {
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };
        let mut quant = match c {
            '*' => {
                self.bump();
                Quantifier {
                    min: 0,
                    max: None,
                    greedy: true,
                }
            }
            '+' => {
                self.bump();
                Quantifier {
                    min: 1,
                    max: None,
                    greedy: true,
                }
            }
            '?' => {
                self.bump();
                Quantifier {
                    min: 0,
                    max: Some(1),
                    greedy: true,
                }
            }
            '{' => {
                self.bump();
                let min = match self.try_parse_decimal() {
                    Some(n) => n,
                    None => return self.error("quantifier is missing a count"),
                };
                let mut max = Some(min);
                if self.try_consume(',') {
                    if self.peek() == Some('}') {
                        max = None;
                    } else {
                        let m = match self.try_parse_decimal() {
                            Some(n) => n,
                            None => return self.error("quantifier is missing a maximum"),
                        };
                        if min > m {
                            return self.error(format!(
                                "invalid quantifier {{{},{}}}: minimum exceeds maximum",
                                min, m
                            ));
                        }
                        max = Some(m);
                    }
                }
                if !self.try_consume('}') {
                    return self.error("unclosed quantifier");
                }
                Quantifier {
                    min,
                    max,
                    greedy: true,
                }
            }
            _ => return Ok(None),
        };
        if self.try_consume('?') {
            quant.greedy = false;
        }
        Ok(Some(quant))
    }

    /// Consume a run of decimal digits, saturating on overflow.
    fn try_parse_decimal(&mut self) -> Option<usize> {
        let mut result: usize = 0;
        let mut digits = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            self.bump();
            digits += 1;
            result = result.saturating_mul(10).saturating_add(d as usize);
        }
        (digits > 0).then_some(result)
    }

    /// atom = literal | escape | class | group | assertion
    fn parse_atom(&mut self) -> Result<Node, Error> {
        let c = self.peek().expect("caller checked for end of pattern");
        match c {
            '(' => {
                self.bump();
                self.parse_group()
            }
            '[' => {
                self.bump();
                self.parse_class()
            }
            '.' => {
                self.bump();
                Ok(Node::Class(if self.flags.dot_all {
                    ClassContents {
                        ranges: vec![RuneRange {
                            lo: '\0',
                            hi: '\u{10FFFF}',
                        }],
                        negate: false,
                        fold: false,
                    }
                } else {
                    ClassContents {
                        ranges: vec![charclasses::r1('\n')],
                        negate: true,
                        fold: false,
                    }
                }))
            }
            '\\' => {
                self.bump();
                self.parse_escape()
            }
            '^' => {
                self.bump();
                Ok(Node::Assert(AssertionKind::StartText {
                    multiline: self.flags.multiline,
                }))
            }
            '$' => {
                self.bump();
                Ok(Node::Assert(AssertionKind::EndText {
                    multiline: self.flags.multiline,
                }))
            }
            '*' | '+' | '?' | '{' => {
                self.error(format!("quantifier {:?} has nothing to repeat", c))
            }
            _ => {
                self.bump();
                Ok(Node::Literal {
                    runes: vec![c],
                    fold: self.flags.icase,
                })
            }
        }
    }

    /// Parse an escape outside a character class; the backslash has been
    /// consumed.
    fn parse_escape(&mut self) -> Result<Node, Error> {
        let c = match self.bump() {
            Some(c) => c,
            None => return self.error("trailing backslash"),
        };
        let class = |ranges: &[RuneRange], negate: bool, fold: bool| {
            Ok(Node::Class(ClassContents {
                ranges: ranges.to_vec(),
                negate,
                fold,
            }))
        };
        let literal = |c: char, fold: bool| {
            Ok(Node::Literal {
                runes: vec![c],
                fold,
            })
        };
        let fold = self.flags.icase;
        match c {
            'd' => class(&charclasses::DIGITS, false, fold),
            'D' => class(&charclasses::DIGITS, true, fold),
            'w' => class(&charclasses::WORD_CHARS, false, fold),
            'W' => class(&charclasses::WORD_CHARS, true, fold),
            's' => class(&charclasses::WHITESPACE, false, fold),
            'S' => class(&charclasses::WHITESPACE, true, fold),

            'b' => Ok(Node::Assert(AssertionKind::WordBoundary)),
            'B' => Ok(Node::Assert(AssertionKind::NotWordBoundary)),
            'A' => Ok(Node::Assert(AssertionKind::StringStart)),
            'Z' => Ok(Node::Assert(AssertionKind::StringEnd)),
            'z' => Ok(Node::Assert(AssertionKind::AbsoluteEnd)),

            'n' => literal('\n', fold),
            't' => literal('\t', fold),
            'r' => literal('\r', fold),
            'f' => literal('\x0C', fold),
            'v' => literal('\x0B', fold),

            '1'..='9' => {
                let group = c.to_digit(10).unwrap() as usize;
                self.max_backref = self.max_backref.max(group);
                Ok(Node::Backref { group, fold })
            }

            // Escaped metacharacters, and anything else, match themselves.
            _ => literal(c, fold),
        }
    }

    /// Parse a character class; the opening bracket has been consumed.
    fn parse_class(&mut self) -> Result<Node, Error> {
        let negate = self.try_consume('^');
        let mut ranges: Vec<RuneRange> = Vec::new();

        // A ] immediately after [ or [^ is a literal ].
        if self.try_consume(']') {
            ranges.push(charclasses::r1(']'));
        }

        loop {
            match self.peek() {
                None => return self.error("unclosed character class"),
                Some(']') => {
                    self.bump();
                    return Ok(Node::Class(ClassContents {
                        ranges,
                        negate,
                        fold: self.flags.icase,
                    }));
                }
                Some('\\') => {
                    // \d, \w and \s expand to their ranges; their negated
                    // forms cannot be expressed inside a class.
                    match self.peek2() {
                        Some('d') => {
                            self.bump();
                            self.bump();
                            ranges.extend_from_slice(&charclasses::DIGITS);
                            continue;
                        }
                        Some('w') => {
                            self.bump();
                            self.bump();
                            ranges.extend_from_slice(&charclasses::WORD_CHARS);
                            continue;
                        }
                        Some('s') => {
                            self.bump();
                            self.bump();
                            ranges.extend_from_slice(&charclasses::WHITESPACE);
                            continue;
                        }
                        Some(nc @ ('D' | 'W' | 'S')) => {
                            return self.error(format!(
                                "\\{} is not supported inside a character class",
                                nc
                            ));
                        }
                        _ => {}
                    }
                }
                _ => {}
            }

            let lo = self.parse_class_char()?;
            if self.try_consume('-') {
                if self.peek() == Some(']') {
                    // A trailing - is a literal.
                    ranges.push(charclasses::r1(lo));
                    ranges.push(charclasses::r1('-'));
                    continue;
                }
                let hi = self.parse_class_char()?;
                if lo > hi {
                    return self.error(format!(
                        "invalid character class range: {:?}-{:?}",
                        lo, hi
                    ));
                }
                ranges.push(charclasses::r(lo, hi));
            } else {
                ranges.push(charclasses::r1(lo));
            }
        }
    }

    /// Parse one char inside a class, resolving escapes.
    fn parse_class_char(&mut self) -> Result<char, Error> {
        let c = match self.bump() {
            Some(c) => c,
            None => return self.error("unclosed character class"),
        };
        if c != '\\' {
            return Ok(c);
        }
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('f') => Ok('\x0C'),
            Some('v') => Ok('\x0B'),
            Some(esc) => Ok(esc),
            None => self.error("trailing backslash"),
        }
    }

    /// Parse a group; the opening parenthesis has been consumed.
    fn parse_group(&mut self) -> Result<Node, Error> {
        if !self.try_consume('?') {
            // Plain capturing group. The index is allocated before the body
            // so outer groups number lower than the groups they contain.
            self.group_count += 1;
            let index = self.group_count;
            let body = self.parse_alternation()?;
            if !self.try_consume(')') {
                return self.error("unclosed capturing group");
            }
            return Ok(Node::Capture {
                body: Box::new(body),
                index,
                name: None,
            });
        }

        if matches!(self.peek(), Some('i' | 'm' | 's' | '-')) {
            return self.parse_flag_group();
        }

        match self.peek() {
            Some(':') => {
                self.bump();
                let body = self.parse_alternation()?;
                if !self.try_consume(')') {
                    return self.error("unclosed group");
                }
                Ok(body)
            }

            Some('P') => {
                self.bump();
                self.parse_named_group()
            }

            Some('=') => {
                self.bump();
                self.parse_lookaround(false, false)
            }

            Some('!') => {
                self.bump();
                self.parse_lookaround(true, false)
            }

            Some('<') => {
                self.bump();
                let negate = match self.peek() {
                    Some('=') => false,
                    Some('!') => true,
                    _ => return self.error("invalid lookbehind syntax"),
                };
                self.bump();
                self.parse_lookaround(negate, true)
            }

            Some(c) => self.error(format!("unrecognized group extension ?{}", c)),
            None => self.error("unclosed group"),
        }
    }

    /// Parse (?flags) or (?flags:body); the "(?" has been consumed and the
    /// next char is a flag letter or '-'.
    fn parse_flag_group(&mut self) -> Result<Node, Error> {
        let saved = self.flags;
        let mut turn_on = true;
        loop {
            match self.peek() {
                Some(')') | Some(':') => break,
                Some('-') => {
                    self.bump();
                    turn_on = false;
                }
                Some('i') => {
                    self.bump();
                    self.flags.icase = turn_on;
                }
                Some('m') => {
                    self.bump();
                    self.flags.multiline = turn_on;
                }
                Some('s') => {
                    self.bump();
                    self.flags.dot_all = turn_on;
                }
                Some(c) => return self.error(format!("unknown flag {:?}", c)),
                None => return self.error("unclosed group"),
            }
        }

        if self.try_consume(')') {
            // (?flags) applies to the rest of the pattern.
            return Ok(Node::Empty);
        }

        // (?flags:body) applies only inside the group.
        self.bump();
        let body = self.parse_alternation()?;
        if !self.try_consume(')') {
            self.flags = saved;
            return self.error("unclosed group");
        }
        self.flags = saved;
        Ok(body)
    }

    /// Parse (?P<name>body); the "(?P" has been consumed.
    fn parse_named_group(&mut self) -> Result<Node, Error> {
        if !self.try_consume('<') {
            return self.error("expected < in named group");
        }
        let name_end = match self.rest().find('>') {
            Some(idx) => idx,
            None => return self.error("unclosed group name"),
        };
        let name = &self.rest()[..name_end];
        if name.is_empty() {
            return self.error("empty capture group name");
        }
        let mut chars = name.chars();
        if !is_ident_start(chars.next().unwrap()) {
            return self.error(format!(
                "invalid capture group name {:?}: must start with a letter or underscore",
                name
            ));
        }
        if let Some(bad) = chars.find(|&c| !is_ident_char(c)) {
            return self.error(format!(
                "invalid capture group name {:?}: contains {:?}",
                name, bad
            ));
        }
        if let Some(&existing) = self.names.get(name) {
            return self.error(format!(
                "duplicate capture group name {:?} (already used for group {})",
                name, existing
            ));
        }

        self.group_count += 1;
        let index = self.group_count;
        let name = name.to_string();
        self.names.insert(name.clone(), index);
        self.pos += name_end + 1;

        let body = self.parse_alternation()?;
        if !self.try_consume(')') {
            return self.error("unclosed named group");
        }
        Ok(Node::Capture {
            body: Box::new(body),
            index,
            name: Some(name.into_boxed_str()),
        })
    }

    fn parse_lookaround(&mut self, negate: bool, behind: bool) -> Result<Node, Error> {
        let body = self.parse_alternation()?;
        if !self.try_consume(')') {
            return self.error("unclosed lookaround");
        }
        Ok(Node::Lookaround {
            body: Box::new(body),
            negate,
            behind,
        })
    }

    fn finalize(&self, node: Node) -> Result<ParsedPattern, Error> {
        if self.max_backref > self.group_count {
            return Err(Error {
                text: format!(
                    "backreference \\{} exceeds number of capture groups",
                    self.max_backref
                ),
                position: None,
            });
        }
        Ok(ParsedPattern {
            node,
            group_count: self.group_count,
        })
    }
}

/// Try parsing a given pattern under the given flags.
pub(crate) fn try_parse(pattern: &str, flags: Flags) -> Result<ParsedPattern, Error> {
    let mut p = Parser {
        pattern,
        pos: 0,
        flags: flags.into(),
        group_count: 0,
        names: HashMap::new(),
        max_backref: 0,
    };
    p.try_parse()
}
