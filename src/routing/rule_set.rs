//! Rule-set block parsing.
//!
//! # Format
//! ```text
//! desc = "beta testers";
//! deadline = 1700000000;
//! rule = ["$header_x-beta == 1", "$query_uid < 1000"];
//! or = ["$cookie_force == yes"];
//! ```
//! Statements end with `;` (optional on the last one). `#` and `//` start
//! line comments. `rule` is required; a catch-all routing says `rule = [];`.
//! `desc`, `deadline` and `or` are optional.
//!
//! # Design Decisions
//! - The first invalid condition aborts the whole block; no partial result
//! - Unknown fields are rejected, so a misspelled `rule` cannot widen a routing
//! - A field set twice is rejected rather than silently overwritten

use crate::routing::condition::Condition;
use crate::routing::types::{ParseError, ParseResult};

/// The parsed contents of one rule-set block.
#[derive(Debug, Default)]
pub struct RuleSet {
    pub description: String,
    pub deadline: i64,
    /// All must hold.
    pub and_conditions: Vec<Condition>,
    /// At least one must hold.
    pub or_conditions: Vec<Condition>,
}

impl RuleSet {
    /// Parse a rule-set block, building every listed condition.
    pub fn parse(text: &str) -> ParseResult<Self> {
        let mut description = None;
        let mut deadline = None;
        let mut and_exprs = None;
        let mut or_exprs = None;

        let mut parser = Parser::new(text);
        while let Some((name, line, value)) = parser.statement()? {
            match name {
                "desc" => set_once(&mut description, name, value.into_string(name)?)?,
                "deadline" => set_once(&mut deadline, name, value.into_integer(name)?)?,
                "rule" => set_once(&mut and_exprs, name, value.into_list(name)?)?,
                "or" => set_once(&mut or_exprs, name, value.into_list(name)?)?,
                other => {
                    return Err(ParseError::UnknownField {
                        field: other.to_string(),
                        line,
                    });
                }
            }
        }
        let and_exprs = and_exprs.ok_or(ParseError::MissingField { field: "rule" })?;

        Ok(Self {
            description: description.unwrap_or_default(),
            deadline: deadline.unwrap_or_default(),
            and_conditions: parse_conditions("rule", and_exprs)?,
            or_conditions: parse_conditions("or", or_exprs.unwrap_or_default())?,
        })
    }
}

fn set_once<T>(slot: &mut Option<T>, field: &str, value: T) -> ParseResult<()> {
    if slot.is_some() {
        return Err(ParseError::DuplicateField {
            field: field.to_string(),
        });
    }
    *slot = Some(value);
    Ok(())
}

fn parse_conditions(field: &'static str, exprs: Vec<String>) -> ParseResult<Vec<Condition>> {
    exprs
        .iter()
        .enumerate()
        .map(|(index, expr)| {
            Condition::parse(expr).map_err(|e| ParseError::Rule {
                field,
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

/// A right-hand side value.
#[derive(Debug)]
enum Value {
    Str(String),
    Int(i64),
    List(Vec<String>),
}

impl Value {
    fn into_string(self, field: &str) -> ParseResult<String> {
        match self {
            Value::Str(s) => Ok(s),
            _ => Err(invalid(field, "a string")),
        }
    }

    fn into_integer(self, field: &str) -> ParseResult<i64> {
        match self {
            Value::Int(i) => Ok(i),
            _ => Err(invalid(field, "an integer")),
        }
    }

    fn into_list(self, field: &str) -> ParseResult<Vec<String>> {
        match self {
            Value::List(items) => Ok(items),
            _ => Err(invalid(field, "a list of strings")),
        }
    }
}

fn invalid(field: &str, expected: &'static str) -> ParseError {
    ParseError::InvalidField {
        field: field.to_string(),
        expected,
    }
}

/// Recursive-descent reader over the block text.
struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Next `name = value` statement with the line it starts on, or `None`
    /// at end of input.
    fn statement(&mut self) -> ParseResult<Option<(&'a str, usize, Value)>> {
        self.skip_trivia();
        if self.peek().is_none() {
            return Ok(None);
        }

        let line = self.line();
        let name = self.ident()?;
        self.skip_trivia();
        self.expect('=')?;
        self.skip_trivia();
        let value = self.value()?;
        self.skip_trivia();
        match self.peek() {
            Some(';') => {
                self.bump();
            }
            None => {}
            Some(c) => return Err(self.error(format!("expected `;`, found `{c}`"))),
        }
        Ok(Some((name, line, value)))
    }

    fn value(&mut self) -> ParseResult<Value> {
        match self.peek() {
            Some('"') => self.string().map(Value::Str),
            Some('[') => self.list().map(Value::List),
            Some(c) if c == '-' || c.is_ascii_digit() => self.integer().map(Value::Int),
            Some(c) => Err(self.error(format!("unexpected `{c}`"))),
            None => Err(self.error("expected a value")),
        }
    }

    fn list(&mut self) -> ParseResult<Vec<String>> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(items);
                }
                Some('"') => items.push(self.string()?),
                Some(c) => return Err(self.error(format!("expected a string, found `{c}`"))),
                None => return Err(self.error("unterminated list")),
            }
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(c) => return Err(self.error(format!("expected `,` or `]`, found `{c}`"))),
                None => return Err(self.error("unterminated list")),
            }
        }
    }

    fn string(&mut self) -> ParseResult<String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c) => return Err(self.error(format!("unknown escape `\\{c}`"))),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn integer(&mut self) -> ParseResult<i64> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let digits = &self.src[start..self.pos];
        digits
            .parse()
            .map_err(|_| self.error(format!("invalid integer `{digits}`")))
    }

    fn ident(&mut self) -> ParseResult<&'a str> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                self.bump();
            }
            Some(c) => return Err(self.error(format!("expected a field name, found `{c}`"))),
            None => return Err(self.error("expected a field name")),
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }
        Ok(&self.src[start..self.pos])
    }

    fn expect(&mut self, want: char) -> ParseResult<()> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected `{want}`, found `{c}`"))),
            None => Err(self.error(format!("expected `{want}`"))),
        }
    }

    /// Whitespace and line comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = &self.src[self.pos..];
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();
            if trimmed.starts_with('#') || trimmed.starts_with("//") {
                self.pos += trimmed.find('\n').unwrap_or(trimmed.len());
            } else {
                return;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn line(&self) -> usize {
        self.src[..self.pos].matches('\n').count() + 1
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            line: self.line(),
            message: message.into(),
        }
    }
}
