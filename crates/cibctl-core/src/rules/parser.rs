//! Rule expression tokens to syntax tree
//!
//! ```text
//! expr    := primary (("and" | "or") primary)*
//! primary := "(" expr ")"
//!          | ("defined" | "not_defined") ATTR
//!          | ATTR OP [TYPE] VALUE
//!          | "date" ("gt" | "lt") DATE
//!          | "date" "in_range" [DATE] "to" (DATE | "duration" PART+)
//!          | "date-spec" PART+
//! ```
//!
//! `and` and `or` bind equally and associate to the left.

use std::fmt;

/// Attribute comparison operators
pub const COMPARISON_OPS: &[&str] = &["lt", "gt", "lte", "gte", "eq", "ne"];

/// Value types accepted after a comparison operator
pub const VALUE_TYPES: &[&str] = &["string", "integer", "number", "version"];

/// Field names accepted in `date-spec` and `duration`
pub const DATE_PARTS: &[&str] = &[
    "hours",
    "monthdays",
    "weekdays",
    "yeardays",
    "months",
    "weeks",
    "years",
    "weekyears",
    "moon",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}

/// End of a `date in_range` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeEnd {
    Date(String),
    Duration(Vec<(String, String)>),
}

/// Parsed rule expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleNode {
    Bool {
        op: BoolOp,
        left: Box<RuleNode>,
        right: Box<RuleNode>,
    },
    /// `defined` / `not_defined`
    Presence { operation: String, attribute: String },
    Compare {
        attribute: String,
        operation: String,
        value_type: Option<String>,
        value: String,
    },
    DateGt(String),
    DateLt(String),
    DateInRange {
        start: Option<String>,
        end: RangeEnd,
    },
    DateSpec(Vec<(String, String)>),
}

/// Why a token list is not a rule expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Split parentheses glued to words: `(#uname` becomes `(`, `#uname`
pub fn preprocess(tokens: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for token in tokens {
        let mut rest = token.as_str();
        while let Some(stripped) = rest.strip_prefix('(') {
            out.push("(".to_string());
            rest = stripped;
        }
        let mut closing = 0;
        while let Some(stripped) = rest.strip_suffix(')') {
            closing += 1;
            rest = stripped;
        }
        if !rest.is_empty() {
            out.push(rest.to_string());
        }
        out.extend(std::iter::repeat(")".to_string()).take(closing));
    }
    out
}

/// Parse preprocessed tokens into a single expression
///
/// # Errors
///
/// Returns a `ParseError` describing the first offending token.
pub fn parse(tokens: &[String]) -> ParseResult<RuleNode> {
    let mut parser = Parser { tokens, pos: 0 };
    let node = parser.expression()?;
    match parser.peek() {
        None => Ok(node),
        Some(")") => Err(ParseError("unexpected ')'".to_string())),
        Some(other) => Err(ParseError(format!(
            "missing one of 'and', 'or' before '{}'",
            other
        ))),
    }
}

struct Parser<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a str> {
        self.tokens.get(self.pos + offset).map(String::as_str)
    }

    fn next(&mut self) -> ParseResult<&'a str> {
        let token = self
            .peek()
            .ok_or_else(|| ParseError("unexpected end of rule".to_string()))?;
        self.pos += 1;
        Ok(token)
    }

    fn expression(&mut self) -> ParseResult<RuleNode> {
        let mut left = self.primary()?;
        loop {
            let op = match self.peek() {
                Some("and") => BoolOp::And,
                Some("or") => BoolOp::Or,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.primary()?;
            left = RuleNode::Bool {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn primary(&mut self) -> ParseResult<RuleNode> {
        let token = self.next()?;
        match token {
            "(" => {
                let inner = self.expression()?;
                match self.next() {
                    Ok(")") => Ok(inner),
                    Ok(other) => Err(ParseError(format!("expecting ')', got '{}'", other))),
                    Err(_) => Err(ParseError("missing ')'".to_string())),
                }
            }
            ")" | "and" | "or" => Err(ParseError(format!("unexpected '{}'", token))),
            "defined" | "not_defined" => {
                let attribute = self.operand(token)?;
                Ok(RuleNode::Presence {
                    operation: token.to_string(),
                    attribute: attribute.to_string(),
                })
            }
            "date-spec" => Ok(RuleNode::DateSpec(self.date_parts("date-spec")?)),
            "date" => self.date(),
            attribute => self.comparison(attribute),
        }
    }

    /// Single operand token that is not an operator or parenthesis
    fn operand(&mut self, after: &str) -> ParseResult<&'a str> {
        match self.next()? {
            "(" | ")" | "and" | "or" => Err(ParseError(format!(
                "missing argument after '{}'",
                after
            ))),
            value => Ok(value),
        }
    }

    fn comparison(&mut self, attribute: &'a str) -> ParseResult<RuleNode> {
        let operation = self.next()?;
        if !COMPARISON_OPS.contains(&operation) {
            return Err(ParseError(format!(
                "missing one of {} after '{}'",
                quoted_list(COMPARISON_OPS),
                attribute
            )));
        }

        let typed = self.peek().is_some_and(|t| VALUE_TYPES.contains(&t))
            && self
                .peek_at(1)
                .is_some_and(|t| !matches!(t, "and" | "or" | ")"));
        let value_type = if typed {
            Some(self.next()?.to_string())
        } else {
            None
        };
        let value = self.operand(operation)?;

        if let Some(kind) = value_type.as_deref() {
            check_typed_value(kind, value)?;
        }

        Ok(RuleNode::Compare {
            attribute: attribute.to_string(),
            operation: operation.to_string(),
            value_type,
            value: value.to_string(),
        })
    }

    fn date(&mut self) -> ParseResult<RuleNode> {
        match self.next()? {
            "gt" => Ok(RuleNode::DateGt(self.operand("gt")?.to_string())),
            "lt" => Ok(RuleNode::DateLt(self.operand("lt")?.to_string())),
            "in_range" => {
                let start = if self.peek() == Some("to") {
                    None
                } else {
                    Some(self.operand("in_range")?.to_string())
                };
                match self.next()? {
                    "to" => {}
                    other => {
                        return Err(ParseError(format!("expecting 'to', got '{}'", other)));
                    }
                }
                let end = if self.peek() == Some("duration") {
                    self.pos += 1;
                    RangeEnd::Duration(self.date_parts("duration")?)
                } else {
                    RangeEnd::Date(self.operand("to")?.to_string())
                };
                Ok(RuleNode::DateInRange { start, end })
            }
            other => Err(ParseError(format!(
                "missing one of 'gt', 'lt', 'in_range' after 'date', got '{}'",
                other
            ))),
        }
    }

    fn date_parts(&mut self, keyword: &str) -> ParseResult<Vec<(String, String)>> {
        let mut parts: Vec<(String, String)> = Vec::new();
        while let Some((name, value)) = self.peek().and_then(|t| t.split_once('=')) {
            if !DATE_PARTS.contains(&name) {
                return Err(ParseError(format!("invalid {} option '{}'", keyword, name)));
            }
            if parts.iter().any(|(existing, _)| existing == name) {
                return Err(ParseError(format!(
                    "duplicate {} option '{}'",
                    keyword, name
                )));
            }
            if value.is_empty() {
                return Err(ParseError(format!(
                    "missing value for {} option '{}'",
                    keyword, name
                )));
            }
            parts.push((name.to_string(), value.to_string()));
            self.pos += 1;
        }
        if parts.is_empty() {
            return Err(match self.peek() {
                None => ParseError("unexpected end of rule".to_string()),
                Some(other) => ParseError(format!(
                    "expecting {} options, got '{}'",
                    keyword, other
                )),
            });
        }
        Ok(parts)
    }
}

fn check_typed_value(kind: &str, value: &str) -> ParseResult<()> {
    let ok = match kind {
        "integer" => value.parse::<i64>().is_ok(),
        "number" => value.parse::<f64>().is_ok(),
        "version" => {
            !value.is_empty()
                && value
                    .split('.')
                    .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
        }
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(ParseError(format!("invalid {} value '{}'", kind, value)))
    }
}

fn quoted_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("'{}'", item))
        .collect::<Vec<_>>()
        .join(", ")
}
