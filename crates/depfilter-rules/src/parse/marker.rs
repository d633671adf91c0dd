//! Tokenizer and recursive-descent parser for condition expressions.
//!
//! Grammar (`and` binds tighter than `or`):
//!
//! ```text
//! or_expr  := and_expr ("or" and_expr)*
//! and_expr := atom ("and" atom)*
//! atom     := "(" or_expr ")" | operand op operand
//! operand  := marker_var | quoted_string
//! ```

use depfilter_core::{FilterError, Result, VersionPattern};

use crate::marker::{CompareOp, Marker, MarkerValue, MarkerVar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Str(&'a str),
    Op(&'a str),
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start();
        let Some(ch) = rest.chars().next() else {
            break;
        };

        match ch {
            '(' => {
                tokens.push(Token::LParen);
                rest = &rest[1..];
            }
            ')' => {
                tokens.push(Token::RParen);
                rest = &rest[1..];
            }
            '\'' | '"' => {
                let body = &rest[1..];
                let end = body.find(ch).ok_or_else(|| {
                    FilterError::malformed(0, format!("unterminated string in `{}`", input.trim()))
                })?;
                tokens.push(Token::Str(&body[..end]));
                rest = &body[end + 1..];
            }
            '=' | '!' | '<' | '>' | '~' => {
                let end = rest
                    .find(|c: char| !matches!(c, '=' | '!' | '<' | '>' | '~'))
                    .unwrap_or(rest.len());
                tokens.push(Token::Op(&rest[..end]));
                rest = &rest[end..];
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let end = rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                tokens.push(Token::Ident(&rest[..end]));
                rest = &rest[end..];
            }
            other => {
                return Err(FilterError::malformed(
                    0,
                    format!("unexpected character `{}` in condition", other),
                ));
            }
        }
    }

    Ok(tokens)
}

/// Parses a condition expression such as
/// `python_version == '3.10' and platform_system == 'Windows'`.
///
/// Errors carry line `0`; callers re-stamp them with
/// [`FilterError::at_line`].
pub fn parse_marker(input: &str) -> Result<Marker> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(FilterError::malformed(0, "empty condition"));
    }

    let mut parser = MarkerParser { tokens, pos: 0 };
    let marker = parser.or_expr()?;
    if let Some(token) = parser.peek() {
        return Err(FilterError::malformed(
            0,
            format!("unexpected {} after condition", describe(token)),
        ));
    }
    Ok(marker)
}

enum Operand<'a> {
    Var(MarkerVar),
    Literal(&'a str),
}

struct MarkerParser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> MarkerParser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek() == Some(Token::Ident(keyword)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or_expr(&mut self) -> Result<Marker> {
        let mut terms = vec![self.and_expr()?];
        while self.eat_keyword("or") {
            terms.push(self.and_expr()?);
        }
        Ok(collapse(terms, Marker::Or))
    }

    fn and_expr(&mut self) -> Result<Marker> {
        let mut terms = vec![self.atom()?];
        while self.eat_keyword("and") {
            terms.push(self.atom()?);
        }
        Ok(collapse(terms, Marker::And))
    }

    fn atom(&mut self) -> Result<Marker> {
        if self.peek() == Some(Token::LParen) {
            self.pos += 1;
            let inner = self.or_expr()?;
            return match self.advance() {
                Some(Token::RParen) => Ok(inner),
                Some(token) => Err(FilterError::malformed(
                    0,
                    format!("expected `)`, found {}", describe(token)),
                )),
                None => Err(FilterError::malformed(0, "unclosed `(` in condition")),
            };
        }

        let left = self.operand()?;
        let op = self.operator()?;
        let right = self.operand()?;

        match (left, right) {
            (Operand::Var(var), Operand::Literal(lit)) => comparison(var, op, lit),
            (Operand::Literal(lit), Operand::Var(var)) => comparison(var, op.flipped(), lit),
            (Operand::Var(_), Operand::Var(_)) => Err(FilterError::malformed(
                0,
                "comparison between two marker variables",
            )),
            (Operand::Literal(_), Operand::Literal(_)) => Err(FilterError::malformed(
                0,
                "comparison between two literals",
            )),
        }
    }

    fn operand(&mut self) -> Result<Operand<'a>> {
        match self.advance() {
            Some(Token::Str(lit)) => Ok(Operand::Literal(lit)),
            Some(Token::Ident(name)) => MarkerVar::from_name(name)
                .map(Operand::Var)
                .ok_or_else(|| {
                    FilterError::malformed(0, format!("unknown marker variable `{}`", name))
                }),
            Some(token) => Err(FilterError::malformed(
                0,
                format!(
                    "expected a marker variable or quoted string, found {}",
                    describe(token)
                ),
            )),
            None => Err(FilterError::malformed(0, "condition ends unexpectedly")),
        }
    }

    fn operator(&mut self) -> Result<CompareOp> {
        match self.advance() {
            Some(Token::Op(token)) => {
                CompareOp::from_token(token).ok_or_else(|| FilterError::unknown_operator(0, token))
            }
            Some(Token::Ident("in")) => Err(FilterError::unknown_operator(0, "in")),
            Some(Token::Ident("not")) if self.eat_keyword("in") => {
                Err(FilterError::unknown_operator(0, "not in"))
            }
            Some(token) => Err(FilterError::malformed(
                0,
                format!("expected a comparison operator, found {}", describe(token)),
            )),
            None => Err(FilterError::malformed(0, "condition ends unexpectedly")),
        }
    }
}

fn comparison(var: MarkerVar, op: CompareOp, literal: &str) -> Result<Marker> {
    let value = if var.is_version() {
        let pattern = VersionPattern::parse(literal)?;
        if pattern.is_wildcard() && !op.is_equality() {
            return Err(FilterError::malformed(
                0,
                format!("wildcard `{}` is not allowed with `{}`", pattern, op.as_str()),
            ));
        }
        MarkerValue::Version(pattern)
    } else {
        if !op.is_equality() {
            return Err(FilterError::unknown_operator(0, op.as_str()));
        }
        MarkerValue::Text(literal.to_string())
    };
    Ok(Marker::Compare { var, op, value })
}

fn collapse(mut terms: Vec<Marker>, wrap: fn(Vec<Marker>) -> Marker) -> Marker {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        wrap(terms)
    }
}

fn describe(token: Token<'_>) -> String {
    match token {
        Token::Ident(name) => format!("`{}`", name),
        Token::Str(lit) => format!("'{}'", lit),
        Token::Op(op) => format!("`{}`", op),
        Token::LParen => "`(`".to_string(),
        Token::RParen => "`)`".to_string(),
    }
}
