//! Recursive-descent parser for the host literal grammar
//!
//! Only constants are recognised. Names other than `None`, `True`, `False`,
//! `inf`, `nan`, `float(...)`, and `set()` are rejected, so host output can
//! never be treated as code.

use crate::literal::Literal;
use thiserror::Error;

/// Syntax error in host text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason} at offset {offset}")]
pub struct ParseError {
    pub offset: usize,
    pub reason: String,
}

/// Parses `text` as exactly one literal, surrounded by optional whitespace
pub fn parse_literal(text: &str, max_depth: usize) -> Result<Literal, ParseError> {
    let mut parser = Parser::new(text, max_depth);
    let literal = parser.parse_value()?;
    parser.skip_ws();
    if parser.pos != text.len() {
        return Err(parser.error("trailing characters after literal"));
    }
    Ok(literal)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, max_depth: usize) -> Self {
        Self {
            text,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn error(&self, reason: impl Into<String>) -> ParseError {
        self.error_at(self.pos, reason)
    }

    fn error_at(&self, offset: usize, reason: impl Into<String>) -> ParseError {
        ParseError {
            offset,
            reason: reason.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected {:?}, found {:?}", expected, c))),
            None => Err(self.error(format!("expected {:?}, found end of input", expected))),
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(self.error(format!("nesting exceeds the limit of {}", self.max_depth)));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_value(&mut self) -> Result<Literal, ParseError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('[') => {
                let (items, _) = self.parse_items('[', ']')?;
                Ok(Literal::List(items))
            }
            Some('(') => self.parse_paren(),
            Some('{') => self.parse_brace(),
            Some('"') | Some('\'') => self.parse_string().map(Literal::Str),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.parse_name(),
            Some(c) => Err(self.error(format!("unexpected character {:?}", c))),
        }
    }

    /// Parses `open item, item, ... close`, reporting whether a comma was seen
    fn parse_items(&mut self, open: char, close: char) -> Result<(Vec<Literal>, bool), ParseError> {
        self.expect(open)?;
        self.enter()?;
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                break;
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    saw_comma = true;
                }
                Some(c) if c == close => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    return Err(self.error(format!("expected ',' or {:?}, found {:?}", close, c)))
                }
                None => return Err(self.error(format!("unterminated {:?}", open))),
            }
        }
        self.leave();
        Ok((items, saw_comma))
    }

    fn parse_paren(&mut self) -> Result<Literal, ParseError> {
        let (mut items, saw_comma) = self.parse_items('(', ')')?;
        if items.len() == 1 && !saw_comma {
            // Parenthesised expression, not a tuple
            return Ok(items.remove(0));
        }
        Ok(Literal::Tuple(items))
    }

    fn parse_brace(&mut self) -> Result<Literal, ParseError> {
        self.expect('{')?;
        self.enter()?;
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            self.leave();
            return Ok(Literal::Dict(Vec::new()));
        }

        let first = self.parse_value()?;
        self.skip_ws();
        let literal = if self.peek() == Some(':') {
            self.bump();
            let value = self.parse_value()?;
            let mut entries = vec![(first, value)];
            while self.continue_brace()? {
                let key = self.parse_value()?;
                self.skip_ws();
                self.expect(':')?;
                let value = self.parse_value()?;
                entries.push((key, value));
            }
            Literal::Dict(entries)
        } else {
            let mut items = vec![first];
            while self.continue_brace()? {
                items.push(self.parse_value()?);
            }
            Literal::Set(items)
        };
        self.leave();
        Ok(literal)
    }

    /// After an element inside braces: true if another element follows
    fn continue_brace(&mut self) -> Result<bool, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some('}') => {
                self.bump();
                Ok(false)
            }
            Some(',') => {
                self.bump();
                self.skip_ws();
                if self.peek() == Some('}') {
                    self.bump();
                    return Ok(false);
                }
                Ok(true)
            }
            Some(c) => Err(self.error(format!("expected ',' or '}}', found {:?}", c))),
            None => Err(self.error("unterminated '{'")),
        }
    }

    fn parse_number(&mut self) -> Result<Literal, ParseError> {
        let start = self.pos;
        let negative = self.peek() == Some('-');
        if negative {
            self.bump();
            if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                return match self.parse_name()? {
                    Literal::Float(v) => Ok(Literal::Float(-v)),
                    other => Err(self.error_at(
                        start,
                        format!("cannot negate {}", other.type_name()),
                    )),
                };
            }
        }

        let digits_start = self.pos;
        self.eat_digits();
        if self.pos == digits_start {
            return Err(self.error("expected digits"));
        }
        let mut is_float = false;
        if self.peek() == Some('.') {
            self.bump();
            self.eat_digits();
            is_float = true;
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            self.bump();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.bump();
            }
            let exp_start = self.pos;
            self.eat_digits();
            if self.pos == exp_start {
                return Err(self.error("expected exponent digits"));
            }
            is_float = true;
        }
        if self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            return Err(self.error("malformed number"));
        }

        let token = &self.text[start..self.pos];
        if is_float {
            return token
                .parse::<f64>()
                .map(Literal::Float)
                .map_err(|_| self.error_at(start, format!("invalid float {:?}", token)));
        }
        let digits = &self.text[digits_start..self.pos];
        if digits.len() > 1 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
            return Err(self.error_at(start, "leading zeros in integer literal"));
        }
        token
            .parse::<i128>()
            .map(Literal::Int)
            .map_err(|_| self.error_at(start, "integer literal too large"))
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    fn parse_name(&mut self) -> Result<Literal, ParseError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }
        let name = &self.text[start..self.pos];
        match name {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "inf" => Ok(Literal::Float(f64::INFINITY)),
            "nan" => Ok(Literal::Float(f64::NAN)),
            "float" => self.parse_float_call(start),
            "set" => {
                self.expect('(')?;
                self.skip_ws();
                self.expect(')')?;
                Ok(Literal::Set(Vec::new()))
            }
            _ => Err(self.error_at(start, format!("unknown name `{}`", name))),
        }
    }

    /// `float('inf')`, `float("-nan")`, and friends
    fn parse_float_call(&mut self, start: usize) -> Result<Literal, ParseError> {
        self.expect('(')?;
        self.skip_ws();
        if !matches!(self.peek(), Some('"') | Some('\'')) {
            return Err(self.error("expected a string argument to float()"));
        }
        let arg = self.parse_string()?;
        self.skip_ws();
        self.expect(')')?;

        let lowered = arg.trim().to_ascii_lowercase();
        let (sign, body) = match lowered.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, lowered.strip_prefix('+').unwrap_or(&lowered)),
        };
        match body {
            "inf" | "infinity" => Ok(Literal::Float(sign * f64::INFINITY)),
            "nan" => Ok(Literal::Float(f64::NAN)),
            _ => Err(self.error_at(start, format!("unsupported float() argument {:?}", arg))),
        }
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error_at(start, "expected string")),
        };
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error_at(start, "unterminated string"));
            };
            match c {
                c if c == quote => break,
                '\\' => self.parse_escape(&mut out)?,
                '\n' | '\r' => return Err(self.error("newline in string literal")),
                c => out.push(c),
            }
        }
        Ok(out)
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let escape_start = self.pos - 1;
        let Some(c) = self.bump() else {
            return Err(self.error_at(escape_start, "unterminated escape"));
        };
        let decoded = match c {
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0c',
            'v' => '\x0b',
            // Line continuation
            '\n' => return Ok(()),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                self.code_point(code, escape_start)?
            }
            'x' => {
                let code = self.read_hex(2, escape_start)?;
                self.code_point(code, escape_start)?
            }
            'u' => {
                let code = self.read_hex(4, escape_start)?;
                self.code_point(code, escape_start)?
            }
            'U' => {
                let code = self.read_hex(8, escape_start)?;
                self.code_point(code, escape_start)?
            }
            other => {
                return Err(self.error_at(escape_start, format!("unknown escape \\{}", other)))
            }
        };
        out.push(decoded);
        Ok(())
    }

    fn read_hex(&mut self, count: usize, escape_start: usize) -> Result<u32, ParseError> {
        let mut code = 0u32;
        for _ in 0..count {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error_at(escape_start, "truncated hex escape"))?;
            self.bump();
            code = code
                .checked_mul(16)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| self.error_at(escape_start, "hex escape overflows"))?;
        }
        Ok(code)
    }

    fn code_point(&self, code: u32, escape_start: usize) -> Result<char, ParseError> {
        char::from_u32(code)
            .ok_or_else(|| self.error_at(escape_start, format!("invalid code point {:#x}", code)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Literal {
        parse_literal(text, 64).unwrap()
    }

    fn fails(text: &str) -> ParseError {
        parse_literal(text, 64).unwrap_err()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse("None"), Literal::None);
        assert_eq!(parse(" True "), Literal::Bool(true));
        assert_eq!(parse("False"), Literal::Bool(false));
        assert_eq!(parse("-17"), Literal::Int(-17));
        assert_eq!(parse("0"), Literal::Int(0));
        assert_eq!(parse("2.5"), Literal::Float(2.5));
        assert_eq!(parse("1e-07"), Literal::Float(1e-7));
        assert_eq!(parse("3."), Literal::Float(3.0));
        assert_eq!(parse("-inf"), Literal::Float(f64::NEG_INFINITY));
        assert_eq!(parse("float('-inf')"), Literal::Float(f64::NEG_INFINITY));
        assert!(matches!(parse("nan"), Literal::Float(v) if v.is_nan()));
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(parse("'it\\'s'"), Literal::Str("it's".to_string()));
        assert_eq!(parse("\"a\\\"b\""), Literal::Str("a\"b".to_string()));
        assert_eq!(parse("'\\n\\t\\\\'"), Literal::Str("\n\t\\".to_string()));
        assert_eq!(parse("'\\x00\\x7f'"), Literal::Str("\0\x7f".to_string()));
        assert_eq!(parse("'\\u2028\\U0001f600'"), Literal::Str("\u{2028}😀".to_string()));
        assert_eq!(parse("'\\101\\0'"), Literal::Str("A\0".to_string()));
        assert_eq!(parse("'ünï'"), Literal::Str("ünï".to_string()));
    }

    #[test]
    fn test_string_errors() {
        assert_eq!(fails("'abc").reason, "unterminated string");
        assert!(fails("'\\q'").reason.contains("unknown escape"));
        assert!(fails("'\\x4'").reason.contains("truncated hex"));
        assert!(fails("'\\ud800'").reason.contains("invalid code point"));
        assert!(fails("'a\nb'").reason.contains("newline"));
    }

    #[test]
    fn test_containers() {
        assert_eq!(parse("[]"), Literal::List(vec![]));
        assert_eq!(
            parse("[1, 2,]"),
            Literal::List(vec![Literal::Int(1), Literal::Int(2)])
        );
        assert_eq!(parse("()"), Literal::Tuple(vec![]));
        assert_eq!(parse("(1,)"), Literal::Tuple(vec![Literal::Int(1)]));
        assert_eq!(parse("(1)"), Literal::Int(1));
        assert_eq!(parse("{}"), Literal::Dict(vec![]));
        assert_eq!(parse("set()"), Literal::Set(vec![]));
        assert_eq!(
            parse("{'a', 'b'}"),
            Literal::Set(vec![
                Literal::Str("a".to_string()),
                Literal::Str("b".to_string())
            ])
        );
        assert_eq!(
            parse("{'k': [None], 'j': (1, 2.0),}"),
            Literal::Dict(vec![
                (
                    Literal::Str("k".to_string()),
                    Literal::List(vec![Literal::None])
                ),
                (
                    Literal::Str("j".to_string()),
                    Literal::Tuple(vec![Literal::Int(1), Literal::Float(2.0)])
                ),
            ])
        );
    }

    #[test]
    fn test_rejects_code() {
        assert!(fails("__import__('os').system('x')").reason.contains("unknown name"));
        assert!(fails("open('f')").reason.contains("unknown name"));
        assert!(fails("Tru").reason.contains("unknown name `Tru`"));
        assert!(fails("[1, 2] + [3]").reason.contains("trailing"));
        assert!(fails("1 2").reason.contains("trailing"));
    }

    #[test]
    fn test_strict_numbers() {
        assert!(fails("12abc").reason.contains("malformed number"));
        assert!(fails("1e").reason.contains("exponent"));
        assert!(fails("007").reason.contains("leading zeros"));
        assert_eq!(parse("000"), Literal::Int(0));
        assert!(fails("-").reason.contains("expected digits"));
        assert!(fails("-None").reason.contains("cannot negate"));
        assert_eq!(
            parse("170141183460469231731687303715884105727"),
            Literal::Int(i128::MAX)
        );
        assert!(fails("999999999999999999999999999999999999999999")
            .reason
            .contains("too large"));
    }

    #[test]
    fn test_structure_errors() {
        assert!(fails("[1, 2").reason.contains("unterminated"));
        assert!(fails("{'a': 1, 'b'}").reason.contains("expected ':'"));
        assert!(fails("[1 2]").reason.contains("expected ','"));
        assert_eq!(fails("").reason, "unexpected end of input");
        assert_eq!(fails("[1, @]").offset, 4);
    }

    #[test]
    fn test_depth_limit() {
        assert!(parse_literal("[[1]]", 2).is_ok());
        let err = parse_literal("[[[1]]]", 2).unwrap_err();
        assert!(err.reason.contains("nesting"));

        let hostile = "[".repeat(10_000);
        assert!(parse_literal(&hostile, 64).is_err());
    }
}
