//! Parser for Python literal expressions.
//!
//! The dataset export stores image lists as the `repr()` of a Python list,
//! e.g. `"['https://a/1.jpg', \"https://a/2.jpg\"]"`. This module accepts the
//! same subset of literals that can appear there:
//!
//! - strings with `'` / `"` / triple quotes, `r` / `u` / `b` prefixes,
//!   the usual escapes and implicit concatenation of adjacent strings
//! - integers and floats (with sign, exponent and `_` separators)
//! - `None`, `True`, `False`
//! - lists, tuples, dicts and sets, nested up to [`MAX_DEPTH`] levels
//!
//! Anything else is a parse error.

use thiserror::Error;

/// Deepest bracket nesting accepted before parsing gives up
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Bytes(Vec<u8>),
    Number(f64),
    Bool(bool),
    None,
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid literal at offset {offset}: {reason}")]
pub struct LiteralError {
    pub offset: usize,
    pub reason: &'static str,
}

/// Parse a complete literal; trailing input other than whitespace is an error.
pub fn parse_literal(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser {
        chars: input.chars().collect(),
        pos: 0,
        depth: 0,
    };
    parser.skip_whitespace();
    let value = parser.value()?;
    parser.skip_whitespace();
    if parser.pos != parser.chars.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn error(&self, reason: &'static str) -> LiteralError {
        LiteralError {
            offset: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(open @ ('[' | '(' | '{')) => {
                if self.depth >= MAX_DEPTH {
                    return Err(self.error("nesting too deep"));
                }
                self.depth += 1;
                self.pos += 1;
                let container = self.container(open);
                self.depth -= 1;
                container
            }
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if is_string_start(c, self.peek_at(1), self.peek_at(2)) => self.strings(),
            Some(c) if c.is_alphabetic() || c == '_' => self.keyword(),
            Some(_) => Err(self.error("unexpected character")),
        }
    }

    /// Body of a list, tuple, dict or set; the opening bracket is consumed
    fn container(&mut self, open: char) -> Result<Literal, LiteralError> {
        match open {
            '[' => {
                let (items, _) = self.sequence(']')?;
                Ok(Literal::List(items))
            }
            '(' => {
                let (mut items, trailing_comma) = self.sequence(')')?;
                // `(x)` is just a parenthesized value, `(x,)` is a tuple
                if items.len() == 1 && !trailing_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Literal::Tuple(items))
                }
            }
            _ => self.dict_or_set(),
        }
    }

    /// Comma-separated values up to `close`; reports whether the last item
    /// was followed by a comma
    fn sequence(&mut self, close: char) -> Result<(Vec<Literal>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok((items, trailing_comma));
            }
            if !items.is_empty() && !trailing_comma {
                return Err(self.error("expected ',' between items"));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            trailing_comma = self.peek() == Some(',');
            if trailing_comma {
                self.pos += 1;
            }
        }
    }

    fn dict_or_set(&mut self) -> Result<Literal, LiteralError> {
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Literal::Dict(Vec::new()));
        }

        let first = self.value()?;
        self.skip_whitespace();
        if self.peek() != Some(':') {
            let mut items = vec![first];
            if self.peek() == Some(',') {
                self.pos += 1;
                let (rest, _) = self.sequence('}')?;
                items.extend(rest);
            } else if self.bump() != Some('}') {
                return Err(self.error("expected ',' or '}' in set"));
            }
            return Ok(Literal::Set(items));
        }

        let mut entries = Vec::new();
        let mut key = first;
        loop {
            // positioned on ':'
            self.pos += 1;
            self.skip_whitespace();
            let value = self.value()?;
            entries.push((key, value));
            self.skip_whitespace();
            match self.bump() {
                Some('}') => return Ok(Literal::Dict(entries)),
                Some(',') => {
                    self.skip_whitespace();
                    if self.peek() == Some('}') {
                        self.pos += 1;
                        return Ok(Literal::Dict(entries));
                    }
                    key = self.value()?;
                    self.skip_whitespace();
                    if self.peek() != Some(':') {
                        return Err(self.error("expected ':' in dict"));
                    }
                }
                _ => return Err(self.error("expected ',' or '}' in dict")),
            }
        }
    }

    fn keyword(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            _ => {
                self.pos = start;
                Err(self.error("unknown name"))
            }
        }
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        let mut negative = false;
        while let Some(sign) = self.peek().filter(|c| *c == '-' || *c == '+') {
            negative ^= sign == '-';
            self.pos += 1;
            self.skip_whitespace();
        }

        let digits_start = self.pos;
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '-' || c == '+')
                && matches!(self.chars.get(self.pos.wrapping_sub(1)), Some('e') | Some('E'));
            if c.is_ascii_digit() || c == '.' || c == '_' || c == 'e' || c == 'E' || exponent_sign
            {
                self.pos += 1;
            } else {
                break;
            }
        }

        let text: String = self.chars[digits_start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        let parsed = text
            .parse::<f64>()
            .ok()
            .filter(|_| !text.is_empty() && text.chars().next().is_some_and(|c| c != 'e' && c != 'E'));
        match parsed {
            Some(value) => Ok(Literal::Number(if negative { -value } else { value })),
            None => {
                self.pos = start;
                Err(self.error("invalid number"))
            }
        }
    }

    /// One or more adjacent string literals, concatenated
    fn strings(&mut self) -> Result<Literal, LiteralError> {
        let mut text: Option<String> = None;
        let mut bytes: Option<Vec<u8>> = None;

        loop {
            let (value, is_bytes) = self.string()?;
            if is_bytes {
                if text.is_some() {
                    return Err(self.error("cannot mix bytes and str literals"));
                }
                bytes
                    .get_or_insert_with(Vec::new)
                    .extend(value.chars().map(|c| c as u32 as u8));
            } else {
                if bytes.is_some() {
                    return Err(self.error("cannot mix bytes and str literals"));
                }
                text.get_or_insert_with(String::new).push_str(&value);
            }

            self.skip_whitespace();
            match self.peek() {
                Some(c) if is_string_start(c, self.peek_at(1), self.peek_at(2)) => continue,
                _ => break,
            }
        }

        Ok(match bytes {
            Some(bytes) => Literal::Bytes(bytes),
            None => Literal::Str(text.unwrap_or_default()),
        })
    }

    /// A single string literal; returns its value and whether it was bytes
    fn string(&mut self) -> Result<(String, bool), LiteralError> {
        let mut raw = false;
        let mut is_bytes = false;
        while let Some(c) = self.peek().filter(|c| c.is_ascii_alphabetic()) {
            match c.to_ascii_lowercase() {
                'r' => raw = true,
                'b' => is_bytes = true,
                'u' => {}
                _ => return Err(self.error("invalid string prefix")),
            }
            self.pos += 1;
        }

        let quote = self.bump().ok_or_else(|| self.error("expected quote"))?;
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        let mut out = String::new();
        loop {
            let c = self.bump().ok_or_else(|| self.error("unterminated string"))?;
            if c == quote {
                if !triple {
                    break;
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.pos += 2;
                    break;
                }
                out.push(c);
                continue;
            }
            if c == '\n' && !triple {
                return Err(self.error("newline in string"));
            }
            if c != '\\' {
                out.push(c);
                continue;
            }

            let escaped = self.bump().ok_or_else(|| self.error("unterminated string"))?;
            if raw {
                out.push('\\');
                out.push(escaped);
                continue;
            }
            match escaped {
                '\n' => {}
                '\\' => out.push('\\'),
                '\'' => out.push('\''),
                '"' => out.push('"'),
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'a' => out.push('\u{07}'),
                'b' => out.push('\u{08}'),
                'f' => out.push('\u{0C}'),
                'v' => out.push('\u{0B}'),
                'x' => out.push(self.hex_escape(2)?),
                'u' if !is_bytes => out.push(self.hex_escape(4)?),
                'U' if !is_bytes => out.push(self.hex_escape(8)?),
                '0'..='7' => {
                    let mut value = escaped.to_digit(8).unwrap_or(0);
                    for _ in 0..2 {
                        match self.peek().and_then(|c| c.to_digit(8)) {
                            Some(d) => {
                                value = value * 8 + d;
                                self.pos += 1;
                            }
                            None => break,
                        }
                    }
                    out.push(char::from_u32(value).ok_or_else(|| self.error("invalid escape"))?);
                }
                other => {
                    // unknown escapes are kept verbatim
                    out.push('\\');
                    out.push(other);
                }
            }
        }
        Ok((out, is_bytes))
    }

    fn hex_escape(&mut self, len: usize) -> Result<char, LiteralError> {
        let mut value = 0u32;
        for _ in 0..len {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            value = value * 16 + digit;
        }
        char::from_u32(value).ok_or_else(|| self.error("invalid code point"))
    }
}

/// True when the input at `c` starts a string literal (possibly prefixed)
fn is_string_start(c: char, next: Option<char>, after: Option<char>) -> bool {
    let is_quote = |c: Option<char>| matches!(c, Some('\'') | Some('"'));
    let is_prefix = |c: char| matches!(c.to_ascii_lowercase(), 'r' | 'u' | 'b');

    if c == '\'' || c == '"' {
        return true;
    }
    if !is_prefix(c) {
        return false;
    }
    match next {
        n if is_quote(n) => true,
        Some(n) if is_prefix(n) && n.to_ascii_lowercase() != c.to_ascii_lowercase() => {
            is_quote(after)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Literal {
        Literal::Str(value.to_string())
    }

    #[test]
    fn test_list_of_strings() {
        let parsed = parse_literal("['http://a.com/1.jpg','http://a.com/2.jpg']").unwrap();
        assert_eq!(
            parsed,
            Literal::List(vec![s("http://a.com/1.jpg"), s("http://a.com/2.jpg")])
        );
    }

    #[test]
    fn test_whitespace_and_trailing_comma() {
        let parsed = parse_literal("  [ \"a\" ,\n 'b', ]  ").unwrap();
        assert_eq!(parsed, Literal::List(vec![s("a"), s("b")]));
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(parse_literal("[]").unwrap(), Literal::List(vec![]));
        assert_eq!(parse_literal("()").unwrap(), Literal::Tuple(vec![]));
        assert_eq!(parse_literal("{}").unwrap(), Literal::Dict(vec![]));
    }

    #[test]
    fn test_parenthesized_value_vs_tuple() {
        assert_eq!(parse_literal("('a')").unwrap(), s("a"));
        assert_eq!(parse_literal("('a',)").unwrap(), Literal::Tuple(vec![s("a")]));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(parse_literal(r"'it\'s'").unwrap(), s("it's"));
        assert_eq!(parse_literal(r#""tab\there""#).unwrap(), s("tab\there"));
        assert_eq!(parse_literal(r"'\x41é'").unwrap(), s("Aé"));
        assert_eq!(parse_literal(r"'\d'").unwrap(), s("\\d"));
        assert_eq!(parse_literal(r"r'\n'").unwrap(), s("\\n"));
    }

    #[test]
    fn test_adjacent_strings_concatenate() {
        assert_eq!(parse_literal("'http://' 'a.com'").unwrap(), s("http://a.com"));
        assert!(parse_literal("'a' b'b'").is_err());
    }

    #[test]
    fn test_triple_quoted_string() {
        assert_eq!(parse_literal("'''multi\nline'''").unwrap(), s("multi\nline"));
    }

    #[test]
    fn test_bytes_literal() {
        assert_eq!(parse_literal("b'ab'").unwrap(), Literal::Bytes(vec![b'a', b'b']));
    }

    #[test]
    fn test_numbers_and_keywords() {
        assert_eq!(
            parse_literal("[1, -2.5, 1_000, 3e2, None, True, False]").unwrap(),
            Literal::List(vec![
                Literal::Number(1.0),
                Literal::Number(-2.5),
                Literal::Number(1000.0),
                Literal::Number(300.0),
                Literal::None,
                Literal::Bool(true),
                Literal::Bool(false),
            ])
        );
    }

    #[test]
    fn test_dict_and_set() {
        assert_eq!(
            parse_literal("{'a': 1, 'b': [2],}").unwrap(),
            Literal::Dict(vec![
                (s("a"), Literal::Number(1.0)),
                (s("b"), Literal::List(vec![Literal::Number(2.0)])),
            ])
        );
        assert_eq!(
            parse_literal("{'a', 'b'}").unwrap(),
            Literal::Set(vec![s("a"), s("b")])
        );
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        let at_limit = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse_literal(&at_limit).is_ok());

        let too_deep = format!("{}{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        let err = parse_literal(&too_deep).unwrap_err();
        assert_eq!(err.reason, "nesting too deep");
        assert_eq!(err.offset, MAX_DEPTH);

        let err = parse_literal(&"{".repeat(100_000)).unwrap_err();
        assert_eq!(err.reason, "nesting too deep");
    }

    #[test]
    fn test_rejects_malformed_input() {
        for input in [
            "not a list",
            "",
            "[",
            "['a' 'b'",
            "['a'] extra",
            "['a',,]",
            "[foo]",
            "'unterminated",
            "'line\nbreak'",
            "{'a': }",
            "nan",
        ] {
            assert!(parse_literal(input).is_err(), "should reject {:?}", input);
        }
    }
}
