//! Parser for the textual list literals stored in the metadata table.
//!
//! The `genres` and `cast` columns were written by a Python build step, so a
//! value looks like `[{'id': 16, 'name': 'Animation'}]`. Some rows were
//! re-exported as JSON and use double quotes and `null` instead. This parser
//! accepts both spellings:
//!
//! - strings in `'...'` or `"..."` with backslash escapes
//! - numbers, `None`/`null`, `True`/`true`, `False`/`false`
//! - lists `[...]`, tuples `(...)` (read as lists) and dicts `{k: v}`
//! - trailing commas
//!
//! It never evaluates anything; unknown syntax is a parse error.

use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// Deepest container nesting accepted. Metadata lists nest two levels.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Value stored under a string key, if this is a dict
    pub fn get(&self, key: &str) -> Option<&Literal> {
        match self {
            Literal::Dict(entries) => entries.iter().find_map(|(k, v)| match k {
                Literal::Str(s) if s == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LiteralError {
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Invalid escape sequence")]
    InvalidEscape,

    #[error("Unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("Containers nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Parse a complete literal. Anything left after the value is an error.
pub fn parse(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser {
        chars: input.chars().peekable(),
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_whitespace();
    match parser.chars.next() {
        None => Ok(value),
        Some(c) => Err(LiteralError::UnexpectedChar(c)),
    }
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    depth: usize,
}

impl Parser<'_> {
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn peek(&mut self) -> Result<char, LiteralError> {
        self.skip_whitespace();
        self.chars.peek().copied().ok_or(LiteralError::UnexpectedEnd)
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        match self.peek()? {
            c if c == expected => {
                self.chars.next();
                Ok(())
            }
            c => Err(LiteralError::UnexpectedChar(c)),
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        match self.peek()? {
            '[' => self.nested(|p| p.sequence('[', ']')),
            '(' => self.nested(|p| p.sequence('(', ')')),
            '{' => self.nested(Self::dict),
            '\'' | '"' => self.string().map(Literal::Str),
            c if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() => self.identifier(),
            c => Err(LiteralError::UnexpectedChar(c)),
        }
    }

    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Literal, LiteralError>,
    ) -> Result<Literal, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Literal, LiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            if self.peek()? == close {
                self.chars.next();
                return Ok(Literal::List(items));
            }
            items.push(self.value()?);
            match self.peek()? {
                ',' => {
                    self.chars.next();
                }
                c if c == close => {}
                c => return Err(LiteralError::UnexpectedChar(c)),
            }
        }
    }

    fn dict(&mut self) -> Result<Literal, LiteralError> {
        self.expect('{')?;
        let mut entries = Vec::new();
        loop {
            if self.peek()? == '}' {
                self.chars.next();
                return Ok(Literal::Dict(entries));
            }
            let key = self.value()?;
            self.expect(':')?;
            let value = self.value()?;
            entries.push((key, value));
            match self.peek()? {
                ',' => {
                    self.chars.next();
                }
                '}' => {}
                c => return Err(LiteralError::UnexpectedChar(c)),
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.chars.next().ok_or(LiteralError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            match self.chars.next().ok_or(LiteralError::UnexpectedEnd)? {
                c if c == quote => return Ok(out),
                '\\' => out.push(self.escape()?),
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, LiteralError> {
        let c = self.chars.next().ok_or(LiteralError::UnexpectedEnd)?;
        Ok(match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            'b' => '\u{8}',
            'f' => '\u{c}',
            '\\' | '\'' | '"' | '/' => c,
            'x' => self.hex_char(2)?,
            'u' => {
                let high = self.hex_code(4)?;
                if (0xD800..0xDC00).contains(&high) {
                    // JSON writes astral characters as a surrogate pair
                    if self.chars.next() != Some('\\') || self.chars.next() != Some('u') {
                        return Err(LiteralError::InvalidEscape);
                    }
                    let low = self.hex_code(4)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(LiteralError::InvalidEscape);
                    }
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    char::from_u32(code).ok_or(LiteralError::InvalidEscape)?
                } else {
                    char::from_u32(high).ok_or(LiteralError::InvalidEscape)?
                }
            }
            'U' => self.hex_char(8)?,
            _ => return Err(LiteralError::InvalidEscape),
        })
    }

    fn hex_code(&mut self, digits: usize) -> Result<u32, LiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let d = self
                .chars
                .next()
                .and_then(|c| c.to_digit(16))
                .ok_or(LiteralError::InvalidEscape)?;
            code = code * 16 + d;
        }
        Ok(code)
    }

    fn hex_char(&mut self, digits: usize) -> Result<char, LiteralError> {
        let code = self.hex_code(digits)?;
        char::from_u32(code).ok_or(LiteralError::InvalidEscape)
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let mut text = String::new();
        while let Some(c) = self
            .chars
            .next_if(|c| c.is_ascii_digit() || matches!(*c, '-' | '+' | '.' | 'e' | 'E' | '_'))
        {
            if c != '_' {
                text.push(c);
            }
        }
        text.parse::<f64>()
            .map(Literal::Number)
            .map_err(|_| LiteralError::InvalidNumber(text))
    }

    fn identifier(&mut self) -> Result<Literal, LiteralError> {
        let mut word = String::new();
        while let Some(c) = self.chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
            word.push(c);
        }
        match word.as_str() {
            "None" | "null" => Ok(Literal::None),
            "True" | "true" => Ok(Literal::Bool(true)),
            "False" | "false" => Ok(Literal::Bool(false)),
            _ => Err(LiteralError::UnknownIdentifier(word)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_style_list() {
        let parsed = parse("[{'id': 16, 'name': 'Animation'}, {'id': 35, 'name': 'Comedy'}]").unwrap();
        let Literal::List(items) = parsed else {
            panic!("expected a list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("name").and_then(Literal::as_str), Some("Animation"));
        assert_eq!(items[1].get("id"), Some(&Literal::Number(35.0)));
    }

    #[test]
    fn test_json_style_list() {
        let parsed = parse(r#"[{"name": "Tom Hanks", "profile_path": null}]"#).unwrap();
        let Literal::List(items) = parsed else {
            panic!("expected a list");
        };
        assert_eq!(items[0].get("profile_path"), Some(&Literal::None));
    }

    #[test]
    fn test_escapes_and_quotes() {
        assert_eq!(
            parse(r#"'Don\'t Look Now'"#).unwrap(),
            Literal::Str("Don't Look Now".to_string())
        );
        assert_eq!(
            parse(r#""It's \"fine\"""#).unwrap(),
            Literal::Str("It's \"fine\"".to_string())
        );
        assert_eq!(
            parse(r#""Am\u00e9lie \ud83c\udfac""#).unwrap(),
            Literal::Str("Amélie 🎬".to_string())
        );
    }

    #[test]
    fn test_trailing_comma_and_tuple() {
        assert_eq!(
            parse("(1, True, None,)").unwrap(),
            Literal::List(vec![Literal::Number(1.0), Literal::Bool(true), Literal::None])
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(parse(" [ ] ").unwrap(), Literal::List(Vec::new()));
        assert_eq!(parse("{}").unwrap(), Literal::Dict(Vec::new()));
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse(&at_limit).is_ok());

        let too_deep = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert_eq!(parse(&too_deep), Err(LiteralError::TooDeep(MAX_DEPTH)));

        let mixed = "[{'a': (".repeat(100);
        assert_eq!(parse(&mixed), Err(LiteralError::TooDeep(MAX_DEPTH)));
    }

    #[test]
    fn test_malformed_input() {
        assert!(parse("").is_err());
        assert!(parse("[{'name': 'Action'}").is_err());
        assert!(parse("[{'name': 'Action'}] extra").is_err());
        assert!(parse("Action, Comedy").is_err());
        assert!(parse("[__import__('os')]").is_err());
        assert!(parse("'unterminated").is_err());
    }
}
