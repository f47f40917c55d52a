//! Lexer for tokenizing user.js preference files
//!
//! Converts a character stream into positioned tokens. Unlike a pure value
//! reader, comments are kept as tokens: the parser needs them for trailing
//! rationale and for section headings.

use crate::error::{Error, Result};
use std::iter::Peekable;
use std::str::Chars;

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier (user_pref, pref, lock_pref, sticky_pref)
    Identifier(String),
    /// String value with escape sequences already processed
    String(String),
    /// Integer value
    Integer(i64),
    /// Boolean value
    Boolean(bool),
    /// `// ...` comment body, without the slashes
    LineComment(String),
    /// `/* ... */` comment body, without the delimiters
    BlockComment(String),
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Eof,
}

/// A token with the position of its first character
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

/// Lexer for user.js files
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        let mut chars = input.chars().peekable();
        // Editors on Windows like to prepend a BOM
        if chars.peek() == Some(&'\u{feff}') {
            chars.next();
        }
        Lexer {
            chars,
            line: 1,
            column: 1,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Spanned> {
        self.skip_whitespace();

        let (line, column) = (self.line, self.column);
        let Some(&c) = self.chars.peek() else {
            return Ok(Spanned {
                token: Token::Eof,
                line,
                column,
            });
        };

        let token = match c {
            '(' => {
                self.advance();
                Token::LeftParen
            }
            ')' => {
                self.advance();
                Token::RightParen
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            ';' => {
                self.advance();
                Token::Semicolon
            }
            '/' => self.lex_comment()?,
            '"' => self.lex_string()?,
            '-' | '+' | '0'..='9' => self.lex_integer()?,
            'a'..='z' | 'A'..='Z' | '_' => self.lex_identifier(),
            _ => {
                return Err(self.error(format!("Unexpected character: '{}'", c)));
            }
        };

        Ok(Spanned {
            token,
            line,
            column,
        })
    }

    /// Consume one character, keeping line/column in sync
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: String) -> Error {
        Error::Lexer {
            line: self.line,
            column: self.column,
            message,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Lex a `//` or `/* */` comment; the leading slash is still unconsumed
    fn lex_comment(&mut self) -> Result<Token> {
        let (start_line, start_col) = (self.line, self.column);
        self.advance();

        match self.chars.peek() {
            Some(&'/') => {
                self.advance();
                let mut body = String::new();
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    body.push(c);
                    self.advance();
                }
                Ok(Token::LineComment(body.trim_end_matches('\r').to_string()))
            }
            Some(&'*') => {
                self.advance();
                let mut body = String::new();
                loop {
                    match self.advance() {
                        Some('*') if self.chars.peek() == Some(&'/') => {
                            self.advance();
                            return Ok(Token::BlockComment(body));
                        }
                        Some(c) => body.push(c),
                        None => {
                            return Err(Error::Lexer {
                                line: start_line,
                                column: start_col,
                                message: "Unterminated block comment".to_string(),
                            });
                        }
                    }
                }
            }
            _ => Err(Error::Lexer {
                line: start_line,
                column: start_col,
                message: "Unexpected character: '/'".to_string(),
            }),
        }
    }

    /// Lex an identifier (user_pref, pref, true, false, ...)
    fn lex_identifier(&mut self) -> Token {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            _ => Token::Identifier(ident),
        }
    }

    /// Lex a double-quoted string literal
    fn lex_string(&mut self) -> Result<Token> {
        let (start_line, start_col) = (self.line, self.column);
        self.advance();

        let mut result = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(Token::String(result)),
                Some('\\') => self.lex_escape(&mut result)?,
                Some(c) => result.push(c),
                None => {
                    return Err(Error::Lexer {
                        line: start_line,
                        column: start_col,
                        message: "Unterminated string literal".to_string(),
                    });
                }
            }
        }
    }

    /// Decode one escape sequence; the backslash is already consumed
    fn lex_escape(&mut self, out: &mut String) -> Result<()> {
        match self.advance() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('0') => {
                if matches!(self.chars.peek(), Some('0'..='7')) {
                    return Err(self.error(
                        "Octal escape sequences are not supported. Use \\x00 instead.".to_string(),
                    ));
                }
                out.push('\0');
            }
            Some('x') => {
                let code = self.read_hex(2, "hex")?;
                // Two hex digits always fit in a char
                out.push(char::from(code as u8));
            }
            Some('u') => {
                let unit = self.read_hex(4, "unicode")?;
                out.push(self.decode_utf16(unit)?);
            }
            Some(c) => return Err(self.error(format!("Invalid escape sequence: \\{}", c))),
            None => {
                return Err(self.error("Unexpected end of input in escape sequence".to_string()))
            }
        }
        Ok(())
    }

    fn read_hex(&mut self, digits: usize, what: &str) -> Result<u32> {
        let mut hex = String::with_capacity(digits);
        for _ in 0..digits {
            match self.chars.peek() {
                Some(&c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.advance();
                }
                _ => break,
            }
        }
        if hex.len() != digits {
            return Err(self.error(format!("Incomplete {} escape: {}", what, hex)));
        }
        u32::from_str_radix(&hex, 16)
            .map_err(|_| self.error(format!("Invalid {} escape: {}", what, hex)))
    }

    /// Combine a `\uD8xx\uDCxx` surrogate pair; lone surrogates become U+FFFD
    fn decode_utf16(&mut self, unit: u32) -> Result<char> {
        if (0xD800..0xDC00).contains(&unit) {
            let mut lookahead = self.chars.clone();
            if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
                self.advance();
                self.advance();
                let low = self.read_hex(4, "unicode")?;
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    return Ok(char::from_u32(code).unwrap_or('\u{FFFD}'));
                }
                return Err(self.error(format!(
                    "Invalid surrogate pair: \\u{:04X}\\u{:04X}",
                    unit, low
                )));
            }
        }
        Ok(char::from_u32(unit).unwrap_or('\u{FFFD}'))
    }

    /// Lex an optionally signed decimal integer
    fn lex_integer(&mut self) -> Result<Token> {
        let (start_line, start_col) = (self.line, self.column);
        let mut num_str = String::new();

        if let Some(&sign) = self.chars.peek() {
            if sign == '-' || sign == '+' {
                if sign == '-' {
                    num_str.push('-');
                }
                self.advance();
            }
        }

        let mut digits = 0;
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                num_str.push(c);
                self.advance();
                digits += 1;
            } else {
                break;
            }
        }

        if digits == 0 {
            return Err(self.error("Expected digits after sign".to_string()));
        }

        if let Some(&('.' | 'e' | 'E')) = self.chars.peek() {
            return Err(Error::Lexer {
                line: start_line,
                column: start_col,
                message: "Floating-point values are not supported; use an integer or a string"
                    .to_string(),
            });
        }

        num_str.parse::<i64>().map(Token::Integer).map_err(|_| Error::Lexer {
            line: start_line,
            column: start_col,
            message: format!("Integer out of range: {}", num_str),
        })
    }
}
