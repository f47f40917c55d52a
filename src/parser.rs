//! Parser for user.js preference files
//!
//! A recursive descent parser over the token stream from [`crate::lexer`].
//! Besides the `(key, value)` pairs it recovers the human-readable structure
//! of a curated file: trailing `//` rationale comments and the section and
//! group headings written as block comments.
//!
//! # Format
//!
//! ```text
//! /****************************************************************************
//!  * SECTION: FASTFOX                                                         *
//! ****************************************************************************/
//! /** DISK CACHE ***/
//! user_pref("browser.cache.disk.enable", false); // RAM only
//! ```
//!
//! # Example
//!
//! ```rust
//! use userjs::{parse_user_js, PrefType, PrefValue};
//!
//! let content = r#"
//!     /** NETWORK ***/
//!     user_pref("network.http.max-connections", 1800); // more parallelism
//! "#;
//!
//! let file = parse_user_js(content)?;
//! let entry = &file.entries[0];
//! assert_eq!(entry.value, PrefValue::Integer(1800));
//! assert_eq!(entry.pref_type, PrefType::User);
//! assert_eq!(entry.group.as_deref(), Some("NETWORK"));
//! assert_eq!(entry.comment.as_deref(), Some("more parallelism"));
//! # Ok::<(), userjs::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Spanned, Token};
use crate::types::{PrefEntry, PrefType, PrefValue, PrefsFile};
use std::path::Path;

/// Parse user.js content into entries with their headings and comments
pub fn parse_user_js(content: &str) -> Result<PrefsFile> {
    let mut parser = Parser::new(content)?;
    parser.parse()?;
    tracing::debug!(
        entries = parser.file.entries.len(),
        sections = parser.file.sections.len(),
        "parsed user.js"
    );
    Ok(parser.file)
}

/// Parse a user.js (or prefs.js) file directly from a path
pub fn parse_user_js_file(path: &Path) -> Result<PrefsFile> {
    tracing::debug!(path = %path.display(), "reading preference file");
    let content = std::fs::read_to_string(path)?;
    parse_user_js(&content)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Current lookahead token
    current: Spanned,
    /// Skip comment tokens while inside a statement
    in_statement: bool,
    /// Line of the most recent statement terminator
    last_statement_line: Option<usize>,
    section: Option<String>,
    group: Option<String>,
    file: PrefsFile,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            in_statement: false,
            last_statement_line: None,
            section: None,
            group: None,
            file: PrefsFile::default(),
        })
    }

    fn parse(&mut self) -> Result<()> {
        loop {
            match &self.current.token {
                Token::Eof => return Ok(()),
                Token::LineComment(text) => {
                    let text = text.trim().to_string();
                    self.attach_trailing_comment(text);
                    self.advance()?;
                }
                Token::BlockComment(body) => {
                    let body = body.clone();
                    self.apply_heading(&body);
                    self.advance()?;
                }
                _ => {
                    let entry = self.parse_statement()?;
                    self.file.entries.push(entry);
                }
            }
        }
    }

    /// A `//` comment on the same line as a statement's `;` explains that statement
    fn attach_trailing_comment(&mut self, text: String) {
        if text.is_empty() || self.last_statement_line != Some(self.current.line) {
            return;
        }
        if let Some(last) = self.file.entries.last_mut() {
            if last.comment.is_none() {
                last.comment = Some(text);
            }
        }
    }

    /// Track `SECTION:`/`START:`/`END:` banners and `/** GROUP ***/` headings
    fn apply_heading(&mut self, body: &str) {
        for raw in body.lines() {
            let line = trim_banner(raw);
            let opened = line
                .strip_prefix("SECTION:")
                .or_else(|| line.strip_prefix("START:"));
            if let Some(name) = opened {
                let name = name.trim().to_string();
                if !self.file.sections.contains(&name) {
                    self.file.sections.push(name.clone());
                }
                tracing::trace!(section = %name, "section opened");
                self.section = Some(name);
                self.group = None;
                return;
            }
            if line.starts_with("END:") {
                self.section = None;
                self.group = None;
                return;
            }
        }

        if !body.contains('\n') {
            let title = trim_banner(body);
            if is_group_title(title) {
                self.group = Some(title.to_string());
            }
        }
    }

    /// Parse `directive "(" string "," value ")" ";"`
    fn parse_statement(&mut self) -> Result<PrefEntry> {
        self.in_statement = true;
        let line = self.current.line;
        let pref_type = self.parse_directive()?;
        self.expect_token(Token::LeftParen)?;
        let key = self.expect_string()?;
        self.expect_token(Token::Comma)?;
        let value = self.parse_value()?;
        self.expect_token(Token::RightParen)?;

        // Comments after the terminator belong to the top level again
        self.in_statement = false;
        self.last_statement_line = Some(self.current.line);
        self.expect_token(Token::Semicolon)?;

        Ok(PrefEntry {
            key,
            value,
            pref_type,
            comment: None,
            section: self.section.clone(),
            group: self.group.clone(),
            line,
        })
    }

    fn parse_directive(&mut self) -> Result<PrefType> {
        match &self.current.token {
            Token::Identifier(ident) => match PrefType::from_directive(ident) {
                Some(pref_type) => {
                    self.advance()?;
                    Ok(pref_type)
                }
                None => Err(self.error(format!(
                    "Unknown pref function '{}'. Expected user_pref, pref, lock_pref, or sticky_pref",
                    ident
                ))),
            },
            token => Err(self.error(format!(
                "Expected pref function name (user_pref, pref, lock_pref, sticky_pref), got {:?}",
                token
            ))),
        }
    }

    fn parse_value(&mut self) -> Result<PrefValue> {
        let value = match &mut self.current.token {
            Token::String(s) => Some(PrefValue::String(std::mem::take(s))),
            Token::Integer(n) => Some(PrefValue::Integer(*n)),
            Token::Boolean(b) => Some(PrefValue::Bool(*b)),
            _ => None,
        };
        let Some(value) = value else {
            let message = match &self.current.token {
                Token::Eof => "Unexpected end of input".to_string(),
                token => format!("Expected value, got {:?}", token),
            };
            return Err(self.error(message));
        };
        self.advance()?;
        Ok(value)
    }

    fn expect_token(&mut self, expected: Token) -> Result<()> {
        if self.current.token == expected {
            return self.advance();
        }
        match &self.current.token {
            Token::Eof => Err(self.error(format!(
                "Unexpected end of input, expected {:?}",
                expected
            ))),
            token => Err(self.error(format!("Expected {:?}, got {:?}", expected, token))),
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        if let Token::String(s) = &mut self.current.token {
            let s = std::mem::take(s);
            self.advance()?;
            return Ok(s);
        }
        let message = format!("Expected string, got {:?}", self.current.token);
        Err(self.error(message))
    }

    fn advance(&mut self) -> Result<()> {
        loop {
            self.current = self.lexer.next_token()?;
            let is_comment = matches!(
                self.current.token,
                Token::LineComment(_) | Token::BlockComment(_)
            );
            if !(self.in_statement && is_comment) {
                return Ok(());
            }
        }
    }

    fn error(&self, message: String) -> Error {
        Error::Parser {
            line: self.current.line,
            column: self.current.column,
            message,
        }
    }
}

/// Strip the `*` borders and padding used by banner comments
fn trim_banner(line: &str) -> &str {
    line.trim_matches(|c: char| c == '*' || c.is_whitespace())
}

/// Group titles lead with an all-caps word, e.g. `DISK CACHE (...)` or `PDF`
fn is_group_title(title: &str) -> bool {
    match title.split_whitespace().next() {
        Some(word) => {
            word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrefValueExt;

    #[test]
    fn test_parse_string_value() {
        let input = r#"user_pref("geo.provider.network.url", "https://beacondb.net/v1/geolocate");"#;
        let file = parse_user_js(input).unwrap();
        assert_eq!(file.entries.len(), 1);
        assert_eq!(
            file.entries[0].value.as_str(),
            Some("https://beacondb.net/v1/geolocate")
        );
        assert_eq!(file.entries[0].pref_type, PrefType::User);
        assert_eq!(file.entries[0].line, 1);
    }

    #[test]
    fn test_parse_all_value_kinds() {
        let input = r#"
            user_pref("a.bool", false);
            user_pref("a.int", -5);
            user_pref("a.str", "");
        "#;
        let file = parse_user_js(input).unwrap();
        let values: Vec<_> = file.entries.iter().map(|e| e.value.clone()).collect();
        assert_eq!(
            values,
            vec![
                PrefValue::Bool(false),
                PrefValue::Integer(-5),
                PrefValue::String(String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_other_directives() {
        let input = r#"
            pref("a.default", 1);
            lock_pref("a.locked", true);
            sticky_pref("a.sticky", "x");
        "#;
        let file = parse_user_js(input).unwrap();
        let types: Vec<_> = file.entries.iter().map(|e| e.pref_type).collect();
        assert_eq!(
            types,
            vec![PrefType::Default, PrefType::Locked, PrefType::Sticky]
        );
    }

    #[test]
    fn test_trailing_comment_attaches_to_same_line_only() {
        let input = r#"
            user_pref("a.one", 1); // first
            // standalone note
            user_pref("a.two", 2);
        "#;
        let file = parse_user_js(input).unwrap();
        assert_eq!(file.entries[0].comment.as_deref(), Some("first"));
        assert_eq!(file.entries[1].comment, None);
    }

    #[test]
    fn test_comment_inside_statement_is_skipped() {
        let input = r#"user_pref("a.b", /* inline */ true);"#;
        let file = parse_user_js(input).unwrap();
        assert_eq!(file.entries[0].value.as_bool(), Some(true));
    }

    #[test]
    fn test_sections_and_groups() {
        let input = r#"
/****************************************************************************
 * SECTION: FASTFOX                                                         *
****************************************************************************/
/** DISK CACHE (RAM only) ***/
user_pref("browser.cache.disk.enable", false);
/** Not a heading, just a note ***/
user_pref("browser.cache.memory.capacity", 131072);

/****************************************************************************
 * START: MY OVERRIDES                                                      *
****************************************************************************/
user_pref("browser.cache.disk.enable", true);

/****************************************************************************
 * END: BETTERFOX                                                           *
****************************************************************************/
user_pref("trailing.pref", 0);
"#;
        let file = parse_user_js(input).unwrap();
        assert_eq!(file.sections, vec!["FASTFOX", "MY OVERRIDES"]);

        let first = &file.entries[0];
        assert_eq!(first.section.as_deref(), Some("FASTFOX"));
        assert_eq!(first.group.as_deref(), Some("DISK CACHE (RAM only)"));

        let second = &file.entries[1];
        assert_eq!(second.group.as_deref(), Some("DISK CACHE (RAM only)"));

        let third = &file.entries[2];
        assert_eq!(third.section.as_deref(), Some("MY OVERRIDES"));
        assert_eq!(third.group, None);

        let last = &file.entries[3];
        assert_eq!(last.section, None);
    }

    #[test]
    fn test_missing_semicolon() {
        let input = "user_pref(\"a.b\", 1)\nuser_pref(\"c.d\", 2);";
        let err = parse_user_js(input).unwrap_err();
        assert_eq!(err.position(), Some((2, 1)));
        assert!(err.to_string().contains("Semicolon"));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        let err = parse_user_js(r#"user_pref("a.b", 1;"#).unwrap_err();
        assert!(err.to_string().contains("RightParen"));
    }

    #[test]
    fn test_unknown_directive() {
        let err = parse_user_js(r#"set_pref("a.b", 1);"#).unwrap_err();
        assert!(err.to_string().contains("Unknown pref function 'set_pref'"));
    }

    #[test]
    fn test_null_value_rejected() {
        assert!(parse_user_js(r#"user_pref("a.b", null);"#).is_err());
    }

    #[test]
    fn test_key_must_be_string() {
        assert!(parse_user_js(r#"user_pref(a.b, 1);"#).is_err());
    }

    #[test]
    fn test_unexpected_eof() {
        let err = parse_user_js(r#"user_pref("a.b","#).unwrap_err();
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn test_empty_and_comment_only_input() {
        assert!(parse_user_js("").unwrap().entries.is_empty());
        assert!(parse_user_js("// nothing\n/* here */")
            .unwrap()
            .entries
            .is_empty());
    }

    #[test]
    fn test_is_group_title() {
        assert!(is_group_title("OCSP & CERTS / HPKP"));
        assert!(is_group_title("AI (Inteligência Artificial)"));
        assert!(!is_group_title("Impede que o Firefox capture senhas"));
        assert!(!is_group_title(""));
        assert!(!is_group_title("&&"));
    }
}
