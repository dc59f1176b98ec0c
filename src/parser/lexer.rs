//! Hand-written lexer for the preprocessed spec text.
//!
//! The grammar only has two lexical shapes, so this stays tiny:
//!
//! ```text
//! Ident   ::= [A-Za-z_][A-Za-z0-9_]*
//! Str     ::= '"' .*? '"'        (no escapes; '"' inside is forbidden)
//! ```
//!
//! Whitespace (newlines included) separates tokens. Everything from `#` to
//! end-of-line is discarded, which also swallows any preprocessor
//! linemarkers that survive `-P`.

use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    Str(String),
}

#[derive(Clone)]
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
        }
    }

    fn next_char(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn read_identifier(&mut self, first: char) -> String {
        let mut id = String::new();
        id.push(first);
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                id.push(c);
                self.next_char();
            } else {
                break;
            }
        }
        id
    }

    fn read_string(&mut self) -> Result<String, String> {
        let mut s = String::new();
        while let Some(c) = self.next_char() {
            if c == '"' {
                return Ok(s);
            }
            s.push(c);
        }
        Err("no closing \" found".into())
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, String>;

    fn next(&mut self) -> Option<Self::Item> {
        // Skip whitespace and #-comments
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.next_char();
            } else if c == '#' {
                while let Some(c) = self.next_char() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }

        let ch = self.next_char()?;
        let tok_res = match ch {
            '"' => self.read_string().map(Token::Str),
            c if c.is_ascii_alphabetic() || c == '_' => Ok(Token::Ident(self.read_identifier(c))),
            e => Err(format!("unexpected character `{e}`")),
        };

        Some(tok_res)
    }
}
