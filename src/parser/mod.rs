//! Parser that consumes the lexer and builds the `Spec` wave list.
//!
//! Expected shape (after preprocessing):
//!
//! ```text
//! beginwave
//!   name "game"
//!   entry boot
//!   beginseg
//!     name "assets"
//!     flags RAW
//!     include "assets/font.bin"
//!   endseg
//! endwave
//! ```
//!
//! `entry` is optional (defaults to `_start`). Only `RAW` segments exist at
//! this level; anything else in a `flags` statement is rejected.

pub mod lexer;

use std::iter::Peekable;

use anyhow::{Result, anyhow};

use crate::model::{RawSegment, Spec, Wave};
use lexer::{Lexer, Token};

pub fn parse_spec(text: &str) -> Result<Spec> {
    Parser::new(text).parse().map_err(|e| anyhow!(e))
}

struct Parser<'a> {
    lex: Peekable<Lexer<'a>>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            lex: Lexer::new(src).peekable(),
        }
    }

    fn next(&mut self) -> Result<Option<Token>, String> {
        self.lex.next().transpose()
    }

    fn expect_str(&mut self, what: &str) -> Result<String, String> {
        match self.next()? {
            Some(Token::Str(s)) => Ok(s),
            Some(Token::Ident(id)) => Err(format!("expected quoted {what}, got `{id}`")),
            None => Err(format!("expected quoted {what}, got end of spec")),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, String> {
        match self.next()? {
            Some(Token::Ident(id)) => Ok(id),
            Some(Token::Str(s)) => Err(format!("expected {what}, got string \"{s}\"")),
            None => Err(format!("expected {what}, got end of spec")),
        }
    }

    fn parse(mut self) -> Result<Spec, String> {
        let mut waves = Vec::new();
        while let Some(tok) = self.next()? {
            match tok {
                Token::Ident(kw) if kw == "beginwave" => {
                    let wave = self
                        .wave()
                        .map_err(|e| format!("wave {} failed: {}", waves.len(), e))?;
                    waves.push(wave);
                }
                other => return Err(format!("expected `beginwave`, got {}", describe(&other))),
            }
        }
        Ok(Spec { waves })
    }

    fn wave(&mut self) -> Result<Wave, String> {
        let mut name: Option<String> = None;
        let mut entry = String::from("_start");
        let mut raw_segments = Vec::new();

        loop {
            let Some(tok) = self.next()? else {
                return Err("missing `endwave`".into());
            };
            match tok {
                Token::Ident(kw) => match kw.as_str() {
                    "name" => name = Some(self.expect_str("wave name")?),
                    "entry" => entry = self.expect_ident("entry symbol")?,
                    "beginseg" => raw_segments.push(self.segment()?),
                    "endwave" => break,
                    other => return Err(format!("unknown wave statement `{other}`")),
                },
                other => return Err(format!("unexpected {} in wave", describe(&other))),
            }
        }

        let name = name.ok_or("wave missing `name`")?;
        Ok(Wave {
            name,
            entry,
            raw_segments,
        })
    }

    fn segment(&mut self) -> Result<RawSegment, String> {
        let mut name: Option<String> = None;
        let mut includes = Vec::new();

        loop {
            let Some(tok) = self.next()? else {
                return Err("missing `endseg`".into());
            };
            match tok {
                Token::Ident(kw) => match kw.as_str() {
                    "name" => name = Some(self.expect_str("segment name")?),
                    "include" => includes.push(self.expect_str("include path")?),
                    "flags" => {
                        let flags = self.expect_ident("segment flags")?;
                        if flags != "RAW" {
                            return Err(format!("unsupported segment flags `{flags}`"));
                        }
                    }
                    "endseg" => break,
                    other => return Err(format!("unknown segment statement `{other}`")),
                },
                other => return Err(format!("unexpected {} in segment", describe(&other))),
            }
        }

        let name = name.ok_or("segment missing `name`")?;
        Ok(RawSegment { name, includes })
    }
}

fn describe(tok: &Token) -> String {
    match tok {
        Token::Ident(id) => format!("`{id}`"),
        Token::Str(s) => format!("string \"{s}\""),
    }
}
