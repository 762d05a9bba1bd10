// This file is part of ras, an assembler.
// Copyright (C) 2020 Jeffrey Sharp
//
// ras is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// ras is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with ras.  If not, see <http://www.gnu.org/licenses/>.

//! Main tokenizer (§4.D). Reconfigurable quote/comment/word recognition
//! rules out the teacher's static transition-table DFA (`lang/lexer/core.rs`
//! in the source this crate is grounded on); this module instead matches
//! directly against the input stack, following the original `next_token`
//! algorithm, while keeping the teacher's action-based quote-scanning shape
//! (`lang/lexer/quoted.rs`) generalized to multi-byte nestable delimiters.

pub mod syntax;
pub mod token;

use crate::input::{InputStack, Peeked};
use self::syntax::SyntaxConfig;
use self::token::Token;

/// Fatal condition raised mid-token; the caller (the expansion driver) is
/// expected to abort the run (§7).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LexError {
    EofInQuote,
    EofInComment,
}

pub struct Lexer {
    /// The token `peek_token` has already scanned but `next_token` has not
    /// yet consumed. Exists so peeking never re-scans the input.
    pending: Option<Result<Token, LexError>>,
}

impl Lexer {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Reports the token `next_token` would produce, without consuming it.
    /// Idempotent: calling this any number of times before the next
    /// `next_token` returns the identical result (§4.D, §8.4).
    pub fn peek_token(&mut self, stack: &mut InputStack, cfg: &SyntaxConfig) -> Result<Token, LexError> {
        if self.pending.is_none() {
            self.pending = Some(self.scan(stack, cfg));
        }
        self.pending.clone().unwrap()
    }

    pub fn next_token(&mut self, stack: &mut InputStack, cfg: &SyntaxConfig) -> Result<Token, LexError> {
        if let Some(t) = self.pending.take() {
            return t;
        }
        self.scan(stack, cfg)
    }

    fn scan(&mut self, stack: &mut InputStack, cfg: &SyntaxConfig) -> Result<Token, LexError> {
        if let Some(builtin) = stack.take_macro() {
            return Ok(Token::Macdef(builtin));
        }

        let c = match stack.advance() {
            Peeked::Eof => return Ok(Token::Eof),
            Peeked::Byte(b) => b,
        };

        if cfg.comment_enabled() && c == cfg.bcomm()[0] && match_delim_tail(stack, &cfg.bcomm()[1..]) {
            let mut buf = cfg.bcomm().to_vec();
            scan_comment(stack, cfg, &mut buf)?;
            return Ok(Token::Str(buf));
        }

        if is_word_start(c, cfg) {
            return Ok(scan_word(stack, cfg, c));
        }

        if cfg.quoting_enabled() && c == cfg.lquote()[0] && match_delim_tail(stack, &cfg.lquote()[1..]) {
            let mut buf = Vec::new();
            scan_quoted(stack, cfg, &mut buf)?;
            return Ok(Token::Str(buf));
        }

        Ok(match c {
            b'(' => Token::Open,
            b',' => Token::Comma,
            b')' => Token::Close,
            _    => Token::Simple(c),
        })
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------

fn is_word_start(c: u8, cfg: &SyntaxConfig) -> bool {
    match cfg.word_regex() {
        Some(_) => cfg.can_start_word(c),
        None    => c.is_ascii_alphabetic() || c == b'_',
    }
}

fn is_word_cont_default(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn scan_word(stack: &mut InputStack, cfg: &SyntaxConfig, first: u8) -> Token {
    match cfg.word_regex() {
        None => {
            let mut buf = vec![first];
            loop {
                match stack.peek() {
                    Peeked::Byte(b) if is_word_cont_default(b) => {
                        stack.advance();
                        buf.push(b);
                    }
                    _ => break,
                }
            }
            Token::Word(buf)
        }
        Some(re) => {
            let mut buf = vec![first];
            loop {
                let next = match stack.peek() {
                    Peeked::Byte(b) => b,
                    Peeked::Eof => break,
                };
                let mut candidate = buf.clone();
                candidate.push(next);
                let text = String::from_utf8_lossy(&candidate).into_owned();
                let whole_match = re.find(&text)
                    .map_or(false, |m| m.start() == 0 && m.end() == text.len());
                if whole_match {
                    stack.advance();
                    buf = candidate;
                } else {
                    break;
                }
            }

            let text = String::from_utf8_lossy(&buf).into_owned();
            let exported = re.captures(&text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or(text);
            Token::Word(exported.into_bytes())
        }
    }
}

/// Balanced quote scanning with nesting (§4.D): `lquote` increments depth
/// and is kept literally; `rquote` decrements, and at depth 0 terminates
/// without being included.
fn scan_quoted(stack: &mut InputStack, cfg: &SyntaxConfig, buf: &mut Vec<u8>) -> Result<(), LexError> {
    let mut depth = 1usize;
    loop {
        if try_consume_delim(stack, cfg.rquote()) {
            depth -= 1;
            if depth == 0 {
                return Ok(());
            }
            buf.extend_from_slice(cfg.rquote());
            continue;
        }
        if try_consume_delim(stack, cfg.lquote()) {
            depth += 1;
            buf.extend_from_slice(cfg.lquote());
            continue;
        }
        match stack.advance() {
            Peeked::Byte(b) => buf.push(b),
            Peeked::Eof => return Err(LexError::EofInQuote),
        }
    }
}

/// Comments do not nest (§4.D): the first `ecomm` match ends the comment.
fn scan_comment(stack: &mut InputStack, cfg: &SyntaxConfig, buf: &mut Vec<u8>) -> Result<(), LexError> {
    loop {
        if try_consume_delim(stack, cfg.ecomm()) {
            buf.extend_from_slice(cfg.ecomm());
            return Ok(());
        }
        match stack.advance() {
            Peeked::Byte(b) => buf.push(b),
            Peeked::Eof => return Err(LexError::EofInComment),
        }
    }
}

/// Attempts to consume all of `delim` starting at the current input
/// position. On any mismatch, pushes back whatever of `delim` was already
/// consumed so no input is lost (§4.D, §9).
fn try_consume_delim(stack: &mut InputStack, delim: &[u8]) -> bool {
    if delim.is_empty() {
        return false;
    }
    match stack.peek() {
        Peeked::Byte(b) if b == delim[0] => {
            stack.advance();
        }
        _ => return false,
    }
    if delim.len() == 1 {
        return true;
    }
    if match_delim_tail(stack, &delim[1..]) {
        true
    } else {
        push_back(stack, &delim[..1]);
        false
    }
}

/// Matches `tail` against the upcoming bytes one at a time; on a mismatch,
/// pushes back whatever prefix of `tail` was already consumed.
fn match_delim_tail(stack: &mut InputStack, tail: &[u8]) -> bool {
    let mut consumed = Vec::new();
    for &want in tail {
        match stack.peek() {
            Peeked::Byte(b) if b == want => {
                stack.advance();
                consumed.push(b);
            }
            _ => {
                push_back(stack, &consumed);
                return false;
            }
        }
    }
    true
}

fn push_back(stack: &mut InputStack, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    stack.push_string_begin();
    stack.push_string_append(bytes);
    stack.push_string_end();
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};
    use crate::input::source::ByteStream;

    fn stack_of(text: &'static str) -> InputStack {
        let mut stack = InputStack::new();
        let name = stack.intern("t");
        let boxed: Box<dyn ByteStream> = Box::new(BufReader::new(Cursor::new(text.as_bytes())));
        stack.push_file(boxed, name, true);
        stack
    }

    fn collect(text: &'static str, cfg: &SyntaxConfig) -> Vec<Token> {
        let mut stack = stack_of(text);
        let mut lexer = Lexer::new();
        let mut out = Vec::new();
        loop {
            let t = lexer.next_token(&mut stack, cfg).unwrap();
            let done = t == Token::Eof;
            out.push(t);
            if done { break; }
        }
        out
    }

    #[test]
    fn scenario_1_word_open_comma_close() {
        let cfg = SyntaxConfig::default();
        let tokens = collect("foo(bar, baz)", &cfg);
        assert_eq!(tokens, vec![
            Token::Word(b"foo".to_vec()),
            Token::Open,
            Token::Word(b"bar".to_vec()),
            Token::Comma,
            Token::Simple(b' '),
            Token::Word(b"baz".to_vec()),
            Token::Close,
            Token::Eof,
        ]);
    }

    #[test]
    fn scenario_2_nested_default_quotes() {
        let cfg = SyntaxConfig::default();
        let tokens = collect("`hello `world' again'", &cfg);
        assert_eq!(tokens, vec![
            Token::Str(b"hello `world' again".to_vec()),
            Token::Eof,
        ]);
    }

    #[test]
    fn scenario_3_default_comment_to_newline() {
        let cfg = SyntaxConfig::default();
        let tokens = collect("# comment\nafter", &cfg);
        assert_eq!(tokens, vec![
            Token::Str(b"# comment\n".to_vec()),
            Token::Word(b"after".to_vec()),
            Token::Eof,
        ]);
    }

    #[test]
    fn scenario_8_multi_byte_quotes_via_changequote() {
        let mut cfg = SyntaxConfig::default();
        cfg.set_quotes(Some(b"[["), Some(b"]]"));
        let tokens = collect("[[a`b]]", &cfg);
        assert_eq!(tokens, vec![
            Token::Str(b"a`b".to_vec()),
            Token::Eof,
        ]);
    }

    #[test]
    fn scenario_9_disabled_comment_falls_through_to_simple_bytes() {
        let mut cfg = SyntaxConfig::default();
        cfg.set_comment(Some(b""), Some(b""));
        let tokens = collect("# not a comment", &cfg);
        assert_eq!(tokens, vec![
            Token::Simple(b'#'),
            Token::Simple(b' '),
            Token::Word(b"not".to_vec()),
            Token::Simple(b' '),
            Token::Word(b"a".to_vec()),
            Token::Simple(b' '),
            Token::Word(b"comment".to_vec()),
            Token::Eof,
        ]);
    }

    #[test]
    fn eof_inside_quote_is_fatal() {
        let cfg = SyntaxConfig::default();
        let mut stack = stack_of("`unterminated");
        let mut lexer = Lexer::new();
        assert_eq!(lexer.next_token(&mut stack, &cfg), Err(LexError::EofInQuote));
    }

    #[test]
    fn eof_inside_comment_is_fatal() {
        let cfg = SyntaxConfig::default();
        let mut stack = stack_of("# no newline");
        let mut lexer = Lexer::new();
        assert_eq!(lexer.next_token(&mut stack, &cfg), Err(LexError::EofInComment));
    }

    #[test]
    fn peek_token_is_idempotent_and_matches_next_token() {
        let cfg = SyntaxConfig::default();
        let mut stack = stack_of("foo(");
        let mut lexer = Lexer::new();
        let peeked_twice_a = lexer.peek_token(&mut stack, &cfg);
        let peeked_twice_b = lexer.peek_token(&mut stack, &cfg);
        assert_eq!(peeked_twice_a, peeked_twice_b);
        let next = lexer.next_token(&mut stack, &cfg);
        assert_eq!(next, peeked_twice_a);
        assert_eq!(lexer.next_token(&mut stack, &cfg).unwrap(), Token::Open);
    }

    #[test]
    fn partial_multi_byte_delimiter_mismatch_is_not_lost() {
        // `]` alone should not be swallowed as a failed attempt at `]]`.
        let mut cfg = SyntaxConfig::default();
        cfg.set_quotes(Some(b"[["), Some(b"]]"));
        let tokens = collect("[[ok]x]]", &cfg);
        assert_eq!(tokens, vec![
            Token::Str(b"ok]x".to_vec()),
            Token::Eof,
        ]);
    }

    #[test]
    fn custom_word_regexp_with_capture_group() {
        let mut cfg = SyntaxConfig::default();
        cfg.set_word_regexp(Some(r"@(\w+)")).unwrap();
        let tokens = collect("@foo ", &cfg);
        assert_eq!(tokens[0], Token::Word(b"foo".to_vec()));
    }
}
