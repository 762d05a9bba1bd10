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

//! Minimal top-level driver (§4.E): a runnable echo of the lexer boundary.
//!
//! The expansion driver itself — reading `WORD`s, collecting argument
//! lists, consulting a symbol table, re-injecting expansion text — is an
//! external collaborator out of CORE scope (§1). This type exists only so
//! the crate has a runnable entry point that exercises the input stack and
//! lexer together, in the spirit of the teacher's `Assembler::assemble_bytes`
//! token-table echo.

use std::fs;
use std::io::{stdin, BufReader, Read};

use crate::input::source::ByteStream;
use crate::input::InputStack;
use crate::lexer::syntax::SyntaxConfig;
use crate::lexer::token::Token;
use crate::lexer::{LexError, Lexer};
use crate::message::{Log, Logger};

/// Type returned by fallible processor methods.
pub type Result<T = (), E = ()> = std::result::Result<T, E>;

pub struct Processor {
    stack:  InputStack,
    syntax: SyntaxConfig,
    lexer:  Lexer,
    logger: Logger,
}

impl Processor {
    pub fn new() -> Self {
        Self {
            stack:  InputStack::new(),
            syntax: SyntaxConfig::default(),
            lexer:  Lexer::new(),
            logger: Logger::new(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.logger.exit_code()
    }

    pub fn process_file(&mut self, path: &str) -> Result {
        match fs::File::open(path) {
            Ok(f)  => self.process_stream(path, f),
            Err(_) => {
                self.logger.log(crate::message::file_not_found_error(path));
                Err(())
            }
        }
    }

    pub fn process_stdin(&mut self) -> Result {
        self.process_stream("stdin", stdin())
    }

    fn process_stream<R: Read + 'static>(&mut self, path: &str, r: R) -> Result {
        let name = self.stack.intern(path);
        let stream: Box<dyn ByteStream> = Box::new(BufReader::new(r));
        self.stack.push_file(stream, name, true);
        self.echo_tokens()
    }

    /// Drains the input stack through the lexer, printing each token —
    /// the minimal ambient echo this crate carries in place of a real
    /// expansion driver.
    fn echo_tokens(&mut self) -> Result {
        loop {
            match self.lexer.next_token(&mut self.stack, &self.syntax) {
                Ok(Token::Eof) => {
                    if !self.stack.pop_wrapup() {
                        return Ok(());
                    }
                }
                Ok(token) => println!("{:?}", token),
                Err(LexError::EofInQuote) => {
                    eprintln!("fatal: end of file in quoted string");
                    return Err(());
                }
                Err(LexError::EofInComment) => {
                    eprintln!("fatal: end of file in comment");
                    return Err(());
                }
            }
        }
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}
