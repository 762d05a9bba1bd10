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

#![allow(dead_code)]

mod eval;
mod input;
mod lexer;
mod mem;
mod message;
mod num;
mod processor;
mod util;

use std::env::args;
use std::process::ExitCode;

use processor::Processor;

/// The name this crate's diagnostics report under (§7).
pub const PROGRAM_NAME: &str = "m4rs";

fn main() -> ExitCode {
    let mut argv = args();
    argv.next();

    let mut proc = Processor::new();
    let mut ok = true;

    let paths: Vec<String> = argv.collect();
    if paths.is_empty() {
        ok &= proc.process_stdin().is_ok();
    } else {
        for path in paths {
            ok &= if path == "-" {
                proc.process_stdin().is_ok()
            } else {
                proc.process_file(&path).is_ok()
            };
        }
    }

    let code = proc.exit_code();
    if code != 0 || !ok {
        ExitCode::from(if code != 0 { code as u8 } else { 1 })
    } else {
        ExitCode::SUCCESS
    }
}
