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

//! Expression evaluator error taxonomy (§4.B, §7).
//!
//! Unlike the crate's `Message`/`Severity` diagnostics, these are plain
//! values returned to the caller of `eval` — no global error state.

use std::fmt::{self, Display, Formatter};

use crate::num::ArithError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EvalError {
    MissingRight,
    SyntaxError,
    UnknownInput,
    ExcessInput,
    DivideZero,
    ModuloZero,
}

impl From<ArithError> for EvalError {
    fn from(e: ArithError) -> Self {
        match e {
            ArithError::DivideByZero => EvalError::DivideZero,
            ArithError::ModuloByZero => EvalError::ModuloZero,
        }
    }
}

impl Display for EvalError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let s = match self {
            EvalError::MissingRight => "missing right parenthesis",
            EvalError::SyntaxError  => "syntax error",
            EvalError::UnknownInput => "unknown input",
            EvalError::ExcessInput  => "excess input after expression",
            EvalError::DivideZero   => "divide by zero",
            EvalError::ModuloZero   => "modulo by zero",
        };
        f.write_str(s)
    }
}
