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

//! Arithmetic expression evaluator (§4.B): a recursive-descent parser over
//! the grammar in precedence order, generic over the chosen [`Number`]
//! backing.

pub mod error;
pub mod lexer;

use crate::num::Number;
use self::error::EvalError;
use self::lexer::{Lexer, Token};

struct Parser<'a, N: Number> {
    lexer: Lexer<'a, N>,
    current: Token<N>,
}

impl<'a, N: Number> Parser<'a, N> {
    fn new(s: &'a str) -> Self {
        let mut lexer = Lexer::new(s);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    fn bump(&mut self) -> Token<N> {
        std::mem::replace(&mut self.current, self.lexer.next_token())
    }

    fn parse(&mut self) -> Result<N, EvalError> {
        let v = self.logical_or()?;
        if matches!(self.current, Token::Error) {
            return Err(EvalError::UnknownInput);
        }
        if !matches!(self.current, Token::EoText) {
            return Err(EvalError::ExcessInput);
        }
        Ok(v)
    }

    fn logical_or(&mut self) -> Result<N, EvalError> {
        let mut lhs = self.logical_and()?;
        while matches!(self.current, Token::LOr) {
            self.bump();
            let rhs = self.logical_and()?;
            lhs = lhs.lor(&rhs);
        }
        Ok(lhs)
    }

    fn logical_and(&mut self) -> Result<N, EvalError> {
        let mut lhs = self.or_expr()?;
        while matches!(self.current, Token::LAnd) {
            self.bump();
            let rhs = self.or_expr()?;
            lhs = lhs.land(&rhs);
        }
        Ok(lhs)
    }

    fn or_expr(&mut self) -> Result<N, EvalError> {
        let mut lhs = self.xor_expr()?;
        while matches!(self.current, Token::Or) {
            self.bump();
            let rhs = self.xor_expr()?;
            lhs = lhs.or(&rhs);
        }
        Ok(lhs)
    }

    fn xor_expr(&mut self) -> Result<N, EvalError> {
        let mut lhs = self.and_expr()?;
        while matches!(self.current, Token::Xor) {
            self.bump();
            let rhs = self.and_expr()?;
            lhs = lhs.xor(&rhs);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<N, EvalError> {
        let mut lhs = self.not_expr()?;
        while matches!(self.current, Token::And) {
            self.bump();
            let rhs = self.not_expr()?;
            lhs = lhs.and(&rhs);
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<N, EvalError> {
        if matches!(self.current, Token::Not) {
            self.bump();
            Ok(self.not_expr()?.not())
        } else {
            self.lnot_expr()
        }
    }

    fn lnot_expr(&mut self) -> Result<N, EvalError> {
        if matches!(self.current, Token::LNot) {
            self.bump();
            Ok(self.lnot_expr()?.lnot())
        } else {
            self.cmp()
        }
    }

    fn cmp(&mut self) -> Result<N, EvalError> {
        let mut lhs = self.shift()?;
        loop {
            let result = match self.current {
                Token::Eq    => { self.bump(); let rhs = self.shift()?; lhs.eq(&rhs) }
                Token::NotEq => { self.bump(); let rhs = self.shift()?; !lhs.eq(&rhs) }
                Token::Ls    => { self.bump(); let rhs = self.shift()?; lhs.lt(&rhs) }
                Token::LsEq  => { self.bump(); let rhs = self.shift()?; lhs.le(&rhs) }
                Token::Gt    => { self.bump(); let rhs = self.shift()?; lhs.gt(&rhs) }
                Token::GtEq  => { self.bump(); let rhs = self.shift()?; lhs.ge(&rhs) }
                _ => break,
            };
            lhs = N::from_i64(result as i64);
        }
        Ok(lhs)
    }

    fn shift(&mut self) -> Result<N, EvalError> {
        let mut lhs = self.additive()?;
        loop {
            match self.current {
                Token::LShift => { self.bump(); let rhs = self.additive()?; lhs = lhs.shl(&rhs); }
                Token::RShift => { self.bump(); let rhs = self.additive()?; lhs = lhs.shr(&rhs); }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn additive(&mut self) -> Result<N, EvalError> {
        let mut lhs = self.multiplicative()?;
        loop {
            match self.current {
                Token::Plus  => { self.bump(); let rhs = self.multiplicative()?; lhs = lhs.add(&rhs); }
                Token::Minus => { self.bump(); let rhs = self.multiplicative()?; lhs = lhs.sub(&rhs); }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> Result<N, EvalError> {
        let mut lhs = self.exp()?;
        loop {
            match self.current {
                Token::Times  => { self.bump(); let rhs = self.exp()?; lhs = lhs.mul(&rhs); }
                Token::Divide => { self.bump(); let rhs = self.exp()?; lhs = lhs.div(&rhs)?; }
                Token::Modulo => { self.bump(); let rhs = self.exp()?; lhs = lhs.rem(&rhs)?; }
                Token::Ratio  => { self.bump(); let rhs = self.exp()?; lhs = lhs.ratio(&rhs)?; }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn exp(&mut self) -> Result<N, EvalError> {
        let lhs = self.unary()?;
        if matches!(self.current, Token::Exponent) {
            self.bump();
            let rhs = self.exp()?;
            Ok(lhs.pow(&rhs))
        } else {
            Ok(lhs)
        }
    }

    fn unary(&mut self) -> Result<N, EvalError> {
        match self.current {
            Token::Plus  => { self.bump(); self.simple() }
            Token::Minus => { self.bump(); Ok(self.simple()?.neg()) }
            _ => self.simple(),
        }
    }

    fn simple(&mut self) -> Result<N, EvalError> {
        match self.bump() {
            Token::Number(n) => Ok(n),
            Token::LeftP => {
                let v = self.logical_or()?;
                if !matches!(self.current, Token::RightP) {
                    return Err(EvalError::MissingRight);
                }
                self.bump();
                Ok(v)
            }
            Token::Error => Err(EvalError::UnknownInput),
            _ => Err(EvalError::SyntaxError),
        }
    }
}

/// Evaluates `expr`, formatting the result in `radix` (2..=36) left-padded
/// with `0` to at least `width` characters (§4.B, §6). `radix` and `width`
/// are assumed already validated by the caller (§6: out-of-range values are
/// a caller error, not an [`EvalError`]).
pub fn evaluate<N: Number>(expr: &str, radix: u32, width: usize) -> Result<String, EvalError> {
    let mut parser = Parser::<N>::new(expr);
    let value = parser.parse()?;
    Ok(pad(&value.format(radix), width))
}

/// Caller-facing validation for the `eval` builtin's optional radix/width
/// arguments (§6, §10.7). Distinct from [`EvalError`]: a bad radix or width
/// is a shape problem the builtin handler rejects before ever constructing
/// a [`Parser`], not something the expression grammar itself can produce.
#[derive(Clone, Copy, Debug)]
pub enum EvalArgError {
    BadRadix(i64),
    BadWidth(i64),
}

impl std::fmt::Display for EvalArgError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            EvalArgError::BadRadix(r) => write!(f, "radix {} in `eval' out of range", r),
            EvalArgError::BadWidth(w) => write!(f, "negative width {} in `eval'", w),
        }
    }
}

impl crate::message::Message for EvalArgError {
    #[inline]
    fn severity(&self) -> crate::message::Severity {
        crate::message::Severity::Error
    }
}

/// Validates the `eval` builtin's optional radix/width arguments per §6
/// (`radix ∈ [2,36]`, `width ≥ 0`), returning them narrowed for
/// [`evaluate`] or a caller-facing [`EvalArgError`].
pub fn check_args(radix: i64, width: i64) -> Result<(u32, usize), EvalArgError> {
    if !(2..=36).contains(&radix) {
        return Err(EvalArgError::BadRadix(radix));
    }
    if width < 0 {
        return Err(EvalArgError::BadWidth(width));
    }
    Ok((radix as u32, width as usize))
}

fn pad(digits: &str, width: usize) -> String {
    let (sign, rest) = match digits.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", digits),
    };
    if sign.len() + rest.len() >= width {
        format!("{}{}", sign, rest)
    } else {
        let zeros = width - sign.len() - rest.len();
        format!("{}{}{}", sign, "0".repeat(zeros), rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::fixed::Fixed;
    use crate::num::rational::Rat;

    fn eval(s: &str) -> Result<String, EvalError> {
        evaluate::<Fixed>(s, 10, 1)
    }

    #[test]
    fn exponentiation() {
        assert_eq!(eval("2**10").unwrap(), "1024");
    }

    #[test]
    fn parenthesized_comparison_and_non_short_circuit_and() {
        assert_eq!(eval("(1+2)*3 == 9 && 4").unwrap(), "1");
    }

    #[test]
    fn divide_by_zero() {
        assert_eq!(eval("5/0").unwrap_err(), EvalError::DivideZero);
    }

    #[test]
    fn modulo_by_zero() {
        assert_eq!(eval("5%0").unwrap_err(), EvalError::ModuloZero);
    }

    #[test]
    fn mixed_radix_literals_sum() {
        assert_eq!(
            evaluate::<Fixed>("0xff + 0b10 + 0r3:21", 10, 3).unwrap(),
            "264"
        );
    }

    #[test]
    fn missing_right_paren() {
        assert_eq!(eval("(1+2").unwrap_err(), EvalError::MissingRight);
    }

    #[test]
    fn leading_operator_is_syntax_error() {
        assert_eq!(eval("*3").unwrap_err(), EvalError::SyntaxError);
    }

    #[test]
    fn excess_input_after_expression() {
        assert_eq!(eval("1 2").unwrap_err(), EvalError::ExcessInput);
    }

    #[test]
    fn trailing_whitespace_is_not_excess_input() {
        assert_eq!(eval("1   ").unwrap(), "1");
    }

    #[test]
    fn width_padding() {
        assert_eq!(evaluate::<Fixed>("5", 10, 4).unwrap(), "0005");
        assert_eq!(evaluate::<Fixed>("-5", 10, 4).unwrap(), "-005");
    }

    #[test]
    fn format_round_trips_through_decimal_at_width_one() {
        for n in [0i64, 1, -1, 42, -42, 1024, i64::MAX, i64::MIN + 1] {
            let formatted = Fixed(n).format(10);
            let reparsed = evaluate::<Fixed>(&formatted, 10, 1).unwrap();
            assert_eq!(reparsed, formatted);
        }
    }

    #[test]
    fn rational_ratio_is_exact() {
        let s = evaluate::<Rat>("1:3", 10, 1).unwrap();
        assert_eq!(s, "1/3");
    }

    #[test]
    fn rational_negative_exponent_is_reciprocal() {
        let s = evaluate::<Rat>("2**-1", 10, 1).unwrap();
        assert_eq!(s, "1/2");
    }

    #[test]
    fn fixed_negative_exponent_degrades_per_quirk() {
        let s = evaluate::<Fixed>("2**-1", 10, 1).unwrap();
        assert_eq!(s, "0");
    }

    #[test]
    fn check_args_accepts_bounds() {
        assert_eq!(check_args(2, 0).unwrap(), (2, 0));
        assert_eq!(check_args(36, 5).unwrap(), (36, 5));
    }

    #[test]
    fn check_args_rejects_out_of_range_radix() {
        assert!(matches!(check_args(1, 1), Err(EvalArgError::BadRadix(1))));
        assert!(matches!(check_args(37, 1), Err(EvalArgError::BadRadix(37))));
    }

    #[test]
    fn check_args_rejects_negative_width() {
        assert!(matches!(check_args(10, -1), Err(EvalArgError::BadWidth(-1))));
    }
}
