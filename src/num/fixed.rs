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

//! Fixed-width (`i64`, two's-complement wrapping) numeric backing.

use super::{ArithError, Number};

/// A fixed-width signed integer, wrapping on overflow with no diagnostic,
/// per §4.A.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Fixed(pub i64);

impl Fixed {
    /// The value's truncated multiplicative "invert", used only for the
    /// negative-exponent `pow` quirk (§9 Open Question, resolved to preserve
    /// the original's behavior bit-for-bit): `1 / self` truncated toward
    /// zero, which is `0` for any `|self| > 1`.
    fn truncated_invert(self) -> Self {
        match self.0 {
            1  => Fixed(1),
            -1 => Fixed(-1),
            _  => Fixed(0),
        }
    }
}

impl Number for Fixed {
    fn from_i64(n: i64) -> Self {
        Fixed(n)
    }

    fn accumulate(&self, radix: u32, digit: u32) -> Self {
        Fixed(self.0.wrapping_mul(radix as i64).wrapping_add(digit as i64))
    }

    fn format(&self, radix: u32) -> String {
        if self.0 == 0 {
            return "0".to_string();
        }

        let negative = self.0 < 0;
        // `i64::MIN` has no positive counterpart; widen to avoid overflow
        // on negation.
        let mut mag = (self.0 as i128).unsigned_abs();
        let mut digits = Vec::new();
        while mag > 0 {
            let d = (mag % radix as u128) as u32;
            digits.push(std::char::from_digit(d, radix).unwrap());
            mag /= radix as u128;
        }
        if negative {
            digits.push('-');
        }
        digits.iter().rev().collect()
    }

    fn is_zero(&self) -> bool { self.0 == 0 }
    fn is_negative(&self) -> bool { self.0 < 0 }

    fn neg(&self) -> Self { Fixed(self.0.wrapping_neg()) }
    fn not(&self) -> Self { Fixed(!self.0) }
    fn lnot(&self) -> Self { Fixed((self.0 == 0) as i64) }

    fn decrement(&self) -> Self { Fixed(self.0.wrapping_sub(1)) }

    fn invert(&self) -> Option<Self> { None }

    fn add(&self, rhs: &Self) -> Self { Fixed(self.0.wrapping_add(rhs.0)) }
    fn sub(&self, rhs: &Self) -> Self { Fixed(self.0.wrapping_sub(rhs.0)) }
    fn mul(&self, rhs: &Self) -> Self { Fixed(self.0.wrapping_mul(rhs.0)) }

    fn div(&self, rhs: &Self) -> Result<Self, ArithError> {
        if rhs.0 == 0 {
            return Err(ArithError::DivideByZero);
        }
        Ok(Fixed(self.0.wrapping_div(rhs.0)))
    }

    fn rem(&self, rhs: &Self) -> Result<Self, ArithError> {
        if rhs.0 == 0 {
            return Err(ArithError::ModuloByZero);
        }
        Ok(Fixed(self.0.wrapping_rem(rhs.0)))
    }

    fn ratio(&self, rhs: &Self) -> Result<Self, ArithError> {
        // Fixed-width backing has no fractional representation, so `:`
        // aliases truncating division (§9).
        self.div(rhs)
    }

    fn pow(&self, rhs: &Self) -> Self {
        if rhs.0 >= 0 {
            let mut result = Fixed(1);
            let mut n = rhs.0;
            while n > 0 {
                result = result.mul(self);
                n -= 1;
            }
            result
        } else {
            // Negative exponent: the original iterates the truncated
            // invert, which degrades to 0 for any |self| > 1 instead of
            // producing a true fraction. Preserved bit-for-bit.
            let inv = self.truncated_invert();
            let mut result = Fixed(1);
            let mut n = -rhs.0;
            while n > 0 {
                result = result.mul(&inv);
                n -= 1;
            }
            result
        }
    }

    fn and(&self, rhs: &Self) -> Self { Fixed(self.0 & rhs.0) }
    fn or(&self, rhs: &Self)  -> Self { Fixed(self.0 | rhs.0) }
    fn xor(&self, rhs: &Self) -> Self { Fixed(self.0 ^ rhs.0) }

    fn shl(&self, rhs: &Self) -> Self {
        let n = (rhs.0 as u32) & 63;
        Fixed(((self.0 as u64).wrapping_shl(n)) as i64)
    }

    fn shr(&self, rhs: &Self) -> Self {
        let n = (rhs.0 as u32) & 63;
        Fixed(self.0.wrapping_shr(n))
    }

    fn land(&self, rhs: &Self) -> Self {
        Fixed(((self.0 != 0) && (rhs.0 != 0)) as i64)
    }

    fn lor(&self, rhs: &Self) -> Self {
        Fixed(((self.0 != 0) || (rhs.0 != 0)) as i64)
    }

    fn eq(&self, rhs: &Self) -> bool { self.0 == rhs.0 }
    fn lt(&self, rhs: &Self) -> bool { self.0 <  rhs.0 }
    fn le(&self, rhs: &Self) -> bool { self.0 <= rhs.0 }
    fn gt(&self, rhs: &Self) -> bool { self.0 >  rhs.0 }
    fn ge(&self, rhs: &Self) -> bool { self.0 >= rhs.0 }
}
