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

//! Arbitrary-precision rational numeric backing, built on `rug`.

use std::cmp::Ordering;

use rug::Rational;

use super::{ArithError, Number};

/// An arbitrary-precision rational value.
#[derive(Clone, Debug)]
pub struct Rat(pub Rational);

impl Rat {
    fn truncated_i64(&self) -> i64 {
        self.0.clone().trunc().numer().to_i64_wrapping()
    }

    fn from_bool(b: bool) -> Self {
        Rat(Rational::from(b as i64))
    }
}

impl PartialEq for Rat {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}

impl Number for Rat {
    fn from_i64(n: i64) -> Self {
        Rat(Rational::from(n))
    }

    fn accumulate(&self, radix: u32, digit: u32) -> Self {
        let radix = Rational::from(radix as i64);
        let digit = Rational::from(digit as i64);
        Rat(self.0.clone() * radix + digit)
    }

    fn format(&self, radix: u32) -> String {
        let numer = self.0.numer();
        let denom = self.0.denom();

        let fmt_int = |n: &rug::Integer| -> String {
            n.to_string_radix(radix as i32)
        };

        if *denom == 1 {
            fmt_int(numer)
        } else {
            format!("{}/{}", fmt_int(numer), fmt_int(denom))
        }
    }

    fn is_zero(&self) -> bool { self.0.cmp0() == Ordering::Equal }
    fn is_negative(&self) -> bool { self.0.cmp0() == Ordering::Less }

    fn neg(&self) -> Self { Rat(-self.0.clone()) }

    fn not(&self) -> Self {
        Rat(Rational::from(!self.truncated_i64()))
    }

    fn lnot(&self) -> Self { Self::from_bool(self.is_zero()) }

    fn decrement(&self) -> Self { Rat(self.0.clone() - Rational::from(1)) }

    fn invert(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(Rat(self.0.clone().recip()))
        }
    }

    fn add(&self, rhs: &Self) -> Self { Rat(self.0.clone() + rhs.0.clone()) }
    fn sub(&self, rhs: &Self) -> Self { Rat(self.0.clone() - rhs.0.clone()) }
    fn mul(&self, rhs: &Self) -> Self { Rat(self.0.clone() * rhs.0.clone()) }

    fn div(&self, rhs: &Self) -> Result<Self, ArithError> {
        if rhs.is_zero() {
            return Err(ArithError::DivideByZero);
        }
        Ok(Rat(self.0.clone() / rhs.0.clone()))
    }

    fn rem(&self, rhs: &Self) -> Result<Self, ArithError> {
        if rhs.is_zero() {
            return Err(ArithError::ModuloByZero);
        }
        let quot = (self.0.clone() / rhs.0.clone()).trunc();
        Ok(Rat(self.0.clone() - rhs.0.clone() * quot))
    }

    fn ratio(&self, rhs: &Self) -> Result<Self, ArithError> {
        // Rational backing performs exact division, unlike the truncating
        // alias used by the fixed-width backing (§9).
        self.div(rhs)
    }

    fn pow(&self, rhs: &Self) -> Self {
        let exp = rhs.truncated_i64();
        if exp >= 0 {
            let mut result = Rational::from(1);
            for _ in 0..exp {
                result *= self.0.clone();
            }
            Rat(result)
        } else {
            // True multiplicative invert: unlike the fixed-width backing's
            // degrading quirk, the rational backing can represent the
            // exact fraction, so a negative exponent is a real reciprocal
            // power (§9).
            let inv = self.0.clone().recip();
            let mut result = Rational::from(1);
            for _ in 0..(-exp) {
                result *= inv.clone();
            }
            Rat(result)
        }
    }

    fn and(&self, rhs: &Self) -> Self {
        Rat(Rational::from(self.truncated_i64() & rhs.truncated_i64()))
    }

    fn or(&self, rhs: &Self) -> Self {
        Rat(Rational::from(self.truncated_i64() | rhs.truncated_i64()))
    }

    fn xor(&self, rhs: &Self) -> Self {
        Rat(Rational::from(self.truncated_i64() ^ rhs.truncated_i64()))
    }

    fn shl(&self, rhs: &Self) -> Self {
        let n = (rhs.truncated_i64() as u32) & 63;
        Rat(Rational::from((self.truncated_i64() as u64).wrapping_shl(n) as i64))
    }

    fn shr(&self, rhs: &Self) -> Self {
        let n = (rhs.truncated_i64() as u32) & 63;
        Rat(Rational::from(self.truncated_i64().wrapping_shr(n)))
    }

    fn land(&self, rhs: &Self) -> Self {
        Self::from_bool(!self.is_zero() && !rhs.is_zero())
    }

    fn lor(&self, rhs: &Self) -> Self {
        Self::from_bool(!self.is_zero() || !rhs.is_zero())
    }

    fn eq(&self, rhs: &Self) -> bool { self.0 == rhs.0 }
    fn lt(&self, rhs: &Self) -> bool { self.0 <  rhs.0 }
    fn le(&self, rhs: &Self) -> bool { self.0 <= rhs.0 }
    fn gt(&self, rhs: &Self) -> bool { self.0 >  rhs.0 }
    fn ge(&self, rhs: &Self) -> bool { self.0 >= rhs.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_ratio_keeps_fraction() {
        let a = Rat::from_i64(1);
        let b = Rat::from_i64(3);
        let r = a.ratio(&b).unwrap();
        assert_eq!(r.format(10), "1/3");
    }

    #[test]
    fn div_by_zero_is_arith_error() {
        assert_eq!(Rat::from_i64(1).div(&Rat::from_i64(0)).is_err(), true);
    }

    #[test]
    fn negative_exponent_is_exact_reciprocal() {
        let r = Rat::from_i64(2).pow(&Rat::from_i64(-1));
        assert_eq!(r.format(10), "1/2");
    }

    #[test]
    fn bitwise_ops_truncate_to_integer() {
        let a = Rat::from_i64(1).ratio(&Rat::from_i64(3)).unwrap().add(&Rat::from_i64(5));
        // 1/3 + 5 truncates to 5; bitwise and with 3 is 1.
        assert_eq!(a.and(&Rat::from_i64(3)).format(10), "1");
    }

    #[test]
    fn format_matches_integer_case_when_denom_is_one() {
        assert_eq!(Rat::from_i64(255).format(16), "ff");
        assert_eq!(Rat::from_i64(0).format(10), "0");
    }

    #[test]
    fn decrement_subtracts_one_exactly() {
        let r = Rat::from_i64(1).ratio(&Rat::from_i64(3)).unwrap().decrement();
        assert_eq!(r.format(10), "-2/3");
    }

    #[test]
    fn invert_is_exact_reciprocal_and_none_at_zero() {
        assert_eq!(Rat::from_i64(4).invert().unwrap().format(10), "1/4");
        assert_eq!(Rat::from_i64(0).invert(), None);
    }
}
