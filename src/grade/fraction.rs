//! Integer fractions for weighting bookkeeping.
//!
//! Construction and addition always reduce. The scaling methods
//! do not, so a weighting can be carried at a chosen denominator.
//! Every operation is checked: a result that does not fit an `i64` is an
//! error rather than a wrapped or panicking value.

use std::fmt;

use crate::error::SyntaxError;

use super::error::GradeError;

/// A rational number `numerator / denominator` with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

fn overflow() -> GradeError {
    GradeError::InvalidExpression("weighting is out of range".into())
}

#[expect(
    clippy::integer_division_remainder_used,
    reason = "Euclid's algorithm is defined in terms of the remainder"
)]
fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Fraction {
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };

    pub const ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    /// A reduced fraction.
    ///
    /// # Errors
    /// Returns [`SyntaxError::DivideByZero`] for a zero denominator.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, GradeError> {
        if denominator == 0 {
            return Err(SyntaxError::DivideByZero.into());
        }
        Self {
            numerator,
            denominator,
        }
        .reduced()
    }

    #[must_use]
    pub fn numerator(self) -> i64 {
        self.numerator
    }

    #[must_use]
    pub fn denominator(self) -> i64 {
        self.denominator
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.numerator == 0
    }

    /// Whether the value is exactly one, at any denominator.
    #[must_use]
    pub fn is_one(self) -> bool {
        self.numerator == self.denominator
    }

    /// The same value in lowest terms, with the sign on the numerator.
    ///
    /// # Errors
    /// Returns [`GradeError::InvalidExpression`] when moving the sign does
    /// not fit an `i64`.
    pub fn reduced(self) -> Result<Self, GradeError> {
        let g = gcd(self.numerator.unsigned_abs(), self.denominator.unsigned_abs()).max(1);
        let g = i64::try_from(g).map_err(|_| overflow())?;
        let sign = if self.denominator < 0 { -1 } else { 1 };
        let scale = |v: i64| {
            v.checked_div(g)
                .and_then(|v| v.checked_mul(sign))
                .ok_or_else(overflow)
        };
        Ok(Self {
            numerator: scale(self.numerator)?,
            denominator: scale(self.denominator)?,
        })
    }

    /// Multiply the numerator by `n` without reducing.
    ///
    /// # Errors
    /// Returns [`GradeError::InvalidExpression`] on overflow.
    pub fn scale_up(&mut self, n: i64) -> Result<(), GradeError> {
        self.numerator = self.numerator.checked_mul(n).ok_or_else(overflow)?;
        Ok(())
    }

    /// Multiply the denominator by `n` without reducing.
    ///
    /// # Errors
    /// Returns [`SyntaxError::DivideByZero`] when `n` is zero and
    /// [`GradeError::InvalidExpression`] on overflow.
    pub fn scale_down(&mut self, n: i64) -> Result<(), GradeError> {
        if n == 0 {
            return Err(SyntaxError::DivideByZero.into());
        }
        self.denominator = self.denominator.checked_mul(n).ok_or_else(overflow)?;
        Ok(())
    }

    /// Rewrite at a denominator `n` times larger; the value is unchanged.
    ///
    /// # Errors
    /// As for [`scale_down`](Self::scale_down).
    pub fn expand(&mut self, n: i64) -> Result<(), GradeError> {
        if n == 0 {
            return Err(SyntaxError::DivideByZero.into());
        }
        let numerator = self.numerator.checked_mul(n).ok_or_else(overflow)?;
        let denominator = self.denominator.checked_mul(n).ok_or_else(overflow)?;
        *self = Self {
            numerator,
            denominator,
        };
        Ok(())
    }

    /// Approximate value.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "weightings are small integers"
    )]
    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Reduced sum.
    ///
    /// # Errors
    /// Returns [`GradeError::InvalidExpression`] on overflow.
    pub fn checked_add(self, other: Self) -> Result<Self, GradeError> {
        if self.denominator == other.denominator {
            let numerator = self
                .numerator
                .checked_add(other.numerator)
                .ok_or_else(overflow)?;
            return Self {
                numerator,
                denominator: self.denominator,
            }
            .reduced();
        }
        let numerator = self
            .numerator
            .checked_mul(other.denominator)
            .zip(other.numerator.checked_mul(self.denominator))
            .and_then(|(a, b)| a.checked_add(b))
            .ok_or_else(overflow)?;
        let denominator = self
            .denominator
            .checked_mul(other.denominator)
            .ok_or_else(overflow)?;
        Self {
            numerator,
            denominator,
        }
        .reduced()
    }

    /// Reduced product.
    ///
    /// # Errors
    /// Returns [`GradeError::InvalidExpression`] on overflow.
    pub fn checked_mul(self, other: Self) -> Result<Self, GradeError> {
        let numerator = self
            .numerator
            .checked_mul(other.numerator)
            .ok_or_else(overflow)?;
        let denominator = self
            .denominator
            .checked_mul(other.denominator)
            .ok_or_else(overflow)?;
        Self {
            numerator,
            denominator,
        }
        .reduced()
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap_or_else(|e| panic!("{e}"))
    }

    #[rstest]
    #[case(2, 4, 1, 2)]
    #[case(4, 4, 1, 1)]
    #[case(3, -6, -1, 2)]
    #[case(0, 5, 0, 1)]
    #[case(i64::MIN, 2, -(1 << 62), 1)]
    fn new_reduces(#[case] n: i64, #[case] d: i64, #[case] rn: i64, #[case] rd: i64) {
        let f = frac(n, d);
        assert_eq!((f.numerator(), f.denominator()), (rn, rd));
    }

    #[test]
    fn zero_denominator_rejected() {
        let expected: Result<Fraction, _> = Err(GradeError::Syntax(SyntaxError::DivideByZero));
        assert_eq!(Fraction::new(1, 0), expected);
        assert_eq!(frac(1, 2).scale_down(0), expected.map(|_| ()));
    }

    #[test]
    fn scaling_does_not_reduce() {
        let mut f = Fraction::ONE;
        f.scale_up(2).unwrap_or_else(|e| panic!("{e}"));
        f.scale_down(4).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!((f.numerator(), f.denominator()), (2, 4));
        f.expand(3).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!((f.numerator(), f.denominator()), (6, 12));
        assert_eq!(f.reduced(), Ok(frac(1, 2)));
    }

    #[test]
    fn add_reduces() {
        let sum = |a, b| Fraction::checked_add(a, b).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(sum(frac(1, 4), frac(1, 4)), frac(1, 2));
        assert_eq!(sum(frac(1, 2), frac(1, 3)), frac(5, 6));
        assert!(sum(frac(3, 4), frac(1, 4)).is_one());
        assert!(sum(Fraction::ZERO, Fraction::ZERO).is_zero());
    }

    #[test]
    fn mul_reduces() {
        assert_eq!(frac(2, 3).checked_mul(frac(3, 4)), Ok(frac(1, 2)));
    }

    #[rstest]
    #[case::scale_up(|f: &mut Fraction| f.scale_up(4))]
    #[case::scale_down(|f: &mut Fraction| f.scale_down(i64::MAX))]
    #[case::expand(|f: &mut Fraction| f.expand(i64::MAX))]
    #[case::add(|f: &mut Fraction| f.checked_add(frac(1, 5)).map(|s| *f = s))]
    #[case::mul(|f: &mut Fraction| f.checked_mul(*f).map(|s| *f = s))]
    fn overflow_is_an_error(#[case] op: fn(&mut Fraction) -> Result<(), GradeError>) {
        let mut f = frac(1 << 62, 3);
        assert_eq!(
            op(&mut f),
            Err(GradeError::InvalidExpression("weighting is out of range".into()))
        );
    }

    #[test]
    fn moving_the_sign_can_overflow() {
        let mut f = Fraction::ONE;
        f.scale_up(i64::MIN).unwrap_or_else(|e| panic!("{e}"));
        f.scale_down(-1).unwrap_or_else(|e| panic!("{e}"));
        assert!(f.reduced().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(frac(3, 4).to_string(), "3/4");
    }
}
