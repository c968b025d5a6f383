//! Fraction arithmetic: gcd/lcm, common denominators, reduced sums.
//!
//! All functions here are pure and total under the input ranges the lesson
//! layer enforces (denominators and factors in [1, 20], numerators in
//! [0, denominator]). The fallible constructors exist so the module is also
//! safe to use standalone, outside the clamped lesson boundary.
//!
//! Degenerate cases follow the usual conventions rather than erroring:
//! - `gcd(0, x) == x`
//! - `lcm` with a zero input returns 0 (no division by zero)

use std::fmt;

/// Errors for the fallible fraction constructors.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ArithError {
    #[error("denominator must be >= 1, got {0}")]
    InvalidDenominator(u32),

    #[error("numerator {numerator} exceeds denominator {denominator}")]
    NumeratorOutOfRange { numerator: u32, denominator: u32 },
}

/// Greatest common divisor (Euclid). `gcd(0, x) == x` by convention.
#[inline]
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple.
///
/// Returns 0 when either input is 0; this mirrors the degenerate-case
/// behavior the lesson's tests depend on. Callers that want strict
/// validation go through [`common_denominator`] instead.
#[inline]
pub fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// A proper fraction: `numerator / denominator` with `numerator <= denominator`.
///
/// Immutable once constructed; every interaction rebuilds its fractions from
/// the current inputs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fraction {
    numerator: u32,
    denominator: u32,
}

impl Fraction {
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, ArithError> {
        if denominator == 0 {
            return Err(ArithError::InvalidDenominator(denominator));
        }
        if numerator > denominator {
            return Err(ArithError::NumeratorOutOfRange {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Construct from values already range-checked by the caller
    /// (the clamped lesson boundary).
    pub(crate) fn from_clamped(numerator: u32, denominator: u32) -> Self {
        debug_assert!(denominator >= 1);
        debug_assert!(numerator <= denominator);
        Self {
            numerator,
            denominator,
        }
    }

    #[inline]
    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    #[inline]
    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// The equivalent fraction `(n*factor) / (d*factor)`.
    ///
    /// `factor` must be >= 1 (factors are clamped to [1, 20] upstream).
    #[inline]
    pub fn scaled(&self, factor: u32) -> Self {
        debug_assert!(factor >= 1);
        Self {
            numerator: self.numerator * factor,
            denominator: self.denominator * factor,
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// The target denominator for adding two fractions, with the per-side
/// scaling factors that reach it.
///
/// Invariant: `lcm == d1 * factor1 == d2 * factor2`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CommonDenominator {
    pub lcm: u32,
    pub factor1: u32,
    pub factor2: u32,
}

impl CommonDenominator {
    /// Compute for denominators already known to be >= 1 (the clamped
    /// lesson boundary). [`common_denominator`] is the checked form.
    pub(crate) fn of_clamped(d1: u32, d2: u32) -> Self {
        debug_assert!(d1 >= 1 && d2 >= 1);
        let l = lcm(u64::from(d1), u64::from(d2)) as u32;
        Self {
            lcm: l,
            factor1: l / d1,
            factor2: l / d2,
        }
    }
}

/// Compute the least common denominator of `d1` and `d2` and the exact
/// per-side factors (`lcm / d1`, `lcm / d2`).
pub fn common_denominator(d1: u32, d2: u32) -> Result<CommonDenominator, ArithError> {
    if d1 == 0 {
        return Err(ArithError::InvalidDenominator(d1));
    }
    if d2 == 0 {
        return Err(ArithError::InvalidDenominator(d2));
    }
    Ok(CommonDenominator::of_clamped(d1, d2))
}

/// Add two numerators over a shared denominator and reduce the result.
///
/// `common` must be >= 1. The zero-sum case reduces to `0/1` via the
/// `gcd(0, x) == x` convention.
pub fn reduced_sum(n1: u32, n2: u32, common: u32) -> (u32, u32) {
    debug_assert!(common >= 1);

    let sum = n1 + n2;
    let g = gcd(u64::from(sum), u64::from(common)) as u32;
    (sum / g, common / g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_zero_convention() {
        assert_eq!(gcd(0, 18), 18);
        assert_eq!(gcd(18, 0), 18);
        assert_eq!(gcd(12, 18), 6);
    }

    #[test]
    fn lcm_zero_input_yields_zero() {
        assert_eq!(lcm(0, 9), 0);
        assert_eq!(lcm(6, 0), 0);
    }

    #[test]
    fn lcm_divides_both_and_is_minimal() {
        for d1 in 1..=20u64 {
            for d2 in 1..=20u64 {
                let l = lcm(d1, d2);
                assert_eq!(l % d1, 0, "lcm({d1},{d2}) not divisible by {d1}");
                assert_eq!(l % d2, 0, "lcm({d1},{d2}) not divisible by {d2}");
                // No smaller positive common multiple exists.
                for candidate in 1..l {
                    assert!(
                        candidate % d1 != 0 || candidate % d2 != 0,
                        "lcm({d1},{d2}) = {l} is not minimal, {candidate} also works"
                    );
                }
            }
        }
    }

    #[test]
    fn common_denominator_six_ninths() {
        let c = common_denominator(6, 9).unwrap();
        assert_eq!(c.lcm, 18);
        assert_eq!(c.factor1, 3);
        assert_eq!(c.factor2, 2);
        assert_eq!(c.lcm, 6 * c.factor1);
        assert_eq!(c.lcm, 9 * c.factor2);
    }

    #[test]
    fn common_denominator_rejects_zero() {
        assert_eq!(
            common_denominator(0, 9),
            Err(ArithError::InvalidDenominator(0))
        );
        assert_eq!(
            common_denominator(6, 0),
            Err(ArithError::InvalidDenominator(0))
        );
    }

    #[test]
    fn reduced_sum_coprime_stays_put() {
        assert_eq!(reduced_sum(3, 4, 18), (7, 18));
    }

    #[test]
    fn reduced_sum_reduces() {
        assert_eq!(reduced_sum(6, 6, 18), (2, 3));
    }

    #[test]
    fn reduced_sum_zero_numerators() {
        assert_eq!(reduced_sum(0, 0, 18), (0, 1));
    }

    #[test]
    fn fraction_validation() {
        assert!(Fraction::new(3, 6).is_ok());
        assert_eq!(
            Fraction::new(3, 0),
            Err(ArithError::InvalidDenominator(0))
        );
        assert_eq!(
            Fraction::new(7, 6),
            Err(ArithError::NumeratorOutOfRange {
                numerator: 7,
                denominator: 6
            })
        );
    }

    #[test]
    fn fraction_scaling_and_display() {
        let f = Fraction::new(3, 6).unwrap();
        let s = f.scaled(3);
        assert_eq!(s.numerator(), 9);
        assert_eq!(s.denominator(), 18);
        assert_eq!(s.to_string(), "9/18");
    }
}
