use crate::error::ArithmeticError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Rational number used for all cycle positions and durations.
///
/// Always stored reduced (gcd of numerator and denominator is 1) with a
/// positive denominator, so equality and hashing are structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

impl Fraction {
    /// Create a new fraction, reduced.
    ///
    /// Panics if `denominator` is zero; fallible division goes through
    /// [`Fraction::checked_div`].
    pub fn new(numerator: i64, denominator: i64) -> Self {
        assert!(denominator != 0, "fraction denominator cannot be zero");
        let gcd = Self::gcd(numerator.abs(), denominator.abs());
        let (mut numerator, mut denominator) = (numerator / gcd, denominator / gcd);
        if denominator < 0 {
            numerator = -numerator;
            denominator = -denominator;
        }
        Fraction {
            numerator,
            denominator,
        }
    }

    pub fn from_int(n: i64) -> Self {
        Fraction {
            numerator: n,
            denominator: 1,
        }
    }

    /// Convert a decimal literal. Exact for up to six decimal places, which
    /// covers everything the mini-notation grammar admits.
    pub fn from_float(f: f64) -> Self {
        let n = (f * 1_000_000.0).round() as i64;
        Fraction::new(n, 1_000_000)
    }

    pub fn to_float(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn zero() -> Self {
        Fraction::from_int(0)
    }

    pub fn one() -> Self {
        Fraction::from_int(1)
    }

    pub fn numerator(self) -> i64 {
        self.numerator
    }

    pub fn denominator(self) -> i64 {
        self.denominator
    }

    pub fn is_zero(self) -> bool {
        self.numerator == 0
    }

    pub fn is_positive(self) -> bool {
        self.numerator > 0
    }

    /// Round down to the nearest integer, as a fraction. Uses euclidean
    /// division so negative positions floor toward negative infinity.
    pub fn floor(self) -> Self {
        Fraction::from_int(self.floor_int())
    }

    /// The integer cycle this position falls in.
    pub fn floor_int(self) -> i64 {
        self.numerator.div_euclid(self.denominator)
    }

    /// Position within the current cycle, in `[0, 1)`.
    pub fn cycle_pos(self) -> Self {
        self - self.floor()
    }

    /// Division that surfaces a zero divisor as an error instead of panicking.
    pub fn checked_div(self, other: Fraction) -> Result<Fraction, ArithmeticError> {
        if other.numerator == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(self / other)
    }

    fn gcd(mut a: i64, mut b: i64) -> i64 {
        while b != 0 {
            let t = b;
            b = a % b;
            a = t;
        }
        a.max(1)
    }

    /// Least common multiple of two positive denominators. Dividing by
    /// the gcd first keeps the intermediate product small.
    fn lcm(a: i64, b: i64) -> i64 {
        (a / Self::gcd(a, b)) * b
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl From<i64> for Fraction {
    fn from(n: i64) -> Self {
        Fraction::from_int(n)
    }
}

impl From<(i64, i64)> for Fraction {
    fn from((num, den): (i64, i64)) -> Self {
        Fraction::new(num, den)
    }
}

impl Add for Fraction {
    type Output = Self;

    // Add and Sub go through the lcm of the denominators; the raw
    // denominator product overflows i64 under fine subdivisions.
    fn add(self, other: Self) -> Self {
        let lcm = Self::lcm(self.denominator, other.denominator);
        let num1 = self.numerator * (lcm / self.denominator);
        let num2 = other.numerator * (lcm / other.denominator);
        Fraction::new(num1 + num2, lcm)
    }
}

impl Sub for Fraction {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        let lcm = Self::lcm(self.denominator, other.denominator);
        let num1 = self.numerator * (lcm / self.denominator);
        let num2 = other.numerator * (lcm / other.denominator);
        Fraction::new(num1 - num2, lcm)
    }
}

impl Mul for Fraction {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Fraction::new(
            self.numerator * other.numerator,
            self.denominator * other.denominator,
        )
    }
}

impl Div for Fraction {
    type Output = Self;

    /// Panics when `other` is zero; compile-time validation keeps zero
    /// factors out of pattern trees, and fallible callers use `checked_div`.
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, other: Self) -> Self {
        Fraction::new(
            self.numerator * other.denominator,
            self.denominator * other.numerator,
        )
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // Cross-multiply in 128 bits; denominators are always positive.
        let left = self.numerator as i128 * other.denominator as i128;
        let right = other.numerator as i128 * self.denominator as i128;
        left.cmp(&right)
    }
}
