//! Micro-unit arithmetic
//!
//! Every length handled by the layout engines is a [`Micro`]: a signed integer
//! count of micrometres, 1000 per display millimetre. Conversions from and to
//! display values happen only at the edges (user input, reports); everything in
//! between is exact integer arithmetic.
//!
//! The free functions in this module are the checked operations. They reject
//! non-finite inputs, zero divisors, negative radicands and overflow with a
//! [`UnitError`] instead of silently producing a default.

use crate::error::UnitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Internal units per display millimetre.
pub const MICROS_PER_MM: i64 = 1_000;

/// Internal units per metre.
pub const MICROS_PER_M: i64 = 1_000_000;

/// Square internal units per square metre.
pub const MICROS2_PER_M2: i128 = (MICROS_PER_M as i128) * (MICROS_PER_M as i128);

/// An exact length in micrometres.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Micro(i64);

impl Micro {
    /// Zero length.
    pub const ZERO: Micro = Micro(0);

    /// Wraps a raw micro-unit count.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Whole display millimetres.
    pub const fn from_mm(mm: i64) -> Self {
        Self(mm * MICROS_PER_MM)
    }

    /// Raw micro-unit count.
    pub const fn raw(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Display millimetres, for reporting only.
    pub fn to_mm(self) -> f64 {
        self.0 as f64 / MICROS_PER_MM as f64
    }

    /// `self * n` for an integer factor.
    pub const fn times(self, n: i64) -> Self {
        Self(self.0 * n)
    }

    /// Floor of `self / 2`.
    pub const fn half(self) -> Self {
        Self(self.0.div_euclid(2))
    }
}

impl Add for Micro {
    type Output = Micro;

    fn add(self, rhs: Micro) -> Micro {
        Micro(self.0 + rhs.0)
    }
}

impl AddAssign for Micro {
    fn add_assign(&mut self, rhs: Micro) {
        self.0 += rhs.0;
    }
}

impl Sub for Micro {
    type Output = Micro;

    fn sub(self, rhs: Micro) -> Micro {
        Micro(self.0 - rhs.0)
    }
}

impl SubAssign for Micro {
    fn sub_assign(&mut self, rhs: Micro) {
        self.0 -= rhs.0;
    }
}

impl Neg for Micro {
    type Output = Micro;

    fn neg(self) -> Micro {
        Micro(-self.0)
    }
}

impl fmt::Display for Micro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_length(*self, 3))
    }
}

/// Converts a display value (millimetres) to micro-units, rounding to nearest.
pub fn to_micro(display: f64) -> Result<Micro, UnitError> {
    if !display.is_finite() {
        return Err(UnitError::NonFinite { value: display });
    }
    round_to_micro(display * MICROS_PER_MM as f64)
}

/// Converts micro-units back to display millimetres rounded to `precision`
/// decimal places.
pub fn to_display(value: Micro, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value.to_mm() * factor).round() / factor
}

/// Formats a length for display, e.g. `"12.500 mm"`.
pub fn format_length(value: Micro, precision: usize) -> String {
    format!("{:.*} mm", precision, value.to_mm())
}

pub fn add(a: Micro, b: Micro) -> Result<Micro, UnitError> {
    a.0.checked_add(b.0).map(Micro).ok_or(UnitError::Overflow)
}

pub fn sub(a: Micro, b: Micro) -> Result<Micro, UnitError> {
    a.0.checked_sub(b.0).map(Micro).ok_or(UnitError::Overflow)
}

/// Scales a length by a real factor, rounding to nearest.
pub fn mul(a: Micro, factor: f64) -> Result<Micro, UnitError> {
    if !factor.is_finite() {
        return Err(UnitError::NonFinite { value: factor });
    }
    round_to_micro(a.0 as f64 * factor)
}

/// Divides a length by a real divisor, rounding to nearest.
pub fn div(a: Micro, divisor: f64) -> Result<Micro, UnitError> {
    if !divisor.is_finite() {
        return Err(UnitError::NonFinite { value: divisor });
    }
    if divisor == 0.0 {
        return Err(UnitError::DivisionByZero);
    }
    round_to_micro(a.0 as f64 / divisor)
}

/// Square root taken in the display domain: `sqrt(9 mm) == 3 mm`.
pub fn sqrt(a: Micro) -> Result<Micro, UnitError> {
    if a.is_negative() {
        return Err(UnitError::NegativeSqrt { value: a.0 });
    }
    let radicand = a.0 as i128 * MICROS_PER_MM as i128;
    let root = isqrt(radicand);
    // (r + 0.5)^2 = r^2 + r + 0.25, so round up once the remainder passes r.
    let rounded = if radicand - root * root > root {
        root + 1
    } else {
        root
    };
    i64::try_from(rounded)
        .map(Micro)
        .map_err(|_| UnitError::Overflow)
}

pub fn mul_int(a: Micro, n: i64) -> Result<Micro, UnitError> {
    a.0.checked_mul(n).map(Micro).ok_or(UnitError::Overflow)
}

/// Floor division of a length by an integer count.
pub fn div_int(a: Micro, n: i64) -> Result<Micro, UnitError> {
    if n == 0 {
        return Err(UnitError::DivisionByZero);
    }
    Ok(Micro(floor_div(a.0, n)))
}

/// How many whole `b` fit into `a`, rounded toward negative infinity.
pub fn div_floor(a: Micro, b: Micro) -> Result<i64, UnitError> {
    if b.is_zero() {
        return Err(UnitError::DivisionByZero);
    }
    Ok(floor_div(a.0, b.0))
}

/// Remainder with the sign of the divisor.
pub fn modulo(a: Micro, b: Micro) -> Result<Micro, UnitError> {
    if b.is_zero() {
        return Err(UnitError::DivisionByZero);
    }
    Ok(Micro(a.0 - floor_div(a.0, b.0) * b.0))
}

/// Converts a micro-unit² area to square metres.
pub fn area_to_square_metres(area: i128) -> f64 {
    area as f64 / MICROS2_PER_M2 as f64
}

/// Integer square root of a non-negative value.
pub fn isqrt(n: i128) -> i128 {
    if n < 2 {
        return n.max(0);
    }
    let mut x = (n as f64).sqrt() as i128;
    while x * x > n {
        x -= 1;
    }
    while (x + 1) * (x + 1) <= n {
        x += 1;
    }
    x
}

fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn round_to_micro(value: f64) -> Result<Micro, UnitError> {
    if !value.is_finite() {
        return Err(UnitError::NonFinite { value });
    }
    let rounded = value.round();
    if rounded > i64::MAX as f64 || rounded < i64::MIN as f64 {
        return Err(UnitError::Overflow);
    }
    Ok(Micro(rounded as i64))
}
