//! Complex arithmetic primitives.
//!
//! All values are pairs of 32-bit floats, matching the bytecode's wire
//! format. The operations the evaluator needs are defined here:
//!
//! | Operation | Method |
//! |-----------|-------------------------------------------------|
//! | `+ - * /` | `std::ops` impls                                |
//! | `z ^ w`   | [`Complex::pow`] via polar-form conversion      |
//! | `e^z`     | [`Complex::exp`]                                |
//! | `sin z`   | [`Complex::sin`] = (e^{iz} − e^{−iz}) / 2i      |
//! | `cos z`   | [`Complex::cos`] = (e^{iz} + e^{−iz}) / 2       |
//!
//! Division carries no zero guard: dividing by a zero-magnitude value
//! produces IEEE non-finite components, which callers may inspect with
//! [`Complex::is_finite`].

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Scalar component type. The bytecode stores 32-bit floats, so all
/// arithmetic happens at `f32` precision.
pub type Scalar = f32;

/// A complex number in rectangular form.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex {
    /// Real part.
    pub re: Scalar,
    /// Imaginary part.
    pub im: Scalar,
}

impl Complex {
    /// Additive identity.
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// The imaginary unit.
    pub const I: Self = Self::new(0.0, 1.0);
    /// Euler's number, as a pure real.
    pub const E: Self = Self::new(std::f32::consts::E, 0.0);
    /// π, as a pure real.
    pub const PI: Self = Self::new(std::f32::consts::PI, 0.0);

    /// Create a complex number from its rectangular components.
    #[must_use]
    pub const fn new(re: Scalar, im: Scalar) -> Self {
        Self { re, im }
    }

    /// Squared magnitude, `re² + im²`.
    #[inline]
    #[must_use]
    pub fn magnitude_squared(self) -> Scalar {
        self.re * self.re + self.im * self.im
    }

    /// Magnitude (absolute value).
    #[inline]
    #[must_use]
    pub fn magnitude(self) -> Scalar {
        self.magnitude_squared().sqrt()
    }

    /// Argument (angle of the polar form), in radians.
    #[inline]
    #[must_use]
    pub fn arg(self) -> Scalar {
        self.im.atan2(self.re)
    }

    /// Whether both components are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// The complex exponential `e^z = e^re · (cos im + i sin im)`.
    #[must_use]
    pub fn exp(self) -> Self {
        let scale = self.re.exp();
        Self::new(scale * self.im.cos(), scale * self.im.sin())
    }

    /// `self` raised to a complex exponent, via polar-form conversion.
    ///
    /// With `self = (r, θ)` in polar form and exponent `w`, the result has
    /// magnitude `r^w.re · e^(−w.im·θ)` and angle `w.re·θ + w.im·ln r`.
    /// A zero base yields non-finite components through `ln 0`.
    #[must_use]
    pub fn pow(self, exponent: Self) -> Self {
        let r = self.magnitude();
        let theta = self.arg();

        let magnitude = r.powf(exponent.re) * (-exponent.im * theta).exp();
        let angle = exponent.re * theta + exponent.im * r.ln();

        Self::new(magnitude * angle.cos(), magnitude * angle.sin())
    }

    /// Complex sine, `(e^{iz} − e^{−iz}) / 2i`.
    #[must_use]
    pub fn sin(self) -> Self {
        let numerator = (Self::I * self).exp() - (Self::I * -self).exp();
        numerator / Self::new(0.0, 2.0)
    }

    /// Complex cosine, `(e^{iz} + e^{−iz}) / 2`.
    #[must_use]
    pub fn cos(self) -> Self {
        let numerator = (Self::I * self).exp() + (Self::I * -self).exp();
        numerator / Self::new(2.0, 0.0)
    }

    /// Complex tangent, `sin z / cos z`.
    #[must_use]
    pub fn tan(self) -> Self {
        self.sin() / self.cos()
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for Complex {
    type Output = Self;

    /// Complex quotient. The divisor's magnitude-squared is the
    /// denominator; a zero divisor yields non-finite components.
    fn div(self, rhs: Self) -> Self {
        let denominator = rhs.magnitude_squared();
        Self::new(
            (self.re * rhs.re + self.im * rhs.im) / denominator,
            (self.im * rhs.re - self.re * rhs.im) / denominator,
        )
    }
}

impl Neg for Complex {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl fmt::Display for Complex {
    /// The `(re + imi)` form the interactive driver prints.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} + {}i)", self.re, self.im)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
