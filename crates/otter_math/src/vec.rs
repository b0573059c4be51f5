//! Three-component `f32` vector.
//!
//! [`Vec3`] is plain data that can live inside component storage. The
//! arithmetic is done by [`glam`]; this type adds the checked operations.
//! Division and normalization return [`MathError`] instead of producing
//! infinities or NaN, and there is no `/` operator.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::error::MathError;

/// A 3D vector of `f32`, laid out as `x, y, z` with no padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vec3 {
    /// X component (index 0).
    pub x: f32,
    /// Y component (index 1).
    pub y: f32,
    /// Z component (index 2).
    pub z: f32,
}

impl Vec3 {
    /// All zeros.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// All ones.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// Unit X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit Y axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Create a vector with all components set to `v`.
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Element-wise sum.
    #[must_use]
    pub fn add(self, rhs: Self) -> Self {
        (self.to_glam() + rhs.to_glam()).into()
    }

    /// Element-wise difference.
    #[must_use]
    pub fn subtract(self, rhs: Self) -> Self {
        (self.to_glam() - rhs.to_glam()).into()
    }

    /// Element-wise product.
    #[must_use]
    pub fn multiply(self, rhs: Self) -> Self {
        (self.to_glam() * rhs.to_glam()).into()
    }

    /// Element-wise quotient.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DivideByZero`] naming the first axis of `rhs`
    /// that is exactly zero.
    pub fn divide(self, rhs: Self) -> Result<Self, MathError> {
        if let Some(axis) = rhs.to_array().iter().position(|&c| c == 0.0) {
            return Err(MathError::DivideByZero { axis });
        }
        Ok((self.to_glam() / rhs.to_glam()).into())
    }

    /// Divide every component by a scalar.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DivideByZero`] (axis 0) when `rhs` is zero.
    pub fn divide_scalar(self, rhs: f32) -> Result<Self, MathError> {
        self.divide(Self::splat(rhs))
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, rhs: Self) -> f32 {
        self.to_glam().dot(rhs.to_glam())
    }

    /// Right-handed cross product.
    #[must_use]
    pub fn cross(self, rhs: Self) -> Self {
        self.to_glam().cross(rhs.to_glam()).into()
    }

    /// Squared Euclidean length.
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.to_glam().length_squared()
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f32 {
        self.to_glam().length()
    }

    /// Scale to unit length.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::ZeroLength`] when the length is zero or not finite.
    pub fn normalize(self) -> Result<Self, MathError> {
        self.to_glam()
            .try_normalize()
            .map(Self::from)
            .ok_or(MathError::ZeroLength)
    }

    /// Read the component at `index` (0 = x, 1 = y, 2 = z).
    ///
    /// # Errors
    ///
    /// Returns [`MathError::IndexOutOfRange`] for any other index.
    pub fn get(&self, index: usize) -> Result<f32, MathError> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            2 => Ok(self.z),
            _ => Err(MathError::IndexOutOfRange(index)),
        }
    }

    /// Mutable access to the component at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::IndexOutOfRange`] for indices above 2.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut f32, MathError> {
        match index {
            0 => Ok(&mut self.x),
            1 => Ok(&mut self.y),
            2 => Ok(&mut self.z),
            _ => Err(MathError::IndexOutOfRange(index)),
        }
    }

    /// Overwrite the component at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::IndexOutOfRange`] for indices above 2.
    pub fn set(&mut self, index: usize, value: f32) -> Result<(), MathError> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// The equivalent [`glam::Vec3`].
    #[must_use]
    pub const fn to_glam(self) -> glam::Vec3 {
        glam::Vec3::new(self.x, self.y, self.z)
    }

    /// Components as an array.
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Vec3::add(self, rhs)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.subtract(rhs)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for Vec3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(rhs)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        (self.to_glam() * rhs).into()
    }
}

impl MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        (-self.to_glam()).into()
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for glam::Vec3 {
    fn from(v: Vec3) -> Self {
        v.to_glam()
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = EPSILON);
        assert_abs_diff_eq!(a.y, b.y, epsilon = EPSILON);
        assert_abs_diff_eq!(a.z, b.z, epsilon = EPSILON);
    }

    #[test]
    fn test_elementwise_arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, -5.0, 0.5);
        assert_eq!(a + b, Vec3::new(5.0, -3.0, 3.5));
        assert_eq!(a - b, Vec3::new(-3.0, 7.0, 2.5));
        assert_eq!(a * b, Vec3::new(4.0, -10.0, 1.5));
        assert_eq!(a.divide(b).unwrap(), Vec3::new(0.25, -0.4, 6.0));
    }

    #[test]
    fn test_add_then_subtract_is_identity() {
        let samples = [
            (Vec3::new(1.5, -2.25, 8.0), Vec3::new(0.1, 0.2, 0.3)),
            (Vec3::new(-1000.0, 3.0, 0.0), Vec3::new(999.5, -3.0, 1e-3)),
            (Vec3::ZERO, Vec3::ONE),
        ];
        for (a, b) in samples {
            assert_vec_eq(a.add(b).subtract(b), a);
            assert_vec_eq((a - b) + b, a);
        }
    }

    #[test]
    fn test_operations_do_not_mutate_operands() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(3.0, 2.0, 1.0);
        let _ = a + b;
        let _ = a.cross(b);
        assert_eq!(a, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b, Vec3::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_divide_by_zero_reports_axis() {
        let a = Vec3::ONE;
        assert_eq!(
            a.divide(Vec3::new(1.0, 0.0, 0.0)),
            Err(MathError::DivideByZero { axis: 1 })
        );
        assert_eq!(
            a.divide_scalar(0.0),
            Err(MathError::DivideByZero { axis: 0 })
        );
    }

    #[test]
    fn test_normalize_has_unit_length() {
        for v in [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-0.001, 0.002, 0.0005),
            Vec3::new(120.0, -7.0, 33.0),
        ] {
            let n = v.normalize().unwrap();
            assert_abs_diff_eq!(n.length(), 1.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_normalize_zero_fails() {
        assert_eq!(Vec3::ZERO.normalize(), Err(MathError::ZeroLength));
    }

    #[test]
    fn test_normalize_non_finite_fails() {
        let v = Vec3::new(f32::INFINITY, 0.0, 0.0);
        assert_eq!(v.normalize(), Err(MathError::ZeroLength));
        assert_eq!(Vec3::splat(f32::NAN).normalize(), Err(MathError::ZeroLength));
    }

    #[test]
    fn test_products_match_glam() {
        let a = Vec3::new(1.5, -2.0, 0.25);
        let b = Vec3::new(-3.0, 4.0, 8.0);
        assert_eq!(a.cross(b).to_glam(), a.to_glam().cross(b.to_glam()));
        assert_eq!(a.dot(b), a.to_glam().dot(b.to_glam()));
        assert_eq!(a.length(), a.to_glam().length());
    }

    #[test]
    fn test_cross_is_orthogonal() {
        let pairs = [
            (Vec3::X, Vec3::Y),
            (Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.5, 2.0)),
            (Vec3::new(0.3, -0.7, 0.1), Vec3::new(5.0, 5.0, -1.0)),
        ];
        for (a, b) in pairs {
            let c = a.cross(b);
            assert_abs_diff_eq!(c.dot(a), 0.0, epsilon = 1e-4);
            assert_abs_diff_eq!(c.dot(b), 0.0, epsilon = 1e-4);
        }
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_indexed_access() {
        let mut v = Vec3::new(7.0, 8.0, 9.0);
        assert_eq!(v.get(0), Ok(7.0));
        assert_eq!(v.get(1), Ok(8.0));
        assert_eq!(v.get(2), Ok(9.0));
        v.set(1, -1.0).unwrap();
        assert_eq!(v.y, -1.0);
    }

    #[test]
    fn test_index_out_of_range() {
        let mut v = Vec3::ZERO;
        assert_eq!(v.get(3), Err(MathError::IndexOutOfRange(3)));
        assert_eq!(v.set(3, 1.0), Err(MathError::IndexOutOfRange(3)));
        assert!(v.get_mut(usize::MAX).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Vec3::new(1.0, -2.5, 0.0).to_string(), "(1, -2.5, 0)");
    }

    #[test]
    fn test_glam_conversion() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let g: glam::Vec3 = v.into();
        assert_eq!(g, glam::Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Vec3::from(g), v);
    }

    #[test]
    fn test_byte_layout() {
        assert_eq!(std::mem::size_of::<Vec3>(), 12);
        let v = Vec3::new(1.0, 2.0, 3.0);
        let bytes = bytemuck::bytes_of(&v);
        assert_eq!(&bytes[4..8], &2.0f32.to_ne_bytes());
    }
}
