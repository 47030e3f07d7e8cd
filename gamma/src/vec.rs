// Copyright (c) the Gamma Index Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Fixed 4-wide vector of [`Scalar`]s, aligned to invite auto-vectorization.

use std::ops::{Add, Div, Mul, Sub};

/// A single scalar component of a [`Vec4`].
pub type Scalar = f64;

/// A 4-wide vector, aligned to `4 * size_of::<Scalar>()` so that compilers
/// targeting wide SIMD registers have a fighting chance of vectorizing
/// operations over it.
#[repr(align(32))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec4 {
    pub v: [Scalar; 4],
}

impl Vec4 {
    pub const ZERO: Vec4 = Vec4 { v: [0.0; 4] };

    #[inline]
    pub const fn new(x: Scalar, y: Scalar, z: Scalar, w: Scalar) -> Self {
        Vec4 { v: [x, y, z, w] }
    }

    #[inline]
    pub const fn splat(x: Scalar) -> Self {
        Vec4 { v: [x, x, x, x] }
    }

    #[inline]
    pub fn x(&self) -> Scalar {
        self.v[0]
    }

    #[inline]
    pub fn y(&self) -> Scalar {
        self.v[1]
    }

    #[inline]
    pub fn z(&self) -> Scalar {
        self.v[2]
    }

    #[inline]
    pub fn w(&self) -> Scalar {
        self.v[3]
    }

    /// `c + a * b`, vector-vector form.
    #[inline]
    pub fn fma(a: Vec4, b: Vec4, c: Vec4) -> Vec4 {
        Vec4::new(
            c.v[0] + a.v[0] * b.v[0],
            c.v[1] + a.v[1] * b.v[1],
            c.v[2] + a.v[2] * b.v[2],
            c.v[3] + a.v[3] * b.v[3],
        )
    }

    /// `c - a * b`, vector-vector form.
    #[inline]
    pub fn fms(a: Vec4, b: Vec4, c: Vec4) -> Vec4 {
        Vec4::new(
            c.v[0] - a.v[0] * b.v[0],
            c.v[1] - a.v[1] * b.v[1],
            c.v[2] - a.v[2] * b.v[2],
            c.v[3] - a.v[3] * b.v[3],
        )
    }

    /// `c + a * b`, vector-scalar form.
    #[inline]
    pub fn fmas(a: Vec4, b: Scalar, c: Vec4) -> Vec4 {
        Vec4::new(
            c.v[0] + a.v[0] * b,
            c.v[1] + a.v[1] * b,
            c.v[2] + a.v[2] * b,
            c.v[3] + a.v[3] * b,
        )
    }

    /// `c - a * b`, vector-scalar form.
    #[inline]
    pub fn fmss(a: Vec4, b: Scalar, c: Vec4) -> Vec4 {
        Vec4::new(
            c.v[0] - a.v[0] * b,
            c.v[1] - a.v[1] * b,
            c.v[2] - a.v[2] * b,
            c.v[3] - a.v[3] * b,
        )
    }

    #[inline]
    pub fn dot(&self, other: &Vec4) -> Scalar {
        self.v[0] * other.v[0] + self.v[1] * other.v[1] + self.v[2] * other.v[2] + self.v[3] * other.v[3]
    }

    /// 3-component cross product; the 4th component of the result is zero.
    #[inline]
    pub fn cross(&self, other: &Vec4) -> Vec4 {
        Vec4::new(
            self.v[1] * other.v[2] - self.v[2] * other.v[1],
            self.v[2] * other.v[0] - self.v[0] * other.v[2],
            self.v[0] * other.v[1] - self.v[1] * other.v[0],
            0.0,
        )
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Vec4 {
            type Output = Vec4;

            #[inline]
            fn $method(self, rhs: Vec4) -> Vec4 {
                Vec4::new(
                    self.v[0] $op rhs.v[0],
                    self.v[1] $op rhs.v[1],
                    self.v[2] $op rhs.v[2],
                    self.v[3] $op rhs.v[3],
                )
            }
        }

        impl $trait<Scalar> for Vec4 {
            type Output = Vec4;

            #[inline]
            fn $method(self, rhs: Scalar) -> Vec4 {
                Vec4::new(
                    self.v[0] $op rhs,
                    self.v[1] $op rhs,
                    self.v[2] $op rhs,
                    self.v[3] $op rhs,
                )
            }
        }
    };
}

impl_binop!(Add, add, +);
impl_binop!(Sub, sub, -);
impl_binop!(Mul, mul, *);
impl_binop!(Div, div, /);

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn dot_identity() {
        let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let b = Vec4::new(1.0, 0.0, 0.0, 0.0);
        assert_eq!(a.dot(&b), 1.0);
    }

    #[test]
    fn cross_axis() {
        let x = Vec4::new(1.0, 0.0, 0.0, 0.0);
        let y = Vec4::new(0.0, 1.0, 0.0, 0.0);
        let z = x.cross(&y);
        assert_eq!(z, Vec4::new(0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn fma_matches_naive() {
        arbtest::arbtest(|u| {
            let mut v4 = || -> Result<Vec4, arbtest::arbitrary::Error> {
                Ok(Vec4::new(
                    u.int_in_range(-1_000_000..=1_000_000)? as Scalar / 1000.0,
                    u.int_in_range(-1_000_000..=1_000_000)? as Scalar / 1000.0,
                    u.int_in_range(-1_000_000..=1_000_000)? as Scalar / 1000.0,
                    u.int_in_range(-1_000_000..=1_000_000)? as Scalar / 1000.0,
                ))
            };
            let a = v4()?;
            let b = v4()?;
            let c = v4()?;
            let got = Vec4::fma(a, b, c);
            let want = c + a * b;
            assert_eq!(got, want);
            Ok(())
        });
    }

    #[test]
    fn binops_elementwise() {
        let a = Vec4::new(4.0, 9.0, 16.0, 25.0);
        let b = Vec4::new(2.0, 3.0, 4.0, 5.0);
        assert_eq!(a / b, Vec4::new(2.0, 3.0, 4.0, 5.0));
        assert_eq!(a - b, Vec4::new(2.0, 6.0, 12.0, 20.0));
        assert_eq!(b * 2.0, Vec4::new(4.0, 6.0, 8.0, 10.0));
    }
}
