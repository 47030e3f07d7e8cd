// Copyright (c) the Gamma Index Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Column-major 4x4 matrix algebra, including an in-place Gauss-Jordan
//! inverse with partial pivoting.

use crate::error::{Error, Result};
use crate::util::tracing_wrappers::trace;
use crate::vec::{Scalar, Vec4};

/// A 4x4 matrix stored as four column vectors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };

    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Mat4 { cols: [c0, c1, c2, c3] }
    }

    /// Composes an affine pixel-to-physical transform from direction
    /// cosines, spacing and origin, per the external interface contract:
    /// `col[k] = direction_column[k] * spacing[k]` for `k in 0..3`, with a
    /// zero homogeneous component, and `col[3] = (origin, 1)`.
    pub fn from_affine(direction: [Vec4; 3], spacing: [Scalar; 3], origin: Vec4) -> Self {
        let mut cols = [Vec4::ZERO; 4];
        for k in 0..3 {
            let mut col = direction[k] * spacing[k];
            col.v[3] = 0.0;
            cols[k] = col;
        }
        cols[3] = Vec4::new(origin.v[0], origin.v[1], origin.v[2], 1.0);
        Mat4 { cols }
    }

    /// `M . v`, via three FMA accumulations over the first three columns
    /// plus the translation column.
    #[inline]
    pub fn mul_vec(&self, v: &Vec4) -> Vec4 {
        let mut res = self.cols[3] * v.v[3];
        res = Vec4::fma(self.cols[0], Vec4::splat(v.v[0]), res);
        res = Vec4::fma(self.cols[1], Vec4::splat(v.v[1]), res);
        res = Vec4::fma(self.cols[2], Vec4::splat(v.v[2]), res);
        res
    }

    fn swap_cols(&mut self, i: usize, j: usize) {
        self.cols.swap(i, j);
    }

    /// Solves `self . x = rhs` for `x`, overwriting `rhs` with the
    /// solution, via partial-pivot (column, by row-`k` absolute value)
    /// Gauss-Jordan elimination. Returns [`Error::SingularMatrix`] if no
    /// pivot can be found for some column; `rhs`'s contents are then
    /// unspecified.
    fn ldivide(&self, rhs: &mut Mat4) -> Result<()> {
        let mut lhs = *self;
        for k in 0..4 {
            let mut pivot = k;
            let mut max_abs = lhs.cols[k].v[k].abs();
            for i in (k + 1)..4 {
                let candidate = lhs.cols[i].v[k].abs();
                if candidate > max_abs {
                    pivot = i;
                    max_abs = candidate;
                }
            }
            if max_abs == 0.0 {
                trace!(column = k, "no nonzero pivot in column, matrix is singular");
                return Err(Error::SingularMatrix);
            }
            lhs.swap_cols(k, pivot);
            rhs.swap_cols(k, pivot);

            let norm = lhs.cols[k].v[k];
            lhs.cols[k] = lhs.cols[k] / norm;
            rhs.cols[k] = rhs.cols[k] / norm;

            for i in 0..4 {
                if i == k {
                    continue;
                }
                let mult = lhs.cols[i].v[k];
                lhs.cols[i] = Vec4::fmss(lhs.cols[k], mult, lhs.cols[i]);
                rhs.cols[i] = Vec4::fmss(rhs.cols[k], mult, rhs.cols[i]);
            }
        }
        Ok(())
    }

    /// Inverts the matrix in place via [`Self::ldivide`] against the
    /// identity, returning [`Error::SingularMatrix`] on failure.
    pub fn invert(&self) -> Result<Mat4> {
        let mut inverse = Mat4::IDENTITY;
        self.ldivide(&mut inverse)?;
        Ok(inverse)
    }
}
