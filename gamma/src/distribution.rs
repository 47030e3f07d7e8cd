// Copyright (c) the Gamma Index Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! An affine-embedded 3D scalar field with zero-extension out-of-volume
//! handling and trilinear interpolation.

use crate::error::Result;
use crate::idx::{IScalar, Idx4};
use crate::interp::Interp;
use crate::mat::Mat4;
use crate::util::tracing_wrappers::{debug, warn};
use crate::vec::{Scalar, Vec4};

/// A dose distribution embedded in R^3: a dense row-major pixel cube
/// (`x` fastest, then `y`, then `z`) together with the affine transform
/// mapping pixel indices to physical coordinates.
///
/// `data` is borrowed rather than owned: the caller retains the buffer
/// for the lifetime of any `compute` that uses this distribution.
pub struct Distribution<'a> {
    matrix: Mat4,
    inverse: Mat4,
    dims: Idx4,
    len: usize,
    max: Scalar,
    data: &'a [Scalar],
}

impl<'a> Distribution<'a> {
    /// Builds a distribution from an affine pixel-to-physical `matrix`,
    /// `dims = (nx, ny, nz)`, and row-major `data` of at least `nx*ny*nz`
    /// samples. Fails with [`crate::error::Error::SingularMatrix`] if
    /// `matrix` cannot be inverted; the distribution is then unusable.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(data), fields(nx = dims.0, ny = dims.1, nz = dims.2)))]
    pub fn set(matrix: Mat4, dims: (i32, i32, i32), data: &'a [Scalar]) -> Result<Self> {
        let inverse = match matrix.invert() {
            Ok(inverse) => inverse,
            Err(err) => {
                warn!(?matrix, "affine matrix is singular, rejecting distribution");
                return Err(err);
            }
        };
        let dims = Idx4::new(dims.0, dims.1, dims.2, IScalar::MAX);
        let len = dims.i[0] as usize * dims.i[1] as usize * dims.i[2] as usize;
        let max = data[..len].iter().copied().fold(Scalar::NEG_INFINITY, Scalar::max);
        debug!(len, max, "distribution built");
        Ok(Distribution { matrix, inverse, dims, len, max, data })
    }

    #[inline]
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    #[inline]
    pub fn dims(&self) -> Idx4 {
        self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn max(&self) -> Scalar {
        self.max
    }

    #[inline]
    fn linearize(&self, idx: &Idx4) -> usize {
        idx.i[0] as usize + self.dims.i[0] as usize * (idx.i[1] as usize + self.dims.i[1] as usize * idx.i[2] as usize)
    }

    /// Fetches the pixel value at `idx`. Out-of-bounds indices (any lane
    /// outside `[0, dims)`) return `0.0` rather than failing.
    #[inline]
    pub fn at(&self, idx: &Idx4) -> Scalar {
        let lo = Idx4::ZERO;
        if Idx4::hit_test(idx, &lo, &self.dims).any() != 0 {
            0.0
        } else {
            self.data[self.linearize(idx)]
        }
    }

    /// Splits `v` into an integral lattice coordinate (truncated toward
    /// zero, per lane) and the remaining fractional part, mutating `v`
    /// in place to hold the fraction.
    #[inline]
    fn modf(v: &mut Vec4) -> Idx4 {
        let idx = Idx4::new(v.v[0] as IScalar, v.v[1] as IScalar, v.v[2] as IScalar, v.v[3] as IScalar);
        v.v[0] -= idx.i[0] as Scalar;
        v.v[1] -= idx.i[1] as Scalar;
        v.v[2] -= idx.i[2] as Scalar;
        v.v[3] -= idx.i[3] as Scalar;
        idx
    }

    fn corners(&self, origin: &Idx4) -> Interp {
        let xoffs = Idx4::new(1, 0, 0, 0);
        let yoffs = Idx4::new(0, 1, 0, 0);
        let xyoffs = Idx4::new(1, 1, 0, 0);
        let up = *origin + Idx4::new(0, 0, 1, 0);

        Interp::new([
            self.at(origin),
            self.at(&(*origin + xoffs)),
            self.at(&(*origin + yoffs)),
            self.at(&(*origin + xyoffs)),
            self.at(&up),
            self.at(&(up + xoffs)),
            self.at(&(up + yoffs)),
            self.at(&(up + xyoffs)),
        ])
    }

    /// Interpolates the field at physical coordinates `pos`, returning
    /// `0.0` if `pos` falls entirely outside the sampled volume's
    /// lattice cell (zero-extension).
    pub fn interp(&self, pos: &Vec4) -> Scalar {
        let mut offs = self.inverse.mul_vec(pos);
        let lat = Self::modf(&mut offs);
        self.corners(&lat).eval_single(&offs)
    }

    /// Returns the physical position and dose value of the voxel at
    /// linear index `n` (`n = i + nx*(j + ny*k)`).
    #[inline]
    pub fn voxel(&self, n: usize) -> (Vec4, Scalar) {
        let nx = self.dims.i[0] as usize;
        let ny = self.dims.i[1] as usize;
        let i = n % nx;
        let rem = n / nx;
        let j = rem % ny;
        let k = rem / ny;
        let pos = self.matrix.mul_vec(&Vec4::new(i as Scalar, j as Scalar, k as Scalar, 1.0));
        (pos, self.data[n])
    }

    /// Visits every voxel `(i, j, k)` with `k` outermost, `j` middle,
    /// `i` innermost, calling `f(physical_position, dose, linear_index)`.
    /// Voxel visitation order is not meaningful; callers needing a
    /// specific reduction order must not rely on it.
    pub fn for_each<F: FnMut(&Vec4, Scalar, usize)>(&self, mut f: F) {
        for n in 0..self.len {
            let (pos, dose) = self.voxel(n);
            f(&pos, dose, n);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assert_almost_eq;
    use crate::error::Error;
    use test_log::test;

    fn identity_cube(nx: i32, ny: i32, nz: i32, data: &[Scalar]) -> Distribution<'_> {
        Distribution::set(Mat4::IDENTITY, (nx, ny, nz), data).unwrap()
    }

    #[test]
    fn zero_extension_outside_bounds() {
        let data = vec![1.0; 8];
        let dist = identity_cube(2, 2, 2, &data);
        assert_eq!(dist.at(&Idx4::new(-1, 0, 0, 0)), 0.0);
        assert_eq!(dist.at(&Idx4::new(2, 0, 0, 0)), 0.0);
        assert_eq!(dist.at(&Idx4::new(0, 0, 0, 0)), 1.0);
    }

    #[test]
    fn lattice_consistency() {
        let (nx, ny, nz) = (3, 4, 2);
        let mut data = vec![0.0; (nx * ny * nz) as usize];
        for (n, v) in data.iter_mut().enumerate() {
            *v = n as Scalar * 0.5;
        }
        let dist = identity_cube(nx, ny, nz, &data);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let idx = Idx4::new(i, j, k, 0);
                    let pos = dist.matrix().mul_vec(&Vec4::new(i as Scalar, j as Scalar, k as Scalar, 1.0));
                    assert_almost_eq!(dist.interp(&pos), dist.at(&idx), 1e-10);
                }
            }
        }
    }

    #[test]
    fn interp_outside_volume_is_zero() {
        let data = vec![5.0; 8];
        let dist = identity_cube(2, 2, 2, &data);
        assert_almost_eq!(dist.interp(&Vec4::new(-5.0, -5.0, -5.0, 1.0)), 0.0, 1e-12);
    }

    #[test]
    fn max_is_cached() {
        let data = vec![1.0, 7.0, 3.0, -2.0];
        let dist = identity_cube(2, 2, 1, &data);
        assert_eq!(dist.max(), 7.0);
    }

    #[test]
    fn singular_matrix_rejected() {
        let degenerate = Mat4::from_cols(
            Vec4::new(1.0, 2.0, 3.0, 0.0),
            Vec4::new(1.0, 2.0, 3.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        );
        let data = [0.0; 8];
        assert_eq!(Distribution::set(degenerate, (2, 2, 2), &data).unwrap_err(), Error::SingularMatrix);
    }

    #[test]
    fn for_each_visits_every_voxel_once() {
        let (nx, ny, nz) = (2, 3, 2);
        let mut data = vec![0.0; (nx * ny * nz) as usize];
        for (n, v) in data.iter_mut().enumerate() {
            *v = n as Scalar;
        }
        let dist = identity_cube(nx, ny, nz, &data);
        let mut seen = vec![false; data.len()];
        let mut count = 0;
        dist.for_each(|_, dose, n| {
            assert_eq!(dose, data[n]);
            assert!(!seen[n]);
            seen[n] = true;
            count += 1;
        });
        assert_eq!(count, data.len());
        assert!(seen.iter().all(|&s| s));
    }
}
