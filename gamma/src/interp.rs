// Copyright (c) the Gamma Index Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Trilinear interpolation over an 8-corner lattice cell.

use crate::vec::{Scalar, Vec4};

/// An 8-entry buffer holding the corner values of a unit lattice cell,
/// indexed by `(x, y, z) in {0, 1}^3` in the order
/// `c000, c100, c010, c110, c001, c101, c011, c111`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Interp {
    buf: [Scalar; 8],
}

impl Interp {
    #[inline]
    pub const fn new(corners: [Scalar; 8]) -> Self {
        Interp { buf: corners }
    }

    /// Evaluates the cell at unit offset `t` without mutating `self`, via
    /// nested linear blends: across `z`, then `y`, then `x`.
    #[inline]
    pub fn eval_single(&self, t: &Vec4) -> Scalar {
        let u = [1.0 - t.x(), 1.0 - t.y(), 1.0 - t.z()];
        let buf = &self.buf;

        let mut b = [0.0; 4];
        for i in 0..4 {
            b[i] = buf[i] * u[2] + buf[i + 4] * t.z();
        }

        let b0 = b[0] * u[1] + b[2] * t.y();
        let b1 = b[1] * u[1] + b[3] * t.y();

        b0 * u[0] + b1 * t.x()
    }

    /// Rewrites the buffer into forward-difference coefficients, so that
    /// repeated [`Self::eval`] calls avoid redoing the corner blends.
    /// Destructive: the buffer no longer holds corner values afterwards.
    pub fn prepare(&mut self) {
        let buf = &mut self.buf;

        buf[4] -= buf[0];
        buf[5] -= buf[1];
        buf[6] -= buf[2];
        buf[7] -= buf[3];

        buf[2] -= buf[0];
        buf[3] -= buf[1];
        buf[6] -= buf[4];
        buf[7] -= buf[5];

        buf[1] -= buf[0];
        buf[3] -= buf[2];
        buf[5] -= buf[4];
        buf[7] -= buf[6];
    }

    /// Evaluates a buffer already [`Self::prepare`]d at unit offset `t`.
    #[inline]
    pub fn eval(&self, t: &Vec4) -> Scalar {
        let buf = &self.buf;

        let c0 = buf[0] + buf[4] * t.z();
        let c1 = buf[1] + buf[5] * t.z();
        let c2 = buf[2] + buf[6] * t.z();
        let c3 = buf[3] + buf[7] * t.z();

        let c0 = c0 + c2 * t.y();
        let c1 = c1 + c3 * t.y();

        c0 + c1 * t.x()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assert_almost_eq;
    use test_log::test;

    #[test]
    fn midpoint_of_two_opposite_corners() {
        let mut corners = [0.0; 8];
        corners[7] = 1.0;
        let interp = Interp::new(corners);
        let t = Vec4::new(0.5, 0.5, 0.5, 0.0);
        assert_almost_eq!(interp.eval_single(&t), 0.125, 1e-12);
    }

    #[test]
    fn corners_are_reproduced_exactly() {
        let corners = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let interp = Interp::new(corners);
        let offsets = [
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (0.0, 1.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
            (1.0, 0.0, 1.0),
            (0.0, 1.0, 1.0),
            (1.0, 1.0, 1.0),
        ];
        for (idx, (x, y, z)) in offsets.iter().enumerate() {
            let t = Vec4::new(*x, *y, *z, 0.0);
            assert_almost_eq!(interp.eval_single(&t), corners[idx], 1e-12);
        }
    }

    #[test]
    fn prepare_then_eval_matches_eval_single() {
        arbtest::arbtest(|u| {
            let mut corner = || -> std::result::Result<Scalar, arbtest::arbitrary::Error> {
                Ok(u.int_in_range(-1_000..=1_000)? as Scalar / 10.0)
            };
            let mut corners = [0.0; 8];
            for c in corners.iter_mut() {
                *c = corner()?;
            }
            let mut t_entry = || -> std::result::Result<Scalar, arbtest::arbitrary::Error> {
                Ok(u.int_in_range(0..=1000)? as Scalar / 1000.0)
            };
            let t = Vec4::new(t_entry()?, t_entry()?, t_entry()?, 0.0);

            let single = Interp::new(corners).eval_single(&t);
            let mut prepared = Interp::new(corners);
            prepared.prepare();
            let staged = prepared.eval(&t);

            assert_almost_eq!(single, staged, 1e-9);
            Ok(())
        });
    }
}
