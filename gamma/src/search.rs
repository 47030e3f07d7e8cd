// Copyright (c) the Gamma Index Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Derivative-free compass/pattern-search minimizer over an orthonormal
//! stencil, with a stencil-shrink schedule.

use crate::vec::{Scalar, Vec4};

/// A coordinate and the objective's value there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pair {
    pub vec: Vec4,
    pub val: Scalar,
}

impl Pair {
    #[inline]
    pub fn new(vec: Vec4, val: Scalar) -> Self {
        Pair { vec, val }
    }
}

#[inline]
fn invoke<F: Fn(&Vec4) -> Scalar>(f: &F, pos: Vec4) -> Pair {
    let val = f(&pos);
    Pair::new(pos, val)
}

/// Probes `pos`, replacing `cand` (and returning `true`) iff the probe's
/// value strictly improves on it. Ties never count as improvement: this
/// guarantees every accepted move is real progress and rules out cycling
/// on plateaus.
#[inline]
fn test<F: Fn(&Vec4) -> Scalar>(f: &F, cand: &mut Pair, pos: Vec4) -> bool {
    let probe = invoke(f, pos);
    let improved = probe.val < cand.val;
    if improved {
        *cand = probe;
    }
    improved
}

/// Minimizes `f` by coordinate pattern search over `bases` (assumed
/// unit-length and mutually orthogonal), starting from `init`, with
/// initial stencil radius `step > 0` and shrink budget `shrinks`.
///
/// Each round probes `init.vec +/- step * basis` for every basis; if any
/// probe improves on the centre, the best one is accepted and the
/// stencil radius is kept. Otherwise the radius halves and the shrink
/// budget decrements. The search stops once the budget goes negative.
///
/// `shrinks < 0` on entry, or an empty `bases`, returns `init` unchanged.
pub fn minimize<F: Fn(&Vec4) -> Scalar>(f: F, bases: &[Vec4], init: Pair, step: Scalar, shrinks: i32) -> Pair {
    if shrinks < 0 || bases.is_empty() {
        return init;
    }

    let mut init = init;
    let mut step = step;
    let mut shrinks = shrinks;

    loop {
        let mut cand = init;
        let mut found = false;
        for basis in bases {
            let plus = Vec4::fmas(*basis, step, init.vec);
            found |= test(&f, &mut cand, plus);
            let minus = Vec4::fmss(*basis, step, init.vec);
            found |= test(&f, &mut cand, minus);
        }
        if found {
            init = cand;
        } else {
            step /= 2.0;
            shrinks -= 1;
        }
        if shrinks < 0 {
            break;
        }
    }
    init
}
