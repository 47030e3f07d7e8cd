// Copyright (c) the Gamma Index Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Per-voxel gamma objective, threshold gating, normalization selection,
//! and parallel reduction of summary statistics.

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::search::{self, Pair};
use crate::stats::Statistics;
use crate::util::tracing_wrappers::debug;
use crate::vec::{Scalar, Vec4};

/// The below-threshold marker written for voxels excluded from
/// statistics. Always negative; never a valid gamma value.
pub const SENTINEL: Scalar = -1.0;

/// Dose-difference normalization mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalization {
    /// Normalize by the measured distribution's maximum dose.
    Global,
    /// Normalize by each voxel's own measured dose.
    Local,
    /// No normalization (denominator is `1.0`).
    Absolute,
}

impl TryFrom<&str> for Normalization {
    type Error = Error;

    /// Parses the case-sensitive literals `"GLOBAL"`, `"LOCAL"`,
    /// `"ABSOLUTE"`; any other value is rejected.
    fn try_from(value: &str) -> Result<Self> {
        match value {
            "GLOBAL" => Ok(Normalization::Global),
            "LOCAL" => Ok(Normalization::Local),
            "ABSOLUTE" => Ok(Normalization::Absolute),
            other => Err(Error::InvalidNormalization(other.to_string())),
        }
    }
}

/// Gamma-index criteria.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GammaParams {
    /// Dose-difference criterion, as a proportion (e.g. `0.03`).
    pub diff: Scalar,
    /// Distance-to-agreement, in the distributions' physical units.
    pub dta: Scalar,
    /// Low-dose threshold, as a proportion of each distribution's max.
    pub threshold: Scalar,
    pub norm: Normalization,
    /// If set, both distributions are normalized to the reference's
    /// dose range before the dose-difference term is evaluated.
    pub relative: bool,
}

/// Options outside the traditional gamma criteria.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GammaOptions {
    /// Optimization hook: permits (but does not require) terminating a
    /// voxel's minimization early once a passing probe is found, since
    /// the pass/fail classification cannot change afterwards. Not
    /// exploited by this implementation, matching its reference source.
    pub pass_only: bool,
    /// Pattern-search stencil shrink budget.
    pub shrinks: i32,
}

/// Output of a `compute` call.
pub struct GammaResults<'a> {
    pub stats: Statistics,
    pub pass: u64,
    /// Per-voxel gamma (or [`SENTINEL`]), one entry per measured voxel,
    /// if the caller wants the full distribution rather than only the
    /// summary statistics.
    pub dist: Option<&'a mut [Scalar]>,
}

impl<'a> GammaResults<'a> {
    pub fn new(dist: Option<&'a mut [Scalar]>) -> Self {
        GammaResults { stats: Statistics::new(), pass: 0, dist }
    }
}

#[inline]
fn objective_value(ratio: Scalar, mdose: Scalar, rdose: Scalar, disp: &Vec4) -> Scalar {
    let d = ratio * (rdose - mdose);
    d * d + disp.dot(disp)
}

#[allow(clippy::too_many_arguments)]
fn pointwise(
    params: &GammaParams,
    options: &GammaOptions,
    reference: &Distribution<'_>,
    measured: &Distribution<'_>,
    pos: &Vec4,
    mdose: Scalar,
    rthresh: Scalar,
    mthresh: Scalar,
) -> Scalar {
    let rdose = reference.interp(pos);
    if rdose < rthresh && mdose < mthresh {
        return SENTINEL;
    }

    let dnorm = match params.norm {
        Normalization::Global => measured.max(),
        Normalization::Local => mdose,
        Normalization::Absolute => 1.0,
    };
    let ratio = (params.dta / params.diff) / dnorm;

    let mdose_eff = if params.relative { mdose * reference.max() / measured.max() } else { mdose };

    let origin = *pos;
    let objective = move |p: &Vec4| -> Scalar {
        let disp = *p - origin;
        objective_value(ratio, mdose_eff, reference.interp(p), &disp)
    };

    // The sequential source seeds with `origin`'s displacement folded in;
    // the parallel source seeds with a zero displacement and only uses
    // the real displacement in subsequent probes. These agree because
    // the seed's displacement from itself is zero either way.
    let seed_val = objective_value(ratio, mdose_eff, rdose, &Vec4::ZERO);
    let seed = Pair::new(origin, seed_val);

    let bases = [Vec4::new(1.0, 0.0, 0.0, 0.0), Vec4::new(0.0, 1.0, 0.0, 0.0), Vec4::new(0.0, 0.0, 1.0, 0.0)];
    let result = search::minimize(objective, &bases, seed, params.dta, options.shrinks);
    result.val.sqrt() / params.dta
}

/// Computes gamma-index statistics for two dose distributions, writing
/// `results.stats`, `results.pass`, and (if present) `results.dist`.
///
/// `compute` never fails today; it returns a `Result` so a future
/// cooperative-cancellation hook can surface partial-results errors
/// without changing this signature.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(reference, measured, results)))]
pub fn compute(
    params: &GammaParams,
    options: &GammaOptions,
    reference: &Distribution<'_>,
    measured: &Distribution<'_>,
    results: &mut GammaResults<'_>,
) -> Result<()> {
    debug!(voxels = measured.len(), "computing gamma index");

    results.stats = Statistics::new();
    results.pass = 0;

    let rthresh = params.threshold * reference.max();
    let mthresh = params.threshold * measured.max();

    #[cfg(feature = "parallel")]
    compute_parallel(params, options, reference, measured, results, rthresh, mthresh);
    #[cfg(not(feature = "parallel"))]
    compute_sequential(params, options, reference, measured, results, rthresh, mthresh);

    Ok(())
}

#[allow(clippy::too_many_arguments)]
#[cfg(not(feature = "parallel"))]
fn compute_sequential(
    params: &GammaParams,
    options: &GammaOptions,
    reference: &Distribution<'_>,
    measured: &Distribution<'_>,
    results: &mut GammaResults<'_>,
    rthresh: Scalar,
    mthresh: Scalar,
) {
    measured.for_each(|pos, dose, n| {
        let gamma = pointwise(params, options, reference, measured, pos, dose, rthresh, mthresh);
        if gamma != SENTINEL {
            if gamma < 1.0 {
                results.pass += 1;
            }
            results.stats.add(gamma);
        }
        if let Some(dist) = results.dist.as_deref_mut() {
            dist[n] = gamma;
        }
    });
}

#[allow(clippy::too_many_arguments)]
#[cfg(feature = "parallel")]
fn compute_parallel(
    params: &GammaParams,
    options: &GammaOptions,
    reference: &Distribution<'_>,
    measured: &Distribution<'_>,
    results: &mut GammaResults<'_>,
    rthresh: Scalar,
    mthresh: Scalar,
) {
    use rayon::prelude::*;

    let fold_gamma = |acc: (Statistics, u64), gamma: Scalar| -> (Statistics, u64) {
        let (mut stats, mut pass) = acc;
        if gamma != SENTINEL {
            if gamma < 1.0 {
                pass += 1;
            }
            stats.add(gamma);
        }
        (stats, pass)
    };
    let merge = |a: (Statistics, u64), b: (Statistics, u64)| (a.0.merge(&b.0), a.1 + b.1);

    let (stats, pass) = if let Some(dist) = results.dist.as_deref_mut() {
        dist.par_iter_mut()
            .enumerate()
            .fold(
                || (Statistics::new(), 0u64),
                |acc, (n, slot)| {
                    let (pos, dose) = measured.voxel(n);
                    let gamma = pointwise(params, options, reference, measured, &pos, dose, rthresh, mthresh);
                    *slot = gamma;
                    fold_gamma(acc, gamma)
                },
            )
            .reduce(|| (Statistics::new(), 0u64), merge)
    } else {
        (0..measured.len())
            .into_par_iter()
            .fold(
                || (Statistics::new(), 0u64),
                |acc, n| {
                    let (pos, dose) = measured.voxel(n);
                    let gamma = pointwise(params, options, reference, measured, &pos, dose, rthresh, mthresh);
                    fold_gamma(acc, gamma)
                },
            )
            .reduce(|| (Statistics::new(), 0u64), merge)
    };

    results.stats = stats;
    results.pass = pass;
}
