// Copyright (c) the Gamma Index Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Streaming count/min/max/mean/mean-of-squares over a sequence of samples.

use crate::vec::Scalar;

/// Running statistics over a stream of samples. Not thread-safe: callers
/// running parallel reductions should keep one `Statistics` per worker
/// and [`Statistics::merge`] the partials at the end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Statistics {
    pub total: u64,
    pub min: Scalar,
    pub max: Scalar,
    pub mean: Scalar,
    pub msqr: Scalar,
}

impl Default for Statistics {
    fn default() -> Self {
        Statistics::new()
    }
}

impl Statistics {
    pub fn new() -> Self {
        Statistics { total: 0, min: Scalar::INFINITY, max: Scalar::NEG_INFINITY, mean: 0.0, msqr: 0.0 }
    }

    /// Folds `x` into the running statistics using a numerically stable
    /// running-weighted update, avoiding the cancellation a naive
    /// sum-of-squares accumulator would suffer at large `total`.
    pub fn add(&mut self, x: Scalar) {
        let orig_len = self.total as Scalar;
        self.total += 1;
        self.min = self.min.min(x);
        self.max = self.max.max(x);
        self.mean = (orig_len * self.mean + x) / self.total as Scalar;
        self.msqr = (orig_len * self.msqr + x * x) / self.total as Scalar;
    }

    /// Combines two independently accumulated `Statistics` into the
    /// statistics of their concatenated sample streams.
    pub fn merge(&self, other: &Statistics) -> Statistics {
        let total = self.total + other.total;
        if total == 0 {
            return Statistics::new();
        }
        let (t_a, t_b) = (self.total as Scalar, other.total as Scalar);
        Statistics {
            total,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            mean: (t_a * self.mean + t_b * other.mean) / total as Scalar,
            msqr: (t_a * self.msqr + t_b * other.msqr) / total as Scalar,
        }
    }
}
