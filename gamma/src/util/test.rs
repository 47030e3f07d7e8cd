// Copyright (c) the Gamma Index Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Shared test-only helpers.

/// Asserts that two `f64`s are within `eps` of each other, printing both
/// values (and their difference) on failure.
#[macro_export]
macro_rules! assert_almost_eq {
    ($left:expr, $right:expr, $eps:expr) => {{
        let left = $left;
        let right = $right;
        let eps = $eps;
        let diff = (left - right).abs();
        assert!(
            diff <= eps,
            "assertion failed: `(left ~= right)`\n  left: `{left:?}`,\n right: `{right:?}`,\n  diff: `{diff:?}` > eps `{eps:?}`"
        );
    }};
}

pub use crate::assert_almost_eq;
