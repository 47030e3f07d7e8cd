// Copyright (c) the Gamma Index Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("affine matrix is singular")]
    SingularMatrix,
    #[error("invalid normalization literal {0:?}, expected GLOBAL, LOCAL or ABSOLUTE")]
    InvalidNormalization(String),
}

pub type Result<T> = std::result::Result<T, Error>;
