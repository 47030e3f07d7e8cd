// Copyright (c) the Gamma Index Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod tracing_wrappers;

#[cfg(test)]
pub mod test;
