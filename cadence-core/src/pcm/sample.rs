// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `sample` module defines the working sample types of the conversion pipeline.

use std::fmt;

/// `Sample` provides a common interface over the in-memory sample types the pipeline stages
/// operate on after the source has been decoded: `i16` for 16-bit destinations, and `i32` for
/// 24-bit and 32-bit destinations.
pub trait Sample: Copy + Default + PartialEq + fmt::Debug + bytemuck::Pod {
    /// Widen the sample to a 64-bit signed integer.
    fn to_wide(self) -> i64;

    /// Narrow a 64-bit signed integer to the sample type, saturating at the bounds of the type.
    fn from_wide(val: i64) -> Self;

    /// Reverse the byte order of the sample.
    fn swap_bytes(self) -> Self;
}

impl Sample for i16 {
    #[inline(always)]
    fn to_wide(self) -> i64 {
        i64::from(self)
    }

    #[inline(always)]
    fn from_wide(val: i64) -> Self {
        val.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
    }

    #[inline(always)]
    fn swap_bytes(self) -> Self {
        i16::swap_bytes(self)
    }
}

impl Sample for i32 {
    #[inline(always)]
    fn to_wide(self) -> i64 {
        i64::from(self)
    }

    #[inline(always)]
    fn from_wide(val: i64) -> Self {
        val.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    #[inline(always)]
    fn swap_bytes(self) -> Self {
        i32::swap_bytes(self)
    }
}
