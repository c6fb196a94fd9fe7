// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::mem;

use crate::errors::{Error, Result};

/// A reusable scratch region for the output of a single pipeline stage.
///
/// A `PcmBuffer` only ever grows. Once it has reached the size required by the largest buffer
/// passed through a stream, converting further buffers of that size does not allocate.
///
/// The backing storage is a vector of 32-bit words so that typed views of `u8`, `i16`, and `i32`
/// samples are always correctly aligned.
#[derive(Default)]
pub struct PcmBuffer {
    words: Vec<u32>,
}

impl PcmBuffer {
    /// Instantiate an empty `PcmBuffer`. No memory is allocated until the buffer is first used.
    pub fn new() -> Self {
        PcmBuffer { words: Vec::new() }
    }

    /// The capacity of the buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.words.len() * mem::size_of::<u32>()
    }

    /// Grow the buffer, if required, such that it can hold at least `size` bytes.
    pub fn ensure_capacity(&mut self, size: usize) -> Result<()> {
        let num_words = size.div_ceil(mem::size_of::<u32>());

        if num_words > self.words.len() {
            let additional = num_words - self.words.len();

            self.words.try_reserve_exact(additional).map_err(|_| Error::OutOfMemory)?;
            self.words.resize(num_words, 0);
        }

        Ok(())
    }

    /// Get a writable view of `len` samples of type `T`, growing the buffer if necessary.
    ///
    /// The contents of the view are unspecified; the caller is expected to overwrite all of it.
    pub fn get<T: bytemuck::Pod>(&mut self, len: usize) -> Result<&mut [T]> {
        debug_assert!(mem::align_of::<T>() <= mem::align_of::<u32>());

        let size = len.checked_mul(mem::size_of::<T>()).ok_or(Error::OutOfMemory)?;

        self.ensure_capacity(size)?;

        let num_words = size.div_ceil(mem::size_of::<u32>());
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.words[..num_words]);

        Ok(bytemuck::cast_slice_mut(&mut bytes[..size]))
    }
}
