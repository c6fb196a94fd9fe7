// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A streaming sample rate converter.
//!
//! The resampler linearly interpolates between adjacent input frames. The position of each output
//! frame within the input stream is tracked exactly as a rational number, and the last input frame
//! of every call is kept as history for the next call. Therefore, converting a stream in a single
//! call, or split at arbitrary frame boundaries across many calls, yields identical output.
//!
//! Output frame `k` of a stream is located at input position `k * src_rate / dest_rate`. An output
//! frame is only produced once the input frame following its position has been received, so the
//! output lags the input by up to one frame.

use log::debug;
use smallvec::SmallVec;

use crate::errors::{unsupported_rate_error, Result};
use crate::pcm::buffer::PcmBuffer;
use crate::pcm::sample::Sample;
use crate::util::bits::gcd;

/// Per-stream resampler state.
#[derive(Default)]
pub struct Resampler {
    /// The source rate, reduced by the greatest common divisor of both rates.
    src_step: u64,
    /// The destination rate, reduced by the greatest common divisor of both rates.
    dest_step: u64,
    src_rate: u32,
    dest_rate: u32,
    num_channels: usize,
    /// The last input frame of the previous call.
    history: SmallVec<[i64; 8]>,
    /// Position of the next output frame relative to the first frame of the next call's input
    /// (including history), in units of `1 / dest_step` input frames.
    phase: u64,
}

impl Resampler {
    pub fn new() -> Self {
        Default::default()
    }

    /// Discard the history and phase, such that the next call begins a new stream.
    pub fn reset(&mut self) {
        self.history.clear();
        self.phase = 0;
    }

    fn configure(&mut self, num_channels: usize, src_rate: u32, dest_rate: u32) -> Result<()> {
        if src_rate == 0 || dest_rate == 0 {
            return unsupported_rate_error(src_rate, dest_rate);
        }

        if self.src_rate != src_rate
            || self.dest_rate != dest_rate
            || self.num_channels != num_channels
        {
            debug!(
                "resampler: configured for {} Hz to {} Hz with {} channels",
                src_rate, dest_rate, num_channels
            );

            let div = gcd(u64::from(src_rate), u64::from(dest_rate));

            self.src_step = u64::from(src_rate) / div;
            self.dest_step = u64::from(dest_rate) / div;
            self.src_rate = src_rate;
            self.dest_rate = dest_rate;
            self.num_channels = num_channels;
            self.reset();
        }

        Ok(())
    }

    /// Resample interleaved frames of `num_channels` channels from `src_rate` to `dest_rate`.
    pub fn resample<'a, S: Sample>(
        &mut self,
        buf: &'a mut PcmBuffer,
        num_channels: u32,
        src_rate: u32,
        src: &[S],
        dest_rate: u32,
    ) -> Result<&'a [S]> {
        let num_channels = num_channels as usize;

        self.configure(num_channels, src_rate, dest_rate)?;

        debug_assert!(num_channels > 0 && src.len() % num_channels == 0);

        let num_history = if self.history.is_empty() { 0 } else { 1 };
        let num_frames = num_history + src.len() / num_channels;

        if num_frames == 0 {
            return buf.get::<S>(0).map(|dest| &*dest);
        }

        // An output frame at position `p` needs input frames `floor(p)` and `floor(p) + 1`, so
        // only positions before the last input frame can be interpolated in this call.
        let limit = (num_frames as u64 - 1) * self.dest_step;

        let num_out = if self.phase < limit {
            ((limit - 1 - self.phase) / self.src_step + 1) as usize
        }
        else {
            0
        };

        let dest = buf.get::<S>(num_out * num_channels)?;

        let history = &self.history;

        // Get sample `ch` of input frame `i`, where frame 0 may be the history frame.
        let sample = |i: usize, ch: usize| -> i64 {
            if i < num_history {
                history[ch]
            }
            else {
                src[(i - num_history) * num_channels + ch].to_wide()
            }
        };

        let dest_step = i128::from(self.dest_step);
        let mut pos = self.phase;

        for frame in dest.chunks_exact_mut(num_channels) {
            let i = (pos / self.dest_step) as usize;
            let frac = i128::from(pos % self.dest_step);

            for (ch, out) in frame.iter_mut().enumerate() {
                let a = sample(i, ch);
                let b = sample(i + 1, ch);

                // Truncates towards zero. The interpolant always lies between a and b.
                let delta = (i128::from(b - a) * frac / dest_step) as i64;

                *out = S::from_wide(a + delta);
            }

            pos += self.src_step;
        }

        // Rebase the phase onto the last input frame, which becomes the history for the next call.
        self.phase = self.phase + num_out as u64 * self.src_step - limit;

        let last: SmallVec<[i64; 8]> =
            (0..num_channels).map(|ch| sample(num_frames - 1, ch)).collect();
        self.history = last;

        Ok(dest)
    }
}
