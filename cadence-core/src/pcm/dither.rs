// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `dither` module applies a dither when reducing the bit depth of a sample.
//!
//! Dithering is the process of adding noise to the least significant digits of a sample before
//! down-converting (quantizing) it to a smaller sample type. The purpose of dithering is to
//! decorrelate the quantization error of the down-conversion from the source signal.
//!
//! Dithering is only applied on lossy conversions, i.e. when the destination has fewer effective
//! bits than the source: 32 to 24, 32 to 16, and 24 to 16 bits.

use log::debug;
use smallvec::SmallVec;

use crate::util::clamp::clamp_to_bits;

mod prng {
    #[inline]
    fn split_mix_64(x: &mut u64) -> u64 {
        *x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = *x;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// `Xoshiro128pp` implements the xoshiro128++ pseudo-random number generator.
    ///
    /// It is not cryptographically secure, but for dithering audio it is more than sufficient.
    /// The seed is further randomized via the SplitMix64 algorithm.
    pub struct Xoshiro128pp {
        s: [u32; 4],
    }

    impl Xoshiro128pp {
        pub fn new(mut seed: u64) -> Self {
            let a = split_mix_64(&mut seed);
            let b = split_mix_64(&mut seed);

            Xoshiro128pp {
                s: [
                    (a & 0xffff_ffff) as u32,
                    (a >> 32) as u32,
                    (b & 0xffff_ffff) as u32,
                    (b >> 32) as u32,
                ],
            }
        }

        #[inline]
        pub fn next(&mut self) -> u32 {
            let result = self.s[0].wrapping_add(self.s[3]).rotate_left(7).wrapping_add(self.s[0]);

            let t = self.s[1] << 9;

            self.s[2] ^= self.s[0];
            self.s[3] ^= self.s[1];
            self.s[1] ^= self.s[2];
            self.s[0] ^= self.s[3];

            self.s[2] ^= t;

            self.s[3] = self.s[3].rotate_left(11);

            result
        }
    }
}

const PRNG_SEED: u64 = 0xb2c1_01f4_425b_987e;

/// Enumeration of dither algorithms.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DitherType {
    /// Round with high-passed random noise and feed the quantization error of each channel back
    /// into the following samples of that channel. The error filter has a zero at DC, so a
    /// constant signal is reproduced without bias over time.
    #[default]
    NoiseShaped,
    /// Add triangularly distributed noise spanning one step of the destination format before
    /// rounding. No error is fed back.
    Triangular,
}

/// Error feedback state of one channel.
#[derive(Copy, Clone, Default)]
struct ChannelState {
    error: [i64; 3],
    random: i64,
}

/// Per-stream dither state.
///
/// The state of each channel carries over from one buffer to the next, so a stream should be
/// dithered by a single `Dither` for its whole lifetime.
pub struct Dither {
    dither_type: DitherType,
    prng: prng::Xoshiro128pp,
    channels: SmallVec<[ChannelState; 8]>,
}

impl Dither {
    pub fn new(dither_type: DitherType) -> Self {
        Dither { dither_type, prng: prng::Xoshiro128pp::new(PRNG_SEED), channels: SmallVec::new() }
    }

    /// Discard the error feedback state of all channels.
    pub fn reset(&mut self) {
        self.channels.iter_mut().for_each(|ch| *ch = Default::default());
    }

    /// Prepare the dither for a stream of `num_channels` interleaved channels. If the number of
    /// channels changed, all feedback state is discarded.
    pub fn configure(&mut self, num_channels: usize) {
        if self.channels.len() != num_channels {
            debug!("dither: configured for {} channels", num_channels);

            self.channels.clear();
            self.channels.resize(num_channels, Default::default());
        }
    }

    /// Quantize a sample with `from_bits` effective bits of precision to `to_bits` bits.
    ///
    /// The returned value is in the range of a `to_bits` signed integer. `configure` must have
    /// been called with a channel count greater than `channel`.
    #[inline]
    pub fn quantize(&mut self, channel: usize, sample: i64, from_bits: u32, to_bits: u32) -> i64 {
        debug_assert!(from_bits > to_bits && from_bits <= 32);

        let scale_bits = from_bits - to_bits;
        let round = 1i64 << (scale_bits - 1);
        let mask = (1i64 << scale_bits) - 1;

        match self.dither_type {
            DitherType::NoiseShaped => {
                let max = (1i64 << (from_bits - 1)) - 1;
                let min = -(1i64 << (from_bits - 1));

                let state = &mut self.channels[channel];

                let mut sample = sample + state.error[0] - state.error[1] + state.error[2];

                state.error[2] = state.error[1];
                state.error[1] = state.error[0] / 2;

                // Round, then add the difference of two successive random values. This is
                // high-passed triangular noise.
                let random = i64::from(self.prng.next());
                let mut output = sample + round + (random & mask) - (state.random & mask);
                state.random = random;

                if output > max {
                    output = max;
                    sample = sample.min(max);
                }
                else if output < min {
                    output = min;
                    sample = sample.max(min);
                }

                output &= !mask;

                state.error[0] = sample - output;

                output >> scale_bits
            }
            DitherType::Triangular => {
                let a = i64::from(self.prng.next()) & mask;
                let b = i64::from(self.prng.next()) & mask;

                let output = (sample + round + a - b) >> scale_bits;

                clamp_to_bits(output, to_bits)
            }
        }
    }
}
