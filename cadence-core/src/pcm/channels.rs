// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between channel layouts.
//!
//! Channels are only identified by their index within a frame. The rules, for `S` source and `D`
//! destination channels, are:
//!
//! * `1 -> D`: the mono sample is copied into every destination channel.
//! * `S -> D`, `D < S`: destination channel `j` is the mean of all source channels `i` where
//!   `i % D == j`. Stereo to mono averages both channels, quadraphonic to stereo folds the rear
//!   channels into the front channels.
//! * `S -> D`, `D > S`, `D % S == 0`: destination channel `j` is a copy of source channel `j % S`.
//!
//! All other combinations are unsupported.
//!
//! Means are rounded half up, `floor((sum + n / 2) / n)`. For example, the mean of `100` and `101`
//! is `101`, and the mean of `-1` and `-2` is `-1`.

use crate::errors::{unsupported_channels_error, Result};
use crate::pcm::buffer::PcmBuffer;
use crate::pcm::sample::Sample;

/// The rounded-half-up mean of `n` samples summing to `sum`.
#[inline(always)]
fn rounded_mean(sum: i64, n: i64) -> i64 {
    (sum + n / 2).div_euclid(n)
}

/// Returns true if a conversion from `src_channels` to `dest_channels` is defined.
pub fn is_supported(src_channels: u32, dest_channels: u32) -> bool {
    if src_channels == 0 || dest_channels == 0 {
        false
    }
    else if src_channels == 1 || dest_channels <= src_channels {
        true
    }
    else {
        dest_channels % src_channels == 0
    }
}

/// Convert interleaved frames with `src_channels` channels to frames with `dest_channels`
/// channels. The number of frames is unchanged.
pub fn convert_channels<'a, S: Sample>(
    buf: &'a mut PcmBuffer,
    dest_channels: u32,
    src_channels: u32,
    src: &[S],
) -> Result<&'a [S]> {
    if !is_supported(src_channels, dest_channels) {
        return unsupported_channels_error(src_channels, dest_channels);
    }

    let num_src = src_channels as usize;
    let num_dest = dest_channels as usize;

    debug_assert!(src.len() % num_src == 0);
    let num_frames = src.len() / num_src;

    let dest = buf.get::<S>(num_frames * num_dest)?;

    if num_src == num_dest {
        dest.copy_from_slice(src);
        return Ok(dest);
    }

    let frames = src.chunks_exact(num_src).zip(dest.chunks_exact_mut(num_dest));

    if num_src == 1 {
        for (s, d) in frames {
            d.fill(s[0]);
        }
    }
    else if num_dest < num_src {
        for (s, d) in frames {
            for (j, out) in d.iter_mut().enumerate() {
                let (sum, n) = s
                    .iter()
                    .skip(j)
                    .step_by(num_dest)
                    .fold((0i64, 0i64), |(sum, n), &x| (sum + x.to_wide(), n + 1));

                *out = S::from_wide(rounded_mean(sum, n));
            }
        }
    }
    else {
        for (s, d) in frames {
            for (j, out) in d.iter_mut().enumerate() {
                *out = s[j % num_src];
            }
        }
    }

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn verify_mono_to_stereo() {
        let mut buf = PcmBuffer::new();
        let out = convert_channels(&mut buf, 2, 1, &[100i16, -5]).unwrap();
        assert_eq!(out, &[100, 100, -5, -5]);
    }

    #[test]
    fn verify_mono_to_many() {
        let mut buf = PcmBuffer::new();
        let out = convert_channels(&mut buf, 3, 1, &[7i32]).unwrap();
        assert_eq!(out, &[7, 7, 7]);
    }

    #[test]
    fn verify_stereo_to_mono_rounding() {
        let mut buf = PcmBuffer::new();

        // Even sums are exact.
        assert_eq!(convert_channels(&mut buf, 1, 2, &[100i16, 102]).unwrap(), &[101]);

        // Odd sums round half up, towards positive infinity.
        assert_eq!(convert_channels(&mut buf, 1, 2, &[100i16, 101]).unwrap(), &[101]);
        assert_eq!(convert_channels(&mut buf, 1, 2, &[101i16, 100]).unwrap(), &[101]);
        assert_eq!(convert_channels(&mut buf, 1, 2, &[-1i16, -2]).unwrap(), &[-1]);
        assert_eq!(convert_channels(&mut buf, 1, 2, &[-100i16, -101]).unwrap(), &[-100]);

        // No overflow at the extremes.
        assert_eq!(
            convert_channels(&mut buf, 1, 2, &[i16::MAX, i16::MAX, i16::MIN, i16::MIN]).unwrap(),
            &[i16::MAX, i16::MIN]
        );
        assert_eq!(convert_channels(&mut buf, 1, 2, &[i32::MAX, i32::MAX]).unwrap(), &[i32::MAX]);
    }

    #[test]
    fn verify_fold_down() {
        let mut buf = PcmBuffer::new();

        // 4 -> 2: channels 0 and 2 form the left, 1 and 3 form the right.
        let out = convert_channels(&mut buf, 2, 4, &[10i16, 20, 30, 41]).unwrap();
        assert_eq!(out, &[20, 31]);

        // 6 -> 2: three channels contribute to each side.
        let out = convert_channels(&mut buf, 2, 6, &[3i32, 0, 3, 0, 4, 1]).unwrap();
        assert_eq!(out, &[3, 0]);

        // 3 -> 1.
        let out = convert_channels(&mut buf, 1, 3, &[1i16, 1, 2]).unwrap();
        assert_eq!(out, &[1]);
    }

    #[test]
    fn verify_fan_out() {
        let mut buf = PcmBuffer::new();
        let out = convert_channels(&mut buf, 4, 2, &[1i16, 2, 3, 4]).unwrap();
        assert_eq!(out, &[1, 2, 1, 2, 3, 4, 3, 4]);
    }

    #[test]
    fn verify_unsupported_channels() {
        let mut buf = PcmBuffer::new();

        match convert_channels(&mut buf, 3, 2, &[1i16, 2]) {
            Err(Error::UnsupportedChannels { from: 2, to: 3 }) => (),
            _ => panic!("expected an unsupported channels error"),
        }

        assert!(!is_supported(4, 6));
        assert!(!is_supported(0, 2));
        assert!(is_supported(6, 2));
        assert!(is_supported(1, 8));
    }
}
