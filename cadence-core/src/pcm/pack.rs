// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between 24-bit samples held in 32-bit words and the packed 3-byte representation.

use crate::errors::Result;
use crate::pcm::buffer::PcmBuffer;
use crate::util::bits::sign_extend_leq32_to_i32;

/// Returns true if samples stored with the given byte order flag are laid out most significant
/// byte first.
#[inline(always)]
fn is_big_endian(reverse_endian: bool) -> bool {
    cfg!(target_endian = "big") != reverse_endian
}

/// Pack 24-bit samples held in 32-bit words into 3 bytes per sample.
///
/// The 32-bit words may already have been byte swapped, in which case `reverse_endian` must be
/// true. The packed samples retain the byte order of the words.
pub fn pack_24<'a>(buf: &'a mut PcmBuffer, src: &[i32], reverse_endian: bool) -> Result<&'a [u8]> {
    let dest = buf.get::<u8>(3 * src.len())?;

    // In memory, the most significant byte of each word is padding. Skip it.
    let range = if is_big_endian(reverse_endian) { 1..4 } else { 0..3 };

    for (d, s) in dest.chunks_exact_mut(3).zip(src) {
        d.copy_from_slice(&s.to_ne_bytes()[range.clone()]);
    }

    Ok(dest)
}

/// Unpack a single 3-byte sample to a sign-extended 32-bit integer.
#[inline(always)]
pub fn unpack_sample_24(bytes: &[u8], reverse_endian: bool) -> i32 {
    let raw = if is_big_endian(reverse_endian) {
        (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2])
    }
    else {
        u32::from(bytes[0]) | (u32::from(bytes[1]) << 8) | (u32::from(bytes[2]) << 16)
    };

    sign_extend_leq32_to_i32(raw, 24)
}

/// Unpack packed 3-byte samples into `dest`, one sign-extended 32-bit word per sample.
///
/// Unlike the input of `pack_24`, the unpacked words are always in native byte order.
pub fn unpack_24(dest: &mut [i32], src: &[u8], reverse_endian: bool) {
    debug_assert!(dest.len() * 3 == src.len());

    for (d, s) in dest.iter_mut().zip(src.chunks_exact(3)) {
        *d = unpack_sample_24(s, reverse_endian);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::byteswap::byteswap;

    use rand::{rngs::SmallRng, Rng, SeedableRng};

    #[test]
    fn verify_pack_24_native() {
        let mut buf = PcmBuffer::new();

        let packed = pack_24(&mut buf, &[0x12_3456, -2], false).unwrap();

        if cfg!(target_endian = "little") {
            assert_eq!(packed, &[0x56, 0x34, 0x12, 0xfe, 0xff, 0xff]);
        }
        else {
            assert_eq!(packed, &[0x12, 0x34, 0x56, 0xff, 0xff, 0xfe]);
        }
    }

    #[test]
    fn verify_pack_24_after_byteswap() {
        let mut swap_buf = PcmBuffer::new();
        let mut pack_buf = PcmBuffer::new();

        let swapped = byteswap(&mut swap_buf, &[0x12_3456i32]).unwrap();
        let packed = pack_24(&mut pack_buf, swapped, true).unwrap();

        if cfg!(target_endian = "little") {
            assert_eq!(packed, &[0x12, 0x34, 0x56]);
        }
        else {
            assert_eq!(packed, &[0x56, 0x34, 0x12]);
        }
    }

    #[test]
    fn verify_pack_unpack_round_trip() {
        let mut rng = SmallRng::seed_from_u64(0x24);

        let mut samples: Vec<i32> =
            (0..1024).map(|_| rng.random_range(-0x80_0000..=0x7f_ffff)).collect();
        samples.extend_from_slice(&[0, -1, 1, -0x80_0000, 0x7f_ffff]);

        for &reverse_endian in &[false, true] {
            let mut swap_buf = PcmBuffer::new();
            let mut buf = PcmBuffer::new();

            // Non-native packing consumes words that were byte swapped beforehand.
            let words = if reverse_endian {
                byteswap(&mut swap_buf, &samples).unwrap()
            }
            else {
                &samples[..]
            };

            let packed = pack_24(&mut buf, words, reverse_endian).unwrap();
            assert_eq!(packed.len(), 3 * samples.len());

            let mut unpacked = vec![0; samples.len()];
            unpack_24(&mut unpacked, packed, reverse_endian);

            assert_eq!(unpacked, samples);
        }
    }
}
