// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `util` module provides a repository of commonly used utility functions sorted into distinct
//! categories.

pub mod bits {
    //! Utilities for bit manipulation.

    /// Sign extends an arbitrary, 32-bit or less, signed two's complement integer stored within an
    /// u32 to a full width i32.
    #[inline(always)]
    pub fn sign_extend_leq32_to_i32(value: u32, width: u32) -> i32 {
        // Move the sign bit of the value into bit 31, then let the arithmetic shift of i32 carry it
        // back down.
        (value.wrapping_shl(32 - width) as i32).wrapping_shr(32 - width)
    }

    /// Returns the greatest common divisor of `a` and `b`.
    pub fn gcd(mut a: u64, mut b: u64) -> u64 {
        while b != 0 {
            let r = a % b;
            a = b;
            b = r;
        }
        a
    }

    #[cfg(test)]
    mod tests {
        use super::{gcd, sign_extend_leq32_to_i32};

        #[test]
        fn verify_sign_extend_leq32_to_i32() {
            assert_eq!(sign_extend_leq32_to_i32(0x7f_ffff, 24), 8_388_607);
            assert_eq!(sign_extend_leq32_to_i32(0x80_0000, 24), -8_388_608);
            assert_eq!(sign_extend_leq32_to_i32(0xff_ffff, 24), -1);
            assert_eq!(sign_extend_leq32_to_i32(0x0, 24), 0);
            assert_eq!(sign_extend_leq32_to_i32(0xffff_ffff, 32), -1);
        }

        #[test]
        fn verify_gcd() {
            assert_eq!(gcd(44100, 48000), 300);
            assert_eq!(gcd(48000, 96000), 48000);
            assert_eq!(gcd(7, 1), 1);
        }
    }
}

pub mod clamp {
    //! Utilities for clamping numeric values to a defined range.

    /// Clamps a 64-bit signed integer to the range of a signed integer of `bits` bits.
    #[inline(always)]
    pub fn clamp_to_bits(val: i64, bits: u32) -> i64 {
        debug_assert!(bits >= 1 && bits <= 32);
        let max = (1i64 << (bits - 1)) - 1;
        let min = -(1i64 << (bits - 1));
        val.clamp(min, max)
    }

}
