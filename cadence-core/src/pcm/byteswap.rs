// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::errors::Result;
use crate::pcm::buffer::PcmBuffer;
use crate::pcm::sample::Sample;

/// Reverse the byte order of every sample in `src`.
pub fn byteswap<'a, S: Sample>(buf: &'a mut PcmBuffer, src: &[S]) -> Result<&'a [S]> {
    let dest = buf.get::<S>(src.len())?;

    for (d, &s) in dest.iter_mut().zip(src) {
        *d = s.swap_bytes();
    }

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::byteswap;
    use crate::pcm::buffer::PcmBuffer;

    #[test]
    fn verify_byteswap_16() {
        let mut buf = PcmBuffer::new();
        let out = byteswap(&mut buf, &[0x0102i16, -2]).unwrap();
        assert_eq!(out, &[0x0201, 0xfeffu16 as i16]);
    }

    #[test]
    fn verify_byteswap_32_twice_is_identity() {
        let src = [0x0102_0304i32, -0x12_3456, 0];

        let mut a = PcmBuffer::new();
        let mut b = PcmBuffer::new();

        let once = byteswap(&mut a, &src).unwrap();
        assert_eq!(once[0], 0x0403_0201);

        let twice = byteswap(&mut b, once).unwrap();
        assert_eq!(twice, &src);
    }
}
