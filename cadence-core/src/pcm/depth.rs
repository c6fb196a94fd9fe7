// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of source samples to the working sample type of a destination bit depth.
//!
//! Source samples are read from raw bytes in the byte order described by the source format, so
//! decoder buffers need not be aligned. Widening conversions are exact shifts. Narrowing
//! conversions are dithered.
//!
//! | destination | 8       | 16      | 24_3, 24  | 32          |
//! |-------------|---------|---------|-----------|-------------|
//! | 16          | `<< 8`  | copy    | dither    | dither      |
//! | 24          | `<< 16` | `<< 8`  | copy      | dither      |
//! | 32          | `<< 24` | `<< 16` | `<< 8`    | copy        |

use crate::errors::{unsupported_format_error, Result};
use crate::format::{AudioFormat, SampleFormat};
use crate::pcm::buffer::PcmBuffer;
use crate::pcm::dither::Dither;
use crate::pcm::pack::unpack_sample_24;

#[inline(always)]
fn read_i16(bytes: &[u8], reverse_endian: bool) -> i16 {
    let s = i16::from_ne_bytes([bytes[0], bytes[1]]);
    if reverse_endian {
        s.swap_bytes()
    }
    else {
        s
    }
}

#[inline(always)]
fn read_i32(bytes: &[u8], reverse_endian: bool) -> i32 {
    let s = i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if reverse_endian {
        s.swap_bytes()
    }
    else {
        s
    }
}

/// Read every sample of `src` as a 32-bit integer, applying `f` to each, and write the result
/// into `dest`.
#[inline(always)]
fn map_samples<T, F>(dest: &mut [T], src: &[u8], format: &AudioFormat, mut f: F)
where
    F: FnMut(usize, i32) -> T,
{
    let reverse_endian = format.reverse_endian;
    let size = format.sample_size();

    for (i, (d, s)) in dest.iter_mut().zip(src.chunks_exact(size)).enumerate() {
        let sample = match format.format {
            SampleFormat::S8 => i32::from(s[0] as i8),
            SampleFormat::S16 => i32::from(read_i16(s, reverse_endian)),
            SampleFormat::S24 => unpack_sample_24(s, reverse_endian),
            SampleFormat::S24P32 | SampleFormat::S32 => read_i32(s, reverse_endian),
            SampleFormat::Undefined => unreachable!(),
        };

        *d = f(i, sample);
    }
}

/// Returns the number of samples in `src`.
fn num_samples(format: &AudioFormat, src: &[u8]) -> usize {
    debug_assert!(src.len() % format.frame_size() == 0);
    src.len() / format.sample_size()
}

/// Convert samples of any format to 16-bit samples.
pub fn convert_to_16<'a>(
    buf: &'a mut PcmBuffer,
    dither: &mut Dither,
    format: &AudioFormat,
    src: &[u8],
) -> Result<&'a [i16]> {
    if !format.format.is_defined() {
        return unsupported_format_error(format.format, SampleFormat::S16);
    }

    let len = num_samples(format, src);
    let dest = buf.get::<i16>(len)?;

    match format.format {
        SampleFormat::S8 => map_samples(dest, src, format, |_, s| (s << 8) as i16),
        SampleFormat::S16 => map_samples(dest, src, format, |_, s| s as i16),
        SampleFormat::S24 | SampleFormat::S24P32 => {
            let channels = format.channels as usize;
            dither.configure(channels);

            map_samples(dest, src, format, |i, s| {
                dither.quantize(i % channels, i64::from(s), 24, 16) as i16
            })
        }
        SampleFormat::S32 => {
            let channels = format.channels as usize;
            dither.configure(channels);

            map_samples(dest, src, format, |i, s| {
                dither.quantize(i % channels, i64::from(s), 32, 16) as i16
            })
        }
        SampleFormat::Undefined => unreachable!(),
    }

    Ok(dest)
}

/// Convert samples of any format to 24-bit samples held in 32-bit integers.
pub fn convert_to_24<'a>(
    buf: &'a mut PcmBuffer,
    dither: &mut Dither,
    format: &AudioFormat,
    src: &[u8],
) -> Result<&'a [i32]> {
    if !format.format.is_defined() {
        return unsupported_format_error(format.format, SampleFormat::S24P32);
    }

    let len = num_samples(format, src);
    let dest = buf.get::<i32>(len)?;

    match format.format {
        SampleFormat::S8 => map_samples(dest, src, format, |_, s| s << 16),
        SampleFormat::S16 => map_samples(dest, src, format, |_, s| s << 8),
        SampleFormat::S24 | SampleFormat::S24P32 => map_samples(dest, src, format, |_, s| s),
        SampleFormat::S32 => {
            let channels = format.channels as usize;
            dither.configure(channels);

            map_samples(dest, src, format, |i, s| {
                dither.quantize(i % channels, i64::from(s), 32, 24) as i32
            })
        }
        SampleFormat::Undefined => unreachable!(),
    }

    Ok(dest)
}

/// Convert samples of any format to 32-bit samples.
pub fn convert_to_32<'a>(
    buf: &'a mut PcmBuffer,
    format: &AudioFormat,
    src: &[u8],
) -> Result<&'a [i32]> {
    if !format.format.is_defined() {
        return unsupported_format_error(format.format, SampleFormat::S32);
    }

    let len = num_samples(format, src);
    let dest = buf.get::<i32>(len)?;

    match format.format {
        SampleFormat::S8 => map_samples(dest, src, format, |_, s| s << 24),
        SampleFormat::S16 => map_samples(dest, src, format, |_, s| s << 16),
        SampleFormat::S24 | SampleFormat::S24P32 => map_samples(dest, src, format, |_, s| s << 8),
        SampleFormat::S32 => map_samples(dest, src, format, |_, s| s),
        SampleFormat::Undefined => unreachable!(),
    }

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::pcm::dither::DitherType;

    fn bytes_16(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_ne_bytes()).collect()
    }

    fn bytes_32(samples: &[i32]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_ne_bytes()).collect()
    }

    #[test]
    fn verify_widening_is_exact() {
        let mut buf = PcmBuffer::new();
        let mut dither = Dither::new(DitherType::default());

        let af = AudioFormat::new(44100, SampleFormat::S8, 1);
        let src = [0x7fu8, 0x80, 0xff, 0x00];

        assert_eq!(
            convert_to_16(&mut buf, &mut dither, &af, &src).unwrap(),
            &[0x7f00, i16::MIN, -0x100, 0]
        );
        assert_eq!(
            convert_to_24(&mut buf, &mut dither, &af, &src).unwrap(),
            &[0x7f_0000, -0x80_0000, -0x1_0000, 0]
        );
        assert_eq!(
            convert_to_32(&mut buf, &af, &src).unwrap(),
            &[0x7f00_0000, i32::MIN, -0x100_0000, 0]
        );

        let af = AudioFormat::new(44100, SampleFormat::S16, 2);
        let src = bytes_16(&[0x1234, -2]);

        assert_eq!(convert_to_16(&mut buf, &mut dither, &af, &src).unwrap(), &[0x1234, -2]);
        assert_eq!(convert_to_24(&mut buf, &mut dither, &af, &src).unwrap(), &[0x12_3400, -0x200]);
        assert_eq!(convert_to_32(&mut buf, &af, &src).unwrap(), &[0x1234_0000, -0x2_0000]);

        let af = AudioFormat::new(44100, SampleFormat::S24P32, 1);
        let src = bytes_32(&[0x12_3456, -0x80_0000]);

        assert_eq!(
            convert_to_24(&mut buf, &mut dither, &af, &src).unwrap(),
            &[0x12_3456, -0x80_0000]
        );
        assert_eq!(convert_to_32(&mut buf, &af, &src).unwrap(), &[0x1234_5600, i32::MIN]);
    }

    #[test]
    fn verify_packed_24_source() {
        let mut buf = PcmBuffer::new();
        let mut dither = Dither::new(DitherType::default());

        let af = AudioFormat::new(48000, SampleFormat::S24, 1);

        let src: Vec<u8> = if cfg!(target_endian = "little") {
            vec![0x56, 0x34, 0x12, 0x00, 0x00, 0x80]
        }
        else {
            vec![0x12, 0x34, 0x56, 0x80, 0x00, 0x00]
        };

        assert_eq!(
            convert_to_24(&mut buf, &mut dither, &af, &src).unwrap(),
            &[0x12_3456, -0x80_0000]
        );
        assert_eq!(convert_to_32(&mut buf, &af, &src).unwrap(), &[0x1234_5600, i32::MIN]);
    }

    #[test]
    fn verify_reverse_endian_source() {
        let mut buf = PcmBuffer::new();
        let mut dither = Dither::new(DitherType::default());

        let af = AudioFormat::new(44100, SampleFormat::S16, 1).with_reverse_endian(true);
        let src = bytes_16(&[0x1234i16.swap_bytes()]);

        assert_eq!(convert_to_16(&mut buf, &mut dither, &af, &src).unwrap(), &[0x1234]);
    }

    #[test]
    fn verify_narrowing_is_dithered() {
        let mut buf = PcmBuffer::new();
        let mut dither = Dither::new(DitherType::NoiseShaped);

        // A constant 24-bit signal that lies between two 16-bit steps.
        let value = 0x12_3480;
        let af = AudioFormat::new(44100, SampleFormat::S24P32, 1);
        let src = bytes_32(&vec![value; 4096]);

        let out = convert_to_16(&mut buf, &mut dither, &af, &src).unwrap();

        // Without a dither every output would truncate to the same value.
        assert!(out.iter().any(|&s| s != out[0]));

        let mean = out.iter().map(|&s| f64::from(s)).sum::<f64>() / out.len() as f64;
        assert!((mean - value as f64 / 256.0).abs() < 0.1);

        // The shaped noise stays within a few steps of the exact value.
        assert!(out.iter().all(|&s| (i32::from(s) - (value >> 8)).abs() <= 5));
    }

    #[test]
    fn verify_undefined_source_is_error() {
        let mut buf = PcmBuffer::new();
        let mut dither = Dither::new(DitherType::default());

        let af = AudioFormat::new(44100, SampleFormat::Undefined, 2);

        match convert_to_16(&mut buf, &mut dither, &af, &[]) {
            Err(Error::UnsupportedFormat {
                from: Some(SampleFormat::Undefined),
                to: SampleFormat::S16,
            }) => (),
            _ => panic!("expected an unsupported format error"),
        }

        assert!(convert_to_24(&mut buf, &mut dither, &af, &[]).is_err());
        assert!(convert_to_32(&mut buf, &af, &[]).is_err());
    }
}
