// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `format` module describes the layout of interleaved PCM audio.

use std::fmt;
use std::str::FromStr;

use crate::errors::{invalid_format_error, Error, Result};

/// The maximum number of channels an `AudioFormat` may describe.
pub const MAX_CHANNELS: u32 = 255;

/// `SampleFormat` describes the data encoding of a single PCM sample.
///
/// All formats are signed, two's complement integers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SampleFormat {
    /// The sample format is not known.
    #[default]
    Undefined,
    /// Signed 8-bit integer.
    S8,
    /// Signed 16-bit integer.
    S16,
    /// Signed 24-bit integer, packed into 3 bytes.
    S24,
    /// Signed 24-bit integer stored in the low bits of a 32-bit integer.
    S24P32,
    /// Signed 32-bit integer.
    S32,
}

impl SampleFormat {
    /// The number of bytes a single sample occupies in memory.
    pub fn bytes_per_sample(&self) -> usize {
        match *self {
            SampleFormat::Undefined => 0,
            SampleFormat::S8 => 1,
            SampleFormat::S16 => 2,
            SampleFormat::S24 => 3,
            SampleFormat::S24P32 => 4,
            SampleFormat::S32 => 4,
        }
    }

    /// The effective number of bits of precision of a sample.
    pub fn bits(&self) -> u32 {
        match *self {
            SampleFormat::Undefined => 0,
            SampleFormat::S8 => 8,
            SampleFormat::S16 => 16,
            SampleFormat::S24 | SampleFormat::S24P32 => 24,
            SampleFormat::S32 => 32,
        }
    }

    pub fn is_defined(&self) -> bool {
        *self != SampleFormat::Undefined
    }

    fn as_str(&self) -> &'static str {
        match *self {
            SampleFormat::Undefined => "?",
            SampleFormat::S8 => "8",
            SampleFormat::S16 => "16",
            SampleFormat::S24 => "24_3",
            SampleFormat::S24P32 => "24",
            SampleFormat::S32 => "32",
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The suffix naming the byte order opposite to the host's.
#[cfg(target_endian = "little")]
const REVERSE_ENDIAN_SUFFIX: &str = "_be";
#[cfg(target_endian = "big")]
const REVERSE_ENDIAN_SUFFIX: &str = "_le";

/// `AudioFormat` describes a stream of interleaved PCM audio: its sample rate, sample format,
/// number of channels, and byte order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct AudioFormat {
    /// The sample rate in Hz.
    pub sample_rate: u32,
    /// The encoding of each sample.
    pub format: SampleFormat,
    /// The number of interleaved channels.
    pub channels: u32,
    /// If true, multi-byte samples are stored in the byte order opposite to the host's.
    pub reverse_endian: bool,
}

impl AudioFormat {
    /// Instantiate an `AudioFormat` in the host's byte order.
    pub fn new(sample_rate: u32, format: SampleFormat, channels: u32) -> Self {
        AudioFormat { sample_rate, format, channels, reverse_endian: false }
    }

    pub fn with_reverse_endian(mut self, reverse_endian: bool) -> Self {
        self.reverse_endian = reverse_endian;
        self
    }

    /// The size of one sample in bytes.
    pub fn sample_size(&self) -> usize {
        self.format.bytes_per_sample()
    }

    /// The size of one frame, a sample for every channel, in bytes.
    pub fn frame_size(&self) -> usize {
        self.sample_size() * self.channels as usize
    }

    /// Returns true if the format may be used for conversion.
    pub fn is_valid(&self) -> bool {
        self.sample_rate > 0
            && self.format.is_defined()
            && self.channels >= 1
            && self.channels <= MAX_CHANNELS
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.reverse_endian { REVERSE_ENDIAN_SUFFIX } else { "" };
        write!(f, "{}:{}{}:{}", self.sample_rate, self.format, suffix, self.channels)
    }
}

impl FromStr for AudioFormat {
    type Err = Error;

    /// Parses a `rate:bits:channels` description, where `bits` is one of `8`, `16`, `24`,
    /// `24_3`, or `32`, optionally followed by an `_le` or `_be` byte order suffix.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(':');

        let (rate, bits, channels) = match (parts.next(), parts.next(), parts.next(), parts.next())
        {
            (Some(rate), Some(bits), Some(channels), None) => (rate, bits, channels),
            _ => return invalid_format_error(format!("expected rate:bits:channels, got \"{}\"", s)),
        };

        let sample_rate = match rate.parse::<u32>() {
            Ok(rate) if rate > 0 => rate,
            _ => return invalid_format_error(format!("invalid sample rate \"{}\"", rate)),
        };

        // Strip an explicit byte order, then compare it against the host's.
        let (bits, reverse_endian) = if let Some(bits) = bits.strip_suffix("_le") {
            (bits, cfg!(target_endian = "big"))
        }
        else if let Some(bits) = bits.strip_suffix("_be") {
            (bits, cfg!(target_endian = "little"))
        }
        else {
            (bits, false)
        };

        let format = match bits {
            "8" => SampleFormat::S8,
            "16" => SampleFormat::S16,
            "24" => SampleFormat::S24P32,
            "24_3" => SampleFormat::S24,
            "32" => SampleFormat::S32,
            _ => return invalid_format_error(format!("invalid sample format \"{}\"", bits)),
        };

        let channels = match channels.parse::<u32>() {
            Ok(count) if count >= 1 && count <= MAX_CHANNELS => count,
            _ => return invalid_format_error(format!("invalid channel count \"{}\"", channels)),
        };

        Ok(AudioFormat { sample_rate, format, channels, reverse_endian })
    }
}
