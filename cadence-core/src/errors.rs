// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error;
use std::fmt;
use std::io;
use std::result;

use crate::format::SampleFormat;

/// `Error` provides an enumeration of all possible errors reported by Cadence.
#[derive(Debug)]
pub enum Error {
    /// An IO error occured while writing to an output, or while reading source audio.
    IoError(std::io::Error),
    /// No sample format conversion is implemented between the two sample formats. If the source
    /// format is `None`, the destination format itself is not a supported conversion target.
    UnsupportedFormat { from: Option<SampleFormat>, to: SampleFormat },
    /// No channel conversion is defined between the two channel counts.
    UnsupportedChannels { from: u32, to: u32 },
    /// The pair of sample rates cannot be resampled.
    UnsupportedRate { from: u32, to: u32 },
    /// A scratch buffer could not be grown.
    OutOfMemory,
    /// An audio format description was malformed or invalid.
    InvalidFormat(String),
    /// No audio output is registered under the given name.
    UnknownOutput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => err.fmt(f),
            Error::UnsupportedFormat { from: Some(from), to } => {
                write!(f, "conversion from {} to {} bit is not implemented", from, to)
            }
            Error::UnsupportedFormat { from: None, to } => {
                write!(f, "PCM conversion to {} is not implemented", to)
            }
            Error::UnsupportedChannels { from, to } => {
                write!(f, "conversion from {} to {} channels is not implemented", from, to)
            }
            Error::UnsupportedRate { from, to } => {
                write!(f, "cannot resample from {} Hz to {} Hz", from, to)
            }
            Error::OutOfMemory => write!(f, "out of memory"),
            Error::InvalidFormat(ref desc) => {
                write!(f, "invalid audio format: {}", desc)
            }
            Error::UnknownOutput(ref name) => {
                write!(f, "no audio output named \"{}\"", name)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create an unsupported sample format conversion error.
pub fn unsupported_format_error<T>(from: SampleFormat, to: SampleFormat) -> Result<T> {
    Err(Error::UnsupportedFormat { from: Some(from), to })
}

/// Convenience function to create an unsupported channel conversion error.
pub fn unsupported_channels_error<T>(from: u32, to: u32) -> Result<T> {
    Err(Error::UnsupportedChannels { from, to })
}

/// Convenience function to create an unsupported sample rate conversion error.
pub fn unsupported_rate_error<T>(from: u32, to: u32) -> Result<T> {
    Err(Error::UnsupportedRate { from, to })
}

/// Convenience function to create an invalid format error.
pub fn invalid_format_error<T>(desc: impl Into<String>) -> Result<T> {
    Err(Error::InvalidFormat(desc.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_error_messages_name_both_values() {
        let err =
            Error::UnsupportedFormat { from: Some(SampleFormat::Undefined), to: SampleFormat::S16 };
        assert_eq!(err.to_string(), "conversion from ? to 16 bit is not implemented");

        let err = Error::UnsupportedFormat { from: None, to: SampleFormat::S8 };
        assert_eq!(err.to_string(), "PCM conversion to 8 is not implemented");

        let err = Error::UnsupportedChannels { from: 2, to: 3 };
        assert_eq!(err.to_string(), "conversion from 2 to 3 channels is not implemented");

        let err = Error::UnsupportedRate { from: 0, to: 48000 };
        assert_eq!(err.to_string(), "cannot resample from 0 Hz to 48000 Hz");
    }
}
