// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `output` module defines the interface of audio outputs, and the writer that feeds converted
//! audio to them.

use std::path::PathBuf;

use log::{debug, error};

use crate::errors::{invalid_format_error, Error, Result};
use crate::format::AudioFormat;
use crate::pcm::{ConvertOptions, PcmConverter};

mod null;
mod pipe;
pub mod registry;

pub use null::NullOutput;
pub use pipe::PipeOutput;
pub use registry::{OutputRegistry, RegisterableOutput};

/// Basic information about an audio output.
#[derive(Copy, Clone, Debug)]
pub struct OutputInfo {
    /// A short name used to select the output. For example, "pipe".
    pub name: &'static str,
    /// A human readable description of the output.
    pub description: &'static str,
}

/// `OutputOptions` is a common set of options that all outputs use.
#[derive(Clone, Debug, Default)]
pub struct OutputOptions {
    /// The destination path of outputs that write to the file system. If `None`, such outputs
    /// write to the standard output.
    pub path: Option<PathBuf>,
}

/// An `AudioOutput` consumes interleaved PCM audio of a fixed format.
pub trait AudioOutput {
    /// Prepare the output to receive audio in `format`.
    fn open(&mut self, format: &AudioFormat) -> Result<()>;

    /// Write audio to the output. Returns the number of bytes consumed, which may be fewer than
    /// the length of `buf`, but is always a whole number of frames.
    fn play(&mut self, buf: &[u8]) -> Result<usize>;

    /// Wait until all audio written so far has been played.
    fn drain(&mut self) -> Result<()> {
        Ok(())
    }

    /// Discard any audio written but not yet played.
    fn cancel(&mut self) {}

    /// Release the output. The output may be opened again afterwards.
    fn close(&mut self);
}

/// Returns a registry with all built-in outputs registered.
pub fn default_outputs() -> OutputRegistry {
    let mut registry = OutputRegistry::new();
    registry.register_all::<NullOutput>();
    registry.register_all::<PipeOutput>();
    registry
}

/// `ConvertingOutput` converts the audio of one stream to the format of an `AudioOutput`, and
/// writes it to that output.
pub struct ConvertingOutput {
    output: Box<dyn AudioOutput>,
    converter: PcmConverter,
    format: AudioFormat,
    /// The source format of the previous buffer.
    src_format: Option<AudioFormat>,
}

impl ConvertingOutput {
    /// Open `output` with the destination `format`.
    pub fn open(
        mut output: Box<dyn AudioOutput>,
        format: AudioFormat,
        opts: ConvertOptions,
    ) -> Result<Self> {
        if !format.is_valid() {
            return invalid_format_error(format!("cannot open an output with format {}", format));
        }

        output.open(&format)?;

        debug!("output: opened with format {}", format);

        Ok(ConvertingOutput {
            output,
            converter: PcmConverter::new(opts),
            format,
            src_format: None,
        })
    }

    /// The format of the audio written to the output.
    pub fn format(&self) -> &AudioFormat {
        &self.format
    }

    /// Convert `buf`, audio in `src_format`, and write all of it to the output.
    ///
    /// A change of source format starts a new stream. The resampler history and dither state of
    /// the previous source do not carry over.
    pub fn play(&mut self, src_format: &AudioFormat, buf: &[u8]) -> Result<()> {
        if self.src_format.is_some_and(|prev| prev != *src_format) {
            debug!("output: source changed to {}, resetting converter", src_format);
            self.converter.reset();
        }

        self.src_format = Some(*src_format);

        let mut converted = match self.converter.convert(src_format, buf, &self.format) {
            Ok(converted) => converted,
            Err(err) => {
                error!("output: cannot convert {} to {}: {}", src_format, self.format, err);
                return Err(err);
            }
        };

        while !converted.is_empty() {
            let written = self.output.play(converted)?;

            if written == 0 {
                return Err(Error::IoError(std::io::ErrorKind::WriteZero.into()));
            }

            converted = &converted[written..];
        }

        Ok(())
    }

    /// Signal that the next buffer does not continue the audio of the previous buffer.
    pub fn reset(&mut self) {
        self.output.cancel();
        self.converter.reset();
    }

    /// Wait for all written audio to be played, and close the output.
    pub fn close(mut self) -> Result<()> {
        let res = self.output.drain();
        self.output.close();
        res
    }
}
