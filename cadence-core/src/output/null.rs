// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::info;

use crate::errors::Result;
use crate::format::AudioFormat;
use crate::output::{AudioOutput, OutputInfo, OutputOptions, RegisterableOutput};

/// An output that discards all audio written to it.
#[derive(Default)]
pub struct NullOutput {
    format: Option<AudioFormat>,
    bytes_written: u64,
}

impl NullOutput {
    pub fn new() -> Self {
        Default::default()
    }

    /// The number of bytes written since the output was opened.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl AudioOutput for NullOutput {
    fn open(&mut self, format: &AudioFormat) -> Result<()> {
        self.format = Some(*format);
        self.bytes_written = 0;
        Ok(())
    }

    fn play(&mut self, buf: &[u8]) -> Result<usize> {
        self.bytes_written += buf.len() as u64;
        Ok(buf.len())
    }

    fn close(&mut self) {
        if let Some(format) = self.format.take() {
            let frames = self.bytes_written / format.frame_size() as u64;
            info!("null: discarded {} frames of {}", frames, format);
        }
    }
}

impl RegisterableOutput for NullOutput {
    fn try_registry_new(_: &OutputOptions) -> Result<Box<dyn AudioOutput>> {
        Ok(Box::new(NullOutput::new()))
    }

    fn supported_outputs() -> &'static [OutputInfo] {
        &[OutputInfo { name: "null", description: "Discards all audio" }]
    }
}
