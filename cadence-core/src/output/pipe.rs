// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use log::{debug, warn};

use crate::errors::Result;
use crate::format::AudioFormat;
use crate::output::{AudioOutput, OutputInfo, OutputOptions, RegisterableOutput};

/// An output that writes raw audio to a file, or to the standard output if no path is given.
pub struct PipeOutput {
    path: Option<PathBuf>,
    writer: Option<Box<dyn Write>>,
    frame_size: usize,
}

impl PipeOutput {
    pub fn new(path: Option<PathBuf>) -> Self {
        PipeOutput { path, writer: None, frame_size: 0 }
    }
}

impl AudioOutput for PipeOutput {
    fn open(&mut self, format: &AudioFormat) -> Result<()> {
        let writer: Box<dyn Write> = match &self.path {
            Some(path) => {
                debug!("pipe: writing {} to {}", format, path.display());
                Box::new(BufWriter::new(File::create(path)?))
            }
            None => {
                debug!("pipe: writing {} to stdout", format);
                Box::new(BufWriter::new(io::stdout()))
            }
        };

        self.writer = Some(writer);
        self.frame_size = format.frame_size();

        Ok(())
    }

    fn play(&mut self, buf: &[u8]) -> Result<usize> {
        let writer = match &mut self.writer {
            Some(writer) => writer,
            None => return Err(io::Error::new(io::ErrorKind::NotConnected, "pipe not open").into()),
        };

        let len = buf.len() - buf.len() % self.frame_size.max(1);
        writer.write_all(&buf[..len])?;

        Ok(len)
    }

    fn drain(&mut self) -> Result<()> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(err) = writer.flush() {
                warn!("pipe: flush failed: {}", err);
            }
        }
    }
}

impl RegisterableOutput for PipeOutput {
    fn try_registry_new(opts: &OutputOptions) -> Result<Box<dyn AudioOutput>> {
        Ok(Box::new(PipeOutput::new(opts.path.clone())))
    }

    fn supported_outputs() -> &'static [OutputInfo] {
        &[OutputInfo { name: "pipe", description: "Writes raw audio to a file or stdout" }]
    }
}
