// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry for audio outputs to support lookup and instantiation of outputs by name at runtime.

use std::collections::HashMap;

use crate::errors::{Error, Result};
use crate::output::{AudioOutput, OutputInfo, OutputOptions};

/// To support registration in an output registry, an `AudioOutput` must implement the
/// `RegisterableOutput` trait.
pub trait RegisterableOutput: AudioOutput {
    fn try_registry_new(opts: &OutputOptions) -> Result<Box<dyn AudioOutput>>
    where
        Self: Sized;

    /// Get a list of outputs provided by this implementation.
    fn supported_outputs() -> &'static [OutputInfo];
}

/// `AudioOutput` factory function. Creates a boxed `AudioOutput`.
pub type OutputFactoryFn = fn(&OutputOptions) -> Result<Box<dyn AudioOutput>>;

/// Registration details of an audio output.
pub struct RegisteredOutput {
    /// Output details.
    pub info: OutputInfo,
    /// Factory function to instantiate the output.
    pub factory: OutputFactoryFn,
}

/// An `OutputRegistry` allows the registration of audio outputs, and provides a method to
/// instantiate an output by name.
///
/// The registry is an ordinary value. The composition root of an application builds it, and hands
/// it to whatever needs to look up outputs.
#[derive(Default)]
pub struct OutputRegistry {
    outputs: HashMap<&'static str, RegisteredOutput>,
}

impl OutputRegistry {
    /// Instantiate a new, empty `OutputRegistry`.
    pub fn new() -> Self {
        OutputRegistry { outputs: Default::default() }
    }

    /// Get the registration information of the output named `name`.
    pub fn get(&self, name: &str) -> Option<&RegisteredOutput> {
        self.outputs.get(name)
    }

    /// Registers all outputs provided by `O`.
    ///
    /// If an output with the same name was previously registered, it will be replaced within the
    /// registry.
    pub fn register_all<O: RegisterableOutput>(&mut self) {
        for info in O::supported_outputs() {
            let reg = RegisteredOutput { info: *info, factory: |opts| O::try_registry_new(opts) };

            self.outputs.insert(info.name, reg);
        }
    }

    /// Iterate over all registered outputs in order of name.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredOutput> {
        let mut outputs: Vec<&RegisteredOutput> = self.outputs.values().collect();
        outputs.sort_by_key(|reg| reg.info.name);
        outputs.into_iter()
    }

    /// Instantiate the output named `name` with the provided options.
    pub fn make(&self, name: &str, opts: &OutputOptions) -> Result<Box<dyn AudioOutput>> {
        match self.get(name) {
            Some(reg) => (reg.factory)(opts),
            None => Err(Error::UnknownOutput(name.to_string())),
        }
    }
}
