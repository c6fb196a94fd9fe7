// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `pcm` module converts interleaved PCM audio from one [`AudioFormat`] to another.
//!
//! A conversion is a fixed chain of stages selected by the destination sample format:
//!
//! 1. The sample format stage converts every source sample to the working sample type of the
//!    destination bit depth (`i16` for 16-bit, `i32` for 24-bit and 32-bit), dithering if bits are
//!    lost.
//! 2. The channel stage remixes each frame if the channel counts differ.
//! 3. The resampling stage changes the sample rate if the rates differ.
//! 4. The byte order stage swaps the bytes of each sample if the destination requests the
//!    non-native byte order.
//! 5. For packed 24-bit destinations only, the packing stage emits 3 bytes per sample.
//!
//! Each stage writes into its own reusable [`PcmBuffer`], owned by the [`PcmConverter`] of the
//! stream.
//!
//! [`AudioFormat`]: crate::format::AudioFormat

mod convert;

pub mod buffer;
pub mod byteswap;
pub mod channels;
pub mod depth;
pub mod dither;
pub mod pack;
pub mod resample;
pub mod sample;

pub use buffer::PcmBuffer;
pub use convert::{ConvertOptions, PcmConverter};
pub use dither::DitherType;
