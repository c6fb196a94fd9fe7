// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::trace;

use crate::errors::{unsupported_channels_error, unsupported_rate_error, Error, Result};
use crate::format::{AudioFormat, SampleFormat};
use crate::pcm::buffer::PcmBuffer;
use crate::pcm::dither::{Dither, DitherType};
use crate::pcm::resample::Resampler;
use crate::pcm::sample::Sample;
use crate::pcm::{byteswap, channels, depth, pack};

/// `ConvertOptions` is a common set of options that all PCM conversions use.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConvertOptions {
    /// The dither applied whenever a conversion reduces the bit depth of the audio.
    pub dither: DitherType,
}

/// The scratch buffers of the stages that follow the sample format stage.
#[derive(Default)]
struct StageBuffers {
    channels: PcmBuffer,
    resample: PcmBuffer,
    byteswap: PcmBuffer,
}

/// Apply the channel, resampling, and byte order stages, as required, to the output of the
/// sample format stage.
fn remix_resample_swap<'a, S: Sample>(
    resampler: &mut Resampler,
    stages: &'a mut StageBuffers,
    src_format: &AudioFormat,
    mut buf: &'a [S],
    dest_format: &AudioFormat,
) -> Result<&'a [S]> {
    if src_format.channels != dest_format.channels {
        buf = channels::convert_channels(
            &mut stages.channels,
            dest_format.channels,
            src_format.channels,
            buf,
        )?;
    }

    if src_format.sample_rate != dest_format.sample_rate {
        buf = resampler.resample(
            &mut stages.resample,
            dest_format.channels,
            src_format.sample_rate,
            buf,
            dest_format.sample_rate,
        )?;
    }

    if dest_format.reverse_endian {
        buf = byteswap::byteswap(&mut stages.byteswap, buf)?;
    }

    Ok(buf)
}

/// `PcmConverter` converts the audio of a single stream from a source format to a destination
/// format.
///
/// A `PcmConverter` holds the resampler history and dither state of the stream, as well as one
/// reusable buffer per conversion stage. It must be used for one stream only, from the beginning
/// of the stream to its end, and calls must not overlap. Distinct streams must each use their own
/// `PcmConverter`.
pub struct PcmConverter {
    dither: Dither,
    resampler: Resampler,
    format_buf: PcmBuffer,
    stages: StageBuffers,
    pack_buf: PcmBuffer,
}

impl PcmConverter {
    /// Instantiate a `PcmConverter`. No buffers are allocated until the first conversion.
    pub fn new(opts: ConvertOptions) -> Self {
        PcmConverter {
            dither: Dither::new(opts.dither),
            resampler: Resampler::new(),
            format_buf: PcmBuffer::new(),
            stages: Default::default(),
            pack_buf: PcmBuffer::new(),
        }
    }

    /// Discard the resampler history and dither state. Call this if the next buffer does not
    /// continue the audio of the previous buffer, for example after a seek.
    pub fn reset(&mut self) {
        self.resampler.reset();
        self.dither.reset();
    }

    /// The combined capacity, in bytes, of all scratch buffers.
    pub fn buffer_capacity(&self) -> usize {
        self.format_buf.capacity()
            + self.stages.channels.capacity()
            + self.stages.resample.capacity()
            + self.stages.byteswap.capacity()
            + self.pack_buf.capacity()
    }

    /// Convert `src`, audio in `src_format`, to `dest_format`.
    ///
    /// The returned buffer is owned by the converter and is valid until the next conversion. Its
    /// length is always a whole number of destination frames. The length of `src` must be a whole
    /// number of source frames.
    ///
    /// On error, no audio is returned and the error describes the unsupported combination.
    pub fn convert(
        &mut self,
        src_format: &AudioFormat,
        src: &[u8],
        dest_format: &AudioFormat,
    ) -> Result<&[u8]> {
        // Reject unsupported layouts and rates before any stage touches the stream state.
        if !channels::is_supported(src_format.channels, dest_format.channels) {
            return unsupported_channels_error(src_format.channels, dest_format.channels);
        }

        if src_format.sample_rate != dest_format.sample_rate
            && (src_format.sample_rate == 0 || dest_format.sample_rate == 0)
        {
            return unsupported_rate_error(src_format.sample_rate, dest_format.sample_rate);
        }

        if src_format.format.is_defined() {
            assert!(
                src.len() % src_format.frame_size() == 0,
                "source buffer of {} bytes is not a whole number of {} frames",
                src.len(),
                src_format
            );
        }

        trace!("converting {} bytes from {} to {}", src.len(), src_format, dest_format);

        match dest_format.format {
            SampleFormat::S16 => {
                let buf = self.convert_16(src_format, src, dest_format)?;
                Ok(bytemuck::cast_slice(buf))
            }
            SampleFormat::S24 => self.convert_24_packed(src_format, src, dest_format),
            SampleFormat::S24P32 => {
                let buf = self.convert_24(src_format, src, dest_format)?;
                Ok(bytemuck::cast_slice(buf))
            }
            SampleFormat::S32 => {
                let buf = self.convert_32(src_format, src, dest_format)?;
                Ok(bytemuck::cast_slice(buf))
            }
            SampleFormat::S8 | SampleFormat::Undefined => {
                Err(Error::UnsupportedFormat { from: None, to: dest_format.format })
            }
        }
    }

    fn convert_16<'a>(
        &'a mut self,
        src_format: &AudioFormat,
        src: &[u8],
        dest_format: &AudioFormat,
    ) -> Result<&'a [i16]> {
        debug_assert!(dest_format.format == SampleFormat::S16);

        let buf = depth::convert_to_16(&mut self.format_buf, &mut self.dither, src_format, src)?;

        remix_resample_swap(&mut self.resampler, &mut self.stages, src_format, buf, dest_format)
    }

    fn convert_24<'a>(
        &'a mut self,
        src_format: &AudioFormat,
        src: &[u8],
        dest_format: &AudioFormat,
    ) -> Result<&'a [i32]> {
        debug_assert!(dest_format.format == SampleFormat::S24P32);

        let buf = depth::convert_to_24(&mut self.format_buf, &mut self.dither, src_format, src)?;

        remix_resample_swap(&mut self.resampler, &mut self.stages, src_format, buf, dest_format)
    }

    /// Convert to packed 24-bit samples by way of 24-bit samples in 32-bit words.
    fn convert_24_packed<'a>(
        &'a mut self,
        src_format: &AudioFormat,
        src: &[u8],
        dest_format: &AudioFormat,
    ) -> Result<&'a [u8]> {
        debug_assert!(dest_format.format == SampleFormat::S24);

        // The byte order is applied to the 32-bit words, and retained by packing.
        let padded_format = AudioFormat { format: SampleFormat::S24P32, ..*dest_format };

        let buf = depth::convert_to_24(&mut self.format_buf, &mut self.dither, src_format, src)?;

        let buf = remix_resample_swap(
            &mut self.resampler,
            &mut self.stages,
            src_format,
            buf,
            &padded_format,
        )?;

        pack::pack_24(&mut self.pack_buf, buf, dest_format.reverse_endian)
    }

    fn convert_32<'a>(
        &'a mut self,
        src_format: &AudioFormat,
        src: &[u8],
        dest_format: &AudioFormat,
    ) -> Result<&'a [i32]> {
        debug_assert!(dest_format.format == SampleFormat::S32);

        let buf = depth::convert_to_32(&mut self.format_buf, src_format, src)?;

        remix_resample_swap(&mut self.resampler, &mut self.stages, src_format, buf, dest_format)
    }
}

impl Default for PcmConverter {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s16(af_rate: u32, channels: u32) -> AudioFormat {
        AudioFormat::new(af_rate, SampleFormat::S16, channels)
    }

    fn to_bytes_16(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_ne_bytes()).collect()
    }

    fn from_bytes_16(bytes: &[u8]) -> Vec<i16> {
        bytes.chunks_exact(2).map(|b| i16::from_ne_bytes([b[0], b[1]])).collect()
    }

    #[test]
    fn verify_identity_is_pass_through() {
        let mut conv = PcmConverter::default();

        let src = to_bytes_16(&[1, -1, 300, -300]);
        let out = conv.convert(&s16(44100, 2), &src, &s16(44100, 2)).unwrap();
        assert_eq!(out, &src[..]);

        // Only the sample format stage buffer is used.
        assert_eq!(conv.buffer_capacity(), conv.format_buf.capacity());
    }

    #[test]
    fn verify_mono_to_stereo_and_byteswap() {
        let mut conv = PcmConverter::default();

        let src = to_bytes_16(&[0x0102]);
        let dest = s16(44100, 2).with_reverse_endian(true);

        let out = from_bytes_16(conv.convert(&s16(44100, 1), &src, &dest).unwrap());
        assert_eq!(out, &[0x0201, 0x0201]);
    }

    #[test]
    fn verify_unsupported_destination() {
        let mut conv = PcmConverter::default();

        for &format in &[SampleFormat::Undefined, SampleFormat::S8] {
            let dest = AudioFormat::new(44100, format, 2);

            match conv.convert(&s16(44100, 2), &[0; 4], &dest) {
                Err(Error::UnsupportedFormat { from: None, to }) => assert_eq!(to, format),
                _ => panic!("expected an unsupported format error"),
            }
        }
    }

    #[test]
    fn verify_unsupported_channels() {
        let mut conv = PcmConverter::default();

        let res = conv.convert(&s16(44100, 2), &[0; 4], &s16(44100, 3));
        assert!(matches!(res, Err(Error::UnsupportedChannels { from: 2, to: 3 })));

        let res = conv.convert(&s16(44100, 0), &[], &s16(44100, 2));
        assert!(matches!(res, Err(Error::UnsupportedChannels { from: 0, to: 2 })));
    }

    #[test]
    fn verify_rejected_conversion_keeps_stream_state() {
        let src_format = AudioFormat::new(44100, SampleFormat::S24P32, 2);
        let src: Vec<u8> = (0..256i32).flat_map(|i| (i * 0x1_0101).to_ne_bytes()).collect();

        let mut fresh = PcmConverter::default();
        let expected = fresh.convert(&src_format, &src, &s16(44100, 2)).unwrap().to_vec();

        let mut conv = PcmConverter::default();

        // Neither failure may advance the dither.
        assert!(conv.convert(&src_format, &src, &s16(44100, 3)).is_err());
        assert!(matches!(
            conv.convert(&src_format, &src, &s16(0, 2)),
            Err(Error::UnsupportedRate { from: 44100, to: 0 })
        ));

        assert_eq!(conv.convert(&src_format, &src, &s16(44100, 2)).unwrap(), &expected[..]);
    }

    #[test]
    #[should_panic]
    fn verify_partial_frame_panics() {
        let mut conv = PcmConverter::default();
        let _ = conv.convert(&s16(44100, 2), &[0; 6], &s16(44100, 2));
    }
}
