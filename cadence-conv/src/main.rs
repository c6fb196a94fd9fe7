// Cadence
// Copyright (c) 2026 The Project Cadence Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::PathBuf;

use cadence_core::errors::{invalid_format_error, Result};
use cadence_core::format::AudioFormat;
use cadence_core::output::{default_outputs, ConvertingOutput, OutputOptions, OutputRegistry};
use cadence_core::pcm::{ConvertOptions, DitherType};

use clap::{Arg, ArgMatches};
use log::{error, info, warn};

const DEFAULT_CHUNK_FRAMES: usize = 4096;

fn main() {
    pretty_env_logger::init();

    let args = clap::Command::new("Cadence Convert")
        .version("1.0")
        .author("The Project Cadence Developers")
        .about("Convert raw PCM audio between formats")
        .arg(
            Arg::new("from")
                .long("from")
                .short('f')
                .value_name("FORMAT")
                .help("The format of the input, as rate:bits:channels")
                .required_unless_present("list-outputs"),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .short('t')
                .value_name("FORMAT")
                .help("The format of the output, as rate:bits:channels")
                .required_unless_present("list-outputs"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("NAME")
                .default_value("pipe")
                .help("The audio output to use"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .value_name("PATH")
                .help("The file written by the pipe output, instead of standard output"),
        )
        .arg(
            Arg::new("chunk")
                .long("chunk")
                .value_name("FRAMES")
                .help("The number of frames converted at a time"),
        )
        .arg(
            Arg::new("dither")
                .long("dither")
                .value_name("TYPE")
                .possible_values(["shaped", "triangular"])
                .help("The dither applied when reducing the bit depth"),
        )
        .arg(
            Arg::new("list-outputs")
                .long("list-outputs")
                .help("List the available audio outputs")
                .conflicts_with_all(&["from", "to", "INPUT"]),
        )
        .arg(
            Arg::new("INPUT")
                .help("The input file path, or - to use standard input")
                .required_unless_present("list-outputs")
                .index(1),
        )
        .get_matches();

    // The registry of outputs is built once, here, and passed to whatever needs it.
    let registry = default_outputs();

    // For any error, return an exit code -1. Otherwise return the exit code provided.
    let code = match run(&args, &registry) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err.to_string().to_lowercase());
            -1
        }
    };

    std::process::exit(code)
}

fn run(args: &ArgMatches, registry: &OutputRegistry) -> Result<i32> {
    if args.is_present("list-outputs") {
        for reg in registry.iter() {
            println!("{:<8} {}", reg.info.name, reg.info.description);
        }
        return Ok(0);
    }

    let src_format = parse_format(args, "from")?;
    let dest_format = parse_format(args, "to")?;

    let chunk_frames = match args.value_of("chunk") {
        Some(value) => match value.parse::<usize>() {
            Ok(frames) if frames > 0 => frames,
            _ => return invalid_format_error(format!("invalid chunk size \"{}\"", value)),
        },
        None => DEFAULT_CHUNK_FRAMES,
    };

    let dither = match args.value_of("dither") {
        Some("triangular") => DitherType::Triangular,
        _ => DitherType::NoiseShaped,
    };

    let output_opts = OutputOptions { path: args.value_of("out").map(PathBuf::from) };

    let output = registry.make(args.value_of("output").unwrap_or("pipe"), &output_opts)?;

    // If the path string is '-' then read from standard input.
    let mut reader: Box<dyn Read> = match args.value_of("INPUT") {
        Some("-") | None => Box::new(io::stdin()),
        Some(path) => Box::new(File::open(path)?),
    };

    info!("converting {} to {}", src_format, dest_format);

    let mut output = ConvertingOutput::open(output, dest_format, ConvertOptions { dither })?;

    let frame_size = src_format.frame_size();
    let mut buf = vec![0u8; chunk_frames * frame_size];
    let mut num_frames = 0u64;

    loop {
        let len = read_chunk(&mut reader, &mut buf)?;

        let whole = len - len % frame_size;

        if whole < len {
            warn!("dropping a partial frame of {} bytes at the end of the input", len - whole);
        }

        if whole > 0 {
            output.play(&src_format, &buf[..whole])?;
            num_frames += (whole / frame_size) as u64;
        }

        if len < buf.len() {
            break;
        }
    }

    output.close()?;

    let held_back = held_back_frames(&src_format, &dest_format, num_frames);

    if held_back > 0 {
        warn!("dropping {} final frame(s) held back by the resampler", held_back);
    }

    info!("converted {} frames", num_frames);

    Ok(0)
}

/// The number of input frames that never reach the output once the input ends. The resampler only
/// emits audio up to its newest input frame, and nothing flushes that frame.
fn held_back_frames(src_format: &AudioFormat, dest_format: &AudioFormat, num_frames: u64) -> u64 {
    if num_frames > 0 && src_format.sample_rate != dest_format.sample_rate {
        1
    }
    else {
        0
    }
}

fn parse_format(args: &ArgMatches, name: &str) -> Result<AudioFormat> {
    match args.value_of(name) {
        Some(value) => value.parse(),
        None => invalid_format_error(format!("no --{} format given", name)),
    }
}

/// Read from `reader` until `buf` is full or the end of the stream is reached. Returns the number
/// of bytes read.
fn read_chunk(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut len = 0;

    while len < buf.len() {
        match reader.read(&mut buf[len..]) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }

    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::format::SampleFormat;

    #[test]
    fn verify_held_back_frames() {
        let cd = AudioFormat::new(44100, SampleFormat::S16, 2);
        let dat = AudioFormat::new(48000, SampleFormat::S16, 2);

        assert_eq!(held_back_frames(&cd, &dat, 1000), 1);
        assert_eq!(held_back_frames(&cd, &dat, 0), 0);
        assert_eq!(held_back_frames(&cd, &cd, 1000), 0);
    }

    #[test]
    fn verify_read_chunk_fills_buffer() {
        let data: Vec<u8> = (0..10).collect();

        let mut reader: &[u8] = &data;
        let mut buf = [0u8; 4];

        assert_eq!(read_chunk(&mut reader, &mut buf).unwrap(), 4);
        assert_eq!(read_chunk(&mut reader, &mut buf).unwrap(), 4);
        assert_eq!(read_chunk(&mut reader, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[8, 9]);
    }
}
