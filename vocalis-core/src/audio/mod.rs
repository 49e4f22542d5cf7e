//! WAV decode/encode boundary.
//!
//! The analysis core never touches the filesystem anywhere else; these two
//! free functions are the whole I/O surface. Decoding collapses
//! multi-channel files to mono by per-frame averaging and converts every
//! supported sample format to raw i16 PCM — the classifier only ranks bin
//! magnitudes, so no normalization is applied on top of that.

pub mod track;

use std::path::Path;

use tracing::debug;

pub use track::AudioTrack;

use crate::error::{Result, VocalisError};

fn decode_err(path: &Path, source: hound::Error) -> VocalisError {
    VocalisError::Decode {
        path: path.to_path_buf(),
        source,
    }
}

fn encode_err(path: &Path, source: hound::Error) -> VocalisError {
    VocalisError::Encode {
        path: path.to_path_buf(),
        source,
    }
}

/// Read a WAV file into a mono i16 track.
///
/// Integer formats up to 16 bits are taken as-is; wider integer formats are
/// narrowed by dropping low-order bits; float formats are scaled by
/// `i16::MAX`. Multi-channel audio is collapsed by averaging each frame.
///
/// # Errors
/// Returns `VocalisError::Decode` when the file is missing, unreadable, or
/// malformed.
pub fn read_wav(path: &Path) -> Result<AudioTrack> {
    let mut reader = hound::WavReader::open(path).map_err(|e| decode_err(path, e))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| {
                s.map(|v| (v.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16)
                    .map_err(|e| decode_err(path, e))
            })
            .collect::<Result<Vec<_>>>()?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample <= 16 {
                reader
                    .samples::<i16>()
                    .map(|s| s.map_err(|e| decode_err(path, e)))
                    .collect::<Result<Vec<_>>>()?
            } else {
                let shift = spec.bits_per_sample - 16;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| (v >> shift) as i16).map_err(|e| decode_err(path, e)))
                    .collect::<Result<Vec<_>>>()?
            }
        }
    };

    let samples = if channels == 1 {
        interleaved
    } else {
        let mut mono = Vec::with_capacity(interleaved.len() / channels);
        for frame in interleaved.chunks_exact(channels) {
            let sum: i32 = frame.iter().map(|&s| i32::from(s)).sum();
            mono.push((sum / channels as i32) as i16);
        }
        mono
    };

    debug!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels,
        frames = samples.len(),
        "decoded wav"
    );

    Ok(AudioTrack::new(spec.sample_rate, samples))
}

/// Write a track as a mono 16-bit PCM WAV file.
///
/// # Errors
/// Returns `VocalisError::Encode` on any writer failure.
pub fn write_wav(path: &Path, track: &AudioTrack) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: track.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| encode_err(path, e))?;
    for &sample in &track.samples {
        writer.write_sample(sample).map_err(|e| encode_err(path, e))?;
    }
    writer.finalize().map_err(|e| encode_err(path, e))?;

    debug!(path = %path.display(), frames = track.len(), "encoded wav");
    Ok(())
}
