//! Mono WAV file I/O (C8)
//!
//! Thin wrapper over `hound` that normalizes samples to `f32` in `[-1, 1]`
//! regardless of whether the file is stored as 16- or 32-bit PCM, and takes
//! the first channel of any multi-channel file rather than failing on it.

use crate::errors::{Result, TpcError};
use std::path::Path;

/// A mono recording: samples plus the rate they were captured at.
#[derive(Debug, Clone, PartialEq)]
pub struct WavData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Read a mono (or first-channel-of-multi) WAV file as normalized `f32` samples.
pub fn read_wav(path: impl AsRef<Path>) -> Result<WavData> {
    let mut reader = hound::WavReader::open(path.as_ref()).map_err(|e| TpcError::UnsupportedFormat {
        detail: e.to_string(),
    })?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int if spec.bits_per_sample == 16 => reader
            .samples::<i16>()
            .step_by(spec.channels as usize)
            .map(|s| s.map(|v| v as f32 / 32_768.0))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| TpcError::UnsupportedFormat { detail: e.to_string() })?,
        hound::SampleFormat::Int if spec.bits_per_sample == 32 => reader
            .samples::<i32>()
            .step_by(spec.channels as usize)
            .map(|s| s.map(|v| v as f32 / 2_147_483_648.0))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| TpcError::UnsupportedFormat { detail: e.to_string() })?,
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .step_by(spec.channels as usize)
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| TpcError::UnsupportedFormat { detail: e.to_string() })?,
        _ => {
            return Err(TpcError::UnsupportedFormat {
                detail: format!("unsupported bits-per-sample: {}", spec.bits_per_sample),
            })
        }
    };

    if samples.is_empty() {
        return Err(TpcError::NoAudioData);
    }

    Ok(WavData {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Write mono `f32` samples as a 16-bit PCM WAV file.
pub fn write_wav_pcm16(path: impl AsRef<Path>, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path.as_ref(), spec).map_err(|e| TpcError::UnsupportedFormat {
        detail: e.to_string(),
    })?;

    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let pcm = (clamped * 32_767.0) as i16;
        writer
            .write_sample(pcm)
            .map_err(|e| TpcError::UnsupportedFormat { detail: e.to_string() })?;
    }
    writer
        .finalize()
        .map_err(|e| TpcError::UnsupportedFormat { detail: e.to_string() })?;
    Ok(())
}

/// Write mono `f32` samples as a 32-bit PCM WAV file.
pub fn write_wav_pcm32(path: impl AsRef<Path>, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path.as_ref(), spec).map_err(|e| TpcError::UnsupportedFormat {
        detail: e.to_string(),
    })?;

    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let pcm = (clamped as f64 * 2_147_483_647.0) as i32;
        writer
            .write_sample(pcm)
            .map_err(|e| TpcError::UnsupportedFormat { detail: e.to_string() })?;
    }
    writer
        .finalize()
        .map_err(|e| TpcError::UnsupportedFormat { detail: e.to_string() })?;
    Ok(())
}
