//! Audio I/O abstraction
//!
//! The probe pipeline never talks to a sound card directly: every stage
//! plays or records through an `AudioHost`. This keeps the DSP and decision
//! logic testable without real hardware, and gives the CLI a place to plug
//! in a live backend later without touching anything upstream of it.

use crate::channel::apply_audio_noise;
use crate::errors::{Result, TpcError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A queryable audio device's basic capabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub name: String,
    pub max_sample_rate: u32,
    pub input_channels: u16,
    pub output_channels: u16,
}

/// Playback/recording backend used by every probe stage.
pub trait AudioHost {
    /// Play `samples` at `sample_rate` to completion.
    fn play(&self, samples: &[f32], sample_rate: u32) -> Result<()>;

    /// Record `duration_s` seconds of audio at `sample_rate`.
    fn record(&self, duration_s: f64, sample_rate: u32) -> Result<Vec<f32>>;

    /// Play `samples` while simultaneously recording, returning whatever was
    /// captured during (and slightly after) playback.
    fn play_and_record(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>>;

    /// List available devices, for the CLI's device-check stage.
    fn query_devices(&self) -> Result<Vec<DeviceInfo>>;
}

/// A host with no real device: reports a device whose maximum sample rate
/// is too low to carry any carrier this system uses, so the orchestrator's
/// device-check step has something deterministic to fail on in environments
/// with no audio hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudioHost;

impl AudioHost for NullAudioHost {
    fn play(&self, _samples: &[f32], _sample_rate: u32) -> Result<()> {
        Err(TpcError::AudioHostError {
            detail: "no audio device available".to_string(),
        })
    }

    fn record(&self, _duration_s: f64, _sample_rate: u32) -> Result<Vec<f32>> {
        Err(TpcError::AudioHostError {
            detail: "no audio device available".to_string(),
        })
    }

    fn play_and_record(&self, _samples: &[f32], _sample_rate: u32) -> Result<Vec<f32>> {
        Err(TpcError::AudioHostError {
            detail: "no audio device available".to_string(),
        })
    }

    fn query_devices(&self) -> Result<Vec<DeviceInfo>> {
        Ok(vec![DeviceInfo {
            name: "null".to_string(),
            max_sample_rate: 8_000,
            input_channels: 0,
            output_channels: 0,
        }])
    }
}

/// A host that feeds playback straight back as the recording, optionally
/// perturbed by AWGN. Stands in for a real speaker-to-microphone round trip
/// in tests and in environments with no audio hardware.
#[derive(Debug, Clone)]
pub struct LoopbackAudioHost {
    noise_std: f64,
    seed: u64,
}

impl LoopbackAudioHost {
    /// A noiseless loopback: what comes out is exactly what went in.
    pub fn clean() -> Self {
        Self { noise_std: 0.0, seed: 0 }
    }

    /// A loopback that injects AWGN with the given standard deviation,
    /// deterministic for a given `seed` so tests are reproducible.
    pub fn noisy(noise_std: f64, seed: u64) -> Self {
        Self { noise_std, seed }
    }
}

impl Default for LoopbackAudioHost {
    fn default() -> Self {
        Self::clean()
    }
}

impl AudioHost for LoopbackAudioHost {
    fn play(&self, _samples: &[f32], _sample_rate: u32) -> Result<()> {
        Ok(())
    }

    fn record(&self, duration_s: f64, sample_rate: u32) -> Result<Vec<f32>> {
        let num_samples = (duration_s * sample_rate as f64).round() as usize;
        Ok(vec![0.0; num_samples])
    }

    fn play_and_record(&self, samples: &[f32], _sample_rate: u32) -> Result<Vec<f32>> {
        if self.noise_std == 0.0 {
            return Ok(samples.to_vec());
        }
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        Ok(apply_audio_noise(samples, self.noise_std, &mut rng))
    }

    fn query_devices(&self) -> Result<Vec<DeviceInfo>> {
        Ok(vec![DeviceInfo {
            name: "loopback".to_string(),
            max_sample_rate: 192_000,
            input_channels: 1,
            output_channels: 1,
        }])
    }
}
