//! Channel modeling and impairment simulation
//!
//! Synthetic AWGN injection for exercising the demodulator and decision
//! engine against a known-noisy channel, used by loopback audio hosts and
//! by the noise-robustness tests (S3).

use rand::Rng;
use rand_distr::StandardNormal;

/// Apply AWGN noise to audio samples.
///
/// `noise_std` controls the resulting SNR: larger values inject more noise
/// power relative to a unit-amplitude signal.
pub fn apply_audio_noise<R: Rng>(audio: &[f32], noise_std: f64, rng: &mut R) -> Vec<f32> {
    let mut noisy = audio.to_vec();

    for sample in noisy.iter_mut() {
        let noise: f64 = rng.sample::<f64, _>(StandardNormal) * (noise_std * 0.1);
        *sample += noise as f32;
    }

    noisy
}
