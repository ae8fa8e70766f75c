//! Waveform generators used by the sweep probe and by test fixtures.
//!
//! The chirp generator implements the exact closed-form sweep used for
//! device-capability probing (C7's first stage): a linear instantaneous
//! frequency ramp evaluated directly from its closed-form phase, not by
//! incremental phase accumulation, so the waveform is reproducible sample
//! for sample regardless of generation order.

use std::f64::consts::PI;

/// Amplitude applied to the generated chirp, matched to the reference probe
/// tooling's choice of headroom below clipping.
const SWEEP_AMPLITUDE: f64 = 0.7;

/// Generate a linear frequency sweep ("chirp") from `start_hz` to `end_hz`
/// over `duration_s` seconds.
///
/// `phase(t) = 2*pi*(start_hz*t + (end_hz - start_hz) / (2*duration_s) * t^2)`
pub fn generate_chirp(start_hz: f64, end_hz: f64, duration_s: f64, sample_rate: u32) -> Vec<f32> {
    let num_samples = (duration_s * sample_rate as f64).round() as usize;
    let rate = (end_hz - start_hz) / (2.0 * duration_s);

    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let phase = 2.0 * PI * (start_hz * t + rate * t * t);
            (SWEEP_AMPLITUDE * phase.sin()) as f32
        })
        .collect()
}

/// Generate a constant-frequency sine tone, used by tests that need a known
/// single-frequency fixture (e.g. an interfering tone for S4).
pub fn generate_tone(freq_hz: f64, duration_s: f64, sample_rate: u32) -> Vec<f32> {
    let num_samples = (duration_s * sample_rate as f64).round() as usize;
    let omega = 2.0 * PI * freq_hz / sample_rate as f64;

    (0..num_samples)
        .map(|i| (omega * i as f64).sin() as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chirp_has_expected_sample_count() {
        let samples = generate_chirp(17_000.0, 22_000.0, 2.0, 48_000);
        assert_eq!(samples.len(), 96_000);
    }

    #[test]
    fn chirp_is_bounded_by_amplitude() {
        let samples = generate_chirp(17_000.0, 22_000.0, 1.0, 48_000);
        for &sample in &samples {
            assert!(sample.abs() <= SWEEP_AMPLITUDE as f32 + 1e-6);
        }
    }

    #[test]
    fn chirp_starts_near_zero_phase() {
        let samples = generate_chirp(1_000.0, 2_000.0, 1.0, 48_000);
        assert!(samples[0].abs() < 1e-3);
    }

    #[test]
    fn tone_matches_requested_frequency_period() {
        let sample_rate = 48_000;
        let freq = 1_000.0;
        let samples = generate_tone(freq, 0.1, sample_rate);
        let period_samples = (sample_rate as f64 / freq).round() as usize;
        assert!((samples[0] - samples[period_samples]).abs() < 1e-3);
    }
}
