//! Real-signal spectral analysis
//!
//! Computes the magnitude spectrum of a real-valued recording via FFT
//! (rustfft only exposes a complex transform, so the imaginary half of the
//! input buffer is zero-filled and the result truncated to the first
//! `n/2 + 1` bins the way a real FFT would return them) and derives the
//! link-quality figures the probe reports need: SNR against a noise floor
//! band, peak frequency in the signal band, a coarse frequency response,
//! and basic level statistics.

use rustfft::{num_complex::Complex32, FftPlanner};

/// One 1 kHz-wide frequency response sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreqResponsePoint {
    pub freq_hz: f64,
    pub power: f64,
    pub power_db: f64,
}

/// Full spectral report for a recorded signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralReport {
    pub snr_db: f64,
    pub signal_power: f64,
    pub noise_power: f64,
    pub peak_freq_hz: f64,
    pub peak_power: f64,
    pub rms: f64,
    pub peak_amplitude: f64,
    pub crest_factor_db: f64,
    pub freq_response: Vec<FreqResponsePoint>,
    pub usable_bandwidth_hz: f64,
    pub sample_count: usize,
    pub duration_s: f64,
}

const POWER_FLOOR: f64 = 1e-10;
const DB_FLOOR: f64 = 1e-15;

fn magnitude_spectrum(samples: &[f32]) -> (Vec<f32>, usize) {
    let n = samples.len();
    let mut buffer: Vec<Complex32> = samples.iter().map(|&s| Complex32::new(s, 0.0)).collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n.max(1));
    fft.process(&mut buffer);

    let rfft_len = n / 2 + 1;
    let magnitudes = buffer[..rfft_len]
        .iter()
        .map(|c| c.norm() / n as f32)
        .collect();
    (magnitudes, n)
}

fn bin_freq(bin: usize, n: usize, sample_rate: u32) -> f64 {
    bin as f64 * sample_rate as f64 / n as f64
}

/// Analyze `samples` for SNR/peak/response between `band_start_hz` and
/// `band_end_hz`, using `noise_start_hz..noise_end_hz` as the noise floor
/// reference band.
pub fn compute_spectral_report(
    samples: &[f32],
    sample_rate: u32,
    band_start_hz: f64,
    band_end_hz: f64,
    noise_start_hz: f64,
    noise_end_hz: f64,
) -> SpectralReport {
    let (magnitude, n) = magnitude_spectrum(samples);
    let power: Vec<f64> = magnitude.iter().map(|&m| (m as f64) * (m as f64)).collect();

    let freq_of = |bin: usize| bin_freq(bin, n, sample_rate);

    let signal_bins: Vec<usize> = (0..power.len())
        .filter(|&b| freq_of(b) >= band_start_hz && freq_of(b) <= band_end_hz)
        .collect();
    let noise_bins: Vec<usize> = (0..power.len())
        .filter(|&b| freq_of(b) >= noise_start_hz && freq_of(b) <= noise_end_hz)
        .collect();

    let signal_power = mean_power(&power, &signal_bins).unwrap_or(0.0);
    let noise_power = mean_power(&power, &noise_bins).unwrap_or(POWER_FLOOR);

    let snr_db = 10.0 * (signal_power / noise_power.max(POWER_FLOOR)).log10();

    let (peak_freq_hz, peak_power) = signal_bins
        .iter()
        .map(|&b| (freq_of(b), power[b]))
        .fold((0.0, 0.0), |acc, (f, p)| if p > acc.1 { (f, p) } else { acc });

    let mut freq_response = Vec::new();
    let mut f = band_start_hz as i64;
    while f <= band_end_hz as i64 {
        let fc = f as f64;
        let band_bins: Vec<usize> = (0..power.len())
            .filter(|&b| freq_of(b) >= fc - 500.0 && freq_of(b) <= fc + 500.0)
            .collect();
        let band_power = mean_power(&power, &band_bins).unwrap_or(0.0);
        freq_response.push(FreqResponsePoint {
            freq_hz: fc,
            power: band_power,
            power_db: 10.0 * band_power.max(DB_FLOOR).log10(),
        });
        f += 1000;
    }

    let rms = (samples.iter().map(|&s| (s as f64).powi(2)).sum::<f64>() / n.max(1) as f64).sqrt();
    let peak_amplitude = samples.iter().map(|&s| (s as f64).abs()).fold(0.0, f64::max);
    let crest_factor = peak_amplitude / rms.max(POWER_FLOOR);

    SpectralReport {
        snr_db,
        signal_power,
        noise_power,
        peak_freq_hz,
        peak_power,
        rms,
        peak_amplitude,
        crest_factor_db: 20.0 * crest_factor.max(POWER_FLOOR).log10(),
        freq_response,
        usable_bandwidth_hz: band_end_hz - band_start_hz,
        sample_count: n,
        duration_s: n as f64 / sample_rate as f64,
    }
}

fn mean_power(power: &[f64], bins: &[usize]) -> Option<f64> {
    if bins.is_empty() {
        return None;
    }
    Some(bins.iter().map(|&b| power[b]).sum::<f64>() / bins.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn tone(freq_hz: f64, sample_rate: u32, duration_s: f64) -> Vec<f32> {
        let n = (duration_s * sample_rate as f64) as usize;
        (0..n)
            .map(|i| (TAU * freq_hz * i as f64 / sample_rate as f64).sin() as f32)
            .collect()
    }

    #[test]
    fn pure_tone_peaks_near_its_frequency() {
        let sample_rate = 48_000;
        let samples = tone(18_000.0, sample_rate, 0.5);
        let report = compute_spectral_report(&samples, sample_rate, 17_000.0, 22_000.0, 100.0, 15_000.0);

        assert!((report.peak_freq_hz - 18_000.0).abs() < 50.0);
    }

    #[test]
    fn pure_tone_in_band_has_high_snr() {
        let sample_rate = 48_000;
        let samples = tone(18_000.0, sample_rate, 0.5);
        let report = compute_spectral_report(&samples, sample_rate, 17_000.0, 22_000.0, 100.0, 15_000.0);

        assert!(report.snr_db > 20.0);
    }

    #[test]
    fn silence_has_zero_rms_and_peak() {
        let samples = vec![0.0f32; 4800];
        let report = compute_spectral_report(&samples, 48_000, 17_000.0, 22_000.0, 100.0, 15_000.0);

        assert_eq!(report.rms, 0.0);
        assert_eq!(report.peak_amplitude, 0.0);
    }

    #[test]
    fn freq_response_spans_the_signal_band_in_1khz_steps() {
        let sample_rate = 48_000;
        let samples = tone(18_000.0, sample_rate, 0.2);
        let report = compute_spectral_report(&samples, sample_rate, 17_000.0, 20_000.0, 100.0, 15_000.0);

        let freqs: Vec<f64> = report.freq_response.iter().map(|p| p.freq_hz).collect();
        assert_eq!(freqs, vec![17_000.0, 18_000.0, 19_000.0, 20_000.0]);
    }

    #[test]
    fn full_scale_square_wave_has_unit_crest_ceiling() {
        let samples: Vec<f32> = (0..1000).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let report = compute_spectral_report(&samples, 48_000, 17_000.0, 22_000.0, 100.0, 15_000.0);

        assert!((report.rms - 1.0).abs() < 1e-6);
        assert!((report.peak_amplitude - 1.0).abs() < 1e-6);
    }
}
