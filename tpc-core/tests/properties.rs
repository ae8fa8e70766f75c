//! Proptest-driven checks for the quantified invariants.

use proptest::prelude::*;
use tpc_core::decision::decide;
use tpc_core::frame::CalibrationFrame;
use tpc_core::packet::FoundPacket;
use tpc_core::signal_processing::demodulation::{afsk_signal_to_bits, DemodulationConfig};
use tpc_core::signal_processing::modulation::{bits_to_afsk_signal, ModulationConfig};
use tpc_core::TpcError;

fn mod_cfg() -> ModulationConfig {
    ModulationConfig {
        sample_rate: 48_000,
        baud_rate: 150,
        freq0_hz: 18_000.0,
        freq1_hz: 20_000.0,
    }
}

fn demod_cfg() -> DemodulationConfig {
    let m = mod_cfg();
    DemodulationConfig {
        sample_rate: m.sample_rate,
        baud_rate: m.baud_rate,
        freq0_hz: m.freq0_hz,
        freq1_hz: m.freq1_hz,
    }
}

proptest! {
    #[test]
    fn invariant_1_round_trip_is_noiseless_exact(seq in 0u16..=65535) {
        let frame = CalibrationFrame::encode(seq);
        let signal = bits_to_afsk_signal(&frame, &mod_cfg()).unwrap();
        let recovered = afsk_signal_to_bits(&signal, &demod_cfg());

        prop_assert_eq!(recovered, frame.to_vec());
        let (_, intact) = CalibrationFrame::decode(&frame).unwrap();
        prop_assert!(intact);
    }

    #[test]
    fn invariant_3_any_single_byte_flip_breaks_integrity(
        seq in 0u16..=65535,
        byte_idx in 8usize..58,
        bit in 0u8..8,
    ) {
        let mut frame = CalibrationFrame::encode(seq);
        frame[byte_idx] ^= 1 << bit;
        let (_, intact) = CalibrationFrame::decode(&frame).unwrap();
        prop_assert!(!intact);
    }

    #[test]
    fn invariant_4_per_arithmetic_is_bounded(
        expected in 0u32..1000,
        found in 0u32..1000,
        intact_frac in 0.0f64..=1.0,
    ) {
        let intact = (found as f64 * intact_frac) as u32;
        let packets: Vec<FoundPacket> = (0..found)
            .map(|i| FoundPacket { seq: i as u16, intact: i < intact })
            .collect();

        let summary = tpc_core::packet::summarize(&packets, expected);

        let lost = expected.saturating_sub(found);
        let corrupted = found - intact;
        let expected_per = (lost + corrupted) as f64 / expected.max(1) as f64;

        prop_assert!((summary.per - expected_per).abs() < 1e-9);
        prop_assert!(summary.per >= 0.0 && summary.per <= 1.0 + 1e-9);
    }

    #[test]
    fn invariant_5_phase_is_continuous_across_bit_boundaries(seq in 0u16..=65535) {
        let frame = CalibrationFrame::encode(seq);
        let cfg = mod_cfg();
        let signal = bits_to_afsk_signal(&frame, &cfg).unwrap();

        let max_freq = cfg.freq0_hz.max(cfg.freq1_hz);
        let max_step = std::f64::consts::TAU * max_freq / cfg.sample_rate as f64;
        let bound = (2.0 * 0.6 * max_step.sin()).abs() + 0.05;

        for window in signal.windows(2) {
            let delta = (window[1] as f64 - window[0] as f64).abs();
            prop_assert!(delta <= bound);
        }
    }

    #[test]
    fn invariant_6_ladder_never_downgrades_as_snr_increases(
        per in 0.0f64..1.0,
        snr_low in 0.0f64..40.0,
        snr_delta in 0.0f64..40.0,
    ) {
        let snr_high = snr_low + snr_delta;
        let low = decide(snr_low, per);
        let high = decide(snr_high, per);

        let rank = |m: tpc_core::decision::Mode| match m {
            tpc_core::decision::Mode::File => 0,
            tpc_core::decision::Mode::Audible => 1,
            tpc_core::decision::Mode::Ultrasonic => 2,
        };
        prop_assert!(rank(high.mode) >= rank(low.mode));
    }
}

#[test]
fn invariant_2_nyquist_refusal_produces_no_samples() {
    let cfg = ModulationConfig {
        sample_rate: 32_000,
        baud_rate: 150,
        freq0_hz: 18_000.0,
        freq1_hz: 20_000.0,
    };
    let result = bits_to_afsk_signal(&[0x00], &cfg);
    assert!(matches!(result, Err(TpcError::NyquistViolation { .. })));
}

#[test]
fn invariant_7_analyzer_locates_a_pure_tone_precisely() {
    use tpc_core::signal_processing::spectrum::compute_spectral_report;

    let sample_rate = 48_000u32;
    let freq = 19_000.0;
    let n = 48_000usize;
    let samples: Vec<f32> = (0..n)
        .map(|i| (std::f64::consts::TAU * freq * i as f64 / sample_rate as f64).sin() as f32)
        .collect();

    let report = compute_spectral_report(&samples, sample_rate, 17_000.0, 22_000.0, 100.0, 15_000.0);
    let bin_width = sample_rate as f64 / n as f64;

    assert!((report.peak_freq_hz - freq).abs() <= bin_width);
    assert!(report.snr_db > 30.0);
}
