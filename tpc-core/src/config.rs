//! Configuration types for the TPC probe pipeline.
//!
//! Thresholds and carrier plans are compile-time constants (not configurable
//! in v1, see design notes); `ProbeConfig` covers the per-run knobs that are.

use serde::{Deserialize, Serialize};

/// Mode-selection thresholds for the decision engine (C6).
///
/// Kept in one namespace so a future injectable-`Thresholds` revision is a
/// small diff rather than a search-and-replace.
pub struct Thresholds;

impl Thresholds {
    pub const ULTRASONIC_SNR_DB: f64 = 20.0;
    pub const ULTRASONIC_PER: f64 = 0.05;
    pub const AUDIBLE_SNR_DB: f64 = 10.0;
    pub const AUDIBLE_PER: f64 = 0.20;
}

/// Carrier frequency/baud plan for each transport profile.
pub struct CarrierPlan;

impl CarrierPlan {
    pub const ULTRASONIC_FREQ0_HZ: f64 = 18_000.0;
    pub const ULTRASONIC_FREQ1_HZ: f64 = 20_000.0;
    pub const ULTRASONIC_BAUD: u32 = 150;

    pub const AUDIBLE_FREQ0_HZ: f64 = 1_200.0;
    pub const AUDIBLE_FREQ1_HZ: f64 = 2_400.0;
    pub const AUDIBLE_BAUD: u32 = 300;

    pub const SWEEP_START_HZ: f64 = 17_000.0;
    pub const SWEEP_END_HZ: f64 = 22_000.0;
}

/// Default noise/signal band bounds used by the spectral analyzer (C5).
pub struct AnalysisBands;

impl AnalysisBands {
    pub const NOISE_START_HZ: f64 = 100.0;
    pub const NOISE_END_HZ: f64 = 15_000.0;
}

/// Per-run configuration for a probe session.
///
/// Covers everything in §6 that is *not* in the "not configurable in v1"
/// threshold/carrier list: sample rate, sweep timing, calibration batch
/// size, and inter-packet gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub sample_rate: u32,
    pub sweep_start_hz: f64,
    pub sweep_end_hz: f64,
    pub sweep_duration_s: f64,
    pub calibration_packets: u16,
    pub gap_ms: f64,
    pub sub_probe_timeout_s: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            sweep_start_hz: CarrierPlan::SWEEP_START_HZ,
            sweep_end_hz: CarrierPlan::SWEEP_END_HZ,
            sweep_duration_s: 2.0,
            calibration_packets: 10,
            gap_ms: 200.0,
            sub_probe_timeout_s: 60,
        }
    }
}
