//! Transport-mode decision engine (C6)
//!
//! A pure function of measured link quality: given the sweep's SNR and the
//! calibration round trip's packet-error rate, picks the best transport the
//! channel can sustain. Deterministic and total — every `(snr_db, per)`
//! pair maps to exactly one `Decision`, with `File` as the always-available
//! floor.

use crate::config::{CarrierPlan, Thresholds};

/// Selected transport mode and the parameters to drive it with.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub mode: Mode,
    pub freq0_hz: Option<f64>,
    pub freq1_hz: Option<f64>,
    pub baud_rate: Option<u32>,
    pub reason: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ultrasonic,
    Audible,
    File,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Ultrasonic => "ultrasonic",
            Mode::Audible => "audible",
            Mode::File => "file",
        }
    }
}

/// Select a transport mode for the measured `snr_db` / `per` pair.
pub fn decide(snr_db: f64, per: f64) -> Decision {
    if snr_db >= Thresholds::ULTRASONIC_SNR_DB && per <= Thresholds::ULTRASONIC_PER {
        Decision {
            mode: Mode::Ultrasonic,
            freq0_hz: Some(CarrierPlan::ULTRASONIC_FREQ0_HZ),
            freq1_hz: Some(CarrierPlan::ULTRASONIC_FREQ1_HZ),
            baud_rate: Some(CarrierPlan::ULTRASONIC_BAUD),
            reason: format!(
                "Excellent ultrasonic channel: SNR={:.1} dB (>= {:.0} dB), PER={:.1}% (<= {:.0}%)",
                snr_db,
                Thresholds::ULTRASONIC_SNR_DB,
                per * 100.0,
                Thresholds::ULTRASONIC_PER * 100.0
            ),
            confidence: (snr_db / 40.0).min(1.0),
        }
    } else if snr_db >= Thresholds::AUDIBLE_SNR_DB && per <= Thresholds::AUDIBLE_PER {
        Decision {
            mode: Mode::Audible,
            freq0_hz: Some(CarrierPlan::AUDIBLE_FREQ0_HZ),
            freq1_hz: Some(CarrierPlan::AUDIBLE_FREQ1_HZ),
            baud_rate: Some(CarrierPlan::AUDIBLE_BAUD),
            reason: format!(
                "Audible fallback: SNR={:.1} dB (>= {:.0} dB, < {:.0} dB), PER={:.1}%",
                snr_db,
                Thresholds::AUDIBLE_SNR_DB,
                Thresholds::ULTRASONIC_SNR_DB,
                per * 100.0
            ),
            confidence: (snr_db / 30.0).min(1.0),
        }
    } else {
        Decision {
            mode: Mode::File,
            freq0_hz: None,
            freq1_hz: None,
            baud_rate: None,
            reason: format!(
                "File mode (no audio): SNR={:.1} dB (< {:.0} dB) or PER={:.1}% (> {:.0}%)",
                snr_db,
                Thresholds::AUDIBLE_SNR_DB,
                per * 100.0,
                Thresholds::AUDIBLE_PER * 100.0
            ),
            confidence: 1.0,
        }
    }
}
