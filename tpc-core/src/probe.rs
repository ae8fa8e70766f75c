//! Auto-probe orchestrator (C7)
//!
//! Runs the full sequence an operator would otherwise drive by hand: check
//! the audio host has a usable device, sweep to measure the channel's
//! ultrasonic SNR, transmit a calibration batch and measure its PER, then
//! feed both figures to the decision engine. Any stage that fails short-
//! circuits the remaining ones and falls back to `Mode::File`, the same way
//! a missing microphone or a busted speaker would in practice.

use crate::audio_generator::generate_chirp;
use crate::audio_host::AudioHost;
use crate::config::{CarrierPlan, ProbeConfig};
use crate::decision::{decide, Decision, Mode};
use crate::errors::{Result, TpcError};
use crate::frame::CalibrationFrame;
use crate::logging::{ProbeLogger, Stage};
use crate::packet::{extract_packets, summarize, PacketErrorSummary};
use crate::signal_processing::demodulation::{afsk_signal_to_bits, DemodulationConfig};
use crate::signal_processing::modulation::{bits_to_afsk_signal, ModulationConfig};
use crate::signal_processing::spectrum::compute_spectral_report;

/// One stage's outcome, kept so the orchestrator's report can show its work.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeStep {
    pub name: &'static str,
    pub success: bool,
    pub detail: String,
}

/// Full result of an auto-probe run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub steps: Vec<ProbeStep>,
    pub snr_db: f64,
    pub per: f64,
    pub packet_summary: Option<PacketErrorSummary>,
    pub decision: Decision,
}

/// Bound a blocking sub-probe call to `timeout_s` wall-clock seconds. Host
/// implementations in this crate are synchronous and return promptly, so
/// this classifies an over-budget call after the fact rather than
/// preempting it mid-flight; a real device backend would need to race the
/// call against the deadline instead.
fn timed<T>(timeout_s: u64, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = std::time::Instant::now();
    let result = f();
    if start.elapsed().as_secs() > timeout_s {
        return Err(TpcError::Timeout { seconds: timeout_s });
    }
    result
}

/// Run the auto-probe sequence against `host` using `config`.
pub fn auto_probe(host: &dyn AudioHost, config: &ProbeConfig, logger: &mut ProbeLogger) -> ProbeResult {
    let mut steps = Vec::new();

    let required_rate_hz = 2.0 * CarrierPlan::ULTRASONIC_FREQ0_HZ.max(CarrierPlan::ULTRASONIC_FREQ1_HZ);
    match host.query_devices() {
        Ok(devices) if devices.iter().any(|d| d.max_sample_rate as f64 >= required_rate_hz) => {
            logger.info(Stage::Orchestrator, format!("found {} device(s)", devices.len()));
            steps.push(ProbeStep {
                name: "device_check",
                success: true,
                detail: format!("{} device(s) available", devices.len()),
            });
        }
        Ok(devices) => {
            let detail = if devices.is_empty() {
                "no audio devices available".to_string()
            } else {
                format!("no device supports sample rate >= {required_rate_hz:.0} Hz")
            };
            logger.warn(Stage::Orchestrator, detail.clone());
            steps.push(ProbeStep {
                name: "device_check",
                success: false,
                detail,
            });
            return fallback_result(steps);
        }
        Err(e) => {
            logger.error(Stage::Orchestrator, format!("device check failed: {e}"));
            steps.push(ProbeStep {
                name: "device_check",
                success: false,
                detail: e.to_string(),
            });
            return fallback_result(steps);
        }
    }

    let chirp = generate_chirp(
        config.sweep_start_hz,
        config.sweep_end_hz,
        config.sweep_duration_s,
        config.sample_rate,
    );
    let recorded_sweep = match timed(config.sub_probe_timeout_s, || {
        host.play_and_record(&chirp, config.sample_rate)
    }) {
        Ok(samples) => samples,
        Err(e) => {
            logger.error(Stage::Orchestrator, format!("sweep failed: {e}"));
            steps.push(ProbeStep {
                name: "sweep",
                success: false,
                detail: e.to_string(),
            });
            return fallback_result(steps);
        }
    };

    let sweep_report = compute_spectral_report(
        &recorded_sweep,
        config.sample_rate,
        config.sweep_start_hz,
        config.sweep_end_hz,
        100.0,
        config.sweep_start_hz * 0.8,
    );
    let snr_db = sweep_report.snr_db;
    logger.info(Stage::Sweep, format!("measured SNR {snr_db:.2} dB"));
    steps.push(ProbeStep {
        name: "sweep",
        success: true,
        detail: format!("snr_db={snr_db:.2}"),
    });

    let mod_cfg = ModulationConfig {
        sample_rate: config.sample_rate,
        baud_rate: CarrierPlan::ULTRASONIC_BAUD,
        freq0_hz: CarrierPlan::ULTRASONIC_FREQ0_HZ,
        freq1_hz: CarrierPlan::ULTRASONIC_FREQ1_HZ,
    };
    let gap_samples = (config.sample_rate as f64 * config.gap_ms / 1000.0).round() as usize;
    let mut calibration_signal = Vec::new();
    for seq in 0..config.calibration_packets {
        let frame = CalibrationFrame::encode(seq);
        match bits_to_afsk_signal(&frame, &mod_cfg) {
            Ok(samples) => {
                calibration_signal.extend(samples);
                calibration_signal.extend(std::iter::repeat(0.0f32).take(gap_samples));
            }
            Err(e) => {
                logger.error(Stage::Orchestrator, format!("calibration modulation failed: {e}"));
                steps.push(ProbeStep {
                    name: "send_calibration",
                    success: false,
                    detail: e.to_string(),
                });
                return fallback_with_snr(steps, snr_db);
            }
        }
    }
    steps.push(ProbeStep {
        name: "send_calibration",
        success: true,
        detail: format!("{} packets queued", config.calibration_packets),
    });

    let recorded_calibration = match timed(config.sub_probe_timeout_s, || {
        host.play_and_record(&calibration_signal, config.sample_rate)
    }) {
        Ok(samples) => samples,
        Err(e) => {
            logger.error(Stage::Orchestrator, format!("calibration round trip failed: {e}"));
            steps.push(ProbeStep {
                name: "recv_calibration",
                success: false,
                detail: e.to_string(),
            });
            return fallback_with_snr(steps, snr_db);
        }
    };

    let demod_cfg = DemodulationConfig {
        sample_rate: mod_cfg.sample_rate,
        baud_rate: mod_cfg.baud_rate,
        freq0_hz: mod_cfg.freq0_hz,
        freq1_hz: mod_cfg.freq1_hz,
    };
    let raw_bytes = afsk_signal_to_bits(&recorded_calibration, &demod_cfg);
    let found = extract_packets(&raw_bytes);
    let summary = summarize(&found, config.calibration_packets as u32);
    logger.info(
        Stage::Packet,
        format!("{}/{} packets intact, per={:.4}", summary.intact, summary.expected, summary.per),
    );
    steps.push(ProbeStep {
        name: "recv_calibration",
        success: true,
        detail: format!("per={:.4}, quality={}", summary.per, summary.quality.as_str()),
    });

    let decision = decide(snr_db, summary.per);
    logger.info(Stage::Decision, format!("selected mode {}", decision.mode.as_str()));

    ProbeResult {
        steps,
        snr_db,
        per: summary.per,
        packet_summary: Some(summary),
        decision,
    }
}

fn fallback_result(steps: Vec<ProbeStep>) -> ProbeResult {
    fallback_with_snr(steps, 0.0)
}

fn fallback_with_snr(steps: Vec<ProbeStep>, snr_db: f64) -> ProbeResult {
    let decision = decide(snr_db, 1.0);
    ProbeResult {
        steps,
        snr_db,
        per: 1.0,
        packet_summary: None,
        decision,
    }
}
