mod config;
mod logging;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use std::path::PathBuf;

use config::CliConfig;
use logging::ProbeReport;

use tpc_core::audio_host::{AudioHost, LoopbackAudioHost};
use tpc_core::config::{AnalysisBands, CarrierPlan};
use tpc_core::decision::decide;
use tpc_core::frame::CalibrationFrame;
use tpc_core::logging::{LogConfig, ProbeLogger};
use tpc_core::packet::{extract_packets, summarize};
use tpc_core::signal_processing::demodulation::{afsk_signal_to_bits, DemodulationConfig};
use tpc_core::signal_processing::modulation::{bits_to_afsk_signal, ModulationConfig};
use tpc_core::signal_processing::spectrum::compute_spectral_report;
use tpc_core::wav::{read_wav, write_wav_pcm16};
use tpc_core::{audio_generator, auto_probe, ProbeConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Near-ultrasonic acoustic link probe", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (see CliConfig for the schema)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sweep the near-ultrasonic band and report a spectral reading.
    Sweep(SweepArgs),
    /// Modulate a calibration batch and write it to a WAV file.
    Send(SendArgs),
    /// Demodulate a calibration batch and report packet-error statistics.
    Recv(RecvArgs),
    /// Analyze an audio buffer's spectral characteristics.
    Analyze(AnalyzeArgs),
    /// Select the transport mode for the measured (or given) channel quality.
    Decide(DecideArgs),
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[arg(long, default_value_t = CarrierPlan::SWEEP_START_HZ)]
    start: f64,
    #[arg(long, default_value_t = CarrierPlan::SWEEP_END_HZ)]
    end: f64,
    #[arg(long, default_value_t = 2.0)]
    duration: f64,
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,
    /// Round-trip the chirp through a (loopback) device instead of analyzing it directly.
    #[arg(long)]
    record: bool,
    /// Validate the sweep parameters without generating or analyzing any audio.
    #[arg(long)]
    check_only: bool,
}

#[derive(Args, Debug)]
struct SendArgs {
    #[arg(long, default_value_t = CarrierPlan::ULTRASONIC_FREQ0_HZ)]
    freq0: f64,
    #[arg(long, default_value_t = CarrierPlan::ULTRASONIC_FREQ1_HZ)]
    freq1: f64,
    #[arg(long, default_value_t = CarrierPlan::ULTRASONIC_BAUD)]
    baud: u32,
    #[arg(long, default_value_t = 10)]
    packets: u16,
    #[arg(long, default_value_t = 200.0)]
    gap_ms: f64,
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,
    #[arg(long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct RecvArgs {
    #[arg(long, default_value_t = CarrierPlan::ULTRASONIC_FREQ0_HZ)]
    freq0: f64,
    #[arg(long, default_value_t = CarrierPlan::ULTRASONIC_FREQ1_HZ)]
    freq1: f64,
    #[arg(long, default_value_t = CarrierPlan::ULTRASONIC_BAUD)]
    baud: u32,
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,
    /// Seconds to record when no `--input` file is given (routes through the loopback host).
    #[arg(long, default_value_t = 3.0)]
    duration: f64,
    #[arg(long, default_value_t = 10)]
    expected: u32,
    /// Read the calibration batch from a WAV file instead of recording it.
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[arg(long)]
    input: Option<PathBuf>,
    /// Record live instead of reading a file (routes through the loopback host).
    #[arg(long)]
    live: bool,
    #[arg(long, default_value_t = 2.0)]
    duration: f64,
    #[arg(long, default_value_t = CarrierPlan::SWEEP_START_HZ)]
    band_start: f64,
    #[arg(long, default_value_t = CarrierPlan::SWEEP_END_HZ)]
    band_end: f64,
    #[arg(long, default_value_t = AnalysisBands::NOISE_START_HZ)]
    noise_start: f64,
    #[arg(long, default_value_t = AnalysisBands::NOISE_END_HZ)]
    noise_end: f64,
}

#[derive(Args, Debug)]
struct DecideArgs {
    /// Run the full auto-probe sequence (sweep + calibration round trip) against the loopback host.
    #[arg(long)]
    auto: bool,
    #[arg(long, requires = "per")]
    snr: Option<f64>,
    #[arg(long, requires = "snr")]
    per: Option<f64>,
    /// Prior `sweep` report JSON, read for its `snr_db` field.
    #[arg(long, requires = "recv_result")]
    sweep_result: Option<PathBuf>,
    /// Prior `recv` report JSON, read for its `per` field.
    #[arg(long, requires = "sweep_result")]
    recv_result: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let cli_config = match &cli.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    let pretty = cli_config.output.pretty;
    let timestamp = chrono::Utc::now().to_rfc3339();

    match cli.command {
        Commands::Sweep(args) => run_sweep(args, timestamp, pretty),
        Commands::Send(args) => run_send(args, timestamp, pretty),
        Commands::Recv(args) => run_recv(args, timestamp, pretty),
        Commands::Analyze(args) => run_analyze(args, timestamp, pretty),
        Commands::Decide(args) => run_decide(args, &cli_config.probe, timestamp, pretty),
    }

    Ok(())
}

fn run_sweep(args: SweepArgs, timestamp: String, pretty: bool) {
    let report = ProbeReport::new("sweep", timestamp)
        .field("start_hz", args.start)
        .field("end_hz", args.end)
        .field("duration_s", args.duration)
        .field("sample_rate", args.sample_rate);

    if args.check_only {
        report.field("checked", true).success(pretty);
        return;
    }

    let chirp = audio_generator::generate_chirp(args.start, args.end, args.duration, args.sample_rate);

    let signal = if args.record {
        match LoopbackAudioHost::clean().play_and_record(&chirp, args.sample_rate) {
            Ok(samples) => samples,
            Err(e) => {
                report.failure(e.to_string(), pretty);
                return;
            }
        }
    } else {
        chirp
    };

    let spectral = compute_spectral_report(
        &signal,
        args.sample_rate,
        args.start,
        args.end,
        AnalysisBands::NOISE_START_HZ,
        AnalysisBands::NOISE_END_HZ,
    );

    report
        .field("recorded", args.record)
        .field("snr_db", spectral.snr_db)
        .field("peak_freq_hz", spectral.peak_freq_hz)
        .field("rms", spectral.rms)
        .field("crest_factor_db", spectral.crest_factor_db)
        .success(pretty);
}

fn run_send(args: SendArgs, timestamp: String, pretty: bool) {
    let report = ProbeReport::new("send", timestamp)
        .field("freq0_hz", args.freq0)
        .field("freq1_hz", args.freq1)
        .field("baud_rate", args.baud)
        .field("packets", args.packets)
        .field("output", args.output.display().to_string());

    let mod_cfg = ModulationConfig {
        sample_rate: args.sample_rate,
        baud_rate: args.baud,
        freq0_hz: args.freq0,
        freq1_hz: args.freq1,
    };
    let gap_samples = (args.sample_rate as f64 * args.gap_ms / 1000.0).round() as usize;

    let mut signal = Vec::new();
    for seq in 0..args.packets {
        let frame = CalibrationFrame::encode(seq);
        match bits_to_afsk_signal(&frame, &mod_cfg) {
            Ok(samples) => {
                signal.extend(samples);
                signal.extend(std::iter::repeat(0.0f32).take(gap_samples));
            }
            Err(e) => {
                report.failure(e.to_string(), pretty);
                return;
            }
        }
    }

    if let Err(e) = write_wav_pcm16(&args.output, &signal, args.sample_rate) {
        report.failure(e.to_string(), pretty);
        return;
    }

    report
        .field("samples", signal.len())
        .field("duration_s", signal.len() as f64 / args.sample_rate as f64)
        .success(pretty);
}

fn run_recv(args: RecvArgs, timestamp: String, pretty: bool) {
    let report = ProbeReport::new("recv", timestamp)
        .field("freq0_hz", args.freq0)
        .field("freq1_hz", args.freq1)
        .field("baud_rate", args.baud)
        .field("expected", args.expected);

    let (samples, sample_rate) = if let Some(input) = &args.input {
        match read_wav(input) {
            Ok(wav) => (wav.samples, wav.sample_rate),
            Err(e) => {
                report.failure(e.to_string(), pretty);
                return;
            }
        }
    } else {
        match LoopbackAudioHost::clean().record(args.duration, args.sample_rate) {
            Ok(samples) => (samples, args.sample_rate),
            Err(e) => {
                report.failure(e.to_string(), pretty);
                return;
            }
        }
    };

    let demod_cfg = DemodulationConfig {
        sample_rate,
        baud_rate: args.baud,
        freq0_hz: args.freq0,
        freq1_hz: args.freq1,
    };
    let raw_bytes = afsk_signal_to_bits(&samples, &demod_cfg);
    let found = extract_packets(&raw_bytes);
    let summary = summarize(&found, args.expected);

    report
        .field("found", summary.found)
        .field("intact", summary.intact)
        .field("corrupted", summary.corrupted)
        .field("lost", summary.lost)
        .field("per", summary.per)
        .field("quality", summary.quality.as_str())
        .success(pretty);
}

fn run_analyze(args: AnalyzeArgs, timestamp: String, pretty: bool) {
    let report = ProbeReport::new("analyze", timestamp)
        .field("band_start_hz", args.band_start)
        .field("band_end_hz", args.band_end)
        .field("noise_start_hz", args.noise_start)
        .field("noise_end_hz", args.noise_end);

    let (samples, sample_rate) = if args.live {
        let sample_rate = 48_000;
        match LoopbackAudioHost::clean().record(args.duration, sample_rate) {
            Ok(samples) => (samples, sample_rate),
            Err(e) => {
                report.failure(e.to_string(), pretty);
                return;
            }
        }
    } else if let Some(input) = &args.input {
        match read_wav(input) {
            Ok(wav) => (wav.samples, wav.sample_rate),
            Err(e) => {
                report.failure(e.to_string(), pretty);
                return;
            }
        }
    } else {
        report.failure("either --input or --live must be given", pretty);
        return;
    };

    let spectral = compute_spectral_report(
        &samples,
        sample_rate,
        args.band_start,
        args.band_end,
        args.noise_start,
        args.noise_end,
    );

    let freq_response: Vec<serde_json::Value> = spectral
        .freq_response
        .iter()
        .map(|p| {
            serde_json::json!({
                "freq_hz": p.freq_hz,
                "power": p.power,
                "power_db": p.power_db,
            })
        })
        .collect();

    report
        .field("sample_rate", sample_rate)
        .field("snr_db", spectral.snr_db)
        .field("peak_freq_hz", spectral.peak_freq_hz)
        .field("peak_power", spectral.peak_power)
        .field("rms", spectral.rms)
        .field("peak_amplitude", spectral.peak_amplitude)
        .field("crest_factor_db", spectral.crest_factor_db)
        .field("usable_bandwidth_hz", spectral.usable_bandwidth_hz)
        .field("duration_s", spectral.duration_s)
        .field("freq_response", freq_response)
        .success(pretty);
}

fn run_decide(args: DecideArgs, probe_config: &ProbeConfig, timestamp: String, pretty: bool) {
    let report = ProbeReport::new("decide", timestamp);

    if args.auto {
        let host = LoopbackAudioHost::clean();
        let mut logger = ProbeLogger::new(LogConfig::default());
        let result = auto_probe(&host, probe_config, &mut logger);

        let steps: Vec<serde_json::Value> = result
            .steps
            .iter()
            .map(|s| serde_json::json!({"name": s.name, "success": s.success, "detail": s.detail}))
            .collect();
        let decision = decision_json(&result.decision);

        report
            .field("steps", steps)
            .field("snr_db", result.snr_db)
            .field("per", result.per)
            .field("decision", decision)
            .success(pretty);
        return;
    }

    if let (Some(snr), Some(per)) = (args.snr, args.per) {
        let decision = decide(snr, per);
        report
            .field("snr_db", snr)
            .field("per", per)
            .field("decision", decision_json(&decision))
            .success(pretty);
        return;
    }

    if let (Some(sweep_path), Some(recv_path)) = (&args.sweep_result, &args.recv_result) {
        let sweep_json = match read_report_json(sweep_path) {
            Ok(v) => v,
            Err(e) => {
                report.failure(e, pretty);
                return;
            }
        };
        let recv_json = match read_report_json(recv_path) {
            Ok(v) => v,
            Err(e) => {
                report.failure(e, pretty);
                return;
            }
        };

        let snr = match sweep_json.get("snr_db").and_then(|v| v.as_f64()) {
            Some(v) => v,
            None => {
                report.failure("sweep result is missing snr_db", pretty);
                return;
            }
        };
        let per = match recv_json.get("per").and_then(|v| v.as_f64()) {
            Some(v) => v,
            None => {
                report.failure("recv result is missing per", pretty);
                return;
            }
        };

        let decision = decide(snr, per);
        report
            .field("snr_db", snr)
            .field("per", per)
            .field("decision", decision_json(&decision))
            .success(pretty);
        return;
    }

    report.failure("one of --auto, --snr/--per, or --sweep-result/--recv-result is required", pretty);
}

fn decision_json(decision: &tpc_core::decision::Decision) -> serde_json::Value {
    serde_json::json!({
        "mode": decision.mode.as_str(),
        "freq0_hz": decision.freq0_hz,
        "freq1_hz": decision.freq1_hz,
        "baud_rate": decision.baud_rate,
        "reason": decision.reason,
        "confidence": decision.confidence,
    })
}

fn read_report_json(path: &PathBuf) -> std::result::Result<serde_json::Value, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}
