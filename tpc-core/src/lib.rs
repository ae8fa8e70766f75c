//! TPC core library
//!
//! A near-ultrasonic acoustic link probe: modulate and demodulate AFSK
//! calibration packets, measure the channel's signal-to-noise ratio and
//! packet-error rate, and pick the transport mode (ultrasonic, audible
//! fallback, or file) the channel can sustain.

pub mod audio_generator;
pub mod audio_host;
pub mod channel;
pub mod config;
pub mod decision;
pub mod errors;
pub mod frame;
pub mod logging;
pub mod packet;
pub mod probe;
pub mod signal_processing;
pub mod wav;

pub use audio_host::{AudioHost, DeviceInfo, LoopbackAudioHost, NullAudioHost};
pub use config::ProbeConfig;
pub use decision::{decide, Decision, Mode};
pub use errors::{Result, TpcError};
pub use frame::CalibrationFrame;
pub use packet::{extract_packets, summarize, FoundPacket, PacketErrorSummary, Quality};
pub use probe::{auto_probe, ProbeResult, ProbeStep};
