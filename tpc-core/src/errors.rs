//! TPC error types with granular categories

use thiserror::Error;

/// Top-level error type for all TPC operations
#[derive(Debug, Error)]
pub enum TpcError {
    #[error("Nyquist violation: carrier {carrier_hz} Hz requires sample rate > {min_required_hz} Hz, got {actual_hz} Hz")]
    NyquistViolation {
        carrier_hz: f64,
        min_required_hz: f64,
        actual_hz: f64,
    },

    #[error("Unsupported audio format: {detail}")]
    UnsupportedFormat { detail: String },

    #[error("No audio data found in container")]
    NoAudioData,

    #[error("Audio host error: {detail}")]
    AudioHostError { detail: String },

    #[error("Sub-probe timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Result type alias for TPC operations
pub type Result<T> = std::result::Result<T, TpcError>;
