//! Signal processing functions for AFSK modulation, demodulation, and spectrum analysis
//!
//! This module provides the DSP core for:
//! - Converting bit streams to continuous-phase AFSK audio carriers
//! - Demodulating audio back to bit streams via Goertzel mark/space discrimination
//! - Computing frequency spectrums via FFT for link-quality analysis
//!
//! These functions are designed to be reusable, testable, and suitable for
//! offline batch operation.

pub mod modulation;
pub mod demodulation;
pub mod spectrum;

// Re-export commonly used items
pub use modulation::{ModulationConfig, bits_to_afsk_signal};
pub use demodulation::{DemodulationConfig, afsk_signal_to_bits};
pub use spectrum::compute_spectral_report;
