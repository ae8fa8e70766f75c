//! AFSK modulation
//!
//! Converts a byte stream into a continuous-phase audio-frequency-shift-keyed
//! waveform: a UART-style bit frame (start bit, 8 data bits MSB-first, stop
//! bit) wrapped in a synchronization preamble and idle postamble, carried on
//! one of two tones selected per bit. Phase accumulates across the whole
//! transmission rather than resetting at bit boundaries, so there is no
//! discontinuity a receiver's Goertzel detector could mistake for a symbol
//! edge.

use crate::errors::{Result, TpcError};
use std::f64::consts::TAU;

/// 32-bit alternating preamble for receiver bit-clock synchronization.
const PREAMBLE_BITS: usize = 32;
/// 16-bit idle tail appended after the final byte.
const POSTAMBLE_BITS: usize = 16;
/// Line amplitude; kept below full scale for DAC headroom on ultrasonic carriers.
const LINE_AMPLITUDE: f64 = 0.6;

/// Modulator configuration: the mark/space tone pair, baud rate, and sample rate.
#[derive(Debug, Clone, Copy)]
pub struct ModulationConfig {
    pub sample_rate: u32,
    pub baud_rate: u32,
    /// Tone for a `0` bit (mark).
    pub freq0_hz: f64,
    /// Tone for a `1` bit (space).
    pub freq1_hz: f64,
}

impl ModulationConfig {
    fn check_nyquist(&self) -> Result<()> {
        let max_freq = self.freq0_hz.max(self.freq1_hz);
        let min_required = max_freq * 2.0;
        if (self.sample_rate as f64) < min_required {
            return Err(TpcError::NyquistViolation {
                carrier_hz: max_freq,
                min_required_hz: min_required,
                actual_hz: self.sample_rate as f64,
            });
        }
        Ok(())
    }
}

/// Assemble the UART-framed bit sequence for `data`: preamble, one
/// start/8-data/stop frame per byte, postamble.
fn frame_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(PREAMBLE_BITS + data.len() * 10 + POSTAMBLE_BITS);

    for i in 0..PREAMBLE_BITS {
        bits.push((i % 2 == 0) as u8);
    }

    for &byte in data {
        bits.push(0); // start bit
        for b in (0..8).rev() {
            bits.push((byte >> b) & 1);
        }
        bits.push(1); // stop bit
    }

    bits.extend(std::iter::repeat(1u8).take(POSTAMBLE_BITS));
    bits
}

/// Modulate `data` into an AFSK audio signal.
pub fn bits_to_afsk_signal(data: &[u8], config: &ModulationConfig) -> Result<Vec<f32>> {
    config.check_nyquist()?;

    let samples_per_bit = (config.sample_rate / config.baud_rate).max(1) as usize;
    let bits = frame_bits(data);
    let mut samples = Vec::with_capacity(bits.len() * samples_per_bit);

    let mut phase = 0.0f64;
    for &bit in &bits {
        let freq = if bit == 0 { config.freq0_hz } else { config.freq1_hz };
        let phase_inc = TAU * freq / config.sample_rate as f64;
        for _ in 0..samples_per_bit {
            samples.push((LINE_AMPLITUDE * phase.sin()) as f32);
            phase += phase_inc;
            if phase > TAU {
                phase -= TAU;
            }
        }
    }

    Ok(samples)
}
