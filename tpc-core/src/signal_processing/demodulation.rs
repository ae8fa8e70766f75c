//! AFSK demodulation
//!
//! Slices the incoming audio into one chunk per bit period, decides mark or
//! space with a pair of Goertzel detectors, then reassembles UART-framed
//! bytes out of the resulting bitstream. A framing error (missing stop bit)
//! slides the scan forward by one bit rather than a full ten-bit frame, so
//! a single corrupted bit can't desynchronize every byte that follows it.

/// Goertzel algorithm: single-frequency power at `target_freq` over `samples`.
fn goertzel_power(samples: &[f32], target_freq: f64, sample_rate: u32) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 0.0;
    }
    let k = (0.5 + n as f64 * target_freq / sample_rate as f64).floor();
    let w = std::f64::consts::TAU * k / n as f64;
    let coeff = 2.0 * w.cos();

    let mut s1 = 0.0f64;
    let mut s2 = 0.0f64;
    for &sample in samples {
        let s0 = sample as f64 + coeff * s1 - s2;
        s2 = s1;
        s1 = s0;
    }
    (s1 * s1 + s2 * s2 - coeff * s1 * s2) / (n as f64 * n as f64)
}

/// Demodulator configuration mirroring the modulator's tone pair and baud rate.
#[derive(Debug, Clone, Copy)]
pub struct DemodulationConfig {
    pub sample_rate: u32,
    pub baud_rate: u32,
    pub freq0_hz: f64,
    pub freq1_hz: f64,
}

/// Slice `samples` into one Goertzel-discriminated bit per bit period.
fn samples_to_bits(samples: &[f32], config: &DemodulationConfig) -> Vec<u8> {
    let samples_per_bit = (config.sample_rate / config.baud_rate).max(1) as usize;
    let num_bits = samples.len() / samples_per_bit;

    let mut bits = Vec::with_capacity(num_bits);
    for i in 0..num_bits {
        let start = i * samples_per_bit;
        let end = start + samples_per_bit;
        let chunk = &samples[start..end];

        let p0 = goertzel_power(chunk, config.freq0_hz, config.sample_rate);
        let p1 = goertzel_power(chunk, config.freq1_hz, config.sample_rate);

        bits.push(if p0 > p1 { 0 } else { 1 });
    }
    bits
}

/// Reassemble UART-framed bytes from a raw bitstream.
///
/// Scans for a `0` start bit, reads 8 MSB-first data bits, and checks for a
/// `1` stop bit. On success the scan jumps past the full 10-bit frame; on a
/// framing error (bad stop bit) it slides forward by a single bit instead of
/// skipping the whole frame, so resynchronization doesn't require losing an
/// extra byte's worth of the stream.
fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut i = 0;

    while i < bits.len() {
        if bits[i] == 0 {
            if i + 9 >= bits.len() {
                break;
            }
            let mut byte_val = 0u8;
            for b in 0..8 {
                byte_val = (byte_val << 1) | bits[i + 1 + b];
            }
            if bits[i + 9] == 1 {
                bytes.push(byte_val);
                i += 10;
            } else {
                i += 1;
            }
        } else {
            i += 1;
        }
    }

    bytes
}

/// Demodulate an AFSK audio signal back into its raw byte stream.
pub fn afsk_signal_to_bits(samples: &[f32], config: &DemodulationConfig) -> Vec<u8> {
    let bits = samples_to_bits(samples, config);
    bits_to_bytes(&bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_processing::modulation::{bits_to_afsk_signal, ModulationConfig};

    fn configs() -> (ModulationConfig, DemodulationConfig) {
        let mod_cfg = ModulationConfig {
            sample_rate: 48_000,
            baud_rate: 150,
            freq0_hz: 18_000.0,
            freq1_hz: 20_000.0,
        };
        let demod_cfg = DemodulationConfig {
            sample_rate: mod_cfg.sample_rate,
            baud_rate: mod_cfg.baud_rate,
            freq0_hz: mod_cfg.freq0_hz,
            freq1_hz: mod_cfg.freq1_hz,
        };
        (mod_cfg, demod_cfg)
    }

    #[test]
    fn round_trip_recovers_original_bytes() {
        let (mod_cfg, demod_cfg) = configs();
        let data = [0x00u8, 0xFF, 0x5A, 0xA5, 0x01];

        let signal = bits_to_afsk_signal(&data, &mod_cfg).unwrap();
        let recovered = afsk_signal_to_bits(&signal, &demod_cfg);

        assert_eq!(recovered, data);
    }

    #[test]
    fn goertzel_detects_correct_tone() {
        let sample_rate = 48_000u32;
        let samples: Vec<f32> = (0..320)
            .map(|i| (std::f64::consts::TAU * 18_000.0 * i as f64 / sample_rate as f64).sin() as f32)
            .collect();

        let p0 = goertzel_power(&samples, 18_000.0, sample_rate);
        let p1 = goertzel_power(&samples, 20_000.0, sample_rate);
        assert!(p0 > p1);
    }

    #[test]
    fn empty_signal_yields_no_bytes() {
        let (_, demod_cfg) = configs();
        assert!(afsk_signal_to_bits(&[], &demod_cfg).is_empty());
    }

    #[test]
    fn framing_error_slides_by_one_bit_not_a_full_frame() {
        // Hand-build a bitstream with one bad stop bit after a valid-looking
        // start+data sequence, and confirm bits_to_bytes recovers a
        // following well-framed byte rather than skipping over it.
        let mut bits = vec![0u8, 1, 0, 1, 0, 1, 0, 1, 0]; // start + 8 data, corrupt stop follows
        bits.push(0); // bad stop bit (should be 1)
        // Well-framed byte 0xFF right after: start(0) + 8x1 + stop(1)
        bits.push(0);
        bits.extend(std::iter::repeat(1u8).take(8));
        bits.push(1);

        let bytes = bits_to_bytes(&bits);
        assert_eq!(bytes, vec![0xFF]);
    }
}
