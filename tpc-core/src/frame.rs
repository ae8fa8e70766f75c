//! Calibration frame codec (C1)
//!
//! Builds and parses the 58-byte calibration frame used to measure
//! packet-error rate across a modulated round trip.
//!
//! ```text
//! offset  size  field
//!   0      2   length   = 56 (covers magic..digest)
//!   2      4   magic    = 0xCA 0x1B 0xDA 0x7A
//!   6      2   seq      monotonically from 0
//!   8     18   payload  = "TPC-CALIBRATE-2026" (ASCII, no NUL)
//!  26     32   digest   = SHA-256(magic || seq || payload)
//! total: 58 bytes
//! ```

use sha2::{Digest, Sha256};

/// Calibration frame layout constants, grouped the way the protocol's other
/// fixed wire parameters are.
pub struct CalibrationFrame;

impl CalibrationFrame {
    pub const MAGIC: [u8; 4] = [0xCA, 0x1B, 0xDA, 0x7A];
    pub const PAYLOAD: &'static [u8; 18] = b"TPC-CALIBRATE-2026";
    /// Bytes covered by `length`: magic..digest, excluding the length prefix itself.
    pub const BODY_LEN: u16 = 56;
    /// Total encoded frame size including the 2-byte length prefix.
    pub const TOTAL_LEN: usize = 58;

    /// Encode a calibration frame for the given sequence number.
    pub fn encode(seq: u16) -> [u8; Self::TOTAL_LEN] {
        let seq_be = seq.to_be_bytes();
        let digest = Self::digest(&seq_be);

        let mut frame = [0u8; Self::TOTAL_LEN];
        frame[0..2].copy_from_slice(&Self::BODY_LEN.to_be_bytes());
        frame[2..6].copy_from_slice(&Self::MAGIC);
        frame[6..8].copy_from_slice(&seq_be);
        frame[8..26].copy_from_slice(Self::PAYLOAD);
        frame[26..58].copy_from_slice(&digest);
        frame
    }

    /// Decode a 58-byte calibration frame, returning the sequence number and
    /// whether the digest and payload both match. Never errors: a malformed
    /// frame is simply reported as `intact = false`.
    pub fn decode(frame: &[u8]) -> Option<(u16, bool)> {
        if frame.len() < Self::TOTAL_LEN {
            return None;
        }
        let magic = &frame[2..6];
        let seq_bytes = &frame[6..8];
        let seq = u16::from_be_bytes([seq_bytes[0], seq_bytes[1]]);
        let payload = &frame[8..26];
        let received_digest = &frame[26..58];

        let expected_digest = Self::digest(seq_bytes);
        let intact = magic == Self::MAGIC
            && payload == Self::PAYLOAD.as_slice()
            && received_digest == expected_digest.as_slice();

        Some((seq, intact))
    }

    fn digest(seq_be: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(Self::MAGIC);
        hasher.update(seq_be);
        hasher.update(Self::PAYLOAD);
        hasher.finalize().into()
    }
}
