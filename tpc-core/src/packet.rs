//! Calibration packet extraction and packet-error-rate scoring (C4)
//!
//! Scans a demodulated byte stream for calibration packets. The 2-byte
//! length prefix precedes the magic bytes in the wire layout, so extraction
//! locates the magic first and then reads the length from the two bytes
//! immediately before it — not after, despite that looking backwards at
//! first glance. This is load-bearing: changing it breaks interop with any
//! transmitter built against the wire format.

use crate::frame::CalibrationFrame;

/// One packet found while scanning a demodulated byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoundPacket {
    pub seq: u16,
    pub intact: bool,
}

/// Scan `raw` for calibration packets, returning one entry per packet found
/// regardless of whether its integrity check passed.
pub fn extract_packets(raw: &[u8]) -> Vec<FoundPacket> {
    let mut packets = Vec::new();
    let mut i = 0usize;

    while i + 2 <= raw.len() {
        let magic_idx = match find_magic(raw, i) {
            Some(idx) => idx,
            None => break,
        };

        if magic_idx < 2 {
            i = magic_idx + 1;
            continue;
        }

        let length = u16::from_be_bytes([raw[magic_idx - 2], raw[magic_idx - 1]]) as usize;
        let packet_start = magic_idx - 2;
        let packet_end = packet_start + 2 + length;

        if packet_end > raw.len() {
            i = magic_idx + 1;
            continue;
        }

        let body = &raw[packet_start + 2..packet_end];
        if body.len() != CalibrationFrame::BODY_LEN as usize {
            i = magic_idx + 1;
            continue;
        }

        // CalibrationFrame::decode expects the full 58-byte frame including
        // the length prefix, so reconstruct it from the body we just sliced.
        let mut frame = [0u8; CalibrationFrame::TOTAL_LEN];
        frame[0..2].copy_from_slice(&raw[packet_start..packet_start + 2]);
        frame[2..].copy_from_slice(body);

        if let Some((seq, intact)) = CalibrationFrame::decode(&frame) {
            packets.push(FoundPacket { seq, intact });
        }

        i = packet_end;
    }

    packets
}

fn find_magic(raw: &[u8], from: usize) -> Option<usize> {
    raw[from..]
        .windows(CalibrationFrame::MAGIC.len())
        .position(|w| w == CalibrationFrame::MAGIC)
        .map(|p| p + from)
}

/// Packet-error-rate summary over an expected batch of calibration packets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketErrorSummary {
    pub expected: u32,
    pub found: u32,
    pub intact: u32,
    pub corrupted: u32,
    pub lost: u32,
    pub per: f64,
    pub quality: Quality,
}

/// Coarse link-quality label derived from PER.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Excellent,
    Good,
    Marginal,
    Poor,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Excellent => "excellent",
            Quality::Good => "good",
            Quality::Marginal => "marginal",
            Quality::Poor => "poor",
        }
    }

    fn from_per(per: f64) -> Self {
        if per == 0.0 {
            Quality::Excellent
        } else if per < 0.1 {
            Quality::Good
        } else if per < 0.3 {
            Quality::Marginal
        } else {
            Quality::Poor
        }
    }
}

/// Summarize packet loss/corruption against an expected count.
pub fn summarize(found: &[FoundPacket], expected: u32) -> PacketErrorSummary {
    let found_count = found.len() as u32;
    let intact = found.iter().filter(|p| p.intact).count() as u32;
    let corrupted = found_count - intact;
    let lost = expected.saturating_sub(found_count);

    let total_errors = lost + corrupted;
    let per = total_errors as f64 / expected.max(1) as f64;

    PacketErrorSummary {
        expected,
        found: found_count,
        intact,
        corrupted,
        lost,
        per,
        quality: Quality::from_per(per),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream_of(seqs: &[u16]) -> Vec<u8> {
        let mut raw = Vec::new();
        for &seq in seqs {
            raw.extend_from_slice(&CalibrationFrame::encode(seq));
        }
        raw
    }

    #[test]
    fn extracts_all_packets_in_a_clean_stream() {
        let raw = stream_of(&[0, 1, 2]);
        let found = extract_packets(&raw);
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|p| p.intact));
        assert_eq!(found.iter().map(|p| p.seq).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn tolerates_garbage_between_packets() {
        let mut raw = vec![0xDE, 0xAD, 0xBE, 0xEF];
        raw.extend_from_slice(&CalibrationFrame::encode(5));
        raw.extend_from_slice(&[0x00, 0x01, 0x02]);
        raw.extend_from_slice(&CalibrationFrame::encode(6));

        let found = extract_packets(&raw);
        assert_eq!(found.iter().map(|p| p.seq).collect::<Vec<_>>(), vec![5, 6]);
    }

    #[test]
    fn truncated_trailing_packet_is_dropped() {
        let mut raw = CalibrationFrame::encode(0).to_vec();
        raw.extend_from_slice(&CalibrationFrame::encode(1)[..30]);

        let found = extract_packets(&raw);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].seq, 0);
    }

    #[test]
    fn oversized_length_prefix_is_skipped_without_panicking() {
        // A corrupted length prefix claiming a body a few bytes longer than
        // BODY_LEN, but still short enough to fit in `raw`, must be
        // rejected rather than copied into a fixed-size 56-byte frame slice.
        let mut raw = Vec::new();
        raw.extend_from_slice(&60u16.to_be_bytes()); // length = 60, BODY_LEN is 56
        raw.extend_from_slice(&CalibrationFrame::MAGIC);
        raw.extend_from_slice(&5u16.to_be_bytes());
        raw.extend_from_slice(CalibrationFrame::PAYLOAD.as_slice());
        raw.extend_from_slice(&[0u8; 32]); // garbage digest
        raw.extend_from_slice(&[0u8; 4]); // padding to reach the claimed length of 60
        raw.extend_from_slice(&CalibrationFrame::encode(9));

        let found = extract_packets(&raw);
        assert_eq!(found.iter().map(|p| p.seq).collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn summary_with_no_loss_is_excellent() {
        let found = vec![
            FoundPacket { seq: 0, intact: true },
            FoundPacket { seq: 1, intact: true },
        ];
        let summary = summarize(&found, 2);
        assert_eq!(summary.per, 0.0);
        assert_eq!(summary.quality, Quality::Excellent);
    }

    #[test]
    fn summary_counts_lost_and_corrupted_separately() {
        let found = vec![
            FoundPacket { seq: 0, intact: true },
            FoundPacket { seq: 1, intact: false },
        ];
        // expected 4: 2 found (1 intact, 1 corrupted), 2 lost
        let summary = summarize(&found, 4);
        assert_eq!(summary.intact, 1);
        assert_eq!(summary.corrupted, 1);
        assert_eq!(summary.lost, 2);
        assert_eq!(summary.per, 0.75);
        assert_eq!(summary.quality, Quality::Poor);
    }

    #[test]
    fn quality_thresholds_match_documented_bands() {
        assert_eq!(Quality::from_per(0.0), Quality::Excellent);
        assert_eq!(Quality::from_per(0.05), Quality::Good);
        assert_eq!(Quality::from_per(0.2), Quality::Marginal);
        assert_eq!(Quality::from_per(0.5), Quality::Poor);
    }
}
