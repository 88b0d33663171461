//! Periodic test-traffic payloads and delivery accounting

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use slotrl_core::frame::{encode_seqnum, MARKER_OFFSET, TEST_PAYLOAD_SIZE, TEST_TRAFFIC_MARKER};

/// Builds marked test payloads with an incrementing sequence number
///
/// Layout: bytes 0..2 little-endian seqnum, bytes 2..4 the test-traffic
/// marker, the remainder deterministic filler.
#[derive(Debug, Clone, Default)]
pub struct TrafficGenerator {
    seqnum: u16,
}

impl TrafficGenerator {
    /// Generator starting at sequence number 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The sequence number the next payload will carry
    #[must_use]
    pub fn next_seqnum(&self) -> u16 {
        self.seqnum
    }

    /// Build the next payload and bump the sequence number
    #[must_use]
    pub fn next_payload(&mut self) -> [u8; TEST_PAYLOAD_SIZE] {
        let mut payload = [0u8; TEST_PAYLOAD_SIZE];
        encode_seqnum(&mut payload, self.seqnum);
        payload[MARKER_OFFSET..MARKER_OFFSET + TEST_TRAFFIC_MARKER.len()]
            .copy_from_slice(&TEST_TRAFFIC_MARKER);
        for (i, byte) in payload.iter_mut().enumerate().skip(4) {
            #[allow(clippy::cast_possible_truncation)]
            {
                *byte = (i as u8).wrapping_add(b'a');
            }
        }
        self.seqnum = self.seqnum.wrapping_add(1);
        payload
    }
}

/// Packet-delivery accounting over a traffic run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryStats {
    /// Payloads sent
    pub sent: usize,
    /// Sent payloads that arrived
    pub received: usize,
    /// Packet delivery ratio, `received / sent` (1.0 for an empty run)
    pub pdr: f64,
}

/// Compute delivery stats from the sent and received sequence numbers
#[must_use]
pub fn delivery_stats(sent: &[u16], received: &[u16]) -> DeliveryStats {
    let received_set: HashSet<u16> = received.iter().copied().collect();
    let delivered = sent.iter().filter(|s| received_set.contains(s)).count();
    let pdr = if sent.is_empty() {
        1.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        {
            delivered as f64 / sent.len() as f64
        }
    };
    DeliveryStats {
        sent: sent.len(),
        received: delivered,
        pdr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slotrl_core::frame::decode_seqnum;

    #[test]
    fn payloads_are_marked_and_sequenced() {
        let mut traffic = TrafficGenerator::new();
        let first = traffic.next_payload();
        let second = traffic.next_payload();

        assert_eq!(decode_seqnum(&first), 0);
        assert_eq!(decode_seqnum(&second), 1);
        assert_eq!(&first[2..4], &TEST_TRAFFIC_MARKER);
        assert_eq!(first[4], 4u8.wrapping_add(b'a'));
    }

    #[test]
    fn pdr_counts_only_sent_seqnums() {
        let stats = delivery_stats(&[0, 1, 2, 3], &[1, 3, 99]);
        assert_eq!(stats.sent, 4);
        assert_eq!(stats.received, 2);
        assert_relative_eq!(stats.pdr, 0.5);
    }

    #[test]
    fn empty_run_has_unit_pdr() {
        let stats = delivery_stats(&[], &[]);
        assert_relative_eq!(stats.pdr, 1.0);
    }
}
