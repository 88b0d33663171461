//! Outgoing-frame classification for the host's dispatch path
//!
//! Test-traffic payloads carry a little-endian sequence number in bytes
//! 0..2 and a two-byte marker in bytes 2..4. The classifier tags marked
//! frames with the node's current exclusive TX slot in the unicast
//! slotframe; everything else rides the broadcast slotframe.

use serde::{Deserialize, Serialize};

use crate::slot::SlotIndex;

/// Marker bytes identifying test traffic, at payload offset 2
pub const TEST_TRAFFIC_MARKER: [u8; 2] = [0xFF, 0xFF];

/// Byte offset of the marker within the payload
pub const MARKER_OFFSET: usize = 2;

/// Total test-traffic payload size in bytes
pub const TEST_PAYLOAD_SIZE: usize = 50;

/// Slotframe carrying shared/advertising broadcast traffic
pub const BROADCAST_SLOTFRAME: u8 = 0;

/// Slotframe carrying the adaptive unicast schedule
pub const UNICAST_SLOTFRAME: u8 = 1;

/// Where an outgoing frame should be transmitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTag {
    /// Slotframe handle
    pub slotframe: u8,
    /// Slot index within the slotframe
    pub timeslot: SlotIndex,
    /// Channel offset within the hopping sequence
    pub channel_offset: u8,
}

/// Classify an outgoing payload, tagging marked test traffic with the
/// node's current exclusive TX slot
#[must_use]
pub fn classify_frame(payload: &[u8], current_tx_slot: SlotIndex) -> LinkTag {
    let marked = payload.len() >= MARKER_OFFSET + TEST_TRAFFIC_MARKER.len()
        && payload[MARKER_OFFSET..MARKER_OFFSET + TEST_TRAFFIC_MARKER.len()]
            == TEST_TRAFFIC_MARKER;

    if marked {
        LinkTag {
            slotframe: UNICAST_SLOTFRAME,
            timeslot: current_tx_slot,
            channel_offset: 0,
        }
    } else {
        LinkTag {
            slotframe: BROADCAST_SLOTFRAME,
            timeslot: SlotIndex(0),
            channel_offset: 0,
        }
    }
}

/// Write a sequence number into payload bytes 0..2, little-endian
pub fn encode_seqnum(payload: &mut [u8], seqnum: u16) {
    payload[0] = (seqnum & 0xFF) as u8;
    payload[1] = (seqnum >> 8) as u8;
}

/// Read the little-endian sequence number from payload bytes 0..2
#[must_use]
pub fn decode_seqnum(payload: &[u8]) -> u16 {
    u16::from(payload[0]) | (u16::from(payload[1]) << 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_frame_tagged_with_current_slot() {
        let mut payload = [0u8; TEST_PAYLOAD_SIZE];
        payload[2] = 0xFF;
        payload[3] = 0xFF;
        let tag = classify_frame(&payload, SlotIndex(3));
        assert_eq!(tag.slotframe, UNICAST_SLOTFRAME);
        assert_eq!(tag.timeslot, SlotIndex(3));
    }

    #[test]
    fn unmarked_frame_rides_broadcast_slotframe() {
        let payload = [0u8; 8];
        let tag = classify_frame(&payload, SlotIndex(3));
        assert_eq!(tag.slotframe, BROADCAST_SLOTFRAME);
        assert_eq!(tag.timeslot, SlotIndex(0));
    }

    #[test]
    fn short_frame_is_never_marked() {
        let tag = classify_frame(&[0xFF], SlotIndex(2));
        assert_eq!(tag.slotframe, BROADCAST_SLOTFRAME);
    }

    #[test]
    fn seqnum_round_trip() {
        let mut payload = [0u8; 4];
        encode_seqnum(&mut payload, 0x1234);
        assert_eq!(decode_seqnum(&payload), 0x1234);
    }
}
