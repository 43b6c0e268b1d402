//! Buffer sizing constants.

/// Default packet capacity in bytes, header included.
pub const PACKET_MAXSIZE: usize = 16384;

/// Size of the little-endian payload length header.
pub const HEADER_SIZE: usize = 2;

/// Bytes at the end of the buffer that writes never touch.
pub const TAIL_MARGIN: usize = 16;

/// Smallest capacity accepted by [`Packet::with_capacity`](crate::Packet::with_capacity).
pub const MIN_CAPACITY: usize = HEADER_SIZE + TAIL_MARGIN;

/// Largest capacity whose payload size still fits the 16-bit header.
pub const MAX_CAPACITY: usize = HEADER_SIZE + u16::MAX as usize;

/// Largest payload a packet of `capacity` bytes can announce in its header.
#[must_use]
pub const fn max_payload(capacity: usize) -> usize {
    capacity.saturating_sub(HEADER_SIZE)
}
