//! Fixed-capacity packet buffer for the tilewire wire format.
//!
//! A packet is a 2-byte little-endian payload length followed by typed fields
//! written in an order both sides agree on. The format does not describe its
//! own fields; schema knowledge lives with the caller.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - Every read and write is checked against the buffer.
//! - **Atomic failures** - A failed read or write leaves the cursor where it was.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use packet::Packet;
//!
//! let mut packet = Packet::new();
//! packet.write_byte(1).unwrap();
//! packet.write_string("Hello World").unwrap();
//! packet.prepare();
//!
//! let mut received = Packet::from_buffer(packet.get_buffer().to_vec()).unwrap();
//! assert_eq!(received.get_header().unwrap(), packet.size());
//! assert_eq!(received.read_byte().unwrap(), 1);
//! assert_eq!(received.read_string().unwrap(), "Hello World");
//! ```

mod error;
mod frame;
mod limits;
mod packet;

pub use error::{PacketError, PacketResult};
pub use frame::{read_frame, write_frame, FrameError, FrameResult};
pub use limits::{
    max_payload, HEADER_SIZE, MAX_CAPACITY, MIN_CAPACITY, PACKET_MAXSIZE, TAIL_MARGIN,
};
pub use packet::Packet;
