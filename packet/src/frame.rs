//! Packet framing over byte streams.

use std::fmt;
use std::io::{self, Read, Write};

use crate::error::PacketError;
use crate::limits::{max_payload, HEADER_SIZE, MAX_CAPACITY};
use crate::packet::Packet;

/// Result type for framing operations.
pub type FrameResult<T> = Result<T, FrameError>;

/// Errors that can occur while moving packets over a stream.
#[derive(Debug)]
#[non_exhaustive]
pub enum FrameError {
    /// The underlying stream failed or ended mid-frame.
    Io(io::Error),

    /// The frame header announces more payload than the receiver accepts.
    FrameTooLarge {
        /// Payload size read from the header.
        size: usize,
        /// Largest payload the receiver accepts.
        max: usize,
    },

    /// The received bytes could not be wrapped as a packet.
    Packet(PacketError),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "frame i/o error: {err}"),
            Self::FrameTooLarge { size, max } => {
                write!(f, "frame announces {size} payload bytes, limit is {max}")
            }
            Self::Packet(err) => write!(f, "frame packet error: {err}"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Packet(err) => Some(err),
            Self::FrameTooLarge { .. } => None,
        }
    }
}

impl From<io::Error> for FrameError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<PacketError> for FrameError {
    fn from(err: PacketError) -> Self {
        Self::Packet(err)
    }
}

/// Prepares `packet` and writes header plus payload to `writer`.
///
/// Returns the number of bytes written.
pub fn write_frame<W: Write + ?Sized>(writer: &mut W, packet: &mut Packet) -> FrameResult<usize> {
    packet.prepare();
    let bytes = packet.get_buffer();
    writer.write_all(bytes)?;
    log::trace!("wrote frame of {} bytes", bytes.len());
    Ok(bytes.len())
}

/// Reads exactly one frame from `reader`.
///
/// The returned packet has its size taken from the header and its cursor
/// positioned at the first payload byte. `max_capacity` bounds the frame
/// length (header included) the receiver is willing to allocate; it is
/// clamped to [`MAX_CAPACITY`].
pub fn read_frame<R: Read + ?Sized>(reader: &mut R, max_capacity: usize) -> FrameResult<Packet> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let size = usize::from(u16::from_le_bytes(header));
    let max = max_payload(max_capacity.min(MAX_CAPACITY));
    if size > max {
        log::debug!("rejecting frame of {size} payload bytes (limit {max})");
        return Err(FrameError::FrameTooLarge { size, max });
    }

    let mut bytes = vec![0u8; HEADER_SIZE + size];
    bytes[..HEADER_SIZE].copy_from_slice(&header);
    reader.read_exact(&mut bytes[HEADER_SIZE..])?;

    let mut packet = Packet::from_buffer(bytes)?;
    packet.get_header()?;
    log::trace!("read frame with {size} payload bytes");
    Ok(packet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::PACKET_MAXSIZE;
    use std::io::Cursor;

    #[test]
    fn write_then_read_frame() {
        let mut packet = Packet::new();
        packet.write_int(-7).unwrap();
        packet.write_string("ok").unwrap();

        let mut stream = Vec::new();
        let written = write_frame(&mut stream, &mut packet).unwrap();
        assert_eq!(written, HEADER_SIZE + packet.size());
        assert_eq!(stream.len(), written);

        let mut received = read_frame(&mut Cursor::new(stream), PACKET_MAXSIZE).unwrap();
        assert_eq!(received.size(), packet.size());
        assert_eq!(received.read_int().unwrap(), -7);
        assert_eq!(received.read_string().unwrap(), "ok");
        assert!(received.read_byte().is_err());
    }

    #[test]
    fn empty_frame() {
        let mut packet = Packet::new();
        let mut stream = Vec::new();
        write_frame(&mut stream, &mut packet).unwrap();
        assert_eq!(stream, vec![0, 0]);

        let received = read_frame(&mut stream.as_slice(), PACKET_MAXSIZE).unwrap();
        assert_eq!(received.size(), 0);
        assert_eq!(received.capacity(), HEADER_SIZE);
    }

    #[test]
    fn frames_read_back_to_back() {
        let mut stream = Vec::new();
        for value in [1i64, 2, 3] {
            let mut packet = Packet::new();
            packet.write_long(value).unwrap();
            write_frame(&mut stream, &mut packet).unwrap();
        }

        let mut cursor = Cursor::new(stream);
        for expected in [1i64, 2, 3] {
            let mut packet = read_frame(&mut cursor, PACKET_MAXSIZE).unwrap();
            assert_eq!(packet.read_long().unwrap(), expected);
        }
        assert!(matches!(
            read_frame(&mut cursor, PACKET_MAXSIZE),
            Err(FrameError::Io(ref err)) if err.kind() == io::ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn truncated_payload_is_unexpected_eof() {
        let stream = vec![4u8, 0, 1, 2];
        let err = read_frame(&mut stream.as_slice(), PACKET_MAXSIZE).unwrap_err();
        match err {
            FrameError::Io(err) => assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected i/o error, got {other:?}"),
        }
    }

    #[test]
    fn oversized_frame_rejected() {
        let stream = vec![0xE8u8, 0x03];
        let err = read_frame(&mut stream.as_slice(), 100).unwrap_err();
        assert!(matches!(
            err,
            FrameError::FrameTooLarge { size: 1000, max: 98 }
        ));
    }

    #[test]
    fn error_display_and_source() {
        use std::error::Error;

        let err = FrameError::from(PacketError::HeaderOutOfRange { size: 5, max: 1 });
        assert!(err.to_string().contains("packet"));
        assert!(err.source().is_some());

        let err = FrameError::FrameTooLarge { size: 9, max: 3 };
        assert!(err.to_string().contains('9'));
        assert!(err.source().is_none());
    }
}
