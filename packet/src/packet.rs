//! Fixed-capacity packet buffer with a shared read/write cursor.

use std::fmt;

use crate::error::{PacketError, PacketResult};
use crate::limits::{
    max_payload, HEADER_SIZE, MAX_CAPACITY, MIN_CAPACITY, PACKET_MAXSIZE, TAIL_MARGIN,
};

/// A single framed message: a 2-byte payload length header followed by
/// typed fields.
///
/// The buffer is allocated once and never grows. Writers advance both the
/// cursor and the payload size; readers advance only the cursor. All
/// multi-byte values are little-endian.
///
/// Outgoing packets are built with the `write_*` methods, finished with
/// [`prepare`](Self::prepare) and sent as [`get_buffer`](Self::get_buffer).
/// Incoming packets are wrapped with [`from_buffer`](Self::from_buffer),
/// sized with [`get_header`](Self::get_header) and consumed with the
/// `read_*` methods in the order the sender wrote them.
pub struct Packet {
    buffer: Vec<u8>,
    cursor: usize,
    size: usize,
}

impl Packet {
    /// Creates an empty packet with the default [`PACKET_MAXSIZE`] capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: vec![0; PACKET_MAXSIZE],
            cursor: HEADER_SIZE,
            size: 0,
        }
    }

    /// Creates an empty packet with a custom capacity.
    ///
    /// # Errors
    ///
    /// Returns [`PacketError::InvalidCapacity`] if `capacity` is outside
    /// [`MIN_CAPACITY`]`..=`[`MAX_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> PacketResult<Self> {
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
            return Err(PacketError::InvalidCapacity {
                capacity,
                min: MIN_CAPACITY,
                max: MAX_CAPACITY,
            });
        }
        Ok(Self {
            buffer: vec![0; capacity],
            cursor: HEADER_SIZE,
            size: 0,
        })
    }

    /// Wraps a received buffer, header included.
    ///
    /// The capacity becomes `bytes.len()`. The payload size stays 0 until
    /// [`get_header`](Self::get_header) is called.
    ///
    /// # Errors
    ///
    /// Returns [`PacketError::InvalidCapacity`] if the buffer cannot hold the
    /// header or is larger than [`MAX_CAPACITY`].
    pub fn from_buffer(bytes: Vec<u8>) -> PacketResult<Self> {
        if bytes.len() < HEADER_SIZE || bytes.len() > MAX_CAPACITY {
            return Err(PacketError::InvalidCapacity {
                capacity: bytes.len(),
                min: HEADER_SIZE,
                max: MAX_CAPACITY,
            });
        }
        Ok(Self {
            buffer: bytes,
            cursor: HEADER_SIZE,
            size: 0,
        })
    }

    /// Total buffer length in bytes, header included.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Payload bytes written so far, or announced by the last header read.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Current cursor offset into the buffer.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// Largest single write that would currently succeed.
    #[must_use]
    pub fn remaining_writable(&self) -> usize {
        let by_cursor = self
            .capacity()
            .saturating_sub(TAIL_MARGIN)
            .saturating_sub(self.cursor)
            .saturating_sub(1);
        let by_size = max_payload(self.capacity()).saturating_sub(self.size);
        by_cursor.min(by_size)
    }

    /// Bytes between the cursor and the end of the buffer.
    #[must_use]
    pub fn remaining_readable(&self) -> usize {
        self.capacity().saturating_sub(self.cursor)
    }

    /// Rewinds the cursor past the header and clears the payload size.
    ///
    /// Buffer contents are kept, so a freshly written packet can be read
    /// back after a reset.
    pub fn reset(&mut self) {
        self.cursor = HEADER_SIZE;
        self.size = 0;
    }

    /// Stores the payload size in the header bytes.
    ///
    /// Call after the last write and before handing
    /// [`get_buffer`](Self::get_buffer) to the transport. Calling it again
    /// rewrites the same header.
    pub fn prepare(&mut self) {
        // size <= capacity - HEADER_SIZE <= u16::MAX
        let header = (self.size as u16).to_le_bytes();
        self.buffer[..HEADER_SIZE].copy_from_slice(&header);
        log::trace!("prepared packet header size={}", self.size);
    }

    /// Reads the payload size from the header bytes and adopts it.
    ///
    /// # Errors
    ///
    /// Returns [`PacketError::HeaderOutOfRange`] if the announced size does
    /// not fit the buffer. The current size is left unchanged in that case.
    pub fn get_header(&mut self) -> PacketResult<usize> {
        let size = usize::from(u16::from_le_bytes([self.buffer[0], self.buffer[1]]));
        let max = max_payload(self.capacity());
        if size > max {
            return Err(PacketError::HeaderOutOfRange { size, max });
        }
        self.size = size;
        log::trace!("read packet header size={size}");
        Ok(size)
    }

    /// Header plus payload, ready to be sent once [`prepare`](Self::prepare)
    /// has been called.
    #[must_use]
    pub fn get_buffer(&self) -> &[u8] {
        &self.buffer[..HEADER_SIZE + self.size]
    }

    /// Payload bytes without the header.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.buffer[HEADER_SIZE..HEADER_SIZE + self.size]
    }

    /// Returns `true` if `len` more bytes can be written without touching the
    /// tail margin.
    #[must_use]
    pub fn can_write(&self, len: usize) -> bool {
        self.cursor.saturating_add(len) < self.capacity().saturating_sub(TAIL_MARGIN)
    }

    /// Returns `true` if `len` more bytes can be read from the buffer.
    #[must_use]
    pub fn can_read(&self, len: usize) -> bool {
        self.cursor.saturating_add(len) <= self.capacity()
    }

    /// Writes a single byte.
    pub fn write_byte(&mut self, value: u8) -> PacketResult<()> {
        self.put([value])
    }

    /// Writes a bool as one byte, 1 or 0.
    pub fn write_bool(&mut self, value: bool) -> PacketResult<()> {
        self.put([u8::from(value)])
    }

    /// Writes a 2-byte signed integer.
    pub fn write_short(&mut self, value: i16) -> PacketResult<()> {
        self.put(value.to_le_bytes())
    }

    /// Writes a 4-byte signed integer.
    pub fn write_int(&mut self, value: i32) -> PacketResult<()> {
        self.put(value.to_le_bytes())
    }

    /// Writes an 8-byte signed integer.
    pub fn write_long(&mut self, value: i64) -> PacketResult<()> {
        self.put(value.to_le_bytes())
    }

    /// Writes a string as a 2-byte byte length followed by its UTF-8 bytes.
    ///
    /// The whole field is checked up front, so a failed write leaves no
    /// dangling length prefix behind.
    ///
    /// # Errors
    ///
    /// Returns [`PacketError::StringTooLong`] if the encoded length does not
    /// fit in 16 bits, or [`PacketError::WriteOverflow`] if the field does not
    /// fit in the buffer.
    pub fn write_string(&mut self, value: &str) -> PacketResult<()> {
        let bytes = value.as_bytes();
        let len = u16::try_from(bytes.len()).map_err(|_| PacketError::StringTooLong {
            len: bytes.len(),
            max: u16::MAX as usize,
        })?;
        self.ensure_write(2 + bytes.len())?;
        self.put(len.to_le_bytes())?;
        self.write_buffer(bytes)
    }

    /// Writes raw bytes.
    pub fn write_buffer(&mut self, value: &[u8]) -> PacketResult<()> {
        self.ensure_write(value.len())?;
        let end = self.cursor + value.len();
        self.buffer[self.cursor..end].copy_from_slice(value);
        self.cursor = end;
        self.size += value.len();
        Ok(())
    }

    /// Reads a single byte.
    pub fn read_byte(&mut self) -> PacketResult<u8> {
        let [value] = self.take::<1>()?;
        Ok(value)
    }

    /// Reads a bool; only a byte equal to 1 is `true`.
    pub fn read_bool(&mut self) -> PacketResult<bool> {
        Ok(self.read_byte()? == 1)
    }

    /// Reads a 2-byte signed integer.
    pub fn read_short(&mut self) -> PacketResult<i16> {
        self.take().map(i16::from_le_bytes)
    }

    /// Reads a 4-byte signed integer.
    pub fn read_int(&mut self) -> PacketResult<i32> {
        self.take().map(i32::from_le_bytes)
    }

    /// Reads an 8-byte signed integer.
    pub fn read_long(&mut self) -> PacketResult<i64> {
        self.take().map(i64::from_le_bytes)
    }

    /// Reads a length-prefixed UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns [`PacketError::ReadOverflow`] if the prefix or the string
    /// bytes run past the buffer, or [`PacketError::InvalidUtf8`] if the bytes
    /// are not valid UTF-8. The cursor is restored to the start of the field
    /// on any error.
    pub fn read_string(&mut self) -> PacketResult<String> {
        let start = self.cursor;
        let len = usize::from(u16::from_le_bytes(self.take()?));
        let result = self.read_buffer(len).and_then(|bytes| {
            std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| PacketError::InvalidUtf8 {
                    position: start + 2,
                })
        });
        if result.is_err() {
            self.cursor = start;
        }
        result
    }

    /// Reads `len` raw bytes.
    pub fn read_buffer(&mut self, len: usize) -> PacketResult<&[u8]> {
        self.ensure_read(len)?;
        let start = self.cursor;
        self.cursor += len;
        Ok(&self.buffer[start..self.cursor])
    }

    fn ensure_write(&self, len: usize) -> PacketResult<()> {
        // size also grows when writing after get_header
        let size_fits = self.size.saturating_add(len) <= max_payload(self.capacity());
        if !self.can_write(len) || !size_fits {
            return Err(PacketError::WriteOverflow {
                requested: len,
                cursor: self.cursor,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    fn ensure_read(&self, len: usize) -> PacketResult<()> {
        if !self.can_read(len) {
            return Err(PacketError::ReadOverflow {
                requested: len,
                cursor: self.cursor,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    fn put<const N: usize>(&mut self, bytes: [u8; N]) -> PacketResult<()> {
        self.ensure_write(N)?;
        self.buffer[self.cursor..self.cursor + N].copy_from_slice(&bytes);
        self.cursor += N;
        self.size += N;
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> PacketResult<[u8; N]> {
        self.ensure_read(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buffer[self.cursor..self.cursor + N]);
        self.cursor += N;
        Ok(out)
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("capacity", &self.capacity())
            .field("cursor", &self.cursor)
            .field("size", &self.size)
            .finish()
    }
}
