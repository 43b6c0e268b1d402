//! Introspection and debugging tools for tilewire keys and packets.
//!
//! - Encode and decode coordinate keys
//! - Inspect framed packet dumps (declared vs actual size), singly or by directory
//! - Decode or build packets from a caller-supplied field list
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what is on the wire.

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glob::Pattern;
use packet::{Packet, HEADER_SIZE};
use serde::{Deserialize, Serialize};

/// A coordinate key with its unpacked components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyReport {
    pub key: i64,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Packs coordinates and reports the key.
///
/// With `checked`, components that would be truncated are rejected.
pub fn key_report_from_coords(x: i32, y: i32, z: i32, checked: bool) -> Result<KeyReport> {
    let key = if checked {
        coords::encode_checked(x, y, z)
    } else {
        coords::encode(x, y, z)
    }
    .context("encode key")?;
    Ok(key_report_from_key(key))
}

/// Unpacks a key.
pub fn key_report_from_key(key: i64) -> KeyReport {
    let (x, y, z) = coords::decode(key);
    KeyReport { key, x, y, z }
}

/// Size breakdown of a framed packet dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    /// Total bytes in the dump.
    pub total_len: usize,
    /// Payload size announced by the header.
    pub declared_payload: usize,
    /// Payload bytes actually present after the header.
    pub actual_payload: usize,
    /// Bytes beyond the announced payload.
    pub trailing: usize,
}

impl InspectReport {
    /// Returns `true` if the dump holds exactly one complete frame.
    pub fn is_exact(&self) -> bool {
        self.declared_payload == self.actual_payload
    }
}

/// Reads the header of a packet dump and compares it with the bytes present.
pub fn inspect_frame(bytes: &[u8]) -> Result<InspectReport> {
    if bytes.len() < HEADER_SIZE {
        bail!(
            "packet too small: {} bytes, need at least {HEADER_SIZE}",
            bytes.len()
        );
    }
    let declared_payload = usize::from(u16::from_le_bytes([bytes[0], bytes[1]]));
    let actual_payload = bytes.len() - HEADER_SIZE;
    Ok(InspectReport {
        total_len: bytes.len(),
        declared_payload,
        actual_payload,
        trailing: actual_payload.saturating_sub(declared_payload),
    })
}

/// A packet dump file found by [`find_dumps`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpEntry {
    pub path: PathBuf,
    pub len: u64,
}

/// Lists the files in `dir` whose names match `pattern` (all files when
/// `None`).
///
/// Entries come back in path order, or largest first with ties in path
/// order when `largest_first` is set.
pub fn find_dumps(dir: &Path, pattern: Option<&str>, largest_first: bool) -> Result<Vec<DumpEntry>> {
    let dir_str = dir
        .to_str()
        .with_context(|| format!("directory {} is not valid UTF-8", dir.display()))?;
    let full = format!("{}/{}", Pattern::escape(dir_str), pattern.unwrap_or("*"));

    let mut dumps = Vec::new();
    for path in glob::glob(&full).with_context(|| format!("invalid glob pattern {full}"))? {
        let path = path?;
        let metadata =
            fs::metadata(&path).with_context(|| format!("stat {}", path.display()))?;
        if metadata.is_file() {
            dumps.push(DumpEntry {
                path,
                len: metadata.len(),
            });
        }
    }
    dumps.sort_by(|a, b| a.path.cmp(&b.path));
    if largest_first {
        dumps.sort_by_key(|dump| Reverse(dump.len));
    }
    log::debug!("found {} dumps under {}", dumps.len(), dir.display());
    Ok(dumps)
}

/// Field types a packet can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Byte,
    Bool,
    Short,
    Int,
    Long,
    String,
}

/// A typed packet field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Byte(u8),
    Bool(bool),
    Short(i16),
    Int(i32),
    Long(i64),
    String(String),
}

/// Reads `fields` in order from a framed packet dump.
///
/// Only the declared payload is visible to the readers; bytes after the
/// frame are ignored and a field that runs past the payload is an error.
pub fn decode_fields(bytes: &[u8], fields: &[FieldKind]) -> Result<Vec<FieldValue>> {
    let report = inspect_frame(bytes)?;
    if report.actual_payload < report.declared_payload {
        bail!(
            "packet truncated: header declares {} payload bytes, {} present",
            report.declared_payload,
            report.actual_payload
        );
    }
    if report.trailing > 0 {
        log::debug!("ignoring {} bytes after the frame", report.trailing);
    }
    let frame_len = HEADER_SIZE + report.declared_payload;
    let mut packet = Packet::from_buffer(bytes[..frame_len].to_vec()).context("wrap packet")?;
    let size = packet.get_header().context("read header")?;
    log::debug!("decoding {} fields from {size} payload bytes", fields.len());

    let mut values = Vec::with_capacity(fields.len());
    for (index, kind) in fields.iter().enumerate() {
        let value = match kind {
            FieldKind::Byte => packet.read_byte().map(FieldValue::Byte),
            FieldKind::Bool => packet.read_bool().map(FieldValue::Bool),
            FieldKind::Short => packet.read_short().map(FieldValue::Short),
            FieldKind::Int => packet.read_int().map(FieldValue::Int),
            FieldKind::Long => packet.read_long().map(FieldValue::Long),
            FieldKind::String => packet.read_string().map(FieldValue::String),
        }
        .with_context(|| format!("read field {index} ({kind:?})"))?;
        values.push(value);
    }
    Ok(values)
}

/// Writes `values` into a packet and returns the prepared frame bytes.
pub fn encode_fields(values: &[FieldValue]) -> Result<Vec<u8>> {
    let mut packet = Packet::new();
    for (index, value) in values.iter().enumerate() {
        match value {
            FieldValue::Byte(v) => packet.write_byte(*v),
            FieldValue::Bool(v) => packet.write_bool(*v),
            FieldValue::Short(v) => packet.write_short(*v),
            FieldValue::Int(v) => packet.write_int(*v),
            FieldValue::Long(v) => packet.write_long(*v),
            FieldValue::String(v) => packet.write_string(v),
        }
        .with_context(|| format!("write field {index}"))?;
    }
    packet.prepare();
    Ok(packet.get_buffer().to_vec())
}

/// One line per field, `index: kind = value`.
pub fn format_fields_pretty(values: &[FieldValue]) -> String {
    let mut out = String::new();
    for (index, value) in values.iter().enumerate() {
        let (kind, rendered) = match value {
            FieldValue::Byte(v) => ("byte", v.to_string()),
            FieldValue::Bool(v) => ("bool", v.to_string()),
            FieldValue::Short(v) => ("short", v.to_string()),
            FieldValue::Int(v) => ("int", v.to_string()),
            FieldValue::Long(v) => ("long", v.to_string()),
            FieldValue::String(v) => ("string", format!("{v:?}")),
        };
        out.push_str(&format!("{index}: {kind} = {rendered}\n"));
    }
    out
}
