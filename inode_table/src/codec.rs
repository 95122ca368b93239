//! Backing store codec
//!
//! The store is a bare sequence of fixed-size records: no header, no count,
//! no checksum. The record count is the file length divided by
//! [`RECORD_SIZE`], capped at the table capacity.
//!
//! ## Record layout
//!
//! | offset | size | field                                |
//! |--------|------|--------------------------------------|
//! | 0      | 4    | id, u32 little-endian                |
//! | 4      | 4    | parent id, u32 little-endian         |
//! | 8      | 1    | kind tag, `d` or `f`                 |
//! | 9      | 32   | name, NUL-padded                     |
//! | 41     | 3    | zero padding                         |
//!
//! The padding keeps every record 4-byte aligned.
//!
//! ## Loading
//!
//! Individually bad records are dropped with a warning and reported in the
//! [`LoadReport`]. The first valid root directory record (id 0, its own
//! parent) anchors the table, name included; records before it are dropped.
//! A store without a valid root is fatal.

use crate::inode::{Inode, InodeId, InodeKind, InodeName, NAME_SIZE};
use crate::table::{InodeTable, TableError, MAX_INODES};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

/// Size of one on-disk record
pub const RECORD_SIZE: usize = 44;

const PARENT_OFFSET: usize = 4;
const KIND_OFFSET: usize = 8;
const NAME_OFFSET: usize = 9;

/// Errors raised while loading or saving the backing store
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt namespace: {0}")]
    CorruptNamespace(String),
}

/// Why a decoded record was left out of the table
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DropReason {
    #[error("unknown kind tag {0:#04x}")]
    UnknownKind(u8),

    #[error("record precedes the root directory")]
    BeforeRoot,

    #[error("{0}")]
    Rejected(#[from] TableError),
}

/// A record dropped during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRecord {
    /// Position of the record in the store
    pub position: usize,
    /// Raw stored id
    pub id: u32,
    /// Raw stored parent id
    pub parent_id: u32,
    /// Why it was dropped
    pub reason: DropReason,
}

/// Summary of a load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Whether a backing store was found
    pub store_existed: bool,
    /// Complete records decoded from the store
    pub records_read: usize,
    /// Records dropped by validation
    pub dropped: Vec<DroppedRecord>,
    /// Records past the table capacity, never decoded
    pub ignored_records: usize,
    /// Bytes of an incomplete trailing record
    pub trailing_bytes: usize,
}

impl LoadReport {
    /// True when every stored byte made it into the table
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.ignored_records == 0 && self.trailing_bytes == 0
    }
}

/// A record as stored, before the kind tag is checked
struct RawRecord {
    id: u32,
    parent_id: u32,
    kind_tag: u8,
    name: InodeName,
}

impl RawRecord {
    fn decode(bytes: &[u8]) -> Self {
        let word = |offset: usize| {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(&bytes[offset..offset + 4]);
            u32::from_le_bytes(buf)
        };
        Self {
            id: word(0),
            parent_id: word(PARENT_OFFSET),
            kind_tag: bytes[KIND_OFFSET],
            name: InodeName::from_field(&bytes[NAME_OFFSET..NAME_OFFSET + NAME_SIZE]),
        }
    }

    fn into_inode(self) -> Result<Inode, DropReason> {
        let kind =
            InodeKind::from_tag(self.kind_tag).ok_or(DropReason::UnknownKind(self.kind_tag))?;
        Ok(Inode::new(
            InodeId::new(self.id),
            InodeId::new(self.parent_id),
            kind,
            self.name,
        ))
    }
}

/// Encodes one record
pub fn encode_record(inode: &Inode) -> [u8; RECORD_SIZE] {
    let mut record = [0u8; RECORD_SIZE];
    record[..PARENT_OFFSET].copy_from_slice(&inode.id.as_u32().to_le_bytes());
    record[PARENT_OFFSET..KIND_OFFSET].copy_from_slice(&inode.parent_id.as_u32().to_le_bytes());
    record[KIND_OFFSET] = inode.kind.tag();
    record[NAME_OFFSET..NAME_OFFSET + NAME_SIZE].copy_from_slice(&inode.name.to_field());
    record
}

/// Encodes every live record, in table order
pub fn encode_table(table: &InodeTable) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(table.len() * RECORD_SIZE);
    for inode in table.iter() {
        bytes.extend_from_slice(&encode_record(inode));
    }
    bytes
}

/// Decodes and validates a store image
pub fn decode_table(bytes: &[u8]) -> Result<(InodeTable, LoadReport), CodecError> {
    let mut report = LoadReport {
        store_existed: true,
        trailing_bytes: bytes.len() % RECORD_SIZE,
        ..LoadReport::default()
    };

    let stored = bytes.len() / RECORD_SIZE;
    let readable = stored.min(MAX_INODES);
    report.records_read = readable;
    report.ignored_records = stored - readable;

    let records = bytes
        .chunks_exact(RECORD_SIZE)
        .take(readable)
        .map(RawRecord::decode);

    let mut table: Option<InodeTable> = None;
    for (position, raw) in records.enumerate() {
        let (id, parent_id) = (raw.id, raw.parent_id);
        let outcome = raw.into_inode().and_then(|inode| {
            if let Some(table) = table.as_mut() {
                return table.restore(inode).map_err(DropReason::from);
            }
            if !inode.is_root() {
                return Err(DropReason::BeforeRoot);
            }
            table = Some(InodeTable::with_root(inode, MAX_INODES));
            Ok(())
        });
        if let Err(reason) = outcome {
            warn!(position, id, parent_id, %reason, "dropping corrupt inode record");
            report.dropped.push(DroppedRecord {
                position,
                id,
                parent_id,
                reason,
            });
        }
    }

    let table = match table {
        Some(table) => table,
        None if readable == 0 => {
            return Err(CodecError::CorruptNamespace(
                "store holds no records".to_string(),
            ))
        }
        None => {
            return Err(CodecError::CorruptNamespace(format!(
                "no valid root directory among {} records",
                readable
            )))
        }
    };

    if report.ignored_records > 0 {
        warn!(
            ignored = report.ignored_records,
            capacity = MAX_INODES,
            "store holds more records than the table capacity"
        );
    }
    if report.trailing_bytes > 0 {
        warn!(
            trailing_bytes = report.trailing_bytes,
            "ignoring incomplete trailing record"
        );
    }

    Ok((table, report))
}

/// Loads the table from `path`
///
/// A missing store yields a bootstrap table holding only the root.
pub fn load(path: &Path) -> Result<(InodeTable, LoadReport), CodecError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no backing store, starting with an empty namespace");
            return Ok((InodeTable::bootstrap(), LoadReport::default()));
        }
        Err(source) => {
            return Err(CodecError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let (table, report) = decode_table(&bytes)?;
    info!(
        path = %path.display(),
        records = table.len(),
        dropped = report.dropped.len(),
        "loaded inode table"
    );
    Ok((table, report))
}

/// Rewrites the whole store at `path`
///
/// The image is written to a temporary file next to `path` and renamed over
/// it, so a reader never observes a partially written store.
pub fn save(table: &InodeTable, path: &Path) -> Result<(), CodecError> {
    let io_error = |source: io::Error| CodecError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
    tmp.write_all(&encode_table(table)).map_err(io_error)?;
    tmp.as_file().sync_all().map_err(io_error)?;
    tmp.persist(path).map_err(|e| io_error(e.error))?;

    info!(path = %path.display(), records = table.len(), "saved inode table");
    Ok(())
}
