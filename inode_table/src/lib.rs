//! # Inode Table
//!
//! Metadata engine for the emulated namespace.
//!
//! ## Design
//!
//! - **Inode**: id, parent id, kind and a bounded name. No content.
//! - **InodeTable**: fixed-capacity, append-only, always holds the root
//! - **Codec**: a bare array of fixed-size records in one file, validated on
//!   load and rewritten whole on save
//!
//! Ids are never reused and the table never grows past [`MAX_INODES`].
//! Names longer than [`MAX_NAME_LEN`] bytes are truncated, which is a
//! property of the on-disk format rather than a user choice.

pub mod codec;
pub mod inode;
pub mod table;

pub use codec::{
    decode_table, encode_record, encode_table, load, save, CodecError, DropReason,
    DroppedRecord, LoadReport, RECORD_SIZE,
};
pub use inode::{Inode, InodeId, InodeKind, InodeName, NameError, MAX_NAME_LEN, NAME_SIZE};
pub use table::{InodeTable, TableError, MAX_INODES};
