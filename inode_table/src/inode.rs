//! Inode records, identifiers and bounded names

use std::fmt;
use thiserror::Error;

/// Size of the on-disk name field, terminator included
pub const NAME_SIZE: usize = 32;

/// Longest name (in bytes) that fits the on-disk field
pub const MAX_NAME_LEN: usize = NAME_SIZE - 1;

/// Identifier of an inode
///
/// Ids are handed out in increasing order and never reused. For a table
/// built only by creation the id is also the record's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InodeId(u32);

impl InodeId {
    /// The root directory
    pub const ROOT: InodeId = InodeId(0);

    /// Creates an id from its raw on-disk value
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw on-disk value
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the id as a table index
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns the id that follows this one
    pub fn successor(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for InodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an inode names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InodeKind {
    /// A directory that can hold other inodes
    Directory,
    /// A regular file (metadata only)
    File,
}

impl InodeKind {
    /// Returns the one-byte tag used in the backing store
    pub const fn tag(self) -> u8 {
        match self {
            InodeKind::Directory => b'd',
            InodeKind::File => b'f',
        }
    }

    /// Parses a backing store tag
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'd' => Some(InodeKind::Directory),
            b'f' => Some(InodeKind::File),
            _ => None,
        }
    }
}

impl fmt::Display for InodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InodeKind::Directory => write!(f, "Directory"),
            InodeKind::File => write!(f, "File"),
        }
    }
}

/// Errors produced when normalizing a user-supplied name
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Name is empty")]
    Empty,

    #[error("Name contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A name that fits the fixed-width on-disk field
///
/// Longer input is silently truncated to [`MAX_NAME_LEN`] bytes, cut on a
/// character boundary. Two names that share the truncated prefix are
/// therefore the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InodeName(String);

impl InodeName {
    /// Normalizes a user-supplied name
    ///
    /// # Examples
    ///
    /// ```
    /// use inode_table::InodeName;
    ///
    /// let name = InodeName::new("a-very-long-name-that-will-not-fit-on-disk").unwrap();
    /// assert_eq!(name.as_str(), "a-very-long-name-that-will-not-");
    /// assert!(InodeName::new("").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, NameError> {
        if raw.is_empty() {
            return Err(NameError::Empty);
        }
        if let Some(bad) = raw.chars().find(|c| *c == '/' || *c == '\0') {
            return Err(NameError::InvalidCharacter(bad));
        }
        Ok(Self(truncate_to_field(raw).to_string()))
    }

    /// The root's name, which is empty
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Decodes a NUL-padded on-disk name field
    pub(crate) fn from_field(field: &[u8]) -> Self {
        let end = field.iter().position(|b| *b == 0).unwrap_or(field.len());
        let decoded = String::from_utf8_lossy(&field[..end]);
        Self(truncate_to_field(&decoded).to_string())
    }

    /// Encodes the name into a NUL-padded on-disk field
    pub(crate) fn to_field(&self) -> [u8; NAME_SIZE] {
        let mut field = [0u8; NAME_SIZE];
        let bytes = self.0.as_bytes();
        field[..bytes.len()].copy_from_slice(bytes);
        field
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn truncate_to_field(raw: &str) -> &str {
    if raw.len() <= MAX_NAME_LEN {
        return raw;
    }
    let mut end = MAX_NAME_LEN;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    &raw[..end]
}

/// A metadata record for one namespace entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inode {
    /// Unique id
    pub id: InodeId,
    /// Containing directory; the root is its own parent
    pub parent_id: InodeId,
    /// Directory or file
    pub kind: InodeKind,
    /// Name, unique among siblings
    pub name: InodeName,
}

impl Inode {
    /// Creates a new inode record
    pub fn new(id: InodeId, parent_id: InodeId, kind: InodeKind, name: InodeName) -> Self {
        Self {
            id,
            parent_id,
            kind,
            name,
        }
    }

    /// Creates the root record: id 0, its own parent, an empty name
    pub fn root() -> Self {
        Self::new(
            InodeId::ROOT,
            InodeId::ROOT,
            InodeKind::Directory,
            InodeName::root(),
        )
    }

    /// Returns true for the self-parented root directory
    pub fn is_root(&self) -> bool {
        self.id == InodeId::ROOT
            && self.parent_id == InodeId::ROOT
            && self.kind == InodeKind::Directory
    }

    pub fn is_directory(&self) -> bool {
        self.kind == InodeKind::Directory
    }
}
