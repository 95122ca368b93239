//! Fixed-capacity inode table
//!
//! The table is append-only. Records stay in insertion order, which is also
//! increasing id order, and every non-root record's parent appears before it.

use crate::inode::{Inode, InodeId, InodeKind, InodeName};
use std::collections::HashMap;
use thiserror::Error;

/// Maximum number of inodes, root included
pub const MAX_INODES: usize = 1024;

/// Errors raised when a record cannot join the table
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Max inodes reached ({capacity})")]
    CapacityExceeded { capacity: usize },

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Parent inode {0} does not exist")]
    ParentNotFound(InodeId),

    #[error("Parent inode {0} is not a directory")]
    NotADirectory(InodeId),

    #[error("Inode {id} is out of order (previous id {previous})")]
    OutOfOrder { id: InodeId, previous: InodeId },

    #[error("Inode {0} is outside the id range")]
    IdOutOfRange(InodeId),

    #[error("Inode {0} has an empty name")]
    Unnamed(InodeId),
}

/// The inode table
///
/// Always contains the root. Sibling names are indexed per parent so
/// uniqueness checks and lookups do not scan the whole table.
#[derive(Debug, Clone)]
pub struct InodeTable {
    records: Vec<Inode>,
    names: HashMap<InodeId, HashMap<String, InodeId>>,
    capacity: usize,
}

impl InodeTable {
    /// Creates a table holding only the root, with the default capacity
    pub fn bootstrap() -> Self {
        Self::with_capacity(MAX_INODES)
    }

    /// Creates a table holding only the root, with a custom capacity
    ///
    /// The capacity covers the root, so it is never less than one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: vec![Inode::root()],
            names: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Creates a table around a root decoded from a store
    ///
    /// The caller has already checked `root.is_root()`; only the name can
    /// differ from a bootstrap root.
    pub(crate) fn with_root(root: Inode, capacity: usize) -> Self {
        Self {
            records: vec![root],
            names: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false, since the table always holds the root
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    /// The id the next appended record will receive
    pub fn next_id(&self) -> InodeId {
        self.records
            .last()
            .and_then(|last| last.id.successor())
            .unwrap_or(InodeId::ROOT)
    }

    /// All records in table order
    pub fn iter(&self) -> impl Iterator<Item = &Inode> + '_ {
        self.records.iter()
    }

    /// Gets a record by id
    pub fn get(&self, id: InodeId) -> Option<&Inode> {
        self.records
            .binary_search_by_key(&id, |inode| inode.id)
            .ok()
            .map(|pos| &self.records[pos])
    }

    /// Finds the child of `parent_id` called `name`
    pub fn lookup(&self, parent_id: InodeId, name: &InodeName) -> Option<&Inode> {
        self.names
            .get(&parent_id)
            .and_then(|siblings| siblings.get(name.as_str()))
            .and_then(|id| self.get(*id))
    }

    /// Records whose parent is `parent_id`, in table order
    ///
    /// The root is its own parent, so it shows up among its own children.
    pub fn children(&self, parent_id: InodeId) -> impl Iterator<Item = &Inode> + '_ {
        self.records
            .iter()
            .filter(move |inode| inode.parent_id == parent_id)
    }

    /// Checks that a new child could be appended, returning the id it would get
    pub fn check_append(
        &self,
        parent_id: InodeId,
        name: &InodeName,
    ) -> Result<InodeId, TableError> {
        let id = self.next_id();
        if self.is_full() || id.as_usize() >= self.capacity {
            return Err(TableError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.check_link(id, parent_id, name)?;
        Ok(id)
    }

    /// Appends a new record with the next id
    pub fn append(
        &mut self,
        parent_id: InodeId,
        kind: InodeKind,
        name: InodeName,
    ) -> Result<InodeId, TableError> {
        let id = self.check_append(parent_id, &name)?;
        self.push(Inode::new(id, parent_id, kind, name));
        Ok(id)
    }

    /// Re-inserts a decoded record, keeping its stored id
    ///
    /// Applies the same invariants as [`InodeTable::append`], plus id
    /// ordering, so a restored table is indistinguishable from one built by
    /// creation.
    pub fn restore(&mut self, inode: Inode) -> Result<(), TableError> {
        if let Some(last) = self.records.last() {
            if inode.id <= last.id {
                return Err(TableError::OutOfOrder {
                    id: inode.id,
                    previous: last.id,
                });
            }
        }
        if inode.id.as_usize() >= self.capacity {
            return Err(TableError::IdOutOfRange(inode.id));
        }
        if self.is_full() {
            return Err(TableError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.check_link(inode.id, inode.parent_id, &inode.name)?;
        self.push(inode);
        Ok(())
    }

    fn check_link(
        &self,
        id: InodeId,
        parent_id: InodeId,
        name: &InodeName,
    ) -> Result<(), TableError> {
        if name.is_empty() {
            return Err(TableError::Unnamed(id));
        }
        let parent = self
            .get(parent_id)
            .ok_or(TableError::ParentNotFound(parent_id))?;
        if !parent.is_directory() {
            return Err(TableError::NotADirectory(parent_id));
        }
        if self.lookup(parent_id, name).is_some() {
            return Err(TableError::AlreadyExists(name.to_string()));
        }
        Ok(())
    }

    fn push(&mut self, inode: Inode) {
        self.names
            .entry(inode.parent_id)
            .or_default()
            .insert(inode.name.as_str().to_string(), inode.id);
        self.records.push(inode);
    }
}

impl Default for InodeTable {
    fn default() -> Self {
        Self::bootstrap()
    }
}
