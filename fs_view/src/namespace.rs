//! Namespace navigator
//!
//! Owns the inode table and a single cursor, the current directory. All
//! names are resolved against the current directory only; there is no path
//! walking and no `..`.

use crate::content::ContentStore;
use crate::error::NamespaceError;
use inode_table::{codec, Inode, InodeId, InodeKind, InodeName, InodeTable, LoadReport};
use std::path::Path;
use tracing::debug;

/// A loaded namespace and its current directory
#[derive(Debug)]
pub struct Namespace<C: ContentStore> {
    table: InodeTable,
    current: InodeId,
    content: C,
}

impl<C: ContentStore> Namespace<C> {
    /// Wraps an existing table, starting at the root
    pub fn new(table: InodeTable, content: C) -> Self {
        Self {
            table,
            current: InodeId::ROOT,
            content,
        }
    }

    /// Loads the namespace from the backing store at `path`
    ///
    /// The cursor always starts at the root.
    pub fn load(path: &Path, content: C) -> Result<(Self, LoadReport), NamespaceError> {
        let (table, report) = codec::load(path)?;
        Ok((Self::new(table, content), report))
    }

    /// Rewrites the backing store at `path`
    ///
    /// On failure the in-memory namespace is untouched.
    pub fn save(&self, path: &Path) -> Result<(), NamespaceError> {
        codec::save(&self.table, path)?;
        Ok(())
    }

    pub fn current_id(&self) -> InodeId {
        self.current
    }

    pub fn table(&self) -> &InodeTable {
        &self.table
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    /// Moves into the child directory called `name`
    pub fn change_directory(&mut self, name: &str) -> Result<InodeId, NamespaceError> {
        let target = InodeName::new(name)
            .ok()
            .and_then(|normalized| self.table.lookup(self.current, &normalized))
            .filter(|inode| inode.is_directory())
            .map(|inode| inode.id)
            .ok_or_else(|| NamespaceError::DirectoryNotFound(name.to_string()))?;

        debug!(from = %self.current, to = %target, name, "cd");
        self.current = target;
        Ok(target)
    }

    /// Entries of the current directory, in creation order
    ///
    /// At the root this includes the root record, which is its own parent.
    pub fn list_contents(&self) -> impl Iterator<Item = &Inode> + '_ {
        self.table.children(self.current)
    }

    /// Creates a directory in the current directory
    pub fn create_directory(&mut self, name: &str) -> Result<InodeId, NamespaceError> {
        self.create(name, InodeKind::Directory)
    }

    /// Creates a file in the current directory
    pub fn create_file(&mut self, name: &str) -> Result<InodeId, NamespaceError> {
        self.create(name, InodeKind::File)
    }

    fn create(&mut self, raw: &str, kind: InodeKind) -> Result<InodeId, NamespaceError> {
        let name = InodeName::new(raw)?;
        if name.len() < raw.len() {
            debug!(requested = raw, stored = %name, "name truncated");
        }

        let id = self.table.check_append(self.current, &name)?;
        let inode = Inode::new(id, self.current, kind, name);
        self.content
            .create_placeholder(&inode)
            .map_err(|source| NamespaceError::IoFailure {
                path: self.content.describe(id),
                source,
            })?;

        let id = self.table.append(inode.parent_id, inode.kind, inode.name)?;
        debug!(id = %id, parent = %self.current, kind = %kind, "created inode");
        Ok(id)
    }

    /// Absolute path of the current directory, `/` for the root
    pub fn current_path(&self) -> String {
        let mut parts = Vec::new();
        let mut cursor = self.current;
        while let Some(inode) = self.table.get(cursor) {
            if inode.is_root() {
                break;
            }
            parts.push(inode.name.as_str());
            cursor = inode.parent_id;
        }
        parts.reverse();
        format!("/{}", parts.join("/"))
    }
}
