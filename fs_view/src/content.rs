//! Sidecar content layer
//!
//! Every created inode gets one placeholder. The namespace only asks for the
//! placeholder to exist; what it holds is up to the store.

use inode_table::{Inode, InodeId, InodeKind};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Where placeholders for new inodes are kept
pub trait ContentStore {
    /// Creates the placeholder for a freshly allocated inode
    ///
    /// Called before the inode joins the table. An error aborts creation.
    fn create_placeholder(&mut self, inode: &Inode) -> io::Result<()>;

    /// Location used in error reports
    fn describe(&self, id: InodeId) -> PathBuf;
}

impl<C: ContentStore + ?Sized> ContentStore for Box<C> {
    fn create_placeholder(&mut self, inode: &Inode) -> io::Result<()> {
        (**self).create_placeholder(inode)
    }

    fn describe(&self, id: InodeId) -> PathBuf {
        (**self).describe(id)
    }
}

/// Text of a placeholder
///
/// Directories list their self and parent links, files hold their own name.
pub fn placeholder_contents(inode: &Inode) -> String {
    match inode.kind {
        InodeKind::Directory => format!("{} .\n{} ..\n", inode.id, inode.parent_id),
        InodeKind::File => format!("{}\n", inode.name),
    }
}

/// Placeholders as files named by inode id inside the namespace root
#[derive(Debug, Clone)]
pub struct SidecarStore {
    root: PathBuf,
}

impl SidecarStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the placeholder for `id`
    pub fn placeholder_path(&self, id: InodeId) -> PathBuf {
        self.root.join(id.to_string())
    }
}

impl ContentStore for SidecarStore {
    fn create_placeholder(&mut self, inode: &Inode) -> io::Result<()> {
        let mut file = File::create(self.placeholder_path(inode.id))?;
        file.write_all(placeholder_contents(inode).as_bytes())?;
        file.flush()
    }

    fn describe(&self, id: InodeId) -> PathBuf {
        self.placeholder_path(id)
    }
}

/// Placeholders kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    placeholders: BTreeMap<InodeId, String>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: InodeId) -> Option<&str> {
        self.placeholders.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.placeholders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }
}

impl ContentStore for MemoryContentStore {
    fn create_placeholder(&mut self, inode: &Inode) -> io::Result<()> {
        self.placeholders
            .insert(inode.id, placeholder_contents(inode));
        Ok(())
    }

    fn describe(&self, id: InodeId) -> PathBuf {
        PathBuf::from(format!("memory:{}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inode_table::InodeName;
    use tempfile::tempdir;

    fn dir_inode() -> Inode {
        Inode::new(
            InodeId::new(3),
            InodeId::new(1),
            InodeKind::Directory,
            InodeName::new("src").unwrap(),
        )
    }

    fn file_inode() -> Inode {
        Inode::new(
            InodeId::new(4),
            InodeId::new(3),
            InodeKind::File,
            InodeName::new("main.rs").unwrap(),
        )
    }

    #[test]
    fn test_placeholder_contents() {
        assert_eq!(placeholder_contents(&dir_inode()), "3 .\n1 ..\n");
        assert_eq!(placeholder_contents(&file_inode()), "main.rs\n");
    }

    #[test]
    fn test_sidecar_store_writes_file_per_id() {
        let dir = tempdir().unwrap();
        let mut store = SidecarStore::new(dir.path());

        store.create_placeholder(&dir_inode()).unwrap();
        store.create_placeholder(&file_inode()).unwrap();

        let dir_text = std::fs::read_to_string(dir.path().join("3")).unwrap();
        let file_text = std::fs::read_to_string(dir.path().join("4")).unwrap();
        assert_eq!(dir_text, "3 .\n1 ..\n");
        assert_eq!(file_text, "main.rs\n");
    }

    #[test]
    fn test_sidecar_store_missing_root_fails() {
        let dir = tempdir().unwrap();
        let mut store = SidecarStore::new(dir.path().join("gone"));
        assert!(store.create_placeholder(&file_inode()).is_err());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryContentStore::new();
        assert!(store.is_empty());

        store.create_placeholder(&file_inode()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(InodeId::new(4)), Some("main.rs\n"));
        assert_eq!(store.get(InodeId::new(3)), None);
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn ContentStore> = Box::new(MemoryContentStore::new());
        store.create_placeholder(&dir_inode()).unwrap();
        assert_eq!(
            store.describe(InodeId::new(3)),
            PathBuf::from("memory:3")
        );
    }
}
