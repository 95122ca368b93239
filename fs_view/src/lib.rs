//! # Filesystem View
//!
//! A shell-style view over the inode table.
//!
//! ## Design
//!
//! - One owned [`Namespace`] holds the table and the current directory
//! - Names resolve against the current directory only
//! - Creating an inode also creates a placeholder in a [`ContentStore`]
//! - The cursor only moves on a successful `change_directory`

pub mod content;
pub mod error;
pub mod namespace;

pub use content::{placeholder_contents, ContentStore, MemoryContentStore, SidecarStore};
pub use error::NamespaceError;
pub use namespace::Namespace;
