//! # Inode Shell
//!
//! Interactive front end for the emulated namespace.
//!
//! ## Responsibilities
//!
//! The shell:
//! - Resolves the backing store and sidecars inside one root directory
//! - Loads the namespace at startup, refusing a store without a root
//! - Runs a line-oriented loop (read → parse → one operation → print)
//! - Saves the whole table on `exit` or end of input
//!
//! ## Non-Responsibilities
//!
//! The shell does NOT:
//! - Resolve multi-component paths or `..`
//! - Store file contents
//! - Lock the store against other sessions (last writer wins)

pub mod commands;
pub mod config;
pub mod session;

pub use commands::{CommandError, ShellCommand, ShellCommandParser};
pub use config::{ConfigError, ShellConfig, DEFAULT_STORE_NAME};
pub use session::{Control, Session, SessionError};
