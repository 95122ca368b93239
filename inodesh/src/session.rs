//! # Shell Session
//!
//! The command loop: read a line, run one namespace operation, print the
//! outcome. Operation errors are printed and the loop goes on; only startup
//! failures and broken terminal I/O end a session early.

use crate::commands::{CommandError, ShellCommand, ShellCommandParser};
use crate::config::ShellConfig;
use fs_view::{ContentStore, MemoryContentStore, Namespace, NamespaceError, SidecarStore};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Session error types
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Namespace root {} is not a directory", .0.display())]
    RootMissing(PathBuf),

    #[error("{0}")]
    Namespace(#[from] NamespaceError),

    #[error("Failed to save namespace: {0}")]
    SaveFailed(NamespaceError),

    #[error("Terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// A running shell over one namespace
pub struct Session<C: ContentStore> {
    namespace: Namespace<C>,
    store_path: PathBuf,
    prompt: String,
}

impl Session<Box<dyn ContentStore>> {
    /// Loads the namespace described by `config`
    ///
    /// Fails if the root directory is missing or the store has no valid root.
    pub fn open(config: &ShellConfig) -> Result<Self, SessionError> {
        if !config.root_dir.is_dir() {
            return Err(SessionError::RootMissing(config.root_dir.clone()));
        }

        let content: Box<dyn ContentStore> = if config.sidecars {
            Box::new(SidecarStore::new(&config.root_dir))
        } else {
            Box::new(MemoryContentStore::new())
        };

        let store_path = config.store_path();
        let (namespace, report) = Namespace::load(&store_path, content)?;
        if !report.is_clean() {
            warn!(
                dropped = report.dropped.len(),
                ignored = report.ignored_records,
                trailing_bytes = report.trailing_bytes,
                "namespace loaded with damaged records removed"
            );
        }
        info!(
            store = %store_path.display(),
            inodes = namespace.table().len(),
            "session opened"
        );

        Ok(Self::new(namespace, store_path, config.prompt.clone()))
    }
}

impl<C: ContentStore> Session<C> {
    pub fn new(namespace: Namespace<C>, store_path: PathBuf, prompt: String) -> Self {
        Self {
            namespace,
            store_path,
            prompt,
        }
    }

    pub fn namespace(&self) -> &Namespace<C> {
        &self.namespace
    }

    /// Runs the loop until `exit` or end of input
    ///
    /// End of input saves like `exit` does; if that save fails there is no
    /// one left to retry, so the failure is returned.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> Result<(), SessionError> {
        let mut line = String::new();
        loop {
            write!(output, "{}", self.prompt)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                info!("end of input");
                return self
                    .namespace
                    .save(&self.store_path)
                    .map_err(SessionError::SaveFailed);
            }

            if self.execute_line(&line, &mut output)? == Control::Exit {
                return Ok(());
            }
        }
    }

    /// Parses and runs one line
    pub fn execute_line<W: Write>(
        &mut self,
        line: &str,
        output: &mut W,
    ) -> Result<Control, SessionError> {
        match ShellCommandParser::parse(line) {
            Ok(command) => self.execute(command, output),
            Err(CommandError::EmptyCommand) => Ok(Control::Continue),
            Err(err) => {
                writeln!(output, "{}", err)?;
                Ok(Control::Continue)
            }
        }
    }

    /// Runs one command, printing its output or error
    pub fn execute<W: Write>(
        &mut self,
        command: ShellCommand,
        output: &mut W,
    ) -> Result<Control, SessionError> {
        let result = match command {
            ShellCommand::ChangeDirectory { name } => {
                self.namespace.change_directory(&name).map(|_| ())
            }
            ShellCommand::List => {
                for inode in self.namespace.list_contents() {
                    writeln!(
                        output,
                        "inode: {}, type: {}, name: {}",
                        inode.id,
                        inode.kind.tag() as char,
                        inode.name
                    )?;
                }
                Ok(())
            }
            ShellCommand::MakeDirectory { name } => {
                self.namespace.create_directory(&name).map(|_| ())
            }
            ShellCommand::Touch { name } => self.namespace.create_file(&name).map(|_| ()),
            ShellCommand::PrintWorkingDirectory => {
                writeln!(output, "{}", self.namespace.current_path())?;
                Ok(())
            }
            ShellCommand::Help => {
                for help in ShellCommandParser::help_lines() {
                    writeln!(output, "{}", help)?;
                }
                Ok(())
            }
            ShellCommand::Exit => return self.exit(output),
        };

        if let Err(err) = result {
            debug!(%err, "command failed");
            writeln!(output, "{}", err)?;
        }
        Ok(Control::Continue)
    }

    fn exit<W: Write>(&mut self, output: &mut W) -> Result<Control, SessionError> {
        match self.namespace.save(&self.store_path) {
            Ok(()) => Ok(Control::Exit),
            Err(err) => {
                error!(%err, "save failed, staying in session");
                writeln!(output, "{}", err)?;
                writeln!(output, "Namespace not saved; fix the problem and exit again")?;
                Ok(Control::Continue)
            }
        }
    }
}
