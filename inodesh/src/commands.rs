//! # Shell Commands
//!
//! One command per input line.
//!
//! ## Command Set
//!
//! - `cd <name>` - Enter a child directory
//! - `ls` - List the current directory
//! - `mkdir <name>` - Create a child directory
//! - `touch <name>` - Create a child file
//! - `pwd` - Print the current directory path
//! - `help` - List the commands
//! - `exit` - Save and leave (`quit` also works)
//!
//! Arguments are the rest of the line after the verb, so names may contain
//! inner spaces. Surrounding whitespace is trimmed. A verb that takes no
//! argument must stand alone on its line, otherwise the line is an invalid
//! command.

use thiserror::Error;

/// Command parse errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Missing argument: {0} needs a name")]
    MissingArgument(String),
}

/// Shell commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Enter a child directory
    ChangeDirectory { name: String },

    /// List the current directory
    List,

    /// Create a child directory
    MakeDirectory { name: String },

    /// Create a child file
    Touch { name: String },

    /// Print the current directory path
    PrintWorkingDirectory,

    /// Show the command list
    Help,

    /// Save and leave
    Exit,
}

/// Shell command parser
pub struct ShellCommandParser;

impl ShellCommandParser {
    /// Parses one input line
    pub fn parse(input: &str) -> Result<ShellCommand, CommandError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(CommandError::EmptyCommand);
        }

        let (verb, rest) = match input.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (input, ""),
        };

        match verb {
            "cd" => Self::named(verb, rest).map(|name| ShellCommand::ChangeDirectory { name }),
            "ls" => Self::bare(input, rest, ShellCommand::List),
            "mkdir" => Self::named(verb, rest).map(|name| ShellCommand::MakeDirectory { name }),
            "touch" => Self::named(verb, rest).map(|name| ShellCommand::Touch { name }),
            "pwd" => Self::bare(input, rest, ShellCommand::PrintWorkingDirectory),
            "help" => Self::bare(input, rest, ShellCommand::Help),
            "exit" | "quit" => Self::bare(input, rest, ShellCommand::Exit),
            _ => Err(CommandError::InvalidCommand(verb.to_string())),
        }
    }

    fn bare(
        input: &str,
        rest: &str,
        command: ShellCommand,
    ) -> Result<ShellCommand, CommandError> {
        if !rest.is_empty() {
            return Err(CommandError::InvalidCommand(input.to_string()));
        }
        Ok(command)
    }

    fn named(verb: &str, rest: &str) -> Result<String, CommandError> {
        if rest.is_empty() {
            return Err(CommandError::MissingArgument(verb.to_string()));
        }
        Ok(rest.to_string())
    }

    /// One-line summaries for `help`
    pub fn help_lines() -> &'static [&'static str] {
        &[
            "cd <name>     enter a child directory",
            "ls            list the current directory",
            "mkdir <name>  create a directory",
            "touch <name>  create a file",
            "pwd           print the current directory",
            "help          show this list",
            "exit          save and quit",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cd() {
        let cmd = ShellCommandParser::parse("cd docs").unwrap();
        assert_eq!(
            cmd,
            ShellCommand::ChangeDirectory {
                name: "docs".to_string()
            }
        );
    }

    #[test]
    fn test_parse_name_with_spaces() {
        let cmd = ShellCommandParser::parse("touch my notes.txt").unwrap();
        assert_eq!(
            cmd,
            ShellCommand::Touch {
                name: "my notes.txt".to_string()
            }
        );
    }

    #[test]
    fn test_parse_mkdir_trims_line_ending() {
        let cmd = ShellCommandParser::parse("mkdir x\r\n").unwrap();
        assert_eq!(
            cmd,
            ShellCommand::MakeDirectory {
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn test_parse_argumentless_verbs() {
        assert_eq!(ShellCommandParser::parse("ls").unwrap(), ShellCommand::List);
        assert_eq!(
            ShellCommandParser::parse("pwd").unwrap(),
            ShellCommand::PrintWorkingDirectory
        );
        assert_eq!(ShellCommandParser::parse("help").unwrap(), ShellCommand::Help);
        assert_eq!(ShellCommandParser::parse("exit").unwrap(), ShellCommand::Exit);
        assert_eq!(ShellCommandParser::parse("quit").unwrap(), ShellCommand::Exit);
    }

    #[test]
    fn test_parse_rejects_arguments_to_bare_verbs() {
        assert_eq!(
            ShellCommandParser::parse("ls -la"),
            Err(CommandError::InvalidCommand("ls -la".to_string()))
        );
        assert_eq!(
            ShellCommandParser::parse("exit now\n"),
            Err(CommandError::InvalidCommand("exit now".to_string()))
        );
        assert_eq!(ShellCommandParser::parse("  ls  \n").unwrap(), ShellCommand::List);
    }

    #[test]
    fn test_parse_missing_argument() {
        assert_eq!(
            ShellCommandParser::parse("cd"),
            Err(CommandError::MissingArgument("cd".to_string()))
        );
        assert_eq!(
            ShellCommandParser::parse("touch   "),
            Err(CommandError::MissingArgument("touch".to_string()))
        );
    }

    #[test]
    fn test_parse_invalid_command() {
        assert_eq!(
            ShellCommandParser::parse("rm docs"),
            Err(CommandError::InvalidCommand("rm".to_string()))
        );
        assert_eq!(
            ShellCommandParser::parse("LS"),
            Err(CommandError::InvalidCommand("LS".to_string()))
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(
            ShellCommandParser::parse("   "),
            Err(CommandError::EmptyCommand)
        );
    }
}
