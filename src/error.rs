use std::path::PathBuf;
use thiserror::Error;

/// User-facing failures whose wording is part of the shell's interface.
///
/// OS-level failures travel as [`anyhow::Error`] with context attached; these
/// variants cover the cases the shell detects itself.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("expected argument to \"{0}\"")]
    MissingArgument(&'static str),

    #[error("{0}: not a directory")]
    NotADirectory(PathBuf),

    #[error("{0}: command not found")]
    CommandNotFound(String),
}
