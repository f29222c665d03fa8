use std::env as stdenv;
use std::ffi::OsString;
use std::path::PathBuf;

/// Mutable, per-shell state shared by every command the interpreter runs.
///
/// The environment contains:
/// - `current_dir`: the working directory, kept in sync with the process by `cd`.
/// - `builtins`: names of the registered built-ins, in registration order.
///
/// Environment variables are not copied: child processes inherit the process
/// environment unchanged, and `PATH` is looked up on demand.
#[derive(Debug, Clone)]
pub struct Environment {
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// Registered built-in names, listed by `help`.
    pub builtins: Vec<&'static str>,
}

impl Environment {
    /// Capture the current process working directory into a new `Environment`.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            builtins: Vec::new(),
        }
    }

    /// The executable search path inherited from the process, if set.
    pub fn search_path(&self) -> Option<OsString> {
        stdenv::var_os("PATH")
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
