use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Signal returned by every dispatched command telling the read-eval loop
/// whether to prompt again.
///
/// Only the `exit` built-in produces [`Continuation::Stop`]; blank lines,
/// external programs and failed commands all continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Keep looping.
    Continue,
    /// Terminate the loop with a success status.
    Stop,
}

impl Continuation {
    /// Returns `true` when the loop should read another line.
    pub fn should_continue(self) -> bool {
        self == Continuation::Continue
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
/// In-process commands write through `stdout` and `stderr`; external programs
/// inherit the real process streams instead.
pub trait ExecutableCommand {
    /// Executes the command.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Continuation>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Name of the built-in this factory produces, or `None` for factories that
    /// accept arbitrary names (the external launcher).
    fn builtin_name(&self) -> Option<&'static str>;

    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
