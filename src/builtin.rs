use crate::command::{CommandFactory, Continuation, ExecutableCommand};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use crate::tree;
use anyhow::{Context, Result};
use log::{debug, info};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are executed directly in-process without spawning a child process.
/// They take their arguments positionally and never reject extra ones: a
/// command that needs a target reads the first argument and ignores the rest,
/// exactly as a user typed them.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "cd" or "ls".
    fn name() -> &'static str;

    /// Build the command from the tokens following its name.
    fn from_args(args: &[&str]) -> Self;

    /// Executes the command, writing regular output to `stdout`.
    ///
    /// Errors are reported by the caller on the error stream; they never stop the loop.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<Continuation>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Continuation> {
        match BuiltinCommand::execute(*self, stdout, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(stderr, "shell: {:#}", e)?;
                Ok(Continuation::Continue)
            }
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn builtin_name(&self) -> Option<&'static str> {
        Some(T::name())
    }

    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(Box::new(T::from_args(args)))
        } else {
            None
        }
    }
}

/// First argument, if any, as an owned target path.
fn first_arg(args: &[&str]) -> Option<String> {
    args.first().map(|s| s.to_string())
}

/// Resolve a user-supplied path against the shell's current directory.
fn resolve(env: &Environment, target: &str) -> PathBuf {
    env.current_dir.join(target)
}

/// Change the current working directory.
pub struct Cd {
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_args(args: &[&str]) -> Self {
        Self {
            target: first_arg(args),
        }
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<Continuation> {
        let target = self.target.ok_or(ShellError::MissingArgument("cd"))?;

        let canonical =
            fs::canonicalize(resolve(env, &target)).with_context(|| format!("cd: {}", target))?;
        env::set_current_dir(&canonical).with_context(|| format!("cd: {}", target))?;
        debug!("working directory is now {}", canonical.display());
        env.current_dir = canonical;
        Ok(Continuation::Continue)
    }
}

/// List the shell's built-in commands.
pub struct Help;

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn from_args(_args: &[&str]) -> Self {
        Help
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<Continuation> {
        writeln!(stdout, "Type program names and arguments, and hit enter.")?;
        writeln!(stdout, "The following are built in:")?;
        for name in &env.builtins {
            writeln!(stdout, "  {}", name)?;
        }
        Ok(Continuation::Continue)
    }
}

/// List the entries of the current directory, one per line.
///
/// `.` and `..` come first, as `readdir` reports them; the rest follow in
/// enumeration order, unsorted.
pub struct Ls;

impl BuiltinCommand for Ls {
    fn name() -> &'static str {
        "ls"
    }

    fn from_args(_args: &[&str]) -> Self {
        Ls
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<Continuation> {
        let entries = fs::read_dir(&env.current_dir).context("ls: error opening directory")?;
        writeln!(stdout, ".")?;
        writeln!(stdout, "..")?;
        for entry in entries {
            let entry = entry.context("ls: error reading directory")?;
            writeln!(stdout, "{}", entry.file_name().to_string_lossy())?;
        }
        Ok(Continuation::Continue)
    }
}

/// Create a directory accessible only to its owner.
pub struct Create {
    /// path of the directory to create.
    pub target: Option<String>,
}

impl BuiltinCommand for Create {
    fn name() -> &'static str {
        "create"
    }

    fn from_args(args: &[&str]) -> Self {
        Self {
            target: first_arg(args),
        }
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<Continuation> {
        let target = self.target.ok_or(ShellError::MissingArgument("create"))?;

        let mut builder = fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder
            .create(resolve(env, &target))
            .with_context(|| format!("create: {}", target))?;
        Ok(Continuation::Continue)
    }
}

/// Recursively delete a directory and everything inside it.
pub struct Delete {
    /// path of the directory tree to remove.
    pub target: Option<String>,
}

impl BuiltinCommand for Delete {
    fn name() -> &'static str {
        "delete"
    }

    fn from_args(args: &[&str]) -> Self {
        Self {
            target: first_arg(args),
        }
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<Continuation> {
        let target = self.target.ok_or(ShellError::MissingArgument("delete"))?;

        let removed = tree::remove_tree(&resolve(env, &target))?;
        info!("delete {}: removed {} entries", target, removed);
        Ok(Continuation::Continue)
    }
}

/// Exit the shell. Arguments are ignored.
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(_args: &[&str]) -> Self {
        Exit
    }

    fn execute(self, _stdout: &mut dyn Write, _env: &mut Environment) -> Result<Continuation> {
        Ok(Continuation::Stop)
    }
}
