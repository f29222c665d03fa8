use crate::command::{CommandFactory, Continuation, ExecutableCommand};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use anyhow::Result;
use log::{debug, warn};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Command that is not a builtin.
///
/// The program inherits the shell's standard streams and environment and runs in
/// the shell's current directory. The shell blocks until it terminates.
pub struct ExternalCommand {
    name: String,
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    /// `name` is what the user typed; `program` is the path actually spawned.
    pub fn new(name: String, program: OsString, args: Vec<OsString>) -> Self {
        Self {
            name,
            program,
            args,
        }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn builtin_name(&self) -> Option<&'static str> {
        None
    }

    /// Accepts every name. Names that don't resolve through `PATH` are still
    /// handed to the OS, whose own lookup has the final word.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let search_paths = env.search_path().unwrap_or_default();
        let program = match find_command_path(&search_paths, Path::new(name)) {
            Some(executable) => executable.as_os_str().to_owned(),
            None => OsString::from(name),
        };
        Some(Box::new(ExternalCommand::new(
            name.to_owned(),
            program,
            args.iter().map(|x| x.into()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Continuation> {
        debug!("spawning {:?} with {:?}", self.program, self.args);
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .current_dir(&env.current_dir)
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                writeln!(stderr, "shell: {}", ShellError::CommandNotFound(self.name))?;
                return Ok(Continuation::Continue);
            }
            Err(e) => {
                writeln!(stderr, "shell: {}: {}", self.name, e)?;
                return Ok(Continuation::Continue);
            }
        };

        // `wait` only returns once the child has exited or been killed by a
        // signal; a stopped child keeps us here.
        match child.wait() {
            Ok(status) => debug!("{} (pid {}) {}", self.name, child.id(), describe(status)),
            Err(e) => {
                warn!("waiting for {} failed: {}", self.name, e);
                writeln!(stderr, "shell: {}: {}", self.name, e)?;
            }
        }
        Ok(Continuation::Continue)
    }
}

/// Human-readable summary of how a child terminated, for logging.
fn describe(exit_status: ExitStatus) -> String {
    match exit_status.code() {
        Some(code) => format!("exited with status {}", code),
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;
    match ExitStatusExt::signal(&exit_status) {
        Some(signal) if ExitStatusExt::core_dumped(&exit_status) => {
            format!("killed by signal {} (core dumped)", signal)
        }
        Some(signal) => format!("killed by signal {}", signal),
        None => "terminated abnormally".to_string(),
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> String {
    "terminated abnormally".to_string()
}

/// Pick the file to spawn for a typed command name, or `None` to leave the
/// name to the OS.
///
/// Names containing a separator are used as paths and only checked for
/// existence; bare names are looked up in each `search_paths` directory in
/// order, skipping entries that are not executable files, just as `execvp`
/// moves past them. A `None` here is not fatal: the launcher hands the raw
/// name to the spawn call, whose own lookup and error decide the outcome.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
