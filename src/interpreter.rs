use crate::command::{CommandFactory, Continuation};
use crate::env::Environment;
use crate::error::ShellError;
use crate::input::LineSource;
use crate::tokenizer::split_line;
use anyhow::Result;
use log::debug;
use std::io::Write;

/// Greeting printed once when an interactive session starts.
pub const BANNER: &str = "It's shell! To find out what it does, write ''help'' without quotes!";

/// Prompt shown before every read unless overridden.
pub const DEFAULT_PROMPT: &str = "> ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: built-ins and the external launcher.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell that executes built-in and external commands.
///
/// The interpreter maintains an [`Environment`] and an ordered list of
/// [`CommandFactory`] objects that are queried to create commands by name; the
/// first factory that recognises a name wins. See [`Default`] for the commands
/// included out of the box.
///
/// Example
/// ```
/// use minishell::{Continuation, Interpreter};
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let flow = sh.run_line("help", &mut out, &mut std::io::sink()).unwrap();
/// assert_eq!(flow, Continuation::Continue);
/// assert!(String::from_utf8(out).unwrap().contains("  exit\n"));
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        let mut env = Environment::new();
        env.builtins = commands.iter().filter_map(|f| f.builtin_name()).collect();
        Self { env, commands }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Dispatch one tokenized command line.
    ///
    /// An empty token sequence is a no-op. Otherwise `tokens[0]` is offered to
    /// each factory in registration order and the remaining tokens become the
    /// command's arguments. Command failures are reported on `stderr` and never
    /// stop the loop; an `Err` means writing to the streams themselves failed.
    pub fn execute(
        &mut self,
        tokens: &[String],
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Continuation> {
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(Continuation::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        let created = self
            .commands
            .iter()
            .find_map(|factory| factory.try_create(&self.env, name, &args));
        let flow = match created {
            Some(cmd) => {
                debug!("dispatching {} {:?}", name, args);
                cmd.execute(stdout, stderr, &mut self.env)?
            }
            None => {
                writeln!(stderr, "shell: {}", ShellError::CommandNotFound(name.clone()))?;
                Continuation::Continue
            }
        };
        stdout.flush()?;
        Ok(flow)
    }

    /// Tokenize and dispatch a single raw line.
    pub fn run_line(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Continuation> {
        let tokens = split_line(line);
        self.execute(&tokens, stdout, stderr)
    }

    /// Read-eval loop: prompt, read, tokenize, dispatch, until `exit` or end of input.
    ///
    /// Each line and its tokens live only for one iteration.
    pub fn repl(
        &mut self,
        source: &mut dyn LineSource,
        prompt: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<()> {
        loop {
            let Some(line) = source.read_line(prompt, stdout)? else {
                debug!("end of input");
                return Ok(());
            };
            if !self.run_line(&line, stdout, stderr)?.should_continue() {
                debug!("exit requested");
                return Ok(());
            }
        }
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - built-ins: `cd`, `help`, `ls`, `create`, `delete`, `exit`
    /// - external command launcher, consulted last
    fn default() -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self::new(vec![
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Help>::default()),
            Box::new(Factory::<Ls>::default()),
            Box::new(Factory::<Create>::default()),
            Box::new(Factory::<Delete>::default()),
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::tests::lock_current_dir;
    use crate::input::BufReadSource;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    /// Feed `input` through the loop of an interpreter rooted at `dir`.
    fn session(dir: &Path, input: &str) -> (String, String) {
        let mut sh = Interpreter::default();
        sh.env_mut().current_dir = dir.to_path_buf();
        let mut source = BufReadSource::new(Cursor::new(input.as_bytes().to_vec()));
        let mut out = Vec::new();
        let mut err = Vec::new();
        sh.repl(&mut source, DEFAULT_PROMPT, &mut out, &mut err)
            .unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_default_registers_builtins_in_order() {
        let sh = Interpreter::default();
        assert_eq!(
            sh.env().builtins,
            vec!["cd", "help", "ls", "create", "delete", "exit"]
        );
    }

    #[test]
    fn test_delimiter_only_lines_are_noops() {
        let mut sh = Interpreter::default();
        for line in ["", "   ", "\t\r\n", "\x07 \x07"] {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let flow = sh.run_line(line, &mut out, &mut err).unwrap();
            assert_eq!(flow, Continuation::Continue);
            assert!(out.is_empty());
            assert!(err.is_empty());
        }
    }

    #[test]
    fn test_builtins_shadow_programs_on_path() {
        // `ls` and friends exist on PATH too; output landing in our buffers
        // proves the in-process builtin ran instead of a child process.
        let tmp = tempfile::tempdir().unwrap();
        let mut sh = Interpreter::default();
        sh.env_mut().current_dir = tmp.path().to_path_buf();
        let cases = [
            ("help", Continuation::Continue, "Type program names", ""),
            ("ls", Continuation::Continue, ".\n..\n", ""),
            ("cd", Continuation::Continue, "", "expected argument to \"cd\""),
            ("create", Continuation::Continue, "", "expected argument to \"create\""),
            ("delete", Continuation::Continue, "", "expected argument to \"delete\""),
            ("exit", Continuation::Stop, "", ""),
        ];
        for (name, expected, out_part, err_part) in cases {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let flow = sh.run_line(name, &mut out, &mut err).unwrap();
            let (out, err) = (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap());
            assert_eq!(flow, expected, "{}", name);
            assert!(out.contains(out_part), "{}: {}", name, out);
            assert!(err.contains(err_part), "{}: {}", name, err);
        }
    }

    #[test]
    fn test_builtin_arguments_are_taken_as_typed() {
        let tmp = tempfile::tempdir().unwrap();
        let (out, err) = session(
            tmp.path(),
            "ls -la\nhelp x\ncreate help\ncreate -x extra\nexit --help\ncreate after\n",
        );

        assert!(err.is_empty(), "{}", err);
        assert!(out.starts_with("> .\n..\n> Type program names and arguments"));
        assert!(!out.contains("Usage"));
        assert!(tmp.path().join("help").is_dir());
        assert!(tmp.path().join("-x").is_dir());
        assert!(!tmp.path().join("extra").exists());
        // `exit --help` still exits
        assert!(!tmp.path().join("after").exists());
    }

    #[test]
    fn test_exit_stops_dispatch() {
        let mut sh = Interpreter::default();
        let flow = sh
            .run_line("exit", &mut Vec::new(), &mut Vec::new())
            .unwrap();
        assert_eq!(flow, Continuation::Stop);
    }

    #[test]
    fn test_lines_after_exit_are_not_run() {
        let tmp = tempfile::tempdir().unwrap();
        let (_, err) = session(tmp.path(), "create a\nls\nexit\ncreate b\n");

        assert!(err.is_empty(), "{}", err);
        assert!(tmp.path().join("a").is_dir());
        assert!(!tmp.path().join("b").exists());
    }

    #[test]
    fn test_end_of_input_stops_after_last_line() {
        let tmp = tempfile::tempdir().unwrap();
        let (out, _) = session(tmp.path(), "\n\ncreate last");

        assert!(tmp.path().join("last").is_dir());
        // one prompt per read, the final one answered by end of input
        assert_eq!(out, "> > > > ");
    }

    #[test]
    fn test_create_then_delete_in_session() {
        let tmp = tempfile::tempdir().unwrap();
        let (_, err) = session(tmp.path(), "create foo\ncreate foo/bar\ndelete foo\nexit\n");

        assert!(err.is_empty(), "{}", err);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_arguments_report_and_continue() {
        let tmp = tempfile::tempdir().unwrap();
        let (out, err) = session(tmp.path(), "create\ndelete\nhelp\n");

        assert_eq!(
            err,
            "shell: expected argument to \"create\"\nshell: expected argument to \"delete\"\n"
        );
        assert!(out.contains("The following are built in:"));
    }

    #[test]
    fn test_cd_then_ls_lists_new_directory() {
        let _lock = lock_current_dir();
        let orig = std::env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let target = fs::canonicalize(tmp.path()).unwrap().join("inside");
        fs::create_dir(&target).unwrap();
        fs::File::create(target.join("marker.txt")).unwrap();

        let mut sh = Interpreter::default();
        let mut source = BufReadSource::new(Cursor::new(
            format!("cd\ncd {}\nls\n", target.display()).into_bytes(),
        ));
        let mut out = Vec::new();
        let mut err = Vec::new();
        let res = sh.repl(&mut source, "", &mut out, &mut err);
        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(&orig).unwrap();

        res.unwrap();
        assert_eq!(String::from_utf8(err).unwrap(), "shell: expected argument to \"cd\"\n");
        assert_eq!(String::from_utf8(out).unwrap(), ".\n..\nmarker.txt\n");
        assert_eq!(fs::canonicalize(cwd).unwrap(), target);
    }

    #[test]
    fn test_unknown_command_reports_and_continues() {
        let _lock = lock_current_dir();
        let mut sh = Interpreter::default();
        let mut out = Vec::new();
        let mut err = Vec::new();

        let flow = sh
            .run_line("no_such_command_for_minishell_xyz --flag", &mut out, &mut err)
            .unwrap();

        assert_eq!(flow, Continuation::Continue);
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "shell: no_such_command_for_minishell_xyz: command not found\n"
        );
    }

    #[test]
    fn test_no_matching_factory_reports_not_found() {
        let mut sh = Interpreter::new(vec![Box::new(Factory::<crate::builtin::Exit>::default())]);
        let mut err = Vec::new();

        let flow = sh.run_line("ls", &mut Vec::new(), &mut err).unwrap();

        assert_eq!(flow, Continuation::Continue);
        assert_eq!(String::from_utf8(err).unwrap(), "shell: ls: command not found\n");
        assert_eq!(sh.env().builtins, vec!["exit"]);
    }
}
