//! Sources of command lines for the read-eval loop.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// Something the read-eval loop can pull lines from.
pub trait LineSource {
    /// Show `prompt` and block until a full line is available.
    ///
    /// Returns `Ok(None)` once the input is exhausted. A final line without a
    /// trailing newline is still returned before that.
    fn read_line(&mut self, prompt: &str, stdout: &mut dyn Write) -> Result<Option<String>>;
}

/// Interactive terminal input backed by [`rustyline`].
///
/// No history is recorded.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str, _stdout: &mut dyn Write) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            // Ctrl-C drops the line being edited
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Plain buffered input, used when stdin is not a terminal.
///
/// The prompt is written to `stdout` and flushed before every read. Bytes that
/// are not valid UTF-8 are replaced rather than rejected.
pub struct BufReadSource<R> {
    reader: R,
}

impl<R: BufRead> BufReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for BufReadSource<R> {
    fn read_line(&mut self, prompt: &str, stdout: &mut dyn Write) -> Result<Option<String>> {
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
