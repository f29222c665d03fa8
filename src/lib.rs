//! A minimal interactive command-line shell.
//!
//! Each line read from the user is split into whitespace-delimited tokens and
//! dispatched either to a built-in command implemented in Rust (`cd`, `help`,
//! `ls`, `create`, `delete`, `exit`) or to an external program found on the
//! search path. The shell waits for every program to finish before prompting
//! again. There are no pipelines, redirections, background jobs, expansions or
//! quoting.
//!
//! The main entry point is [`Interpreter`], which runs a read-eval loop over any
//! [`input::LineSource`]. The public modules [`command`] and [`env`] expose the
//! traits and state used to plug in further commands.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
mod external;
pub mod input;
mod interpreter;
pub mod tokenizer;
mod tree;

pub use command::Continuation;
pub use error::ShellError;
/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{BANNER, DEFAULT_PROMPT, Interpreter};
