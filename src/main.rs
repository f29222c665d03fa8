use argh::FromArgs;
use log::info;
use minishell::input::{BufReadSource, EditorSource, LineSource};
use minishell::{BANNER, DEFAULT_PROMPT, Interpreter};
use std::io::{self, IsTerminal};

#[derive(FromArgs)]
/// A minimal interactive shell.
struct Args {
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// text shown before every command line.
    prompt: String,

    #[argh(switch, short = 'q')]
    /// do not print the startup banner.
    quiet: bool,
}

fn run(args: Args) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut source: Box<dyn LineSource> = if stdin.is_terminal() {
        Box::new(EditorSource::new()?)
    } else {
        Box::new(BufReadSource::new(stdin.lock()))
    };

    if !args.quiet {
        println!("{}", BANNER);
    }

    let mut sh = Interpreter::default();
    info!("starting in {}", sh.env().current_dir.display());
    sh.repl(
        source.as_mut(),
        &args.prompt,
        &mut io::stdout(),
        &mut io::stderr(),
    )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Args = argh::from_env();
    if let Err(err) = run(args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
