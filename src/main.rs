mod app;
mod audio;
mod command;
mod config;
mod consts;
mod game;
mod menu;
mod options;
mod records;
mod store;
mod util;
mod warning;
use crate::app::App;
use crate::config::Config;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: snakeduel [<options>]

Play Snake against an AI rival in the terminal

Options:
  -c, --config <path>   Read configuration from the given file
      --log <path>      Write a log of the run to the given file
      --seed <u64>      Seed the random number generator
  -h, --help            Display this help message and exit
  -V, --version         Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Cli {
    Run(Arguments),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    log: Option<PathBuf>,
    seed: Option<u64>,
}

impl Cli {
    fn from_parser(mut parser: Parser) -> Result<Cli, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log") => args.log = Some(PathBuf::from(parser.value()?)),
                Arg::Long("seed") => args.seed = Some(parser.value()?.parse()?),
                Arg::Short('h') | Arg::Long("help") => return Ok(Cli::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Cli::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Cli::Run(args))
    }
}

fn main() -> ExitCode {
    match Cli::from_parser(Parser::from_env()) {
        Ok(Cli::Run(args)) => run(&args),
        Ok(Cli::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Cli::Version) => {
            println!("snakeduel {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("snakeduel: {e}\n\n{USAGE}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Arguments) -> ExitCode {
    let app = match startup(args) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("snakeduel: {e:?}");
            return ExitCode::FAILURE;
        }
    };
    let terminal = ratatui::init();
    let r = app.run(terminal);
    ratatui::restore();
    tracing::info!("exiting");
    io_exit(r)
}

fn startup(args: &Arguments) -> anyhow::Result<App> {
    if let Some(ref path) = args.log {
        init_logging(path)?;
    }
    let config = match args.config {
        Some(ref path) => Config::load(path, false),
        None => Config::load(&Config::default_path()?, true),
    }
    .context("failed to load configuration")?;
    tracing::info!(seed = ?args.seed, "starting snakeduel");
    Ok(App::new(&config, args.seed))
}

/// Send log messages to `path`.  The terminal belongs to the game, so without
/// a log file nothing is logged.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = fs_err::File::create(path).context("failed to open log file")?;
    let filter = EnvFilter::try_from_env("SNAKEDUEL_LOG")
        .or_else(|_| EnvFilter::try_new("info"))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "I/O error");
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}
