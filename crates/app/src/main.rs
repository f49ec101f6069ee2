mod console;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use services::{Clock, QuizLoopService};
use storage::Storage;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--bank <file>] [--progress-dir <dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bank quiz_questions.json");
    eprintln!("  --progress-dir .quiz");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK, QUIZ_PROGRESS_DIR");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    bank_path: PathBuf,
    progress_dir: PathBuf,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut bank_path = std::env::var("QUIZ_BANK")
            .map_or_else(|_| PathBuf::from("quiz_questions.json"), PathBuf::from);
        let mut progress_dir = std::env::var("QUIZ_PROGRESS_DIR")
            .map_or_else(|_| PathBuf::from(".quiz"), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => bank_path = PathBuf::from(require_value(&mut args, "--bank")?),
                "--progress-dir" => {
                    progress_dir = PathBuf::from(require_value(&mut args, "--progress-dir")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            bank_path,
            progress_dir,
        })
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let args = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::file(args.bank_path, args.progress_dir)?;
    let service = QuizLoopService::new(
        Clock::default_clock(),
        Arc::clone(&storage.progress),
        Arc::clone(&storage.questions),
    );

    // A load failure is terminal; there is no in-session retry.
    let mut session = service.start()?;
    console::run(&service, &mut session)?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
