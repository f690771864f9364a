//! quizgrade CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "quizgrade",
    version,
    about = "Grade quiz submissions and enforce attempt limits"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a lesson library
    Validate {
        /// Path to a .json or .toml library (defaults to the config value)
        #[arg(long)]
        library: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a student's answers for one lesson
    Grade {
        /// Path to a .json or .toml library (defaults to the config value)
        #[arg(long)]
        library: Option<PathBuf>,

        /// Lesson ID to grade
        #[arg(long)]
        lesson: String,

        /// JSON file mapping question IDs to answers
        #[arg(long)]
        answers: PathBuf,

        /// Student ID the attempt is recorded for
        #[arg(long)]
        student: String,

        /// Attempt ledger JSON (defaults to the config value)
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Directory to write the JSON result into
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Grade without checking or recording the attempt
        #[arg(long)]
        dry_run: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show attempt status for a student across all lessons
    Status {
        /// Path to a .json or .toml library (defaults to the config value)
        #[arg(long)]
        library: Option<PathBuf>,

        /// Student ID
        #[arg(long)]
        student: String,

        /// Attempt ledger JSON (defaults to the config value)
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and sample lesson library
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizgrade=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { library, config } => commands::validate::execute(library, config),
        Commands::Grade {
            library,
            lesson,
            answers,
            student,
            ledger,
            output,
            format,
            dry_run,
            config,
        } => commands::grade::execute(commands::grade::GradeArgs {
            library,
            lesson,
            answers,
            student,
            ledger,
            output,
            format,
            dry_run,
            config,
        }),
        Commands::Status {
            library,
            student,
            ledger,
            config,
        } => commands::status::execute(library, student, ledger, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
