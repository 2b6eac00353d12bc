// placemerge - reconcile old-method and new-method place collections

mod exit_codes;
mod filter;
mod merge;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use placemerge_recon::MatchStrategy;

use exit_codes::{EXIT_ERROR, EXIT_GEO, EXIT_INPUT, EXIT_INVALID_CONFIG, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "placemerge")]
#[command(about = "Merge place registries collected by two methods")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match two place collections and write the merged registry
    #[command(after_help = "\
Examples:
  placemerge merge brighton.toml
  placemerge merge brighton.toml --output registry.xlsx
  placemerge merge brighton.toml --strategy optimal --json")]
    Merge {
        /// Path to the merge config (.toml)
        config: PathBuf,

        /// Override the config's match strategy
        #[arg(long)]
        strategy: Option<StrategyArg>,

        /// Registry output (.csv, .tsv, .xlsx or .json); overrides [output] file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print the full result as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Check a merge config without running it
    #[command(after_help = "\
Examples:
  placemerge validate brighton.toml")]
    Validate {
        /// Path to the merge config (.toml)
        config: PathBuf,
    },

    /// Spatial pre-filters for place tables
    #[command(subcommand)]
    Filter(filter::FilterCommands),
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Greedy,
    Optimal,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Greedy => MatchStrategy::Greedy,
            StrategyArg::Optimal => MatchStrategy::Optimal,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  placemerge-recon ", env!("CARGO_PKG_VERSION"),
    )
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Merge {
            config,
            strategy,
            output,
            json,
        } => merge::cmd_merge(config, strategy.map(Into::into), output, json),
        Commands::Validate { config } => merge::cmd_validate(config),
        Commands::Filter(cmd) => filter::cmd_filter(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn engine(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    pub fn geo(msg: impl Into<String>) -> Self {
        Self { code: EXIT_GEO, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<placemerge_io::IoError> for CliError {
    /// Load-side failures; writers map their errors explicitly.
    fn from(err: placemerge_io::IoError) -> Self {
        use placemerge_io::IoError;
        let hint = match &err {
            IoError::MissingColumn { .. } => Some("check the [*.columns] mapping against the file's header row"),
            IoError::UnsupportedFormat { .. } => Some("save the sheet as .csv or .xlsx"),
            _ => None,
        };
        let cli = CliError::input(err.to_string());
        match hint {
            Some(h) => cli.with_hint(h),
            None => cli,
        }
    }
}
