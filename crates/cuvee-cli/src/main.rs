mod commands;
mod error;
mod output;
mod telemetry;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cuvee",
    version,
    about = "Wine quality evaluation from physicochemical measurements"
)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "cuvee_core=debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Where the model and tables come from.
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Model artifact (JSON linear model)
    #[arg(short, long, default_value = "wine_quality_model.json")]
    pub model: PathBuf,

    /// Custom reference table JSON (default: built-in)
    #[arg(long, value_name = "FILE")]
    pub reference: Option<PathBuf>,

    /// Custom advisor rules JSON (default: built-in)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

/// Measurement values; anything not given falls back to the input file or
/// the form defaults.
#[derive(Args, Clone, Default)]
pub struct MeasurementArgs {
    /// Fixed acidity (g/L)
    #[arg(long, value_name = "G_PER_L")]
    pub fixed_acidity: Option<String>,
    /// Volatile acidity (g/L)
    #[arg(long, value_name = "G_PER_L")]
    pub volatile_acidity: Option<String>,
    /// Citric acid (g/L)
    #[arg(long, value_name = "G_PER_L")]
    pub citric_acid: Option<String>,
    /// Residual sugar (g/L)
    #[arg(long, value_name = "G_PER_L")]
    pub residual_sugar: Option<String>,
    /// Chlorides (g/L)
    #[arg(long, value_name = "G_PER_L")]
    pub chlorides: Option<String>,
    /// Free sulfur dioxide (mg/L, whole number)
    #[arg(long, value_name = "MG_PER_L")]
    pub free_sulfur_dioxide: Option<String>,
    /// Total sulfur dioxide (mg/L, whole number)
    #[arg(long, value_name = "MG_PER_L")]
    pub total_sulfur_dioxide: Option<String>,
    /// Density (g/cm³)
    #[arg(long, value_name = "G_PER_CM3")]
    pub density: Option<String>,
    /// pH
    #[arg(long)]
    pub ph: Option<String>,
    /// Sulphates (g/L)
    #[arg(long, value_name = "G_PER_L")]
    pub sulphates: Option<String>,
    /// Alcohol (% vol)
    #[arg(long, value_name = "PERCENT")]
    pub alcohol: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict quality and analyze one wine sample
    Analyze {
        /// JSON file with all eleven measurements
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[command(flatten)]
        measurements: MeasurementArgs,

        #[command(flatten)]
        sources: SourceArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show explanations and the conditions behind each judgment
        #[arg(long)]
        verbose: bool,
    },
    /// Enter measurements at a prompt and analyze repeatedly
    Interactive {
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// Inspect or validate reference tables
    Reference {
        #[command(subcommand)]
        action: TableAction,
    },
    /// Inspect or validate advisor rules
    Rules {
        #[command(subcommand)]
        action: TableAction,
    },
    /// Explain the 0-10 quality scale
    Scale,
}

#[derive(Subcommand)]
enum TableAction {
    /// Print the built-in table
    Show,
    /// Validate a custom JSON file
    Validate {
        /// Path to JSON file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    telemetry::init(&cli.log_level)?;

    match cli.command {
        Commands::Analyze {
            input,
            measurements,
            sources,
            output,
            verbose,
        } => commands::analyze::run(input, &measurements, &sources, &output, verbose),
        Commands::Interactive { sources } => Ok(commands::interactive::run(&sources)?),
        Commands::Reference { action } => Ok(match action {
            TableAction::Show => commands::tables::show_reference(),
            TableAction::Validate { file } => commands::tables::validate_reference(&file),
        }?),
        Commands::Rules { action } => Ok(match action {
            TableAction::Show => commands::tables::show_rules(),
            TableAction::Validate { file } => commands::tables::validate_rules(&file),
        }?),
        Commands::Scale => Ok(commands::tables::scale()?),
    }
}
