use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tirage::cli::{self, SeriesInput};
use tirage::config::Config;
use tirage::core::{ExtractionMode, PolicyKind};
use tirage::error::TirageResult;

#[derive(Parser)]
#[command(name = "tirage")]
#[command(about = "Daily draw ledger: record series and results, predict, compare.")]
#[command(long_about = "Tirage - daily draw ledger backed by an Excel workbook

COMMANDS:
  init      - Create an empty workbook
  series    - Record the day's series and generate a prediction
  predict   - Generate a prediction from an already recorded series
  result    - Record the drawn numbers
  show      - Prediction, result and score for a date
  history   - Scores for every date with a prediction and a result
  extract   - Show the digits/pairs extracted from a string

WORKBOOK SHEETS:
  Historique_Gagnants  Date, Num1..Num5
  Series_Journalieres  Date, Matrice, Clavier, Cerveau, Code, Event
  Predictions          Date, Pred1..Pred5

EXAMPLES:
  tirage init
  tirage series --matrice 123,456 --clavier 908 --policy frequency
  tirage result 4 17 23 56 88
  tirage show --date 2024-05-01

NOTE: the workbook is rewritten in full on every save. Two processes
writing the same file at once will lose one of the writes.")]
#[command(version)]
struct Cli {
    /// Workbook path (default: Donnees_Tirage.xlsx or the config value)
    #[arg(short, long, global = true, env = "TIRAGE_WORKBOOK")]
    workbook: Option<PathBuf>,

    /// Config file (default: tirage.yaml when present)
    #[arg(short, long, global = true, env = "TIRAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty workbook with the three sheets
    Init {
        /// Overwrite an existing workbook
        #[arg(long)]
        force: bool,
    },

    #[command(long_about = "Record the day's series and generate a prediction.

The five fields are free text. Comma-separated 3-digit groups (123,456)
or plain digit strings are read; anything else is ignored.

POLICIES:
  frequency - most frequent digits and digit pairs, sorted, first five
  random    - five distinct numbers from 1 to 99")]
    /// Record the day's series and generate a prediction
    Series {
        #[arg(long, default_value = "")]
        matrice: String,

        #[arg(long, default_value = "")]
        clavier: String,

        #[arg(long, default_value = "")]
        cerveau: String,

        #[arg(long, default_value = "")]
        code: String,

        #[arg(long, default_value = "")]
        event: String,

        /// Draw date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Prediction policy (default: from config)
        #[arg(short, long, value_enum)]
        policy: Option<PolicyKind>,

        /// Seed for the random policy
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate a prediction from an already recorded series
    Predict {
        /// Draw date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Prediction policy (default: from config)
        #[arg(short, long, value_enum)]
        policy: Option<PolicyKind>,

        /// Seed for the random policy
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Record the five drawn numbers
    Result {
        /// Five numbers between 1 and 99
        #[arg(required = true, num_args = 5, value_parser = clap::value_parser!(u8).range(1..=99))]
        numbers: Vec<u8>,

        /// Draw date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show prediction, result and score for a date
    Show {
        /// Draw date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Scores for every date with both a prediction and a result
    History {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the values extracted from a string
    Extract {
        /// Text to read, e.g. "123,456"
        text: String,

        /// Extraction mode
        #[arg(short, long, value_enum, default_value_t = ExtractionMode::Unite)]
        mode: ExtractionMode,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("tirage=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "tirage=warn".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> TirageResult<()> {
    // Extraction touches neither the workbook nor the config
    if let Commands::Extract { text, mode } = &cli.command {
        cli::extract_text(text, *mode);
        return Ok(());
    }

    let config = Config::resolve(cli.config.as_deref())?;
    let workbook = cli.workbook.unwrap_or_else(|| config.workbook.clone());
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Init { force } => cli::init(&workbook, force),

        Commands::Series {
            matrice,
            clavier,
            cerveau,
            code,
            event,
            date,
            policy,
            seed,
        } => {
            let mut settings = config.predictor_settings();
            settings.seed = seed.or(settings.seed);
            let input = SeriesInput {
                matrice,
                clavier,
                cerveau,
                code,
                event,
            };
            cli::series(
                &workbook,
                date.unwrap_or(today),
                input,
                policy.unwrap_or(config.policy),
                &settings,
            )
            .map(|_| ())
        }

        Commands::Predict { date, policy, seed } => {
            let mut settings = config.predictor_settings();
            settings.seed = seed.or(settings.seed);
            cli::predict(
                &workbook,
                date.unwrap_or(today),
                policy.unwrap_or(config.policy),
                &settings,
            )
            .map(|_| ())
        }

        Commands::Result { numbers, date } => {
            cli::result(&workbook, date.unwrap_or(today), &numbers).map(|_| ())
        }

        Commands::Show { date, json } => {
            cli::show(&workbook, date.unwrap_or(today), json).map(|_| ())
        }

        Commands::History { json } => cli::history(&workbook, json).map(|_| ()),

        Commands::Extract { .. } => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("❌ {}", e).red().bold());
        std::process::exit(1);
    }
}
