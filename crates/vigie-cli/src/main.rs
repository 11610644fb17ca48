mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "vigie",
    version,
    about = "Explainable health and environmental scoring for food, cosmetics and detergents"
)]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the lookup tables (overrides config and VIGIE_TABLES_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    tables: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one product or an array of products from a JSON file
    Analyze {
        /// Path to a JSON file with a product object or an array of products
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Show normalized ingredients and detected markers/additives (without scoring)
    Detect {
        /// Path to a JSON file with a product object
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate lookup tables
    Tables {
        #[command(subcommand)]
        action: TablesAction,
    },
}

#[derive(Subcommand)]
enum TablesAction {
    /// List the active tables with their versions
    List,
    /// Validate a table directory
    Validate {
        /// Directory containing markers.json, additives.json, ...
        dir: PathBuf,
    },
    /// Look up an additive by E-number (e.g. E320, en:e150d)
    Additive {
        code: String,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = commands::Settings {
        config: cli.config,
        tables: cli.tables,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Analyze { input_file, output } => {
            commands::analyze::run(&settings, &input_file, &output)
        }
        Commands::Detect { input_file, output } => {
            commands::detect::run(&settings, &input_file, &output)
        }
        Commands::Tables { action } => match action {
            TablesAction::List => commands::tables::list(&settings),
            TablesAction::Validate { dir } => commands::tables::validate(&dir),
            TablesAction::Additive { code } => commands::tables::additive(&settings, &code),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(hint) = e.hint() {
            eprintln!("Hint: {hint}");
        }
        std::process::exit(1);
    }
}
