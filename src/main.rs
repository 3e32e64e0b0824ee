use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use txbook::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for txbook::AppCommand {
    fn from(cmd: Commands) -> txbook::AppCommand {
        match cmd {
            Commands::Register {
                description,
                date,
                amount,
            } => txbook::AppCommand::Register {
                description,
                date,
                amount,
            },
            Commands::Query { id } => txbook::AppCommand::Query { id },
            Commands::Convert {
                id,
                country,
                currency,
            } => txbook::AppCommand::Convert {
                id,
                country,
                currency,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Record a purchase transaction and print its id
    Register {
        /// Purchase description, up to 50 characters
        #[arg(short, long)]
        description: String,
        /// Purchase date, e.g. 2023-09-26 or 26/09/2023
        #[arg(short = 't', long)]
        date: String,
        /// Purchase amount, e.g. 99.99
        #[arg(short, long)]
        amount: String,
    },
    /// Look up a recorded transaction by id
    Query { id: String },
    /// Convert a recorded transaction into another currency
    Convert {
        id: String,
        /// Country of the target currency, e.g. Mexico
        #[arg(long)]
        country: String,
        /// Target currency name, e.g. Peso
        #[arg(long)]
        currency: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => txbook::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = txbook::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
# storage: "/path/to/transactions.json"

providers:
  treasury:
    base_url: "https://api.fiscaldata.treasury.gov"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
