pub mod config;
pub mod convert;
pub mod core;
pub mod log;
pub mod providers;
pub mod store;

use crate::convert::convert_transaction;
use crate::core::Transaction;
use crate::providers::treasury::TreasuryRateSource;
use crate::store::TransactionStore;
use anyhow::Result;
use serde_json::json;
use tracing::{debug, info};

pub enum AppCommand {
    Register {
        description: String,
        date: String,
        amount: String,
    },
    Query {
        id: String,
    },
    Convert {
        id: String,
        country: String,
        currency: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Transaction book starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = TransactionStore::open(config.storage_path()?);

    match command {
        AppCommand::Register {
            description,
            date,
            amount,
        } => {
            let transaction = Transaction::new(&description, &date, &amount)?;
            let uid = store.register(transaction).await?;
            info!("Transaction registered: {uid}");
            println!("{}", serde_json::to_string_pretty(&json!({ "transactionId": uid }))?);
        }
        AppCommand::Query { id } => {
            let entry = store.query(&id).await?;
            info!("Transaction queried: {}", entry.uid);
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        AppCommand::Convert {
            id,
            country,
            currency,
        } => {
            let base_url = config
                .providers
                .treasury
                .as_ref()
                .map_or(config::TREASURY_BASE_URL, |p| &p.base_url);
            let rates = TreasuryRateSource::new(base_url);

            let report = convert_transaction(&store, &rates, &id, &country, &currency).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    // every hand-off accepted above must reach the snapshot before we exit
    store.flush().await?;
    store.shutdown().await;
    Ok(())
}
