use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tallybook::app;
use tallybook::config::{default_config_path, ResolvedConfig};
use tallybook::error::{LedgerError, LedgerResult, ValidationError};
use tallybook::models::{Id, TransactionDraft};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tallybook")]
#[command(about = "Running-balance ledger with monthly revenue/expense rollups")]
struct Cli {
    /// Path to config file (defaults to ./tallybook.toml, then the data directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct UserArg {
    /// User whose account to operate on
    #[arg(short, long)]
    user: String,
}

#[derive(Args)]
struct TransactionArgs {
    /// Calendar date (YYYY-MM-DD) or RFC 3339 timestamp
    #[arg(long)]
    date: String,

    /// Positive amount in minor units (e.g. cents)
    #[arg(long)]
    amount: String,

    /// "revenue" or "expense"
    #[arg(long = "type")]
    kind: String,

    #[arg(long)]
    description: Option<String>,
}

impl TransactionArgs {
    fn draft(&self) -> TransactionDraft {
        TransactionDraft {
            date: Some(self.date.clone()),
            amount: Some(serde_json::Value::String(self.amount.clone())),
            kind: Some(self.kind.clone()),
            description: self.description.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show current configuration
    Config,
    /// Create the account for a user
    Init(UserArg),
    /// Full account snapshot
    Account(UserArg),
    /// Balance and lifetime totals
    Stats(UserArg),
    /// Transaction list in entry order
    Transactions(UserArg),
    /// Twelve-month revenue/expense series with month-over-month change
    Series(UserArg),
    /// Recompute aggregates from the transaction log and report mismatches
    Audit(UserArg),
    /// Record a transaction
    Add {
        #[command(flatten)]
        user: UserArg,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Replace every field of a transaction
    Update {
        #[command(flatten)]
        user: UserArg,
        /// Transaction id
        #[arg(long)]
        id: String,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Remove a transaction
    Delete {
        #[command(flatten)]
        user: UserArg,
        /// Transaction id
        #[arg(long)]
        id: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn parse_id(raw: &str) -> LedgerResult<Id> {
    Id::from_string_checked(raw).map_err(|e| LedgerError::Validation(ValidationError::from(e)))
}

fn to_json<T: serde::Serialize>(value: T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

async fn run(
    command: Command,
    config_path: &std::path::Path,
    config: &ResolvedConfig,
) -> Result<serde_json::Value> {
    let service = app::open_service(config);
    let display = &config.display;

    match command {
        Command::Config => Ok(app::config_output(config_path, config)),
        Command::Init(u) => Ok(app::init_account(&service, display, &parse_id(&u.user)?).await?),
        Command::Account(u) => {
            to_json(app::show_account(&service, display, &parse_id(&u.user)?).await?)
        }
        Command::Stats(u) => to_json(app::show_stats(&service, display, &parse_id(&u.user)?).await?),
        Command::Transactions(u) => {
            to_json(app::list_transactions(&service, display, &parse_id(&u.user)?).await?)
        }
        Command::Series(u) => {
            to_json(app::monthly_series(&service, display, &parse_id(&u.user)?).await?)
        }
        Command::Audit(u) => Ok(app::audit_account(&service, &parse_id(&u.user)?).await?),
        Command::Add { user, fields } => Ok(app::add_transaction(
            &service,
            display,
            &parse_id(&user.user)?,
            &fields.draft(),
        )
        .await?),
        Command::Update { user, id, fields } => Ok(app::update_transaction(
            &service,
            display,
            &parse_id(&user.user)?,
            &parse_id(&id)?,
            &fields.draft(),
        )
        .await?),
        Command::Delete { user, id } => Ok(app::delete_transaction(
            &service,
            display,
            &parse_id(&user.user)?,
            &parse_id(&id)?,
        )
        .await?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = ResolvedConfig::load_or_default(&config_path)?;

    match run(cli.command, &config_path, &config).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => match err.downcast_ref::<LedgerError>() {
            Some(ledger_err) => {
                println!("{}", serde_json::to_string_pretty(&app::error_output(ledger_err))?);
                std::process::exit(1);
            }
            None => Err(err),
        },
    }
}
