//! trisql CLI
//!
//! Runs ad-hoc statements against SQLite, MySQL or PostgreSQL.

use std::collections::BTreeMap;

use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use trisql::prelude::*;

/// Run SQL against SQLite, MySQL or PostgreSQL.
#[derive(Parser)]
#[command(name = "trisql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Driver: sqlite, mysql or pgsql.
    #[arg(long, env = "TRISQL_DRIVER", default_value = "sqlite")]
    driver: String,

    /// Database name, or SQLite file path (`:memory:` for a scratch database).
    #[arg(short, long, env = "TRISQL_DATABASE", default_value = ":memory:")]
    database: String,

    /// Server host (MySQL / PostgreSQL).
    #[arg(long)]
    host: Option<String>,

    /// Server port (MySQL / PostgreSQL).
    #[arg(long)]
    port: Option<u16>,

    /// User name (MySQL / PostgreSQL).
    #[arg(short, long)]
    user: Option<String>,

    /// Password (MySQL / PostgreSQL).
    #[arg(long, env = "TRISQL_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl ConnectionArgs {
    fn params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert(String::from("database"), self.database.clone());
        let optional = [
            ("host", self.host.clone()),
            ("port", self.port.as_ref().map(ToString::to_string)),
            ("user", self.user.clone()),
            ("password", self.password.clone()),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                params.insert(String::from(key), value);
            }
        }
        params
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a statement and print its rows as JSON lines.
    Query {
        /// SQL text with `?` placeholders (`$n` on PostgreSQL).
        sql: String,

        /// Bound parameter; repeat for each placeholder.
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Run a statement and print the affected row count.
    Exec {
        /// SQL text with `?` placeholders (`$n` on PostgreSQL).
        sql: String,

        /// Bound parameter; repeat for each placeholder.
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Drop a table if it exists.
    DropTable {
        /// Table name.
        name: String,
    },
}

/// Parses a CLI parameter as an integer, then a float, else text.
fn parse_param(raw: &str) -> SqlValue {
    if let Ok(n) = raw.parse::<i64>() {
        SqlValue::Int(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        SqlValue::Float(f)
    } else {
        SqlValue::Text(raw.to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ConnectionConfig::from_params(&cli.connection.driver, &cli.connection.params())?;
    let db = Database::connect(&config).await?;

    match cli.command {
        Commands::Query { sql, params } => {
            let params = params.iter().map(String::as_str).map(parse_param).collect();
            let rows = db.query(&sql, params).await?;
            for row in &rows {
                println!("{}", serde_json::to_string(row)?);
            }
            info!("{} row(s)", rows.len());
        }

        Commands::Exec { sql, params } => {
            let params = params.iter().map(String::as_str).map(parse_param).collect();
            let affected = db.statement(&sql, params).await?;
            println!("{affected}");
        }

        Commands::DropTable { name } => {
            db.schema().drop_table(&name).await?;
            info!("Dropped table {name}");
        }
    }

    Ok(())
}
