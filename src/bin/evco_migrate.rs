use anyhow::Result;
use clap::{Parser, Subcommand};
use evco::{config::DatabaseConfig, services::MigrationService, startup::init_tracing};

/// EV co-ownership database migration tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations
    Up {
        /// Stop after this migration version (default: latest)
        #[arg(long)]
        target: Option<i64>,
    },

    /// Revert the most recently applied migrations
    Down {
        /// Number of migrations to revert
        #[arg(short = 'n', long, default_value_t = 1)]
        steps: usize,
    },

    /// List known migrations and whether they are applied
    Status,

    /// Print the column layout of a table
    Describe {
        table: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = DatabaseConfig::from_env()?;
    let service = MigrationService::connect(&config).await?;

    let outcome = run(&service, args.command).await;
    service.close().await;
    outcome
}

async fn run(service: &MigrationService, command: Command) -> Result<()> {
    match command {
        Command::Up { target } => {
            let applied = service.up(target).await?;
            if applied.is_empty() {
                println!("Database is up to date");
            }
            for version in applied {
                println!("Applied {}", version);
            }
        }
        Command::Down { steps } => {
            let reverted = service.down(steps).await?;
            if reverted.is_empty() {
                println!("Nothing to revert");
            }
            for version in reverted {
                println!("Reverted {}", version);
            }
        }
        Command::Status => {
            for migration in service.status().await? {
                let mark = if migration.applied { "applied" } else { "pending" };
                println!("{:>14}  {:<8} {}", migration.version, mark, migration.description);
            }
        }
        Command::Describe { table } => {
            for column in service.describe(&table).await? {
                let length = column
                    .character_maximum_length
                    .map(|l| format!("({})", l))
                    .unwrap_or_default();
                let nullable = if column.is_nullable { "NULL" } else { "NOT NULL" };
                println!(
                    "{:<20} {}{:<12} {}",
                    column.column_name, column.udt_name, length, nullable
                );
            }
        }
    }

    Ok(())
}
