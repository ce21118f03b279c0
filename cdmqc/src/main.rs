// cdmqc/src/main.rs

use clap::Parser;

mod cli;
mod commands;
mod render;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug cdmqc checks ... to see per-query timings.
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schemas => {
            if let Err(e) = commands::schemas::execute().await {
                eprintln!("❌ Schema discovery failed: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Describe => {
            commands::describe::execute();
        }

        Commands::Checks { schema, cutoff } => {
            if let Err(e) = commands::checks::execute(schema, cutoff).await {
                eprintln!("❌ Checks failed: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Persistence {
            previous,
            current,
            cutoff,
        } => {
            if let Err(e) = commands::persistence::execute(previous, current, cutoff).await {
                eprintln!("❌ Comparison failed: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Summary { schema, reference } => {
            if let Err(e) = commands::summary::execute(schema, reference).await {
                eprintln!("❌ Summary failed: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Trend {
            schema,
            table,
            interval,
            start,
            end,
        } => {
            if let Err(e) = commands::trend::execute(schema, table, interval, start, end).await {
                eprintln!("❌ Trend failed: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Query { query, db_path } => {
            if let Err(e) = commands::query::execute(query, db_path).await {
                eprintln!("❌ Query failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
