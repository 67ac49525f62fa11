use clap::Parser;
use mongodb_tools::cli::{self, ConnectionArgs};
use mongodb_tools::connection::{ConnectionManager, MongoSource};
use mongodb_tools::stats::RedundantIndexFinder;

/// Print indexes whose keys are a prefix of another index on the same collection.
#[derive(Parser)]
#[command(name = "redundant-indexes", version, about)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
}

fn main() -> anyhow::Result<()> {
    cli::init_logging();
    let args = Cli::parse();

    let settings = args.connection.settings()?;
    let manager = ConnectionManager::new()?;
    let source = MongoSource::connect(&manager, &settings.uri)?;

    let report = RedundantIndexFinder::new(&source, settings.collect_options(None)).find()?;
    for finding in &report.findings {
        println!("{finding}");
    }
    if report.findings.is_empty() {
        log::info!("No redundant indexes found");
    }
    Ok(())
}
