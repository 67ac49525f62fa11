use clap::Parser;
use mongodb_tools::cli::{self, ConnectionArgs};
use mongodb_tools::connection::ConnectionManager;
use mongodb_tools::stats::Reporter;

/// Print basic stats about the size of every collection and its indexes.
#[derive(Parser)]
#[command(name = "collection-stats", version, about)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
}

fn main() -> anyhow::Result<()> {
    cli::init_logging();
    let args = Cli::parse();

    let settings = args.connection.settings()?;
    let manager = ConnectionManager::new()?;
    let snapshot = cli::collect_snapshot(&manager, &settings)?;

    print!("{}", Reporter::new(&snapshot).render_collection_report());
    Ok(())
}
