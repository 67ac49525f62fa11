use clap::Parser;
use mongodb_tools::cli::{self, ConnectionArgs};
use mongodb_tools::connection::ConnectionManager;
use mongodb_tools::stats::{DEFAULT_TOP_INDEXES, Reporter};

/// Print the size of every index and the largest ones overall.
#[derive(Parser)]
#[command(name = "index-stats", version, about)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// How many of the largest indexes to list
    #[arg(long, default_value_t = DEFAULT_TOP_INDEXES)]
    top: usize,
}

fn main() -> anyhow::Result<()> {
    cli::init_logging();
    let args = Cli::parse();

    let settings = args.connection.settings()?;
    let manager = ConnectionManager::new()?;
    let snapshot = cli::collect_snapshot(&manager, &settings)?;

    print!("{}", Reporter::new(&snapshot).render_index_report(args.top));
    Ok(())
}
