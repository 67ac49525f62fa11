use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mongodb::bson::Bson;
use mongodb_tools::cli;
use mongodb_tools::helpers::dump::{DumpReader, Groups, field_equals, parse_value};
use mongodb_tools::stats::group_table;

/// Scan a mongodump `.bson` file without restoring it.
///
/// Prints matching documents as relaxed extended JSON, one per line, or a count
/// per distinct value with `--group-by`.
#[derive(Parser)]
#[command(name = "dump-query", version, about)]
struct Cli {
    /// A `<collection>.bson` file written by mongodump
    file: PathBuf,

    /// Keep documents where this field equals `--equals`; dotted paths descend into subdocuments
    #[arg(long, requires = "equals")]
    field: Option<String>,

    /// Value to compare against, as extended JSON or a bare string
    #[arg(long, requires = "field")]
    equals: Option<String>,

    /// Count documents per distinct value of this field
    #[arg(long, value_name = "FIELD")]
    group_by: Option<String>,
}

fn main() -> anyhow::Result<()> {
    cli::init_logging();
    let args = Cli::parse();

    let filter = args.field.as_deref().zip(args.equals.as_deref().map(parse_value));
    let mut groups = args.group_by.as_deref().map(|field| Groups::counting(field));
    let reader = DumpReader::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    let mut scanned = 0_u64;
    for doc in reader {
        let doc = doc.with_context(|| format!("Failed to read {}", args.file.display()))?;
        scanned += 1;

        if let Some((path, value)) = &filter
            && !field_equals(&doc, path, value)
        {
            continue;
        }

        match groups.as_mut() {
            Some(groups) => groups.insert(doc),
            None => println!("{}", Bson::Document(doc).into_relaxed_extjson()),
        }
    }
    log::info!("Scanned {scanned} documents from {}", args.file.display());

    if let (Some(field), Some(groups)) = (&args.group_by, groups) {
        println!("{}", group_table(field, &groups.into_groups()));
    }
    Ok(())
}
