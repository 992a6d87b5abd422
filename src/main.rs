use std::path::PathBuf;

use clap::Parser;

use blockgraph_lib::{
    commands::resolve, core::types::output_schema, init_tracing, AppError, ResolverConfig,
};

/// Resolve a saved document-analysis result into lines, form fields,
/// query answers and tables.
#[derive(Parser)]
#[command(name = "blockgraph")]
#[command(version)]
struct Cli {
    /// Analysis result JSON (reads stdin when omitted)
    file: Option<PathBuf>,

    /// Reconstruct TABLE blocks (also enabled by BLOCKGRAPH_TABLES)
    #[arg(long)]
    tables: bool,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,

    /// Print the output JSON schema and exit
    #[arg(long)]
    schema: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = if cli.schema {
        output_schema().and_then(|schema| {
            serde_json::to_string_pretty(&schema)
                .map_err(|err| AppError::Serialization(err.to_string()))
        })
    } else {
        let mut config = ResolverConfig::from_env();
        if cli.tables {
            config = config.with_tables(true);
        }
        resolve::run(cli.file.as_deref(), &config, cli.pretty)
    };

    match outcome {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            let body = serde_json::to_string(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{body}");
            std::process::exit(1);
        }
    }
}
