use std::{io, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mwxl2csv::{NumericPolicy, Options, Schema, SchemaSelection};

const AFTER_HELP: &str = r#"The tool prints logs to stderr and conversion results to stdout,
so logs and results could be stored as files this way:
    mwxl2csv mission.xml 2>mwxl2csv.log 1>mission.csv
Without FILE (or with '-') the mission is read from stdin:
    cat mission.xml | mwxl2csv"#;

/// A tool to convert a MultiWii / INAV mission XML file into CSV.
#[derive(Parser)]
#[command(name = "mwxl2csv")]
#[command(author, version, about, long_about = None, after_help = AFTER_HELP)]
struct Cli {
    /// Mission XML file, stdin when omitted or '-'
    file: Option<PathBuf>,

    /// Mission XML layout
    #[arg(long, value_enum, default_value = "auto")]
    schema: SchemaArg,

    /// Coerce non-numeric parameters to 0 instead of failing
    #[arg(long)]
    lenient: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemaArg {
    /// Detect from the item elements present
    Auto,
    /// Uppercase MISSION / MISSIONITEM, p1 column only
    Legacy,
    /// Lowercase mission / missionitem, p1 and p2 columns
    Modern,
}

impl From<SchemaArg> for SchemaSelection {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Auto => SchemaSelection::Auto,
            SchemaArg::Legacy => SchemaSelection::Forced(Schema::Legacy),
            SchemaArg::Modern => SchemaSelection::Forced(Schema::Modern),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = Options {
        schema: cli.schema.into(),
        numeric: if cli.lenient {
            NumericPolicy::Lenient
        } else {
            NumericPolicy::Strict
        },
    };

    match mwxl2csv::run(cli.file.as_deref(), &options, io::stdout().lock()) {
        Ok(rows) => {
            info!("done, {} rows written", rows);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("mwxl2csv={}", level))),
        )
        .init();
}
