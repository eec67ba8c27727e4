use clap::Parser;
use dts_compare::{
    compare_sources, load_source_file, tracing_config, Alignment, CompareOptions, CsvFormatter,
    Error, Formatter, Result,
};

use std::path::{Path, PathBuf};

/// Compare two declaration files and print one CSV line per construct.
#[derive(Parser, Debug)]
#[command(name = "dts-compare", version)]
struct Cli {
    /// Reference declarations, as a JSON syntax tree
    reference: PathBuf,
    /// Candidate declarations, as a JSON syntax tree
    candidate: PathBuf,
    /// First column of every line (defaults to the candidate file stem)
    #[arg(long)]
    label: Option<String>,
    /// Only report the construct with this (qualified) name
    #[arg(long)]
    construct: Option<String>,
    #[arg(long, value_enum, default_value_t = Alignment::ByName)]
    alignment: Alignment,
    #[arg(long, default_value_t = ',')]
    separator: char,
    /// Print a header row first
    #[arg(long)]
    header: bool,
    /// List every difference on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    tracing_config::init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let reference = load_source_file(&cli.reference)?;
    let candidate = load_source_file(&cli.candidate)?;
    let options = CompareOptions {
        alignment: cli.alignment,
    };

    let mut results = compare_sources(&reference, &candidate, &options);
    if let Some(name) = &cli.construct {
        results.retain(|r| &r.template == name);
        if results.is_empty() {
            return Err(Error::ConstructNotFound(name.clone()));
        }
    }

    let label = cli
        .label
        .clone()
        .unwrap_or_else(|| file_stem(&cli.candidate));
    let formatter = CsvFormatter::with_separator(cli.separator);

    if cli.header {
        println!("{}", formatter.header());
    }
    for result in &results {
        println!("{}", formatter.format(&label, result));
        if cli.verbose {
            for d in &result.differences {
                eprintln!("  {}", d);
            }
        }
    }

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
