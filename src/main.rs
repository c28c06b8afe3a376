//! Command-line driver for ad-hoc extraction runs: reads a JSON table
//! description and prints the extracted form records as JSON lines.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use wifl::grid::expand_grid;
use wifl::{Cell, FormSink, HeuristicServices, TableContext};

#[derive(Debug, Parser)]
#[command(version, about = "Extract form records from an inflection table")]
struct Args {
    /// JSON table description: {lang, pos, word, source?, titles?, rows}
    input: PathBuf,

    /// Pretty-print the extracted records
    #[arg(long)]
    pretty: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Deserialize)]
struct TableInput {
    lang: String,
    pos: String,
    word: String,
    #[serde(default = "default_source")]
    source: String,
    #[serde(default)]
    titles: Vec<String>,
    rows: Vec<Vec<CellInput>>,
}

fn default_source() -> String {
    "inflection".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct CellInput {
    text: String,
    header: bool,
    colspan: usize,
    rowspan: usize,
}

impl Default for CellInput {
    fn default() -> Self {
        Self {
            text: String::new(),
            header: false,
            colspan: 1,
            rowspan: 1,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let table: TableInput =
        serde_json::from_str(&raw).context("Error decoding JSON table description")?;

    let mut rows = Vec::new();
    for row in &table.rows {
        let mut cells = Vec::new();
        for cell in row {
            ensure!(
                cell.colspan >= 1 && cell.rowspan >= 1,
                "cell {:?}: colspan and rowspan must be at least 1",
                cell.text
            );
            cells.push(Cell::new(&cell.text, cell.header, 0, cell.colspan, cell.rowspan));
        }
        rows.push(cells);
    }
    let grid = expand_grid(rows);

    let ctx = TableContext {
        lang: &table.lang,
        pos: &table.pos,
        word: &table.word,
        source: &table.source,
    };
    let mut sink = FormSink::new();
    if !sink.add_table(&HeuristicServices, &ctx, &grid, &table.titles) {
        anyhow::bail!("table shape not recognised");
    }

    for record in sink.forms() {
        let json = if args.pretty {
            serde_json::to_string_pretty(record)?
        } else {
            serde_json::to_string(record)?
        };
        println!("{json}");
    }
    Ok(())
}
