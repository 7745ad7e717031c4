//! findtable - query a directory tree as a table

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser as ClapParser;
use findtable::{row_matches, FindTable, Qualifier, Row, ScanOptions, TableOptions, Value};
use std::io::{self, BufWriter, Write};

/// Query a directory tree as a table of files
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root directory of the table
    #[arg(short, long)]
    root: String,

    /// Column option as column=value (alias, pattern or command); repeatable
    #[arg(short, long = "option", value_name = "COLUMN=VALUE")]
    options: Vec<String>,

    /// Columns to output, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "path")]
    columns: Vec<String>,

    /// Qualifier such as "size>=100" or "path~~'%.txt'"; repeatable
    #[arg(short, long = "where", value_name = "QUALIFIER")]
    quals: Vec<String>,

    /// Fail when a qualifier cannot be pushed down to find
    #[arg(long)]
    strict: bool,

    /// Print rows as JSON objects, one per line
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut options = TableOptions::new();
    options.insert(findtable::config::ROOT_DIRECTORY, args.root.as_str());
    for option in &args.options {
        let (column, value) = option
            .split_once('=')
            .ok_or_else(|| anyhow!("Option {:?} is not of the form column=value", option))?;
        options.insert(column.trim(), value);
    }

    let quals = args
        .quals
        .iter()
        .map(|q| q.parse::<Qualifier>())
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to parse qualifier")?;

    // Qualified columns must be declared even when they are not printed
    let mut scanned = args.columns.clone();
    for qual in &quals {
        if !scanned.contains(&qual.field) {
            scanned.push(qual.field.clone());
        }
    }
    let mut declared = scanned.clone();
    for (column, _) in options.iter() {
        let reserved = findtable::config::RESERVED.contains(&column);
        if !reserved && !declared.iter().any(|c| c == column) {
            declared.push(column.to_string());
        }
    }

    let table = FindTable::new(options, &declared).context("Failed to configure table")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let scan = table.execute_with(&quals, &scanned, ScanOptions { strict: args.strict });
    let mut failed = false;
    for row in scan {
        match row {
            // find only applies the qualifiers it could express
            Ok(row) if row_matches(&quals, &row) => {
                write_row(&mut out, &project(&row, &args.columns), args.json)?
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                failed = true;
            }
        }
    }
    out.flush()?;

    if failed {
        bail!("Scan of {} failed", table.root());
    }
    Ok(())
}

/// Keep only `columns`, in the order given
fn project(row: &Row, columns: &[String]) -> Row {
    columns
        .iter()
        .map(|column| {
            let value = row.get(column).cloned().unwrap_or(Value::Null);
            (column.as_str(), value)
        })
        .collect()
}

fn write_row(out: &mut impl Write, row: &Row, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, row)?;
        writeln!(out)?;
    } else {
        let fields: Vec<String> = row.values().map(|v| v.to_string()).collect();
        writeln!(out, "{}", fields.join("\t"))?;
    }
    Ok(())
}
