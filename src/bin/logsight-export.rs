// Logsight - GPL-3.0-or-later
// This file is part of Logsight.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// Logsight is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Logsight is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Logsight.  If not, see <https://www.gnu.org/licenses/>.

//! Offline exporter: snapshot file in, chart document JSON out.

use anyhow::Context;
use clap::Parser;
use logsight::core::{Dashboard, Snapshot};
use logsight::parser::load_snapshot_file;
use logsight::ui::cli::{init_tracing, DrillArgs};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "logsight-export")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
#[command(about = "Export the dashboard of a log snapshot as JSON", long_about = None)]
struct Args {
    /// Snapshot document: an array of records or {"logs": [...], "anomalies": [...]}
    #[arg(value_name = "SNAPSHOT")]
    input: PathBuf,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    #[command(flatten)]
    drill: DrillArgs,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let document = load_snapshot_file(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let dashboard = Dashboard::compute(Snapshot::from(document));

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let selection = args.drill.selection();
    match (&selection, args.compact) {
        (Some(selection), true) => {
            serde_json::to_writer(&mut writer, &dashboard.drill_down_view(selection))?;
        }
        (Some(selection), false) => {
            serde_json::to_writer_pretty(&mut writer, &dashboard.drill_down_view(selection))?;
        }
        (None, true) => serde_json::to_writer(&mut writer, &dashboard)?,
        (None, false) => serde_json::to_writer_pretty(&mut writer, &dashboard)?,
    }
    writeln!(writer)?;
    writer.flush()?;

    if let Some(path) = &args.output {
        tracing::info!(
            "Exported {} records ({} anomalies) to {}",
            dashboard.summary.total,
            dashboard.summary.anomalies,
            path.display()
        );
    }
    Ok(())
}
