// Logsight - Anomaly dashboard for scored log records
//
// Copyright (C) 2026 Daniel Freiermuth
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
use anyhow::Context;
use clap::Parser;
use logsight::client::{FileSource, LogQuery, LogServiceClient, SnapshotSource};
use logsight::config::GlobalConfig;
use logsight::core::{Dashboard, RefreshOutcome, Refresher, Selection};
use logsight::ui::cli::{init_tracing, DrillArgs};
use logsight::ui::report;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");
const DEFAULT_REFRESH_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(name = "logsight")]
#[command(author = "Daniel Freiermuth")]
#[command(version = VERSION)]
#[command(about = "Severity, category and service breakdown of anomaly-scored logs", long_about = None)]
struct Args {
    /// Read the snapshot from a JSON file instead of the log service
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Log service base URL (overrides config and LOGSIGHT_URL)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Only fetch records of this service
    #[arg(long, value_name = "SERVICE")]
    service: Option<String>,

    /// Start of the time window, epoch milliseconds
    #[arg(long, value_name = "MILLIS")]
    from: Option<i64>,

    /// End of the time window, epoch milliseconds
    #[arg(long, value_name = "MILLIS")]
    to: Option<i64>,

    /// Maximum number of records to fetch
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    #[command(flatten)]
    drill: DrillArgs,

    /// Also list the flagged anomalies
    #[arg(long)]
    anomalies: bool,

    /// Print JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Refresh periodically (every SECS seconds, or the configured interval)
    #[arg(long, value_name = "SECS", num_args = 0..=1)]
    watch: Option<Option<u64>>,

    /// Save the effective log service URL to the config file
    #[arg(long)]
    save_config: bool,
}

/// What to print for each published dashboard
struct Output {
    selection: Option<Selection>,
    anomalies: bool,
    json: bool,
}

impl Output {
    fn print(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        let mut out = std::io::stdout().lock();
        if self.json {
            match &self.selection {
                Some(selection) => {
                    serde_json::to_writer_pretty(&mut out, &dashboard.drill_down_view(selection))?;
                }
                None => serde_json::to_writer_pretty(&mut out, dashboard)?,
            }
            writeln!(out)?;
        } else {
            report::render_dashboard(&mut out, dashboard)?;
            if let Some(selection) = &self.selection {
                writeln!(out)?;
                report::render_drill_down(&mut out, &dashboard.drill_down_view(selection))?;
            }
            if self.anomalies {
                writeln!(out)?;
                report::render_anomalies(&mut out, dashboard)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

async fn run<S: SnapshotSource>(
    source: S,
    query: &LogQuery,
    output: &Output,
    watch: Option<Duration>,
) -> anyhow::Result<()> {
    let refresher = Refresher::new(source);

    let Some(period) = watch else {
        let outcome = refresher
            .refresh(query)
            .await
            .with_context(|| format!("Failed to load snapshot from {}", refresher.source().describe()))?;
        if let RefreshOutcome::Applied(dashboard) = outcome {
            output.print(&dashboard)?;
        }
        return Ok(());
    };

    tracing::info!("Watching {} every {}s", refresher.source().describe(), period.as_secs());
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        match refresher.refresh(query).await {
            Ok(RefreshOutcome::Applied(dashboard)) => output.print(&dashboard)?,
            Ok(RefreshOutcome::Stale { .. }) => {}
            Err(e) if e.is_retryable() => {
                tracing::warn!("Refresh failed, keeping previous snapshot: {e}");
            }
            Err(e) => return Err(e).context("Refresh failed"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    tracing::info!("Logsight starting up (version {VERSION})");

    let config = GlobalConfig::load()
        .with_env_overrides()
        .with_url_override(args.url.clone());

    if args.save_config {
        let path = config.save().context("Failed to save config")?;
        tracing::info!("Log service URL {} saved to {}", config.log_service_url, path.display());
    }

    let query = LogQuery {
        service_name: args.service,
        from: args.from,
        to: args.to,
        limit: args.limit.or(config.default_limit),
    };
    let output = Output {
        selection: args.drill.selection(),
        anomalies: args.anomalies,
        json: args.json,
    };
    let watch = args.watch.map(|secs| {
        let secs = secs
            .or(config.refresh_interval_secs)
            .unwrap_or(DEFAULT_REFRESH_SECS)
            .max(1);
        Duration::from_secs(secs)
    });

    match args.file {
        Some(path) => run(FileSource::new(path), &query, &output, watch).await,
        None => {
            let client = LogServiceClient::from_config(&config)?;
            run(client, &query, &output, watch).await
        }
    }
}
