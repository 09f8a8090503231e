//! Negotiation Analytics - Main binary
//!
//! Evaluates recorded bilateral negotiation sessions: per-session efficiency
//! and concession profiles, per-tournament tables, and campaign aggregates
//! over repeated tournament runs.
//!
//! # Commands
//!
//! ```text
//! evaluate   <TRACE>      one session      → evaluation.csv, dans.csv, move logs
//! tournament <DIR>        one tournament   → tournament_*.csv + aggregate tables
//! campaign                every tournament → aggregate_*.csv, domain_*.csv
//! domains                 domain catalogue → domains_summary.csv
//! ```
//!
//! Settings come from defaults, then `--config FILE` (TOML), then flags and
//! their environment variables.

mod config;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use config::AnalysisConfig;

/// Negotiation Analytics - efficiency and concession metrics for recorded sessions
#[derive(Parser, Debug)]
#[command(name = "negotiation-analytics")]
#[command(about = "Efficiency and concession-profile analytics for recorded negotiation sessions")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "NEGOTIATION_CONFIG")]
    config: Option<PathBuf>,

    /// Log at DEBUG instead of INFO
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory of domain references (one sub-directory per domain)
    #[arg(long, global = true, env = "NEGOTIATION_DOMAINS")]
    domains: Option<PathBuf>,

    /// Evaluate sessions on a single thread
    #[arg(long, global = true, env = "NEGOTIATION_SEQUENTIAL")]
    sequential: Option<bool>,

    /// Skip the per-seat move logs
    #[arg(long, global = true)]
    no_move_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyse a single session trace
    Evaluate {
        /// Path to the trace JSON
        #[arg(value_name = "TRACE")]
        trace: PathBuf,

        /// Output directory (defaults to a directory beside the trace)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Analyse every session of one tournament directory
    Tournament {
        /// Tournament directory holding session_<n>.json traces
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Matchup configuration (defaults to DIR/tournament_steps.json)
        #[arg(long)]
        matchups: Option<PathBuf>,

        /// Output directory for the aggregate tables (defaults to DIR)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Analyse every tournament under the results directory and aggregate
    Campaign {
        /// Results directory to scan
        #[arg(long, env = "NEGOTIATION_RESULTS")]
        results: Option<PathBuf>,

        /// Substring that marks a directory as a tournament
        #[arg(long)]
        marker: Option<String>,

        /// Output directory for the campaign tables (defaults to the results dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Summarise every domain reference
    Domains {
        /// Output directory (defaults to the domains dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Defaults, then the config file, then flags shared by every command.
fn resolve_config(cli: &Cli) -> anyhow::Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(domains) = &cli.domains {
        config = config.domains_dir(domains);
    }
    if let Some(sequential) = cli.sequential {
        config = config.force_sequential(sequential);
    }
    if cli.no_move_logs {
        config = config.write_move_logs(false);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = resolve_config(&cli)?;
    info!(
        domains = %config.domains_dir.display(),
        sequential = config.force_sequential,
        parallel_build = cfg!(feature = "parallel"),
        "configuration resolved"
    );

    let report = match cli.command {
        Commands::Evaluate { trace, out } => {
            let (_, report) = pipeline::evaluate_session(&config, &trace, out.as_deref())?;
            report
        }
        Commands::Tournament { dir, matchups, out } => {
            if let Some(out) = out {
                config = config.output_dir(out);
            }
            pipeline::evaluate_tournament(&config, &dir, matchups.as_deref())?.report
        }
        Commands::Campaign {
            results,
            marker,
            out,
        } => {
            if let Some(results) = results {
                config = config.results_dir(results);
            }
            if let Some(marker) = marker {
                config = config.tournament_marker(marker);
            }
            if let Some(out) = out {
                config = config.output_dir(out);
            }
            let campaign = pipeline::run_campaign(&config)?;
            info!(
                tournaments = campaign.tournaments,
                ordinals = campaign.aggregate.by_ordinal.len(),
                "campaign complete"
            );
            campaign.report
        }
        Commands::Domains { out } => {
            if let Some(out) = out {
                config = config.output_dir(out);
            }
            let (_, report) = pipeline::summarize_domains(&config)?;
            report
        }
    };

    report.log();
    Ok(())
}
