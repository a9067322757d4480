use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod cache;
mod columns;
mod dashboard;
mod demo;
mod error;
mod insights;
mod load;
mod metrics;
mod models;
mod report;
mod team;

use crate::cache::DashboardCache;
use crate::dashboard::{Dashboard, DashboardView};
use crate::error::LoadError;
use crate::models::{AgentSummary, Polarity, TeamSummary};
use crate::team::TeamAssigner;

#[derive(Parser)]
#[command(name = "qa-dashboard")]
#[command(about = "Team and agent performance summaries from QA scorecard exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// QA scorecard CSV export
    #[arg(long, required_unless_present = "demo", conflicts_with = "demo")]
    csv: Option<PathBuf>,
    /// Use the built-in three-agent sample instead of a file
    #[arg(long)]
    demo: bool,
    /// CSV of `email,team` rows overriding domain-derived teams
    #[arg(long)]
    team_map: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the overview and ranked agents for one team or all teams
    Summary {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        team: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write a markdown report per selected team (all teams when none given)
    Report {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        team: Vec<String>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// List teams found in the file
    Teams {
        #[command(flatten)]
        source: Source,
    },
    /// Show the expected CSV format and write the sample dataset
    Demo {
        /// Where to write the sample CSV (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    title: &'a str,
    overview: &'a TeamSummary,
    teams: &'a [&'a TeamSummary],
    top_agents: Vec<&'a AgentSummary>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cache = DashboardCache::new();

    match cli.command {
        Commands::Summary {
            source,
            team,
            limit,
            json,
        } => {
            let upload = read_source(&source)?;
            let Some(dashboard) = load_dashboard(&mut cache, &upload)? else {
                return Ok(());
            };
            let Some(view) = select(&dashboard, team.as_deref()) else {
                return Ok(());
            };

            if json {
                let output = SummaryOutput {
                    title: view.title,
                    overview: view.overview,
                    teams: &view.teams,
                    top_agents: view.ranked_agents().into_iter().take(limit).collect(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_summary(&view, limit);
            }
        }
        Commands::Report {
            source,
            team,
            out_dir,
        } => {
            let selections: Vec<Option<String>> = if team.is_empty() {
                vec![None]
            } else {
                team.into_iter().map(Some).collect()
            };

            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("failed to create {}", out_dir.display()))?;

            let upload = read_source(&source)?;
            for selection in selections {
                // Each selection re-renders from the cached dashboard.
                let Some(dashboard) = load_dashboard(&mut cache, &upload)? else {
                    return Ok(());
                };
                let Some(view) = select(&dashboard, selection.as_deref()) else {
                    continue;
                };

                let generated = chrono::Local::now().naive_local();
                let markdown = report::build_report(&view, generated);
                let out = out_dir.join(report::report_file_name(view.title, generated));
                std::fs::write(&out, markdown)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                info!(team = view.title, path = %out.display(), "report written");
                println!("Report written to {}.", out.display());
            }
        }
        Commands::Teams { source } => {
            let upload = read_source(&source)?;
            let Some(dashboard) = load_dashboard(&mut cache, &upload)? else {
                return Ok(());
            };
            for line in report::team_lines(&dashboard) {
                println!("{line}");
            }
        }
        Commands::Demo { out } => {
            println!("Expected CSV format:\n");
            println!("{}", demo::EXPECTED_FORMAT);
            match out {
                Some(path) => {
                    std::fs::write(&path, demo::DEMO_CSV)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Sample data written to {}.", path.display());
                }
                None => print!("{}", demo::DEMO_CSV),
            }
        }
    }

    debug!(
        entries = cache.len(),
        hits = cache.hits(),
        misses = cache.misses(),
        "dashboard cache"
    );
    Ok(())
}

/// Raw upload plus the team map it is read with.
struct Upload {
    bytes: Vec<u8>,
    assigner: TeamAssigner,
}

fn read_source(source: &Source) -> anyhow::Result<Upload> {
    let bytes = match (&source.csv, source.demo) {
        (Some(path), false) => std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => demo::DEMO_CSV.as_bytes().to_vec(),
    };
    let assigner = match &source.team_map {
        Some(path) => TeamAssigner::from_csv(path)?,
        None => TeamAssigner::new(),
    };
    debug!(
        bytes = bytes.len(),
        overrides = assigner.override_count(),
        "read dataset"
    );
    Ok(Upload { bytes, assigner })
}

/// Loads the upload through the cache. Missing columns and empty files are
/// reported to the user and yield `None`.
fn load_dashboard(
    cache: &mut DashboardCache,
    upload: &Upload,
) -> anyhow::Result<Option<Arc<Dashboard>>> {
    let assigner = &upload.assigner;
    match cache.get_or_build(&upload.bytes, |bytes| Dashboard::from_csv(bytes, assigner)) {
        Ok(dashboard) => Ok(Some(dashboard)),
        Err(err) if err.is_recoverable() => {
            warn!(error = %err, "dataset not usable");
            match err {
                LoadError::MissingColumns(_) => {
                    println!("Error: {err}");
                    println!(
                        "Please check your CSV column names match the expected format (see `qa-dashboard demo`)."
                    );
                }
                _ => println!("No data found in the uploaded file."),
            }
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn select<'a>(dashboard: &'a Dashboard, team: Option<&str>) -> Option<DashboardView<'a>> {
    let view = dashboard.view(team);
    if view.is_none() {
        let requested = team.unwrap_or_default();
        warn!(team = requested, "unknown team selection");
        let available: Vec<&str> = dashboard.team_names().collect();
        println!(
            "No data found for team: {requested} (available: {})",
            available.join(", ")
        );
    }
    view
}

fn print_summary(view: &DashboardView<'_>, limit: usize) {
    println!("{} Overview", view.title);
    for line in report::overview_lines(view.overview) {
        println!("- {line}");
    }

    if view.overview.insights.is_empty() {
        println!("No positive patterns or improvement areas identified in feedback.");
    } else {
        println!("Feedback highlights:");
        for insight in view.overview.insights.insights() {
            let marker = match insight.polarity {
                Polarity::Positive => "strength",
                Polarity::Improvement => "improve",
            };
            println!("  [{marker}] {}", insight.snippet);
        }
    }

    let ranked = view.ranked_agents();
    if ranked.is_empty() {
        println!("No agents found for this selection.");
        return;
    }

    println!("Top agents by QA score:");
    for agent in ranked.iter().take(limit) {
        println!("- {}", report::agent_line(agent));
    }
}
