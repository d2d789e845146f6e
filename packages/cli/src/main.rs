#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the adequacy map toolchain.

use std::path::{Path, PathBuf};

use adequacy_map_dashboard::{
    PlotlyJsonRenderer,
    context::{format_mean, format_total},
};
use adequacy_map_dashboard_models::RankingEntry;
use adequacy_map_database::SourceConfig;
use adequacy_map_ingest::{DEFAULT_NAME_PROPERTY, IngestOptions};
use adequacy_map_scoring::summary::top_n;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "adequacy_map", about = "Province healthcare adequacy map toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load province boundaries and adequacy metrics into the source store
    Ingest {
        /// `GeoJSON` `FeatureCollection` of province boundaries
        #[arg(long)]
        geometry: PathBuf,
        /// CSV export of the adequacy metrics sheet
        #[arg(long)]
        metrics: PathBuf,
        /// JSON object mapping Thai province names to province keys
        #[arg(long)]
        province_dict: PathBuf,
        /// Feature property holding the Thai province name
        #[arg(long, default_value = DEFAULT_NAME_PROPERTY)]
        name_property: String,
        /// Source store configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run one dashboard request and write the page context as JSON
    Dashboard {
        /// Source store configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the provinces ranked by adequacy index
    Rank {
        /// Source store configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of provinces to print
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            geometry,
            metrics,
            province_dict,
            name_property,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let summary = adequacy_map_ingest::ingest(
                &config,
                &IngestOptions {
                    geometry_path: geometry,
                    metrics_path: metrics,
                    province_dict_path: province_dict,
                    name_property,
                },
            )?;
            println!(
                "Wrote {} boundaries and {} metric rows to {}",
                summary.boundaries,
                summary.metric_rows,
                config.path.display()
            );
        }
        Commands::Dashboard { config, output } => {
            let config = load_config(config.as_deref())?;
            let context =
                adequacy_map_dashboard::render_dashboard(&config, &PlotlyJsonRenderer::default())?;
            let json = serde_json::to_string_pretty(&context)?;

            if let Some(path) = output {
                std::fs::write(&path, json)?;
                log::info!("Wrote dashboard context to {}", path.display());
            } else {
                println!("{json}");
            }
        }
        Commands::Rank { config, limit } => {
            let config = load_config(config.as_deref())?;
            let report = adequacy_map_dashboard::score(&config)?;
            let ranked: Vec<RankingEntry> = top_n(&report.provinces, limit)
                .iter()
                .enumerate()
                .map(|(i, ranked)| RankingEntry::from_ranked(i, ranked))
                .collect();

            println!("{:>4}  {:<30} A_i", "RANK", "PROVINCE");
            println!("{}", "-".repeat(42));
            for entry in &ranked {
                println!(
                    "{:>4}  {:<30} {:.3}",
                    entry.rank, entry.province_name_th, entry.adequacy_index
                );
            }
            println!();
            println!(
                "Total elderly: {}  Mean A_i: {}",
                format_total(report.summary.total_elderly),
                format_mean(report.summary.mean_index)
            );
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SourceConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => SourceConfig::from_file(path)?,
        None => SourceConfig::default(),
    })
}

