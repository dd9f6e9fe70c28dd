#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line entry point for the Mallorca bird density engine.
//!
//! Starts the API server or runs the density computations once and prints
//! the result as JSON.

use std::sync::Arc;

use aves_mallorca_boundary::registry;
use aves_mallorca_boundary_models::{BoundaryFetcherConfig, BoundarySource};
use aves_mallorca_database::{db, queries};
use aves_mallorca_density::{estimate, pipeline};
use aves_mallorca_density_models::Season;
use aves_mallorca_geometry::HoleMode;
use aves_mallorca_server::sources::{BoundaryRegionSource, DatabaseSiteSource};
use aves_mallorca_server_models::ApiRegionDensity;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aves_mallorca", about = "Mallorca bird seasonal density tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Print the site-level seasonal estimate
    Seasonal,
    /// Print the per-municipality density for one season
    Density {
        /// Season name (`Primavera`, `Verano`, `Otoño`, `Invierno`); the
        /// initial view when omitted
        #[arg(long)]
        season: Option<Season>,
        /// Read boundaries from a local `GeoJSON` file instead of the
        /// configured source
        #[arg(long)]
        boundaries_file: Option<String>,
        /// Boundary source id from the registry
        #[arg(long, default_value = registry::DEFAULT_SOURCE_ID)]
        boundary_source: String,
        /// Exclude sites inside polygon holes
        #[arg(long)]
        subtract_holes: bool,
    },
    /// List the registered boundary sources
    Boundaries,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(aves_mallorca_server::run_server())
            })
            .await??;
        }
        Commands::Seasonal => {
            let db = db::connect_from_env().await?;
            let rows = queries::seasonal_groups(db.as_ref()).await?;
            print_json(&estimate(&rows))?;
        }
        Commands::Density {
            season,
            boundaries_file,
            boundary_source,
            subtract_holes,
        } => {
            let source = resolve_boundary_source(&boundary_source, boundaries_file)?;
            let holes = if subtract_holes {
                HoleMode::Subtract
            } else {
                HoleMode::Ignore
            };

            let db = db::connect_from_env().await?;
            let sites = DatabaseSiteSource::new(Arc::from(db));
            let regions = BoundaryRegionSource::new(reqwest::Client::new(), source);

            let mut view = pipeline::run_view(&sites, &regions, holes).await?;
            if let Some(season) = season {
                view.select(season);
            }

            print_json(&ApiRegionDensity::from(view.summary().clone()))?;
        }
        Commands::Boundaries => {
            for source in registry::all_sources() {
                println!("{}\t{}", source.id(), source.name());
            }
        }
    }

    Ok(())
}

/// Looks up `id` in the registry, optionally swapping its fetcher for a
/// local file while keeping the property mapping.
fn resolve_boundary_source(
    id: &str,
    file: Option<String>,
) -> Result<BoundarySource, Box<dyn std::error::Error>> {
    let mut source = registry::source_by_id(id)?;

    if let Some(path) = file {
        log::info!("Reading boundaries from {path}");
        source.fetcher = BoundaryFetcherConfig::File { path };
    }

    Ok(source)
}

fn print_json(value: &impl serde::Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_override_keeps_field_mapping() {
        let source =
            resolve_boundary_source(registry::DEFAULT_SOURCE_ID, Some("m.json".to_string()))
                .unwrap();

        assert!(matches!(
            source.fetcher,
            BoundaryFetcherConfig::File { ref path } if path == "m.json"
        ));
        assert_eq!(source.fields.key, "neighbourhood_id");
    }

    #[test]
    fn unknown_season_is_rejected_while_parsing_arguments() {
        let result = Cli::try_parse_from(["aves_mallorca", "density", "--season", "Winter"]);
        assert!(result.is_err());

        let cli =
            Cli::try_parse_from(["aves_mallorca", "density", "--season", "Otoño"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Density {
                season: Some(Season::Autumn),
                ..
            }
        ));
    }

    #[test]
    fn unknown_source_is_rejected() {
        assert!(resolve_boundary_source("nowhere", None).is_err());
    }

    #[test]
    fn parses_density_arguments() {
        let cli = Cli::try_parse_from([
            "aves_mallorca",
            "density",
            "--season",
            "Verano",
            "--subtract-holes",
        ])
        .unwrap();

        let Commands::Density {
            season,
            boundaries_file,
            boundary_source,
            subtract_holes,
        } = cli.command
        else {
            panic!("expected density command");
        };
        assert_eq!(season, Some(Season::Summer));
        assert_eq!(boundaries_file, None);
        assert_eq!(boundary_source, registry::DEFAULT_SOURCE_ID);
        assert!(subtract_holes);
    }
}
