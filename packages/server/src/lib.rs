#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the Mallorca bird catalog.
//!
//! Serves the catalog, park and bird location listings, the site-level
//! seasonal density report, the per-municipality seasonal density used by
//! the choropleth, and the team and contribution pages. Municipality boundaries are fetched per request;
//! nothing computed is cached between requests.

mod handlers;
pub mod recovery_plans;
pub mod sources;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use aves_mallorca_boundary::registry;
use aves_mallorca_boundary_models::BoundarySource;
use aves_mallorca_database::{db, run_migrations};
use switchy_database::Database;

/// Shared application state.
pub struct AppState {
    /// `PostgreSQL` database connection.
    pub db: Arc<dyn Database>,
    /// HTTP client for boundary downloads.
    pub http: reqwest::Client,
    /// Boundary source used for regional density.
    pub boundary_source: BoundarySource,
}

/// Server settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`, default `127.0.0.1`).
    pub bind_addr: String,
    /// Port to bind (`PORT`, default `8081`).
    pub port: u16,
    /// Boundary source id (`BOUNDARY_SOURCE`, default
    /// `mallorca_municipalities`).
    pub boundary_source: String,
}

impl ServerConfig {
    /// Reads the configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8081),
            boundary_source: lookup("BOUNDARY_SOURCE")
                .unwrap_or_else(|| registry::DEFAULT_SOURCE_ID.to_string()),
        }
    }
}

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    log::error!("{context}: {e}");
    std::io::Error::other(format!("{context}: {e}"))
}

/// Starts the API server.
///
/// Connects to the database, runs migrations, resolves the boundary
/// source and starts the Actix-Web HTTP server. The caller provides the
/// async runtime (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Error` if the database connection or migrations
/// fail, the boundary source is unknown, or the HTTP server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let config = ServerConfig::from_env();

    let boundary_source = registry::source_by_id(&config.boundary_source)
        .map_err(|e| startup_error("Invalid boundary source", e))?;

    log::info!("Connecting to database...");
    let db_conn = db::connect_from_env()
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;

    log::info!("Running migrations...");
    run_migrations(db_conn.as_ref())
        .await
        .map_err(|e| startup_error("Failed to run migrations", e))?;

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
        http: reqwest::Client::new(),
        boundary_source,
    });

    log::info!(
        "Starting server on {}:{} (boundaries: {})",
        config.bind_addr,
        config.port,
        state.boundary_source.id(),
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/seasonal-density", web::get().to(handlers::seasonal_density))
                    .route("/bird-locations", web::get().to(handlers::bird_locations))
                    .route("/parks", web::get().to(handlers::parks))
                    .route("/catalog", web::get().to(handlers::catalog))
                    .route("/regions/density", web::get().to(handlers::region_density))
                    .route("/team", web::get().to(handlers::team))
                    .route("/contribute", web::get().to(handlers::contribute)),
            )
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
