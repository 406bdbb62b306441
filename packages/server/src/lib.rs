#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the terror map dashboard.
//!
//! Loads the incident dataset once at start-up and serves JSON endpoints
//! for the filter option lists, the filtered map points, and the summary
//! statistics. Each request carries its full filter state in the query
//! string and triggers one independent recomputation over the shared,
//! read-only dataset. If the dataset failed to load, every data endpoint
//! answers `503 Service Unavailable` instead.

pub mod handlers;

use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use terror_map_dataset::{DatasetConfig, DatasetStatus, LoadError};
use terror_map_filter_models::DEFAULT_YEAR_MARK_STEP;

/// Errors that can stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Binding or running the HTTP server failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset config could not be read.
    #[error("Dataset config error: {0}")]
    DatasetConfig(#[from] LoadError),

    /// An environment variable held an unusable value.
    #[error("Invalid value '{value}' for {name}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Shared application state.
pub struct AppState {
    /// The loaded dataset, or why it is unavailable.
    pub dataset: DatasetStatus,
    /// Spacing between year slider marks.
    pub year_mark_step: u16,
}

/// Start-up configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Dataset source.
    pub dataset: DatasetConfig,
    /// Spacing between year slider marks.
    pub year_mark_step: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            dataset: DatasetConfig::embedded(),
            year_mark_step: DEFAULT_YEAR_MARK_STEP,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the environment.
    ///
    /// * `BIND_ADDR` (default `127.0.0.1`)
    /// * `PORT` (default `8080`)
    /// * `TERROR_MAP_DATASET`: path to a dataset TOML config (default: the
    ///   embedded Global Terrorism Database config)
    /// * `TERROR_MAP_DATA_PATH`: overrides the config's source with a local
    ///   file
    /// * `TERROR_MAP_YEAR_MARK_STEP` (default `5`)
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if a numeric variable does not parse or the
    /// dataset config cannot be read.
    pub fn from_env() -> Result<Self, ServerError> {
        let mut config = Self::default();

        if let Ok(bind_addr) = std::env::var("BIND_ADDR") {
            config.bind_addr = bind_addr;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.port = port.parse().map_err(|_| ServerError::InvalidEnv {
                name: "PORT",
                value: port.clone(),
            })?;
        }
        if let Ok(step) = std::env::var("TERROR_MAP_YEAR_MARK_STEP") {
            config.year_mark_step = step.parse().map_err(|_| ServerError::InvalidEnv {
                name: "TERROR_MAP_YEAR_MARK_STEP",
                value: step.clone(),
            })?;
        }
        if let Ok(path) = std::env::var("TERROR_MAP_DATASET") {
            config.dataset = DatasetConfig::from_file(&PathBuf::from(path))?;
        }
        if let Ok(path) = std::env::var("TERROR_MAP_DATA_PATH") {
            config.dataset = config.dataset.with_file(path);
        }

        Ok(config)
    }
}

/// Registers every API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route(
                "/options/countries",
                web::get().to(handlers::country_options),
            )
            .route("/incidents", web::get().to(handlers::incidents))
            .route("/statistics", web::get().to(handlers::statistics))
            .route("/dashboard", web::get().to(handlers::dashboard)),
    );
}

/// Loads the dataset and runs the HTTP server until it is stopped.
///
/// A dataset that fails to load does not prevent start-up; the server
/// reports it through `/api/health` and answers data requests with `503`.
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the server fails to bind or encounters a
/// runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    log::info!(
        "Loading dataset '{}' from {}...",
        config.dataset.name,
        config.dataset.source
    );
    let dataset = DatasetStatus::load(&config.dataset).await;

    let state = web::Data::new(AppState {
        dataset,
        year_mark_step: config.year_mark_step,
    });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
