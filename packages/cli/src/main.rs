#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the terror map dashboard.
//!
//! Each subcommand loads the dataset, runs one recomputation pass for the
//! filters given as flags, and prints the result. `serve` starts the API
//! server instead. Running without a subcommand opens an interactive
//! session that walks through the cascading filters with `dialoguer`
//! prompts and reprints the statistics panel after every change.

mod interactive;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use terror_map_dataset::{DatasetConfig, LoadError, load_dataset};
use terror_map_filter::dashboard::{reconcile_countries, recompute};
use terror_map_filter::filter::apply;
use terror_map_filter::options::{country_options, filter_options};
use terror_map_filter_models::{DEFAULT_YEAR_MARK_STEP, FilterState};
use terror_map_incident_models::Dataset;
use terror_map_server::ServerConfig;
use terror_map_server_models::{FilterQueryParams, parse_list};

#[derive(Parser)]
#[command(name = "terror_map", about = "Global terrorism incident dashboard")]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where to load the dataset from. Falls back to `TERROR_MAP_DATASET` and
/// `TERROR_MAP_DATA_PATH`, then to the embedded config.
#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// Path to a dataset TOML config
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Local CSV file to read instead of the config's source
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Maximum number of rows to load
    #[arg(long, global = true)]
    max_records: Option<u64>,
}

impl SourceArgs {
    fn dataset_config(&self) -> Result<DatasetConfig, LoadError> {
        let config_path = self
            .dataset
            .clone()
            .or_else(|| std::env::var_os("TERROR_MAP_DATASET").map(PathBuf::from));
        let data_path = self
            .data
            .clone()
            .or_else(|| std::env::var_os("TERROR_MAP_DATA_PATH").map(PathBuf::from));

        let mut config = match config_path {
            Some(path) => DatasetConfig::from_file(&path)?,
            None => DatasetConfig::embedded(),
        };
        if let Some(path) = data_path {
            config = config.with_file(path);
        }
        if let Some(max) = self.max_records {
            config = config.with_max_records(max);
        }

        log::debug!("Using dataset '{}' from {}", config.id, config.source);

        Ok(config)
    }
}

/// Filter flags shared by `summary` and `incidents`.
#[derive(Args, Debug, Default, Clone)]
struct FilterArgs {
    /// Comma-separated regions
    #[arg(long)]
    regions: Option<String>,

    /// Comma-separated countries
    #[arg(long)]
    countries: Option<String>,

    /// Comma-separated attack types
    #[arg(long)]
    attack_types: Option<String>,

    /// First year to include (default: earliest in the dataset)
    #[arg(long)]
    year_from: Option<i32>,

    /// Last year to include (default: latest in the dataset)
    #[arg(long)]
    year_to: Option<i32>,
}

impl FilterArgs {
    fn to_filter_state(&self, dataset: &Dataset) -> FilterState {
        FilterQueryParams {
            regions: self.regions.clone(),
            countries: self.countries.clone(),
            attack_types: self.attack_types.clone(),
            year_from: self.year_from,
            year_to: self.year_to,
        }
        .to_filter_state(dataset.year_bounds())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the region, country, and attack type options
    Options {
        /// Comma-separated regions to narrow the country list by
        #[arg(long)]
        regions: Option<String>,
    },

    /// Print the statistics panel for a filter selection
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print the incidents matching a filter selection
    Incidents {
        #[command(flatten)]
        filter: FilterArgs,

        /// Maximum number of rows to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Start the API server
    Serve {
        /// Address to bind (default: `BIND_ADDR` or 127.0.0.1)
        #[arg(long)]
        bind_addr: Option<String>,

        /// Port to bind (default: `PORT` or 8080)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        let config = cli.source.dataset_config()?;
        let dataset = load_dataset(&config).await?;
        return interactive::run(Arc::new(dataset));
    };

    match command {
        Commands::Options { regions } => {
            let dataset = load_dataset(&cli.source.dataset_config()?).await?;
            let options = filter_options(
                &dataset,
                &parse_list(regions.as_deref()),
                DEFAULT_YEAR_MARK_STEP,
            );
            render::print_options(&options);
        }
        Commands::Summary { filter } => {
            let dataset = load_dataset(&cli.source.dataset_config()?).await?;
            let view = recompute(
                &dataset,
                filter.to_filter_state(&dataset),
                DEFAULT_YEAR_MARK_STEP,
            );
            render::print_filter_state(&view.filter_state);
            render::print_panel(&view.statistics);
        }
        Commands::Incidents { filter, limit } => {
            let dataset = load_dataset(&cli.source.dataset_config()?).await?;
            let mut state = filter.to_filter_state(&dataset);
            let countries = country_options(&dataset, &state.regions);
            reconcile_countries(&mut state, &countries);
            let incidents = apply(&dataset, &state);
            render::print_incidents(&incidents, limit);
        }
        Commands::Serve { bind_addr, port } => {
            let mut config = ServerConfig::from_env()?;
            if cli.source.dataset.is_some() || cli.source.data.is_some() {
                config.dataset = cli.source.dataset_config()?;
            } else if let Some(max) = cli.source.max_records {
                config.dataset = config.dataset.with_max_records(max);
            }
            if let Some(bind_addr) = bind_addr {
                config.bind_addr = bind_addr;
            }
            if let Some(port) = port {
                config.port = port;
            }

            // actix-web runs its own runtime; keep it off the tokio workers.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(terror_map_server::run_server(config))
            })
            .await??;
        }
    }

    Ok(())
}
