//! RegeneraX entry point: CLI wiring for the API server and offline tools.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use regenerax::config::AppConfig;
use regenerax::dataset::Dataset;
use regenerax::io::export::export_csv;
use regenerax::model::City;
use regenerax::proposal::generate_proposal;
use regenerax::sim::estimate;

/// City resource-demand simulator and retrofit planner.
#[derive(Parser)]
#[command(name = "regenerax")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Dataset selection shared by the subcommands that read records.
#[derive(Args)]
struct DataArgs {
    /// Built-in dataset preset (bengaluru, empty).
    #[arg(long)]
    preset: Option<String>,

    /// TOML dataset file; takes priority over --preset.
    #[arg(long)]
    dataset: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API.
    #[cfg(feature = "api")]
    Serve {
        #[command(flatten)]
        data: DataArgs,

        /// Interface to bind.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on.
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Answer chat requests without calling an external API.
        #[arg(long)]
        offline: bool,
    },

    /// Estimate resource demand for every building in a city.
    Simulate {
        #[command(flatten)]
        data: DataArgs,

        /// City id (defaults to the dataset's first city).
        #[arg(long)]
        city: Option<String>,

        /// Write per-building estimates to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate a retrofit proposal for one building.
    Propose {
        #[command(flatten)]
        data: DataArgs,

        /// Building id.
        #[arg(short, long)]
        building: String,

        /// City id recorded on the proposal (defaults to the building's city).
        #[arg(long)]
        city: Option<String>,

        /// Print the proposal as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Forecast a series with exponential smoothing.
    Forecast {
        /// Historical values, oldest first (comma separated).
        #[arg(required = true, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<f64>,

        /// Number of periods to forecast.
        #[arg(short, long, default_value = "1")]
        periods: usize,

        /// Smoothing factor in (0, 1].
        #[arg(short, long)]
        alpha: Option<f64>,
    },

    /// Open the terminal dashboard.
    #[cfg(feature = "tui")]
    Dashboard {
        #[command(flatten)]
        data: DataArgs,

        /// City id (defaults to the dataset's first city).
        #[arg(long)]
        city: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "tui")]
    let interactive = matches!(cli.command, Commands::Dashboard { .. });
    #[cfg(not(feature = "tui"))]
    let interactive = false;
    if !interactive {
        init_tracing();
    }

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        #[cfg(feature = "api")]
        Commands::Serve {
            data,
            host,
            port,
            offline,
        } => {
            data.apply(&mut config);
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if offline {
                config.assistant.backend = "offline".to_string();
            }
            serve(&config)
        }
        Commands::Simulate {
            data,
            city,
            csv,
            json,
        } => {
            data.apply(&mut config);
            let dataset = load_dataset(&config)?;
            let city = select_city(&dataset, city.as_deref())?.clone();
            let buildings: Vec<_> = dataset
                .buildings
                .into_iter()
                .filter(|b| b.city_id == city.id)
                .collect();
            let result = estimate(&city, &buildings)?;

            if let Some(path) = csv {
                export_csv(&result.building_results, &path)
                    .with_context(|| format!("cannot write \"{}\"", path.display()))?;
                tracing::info!("estimates written to {}", path.display());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{result}");
            }
            Ok(())
        }
        Commands::Propose {
            data,
            building,
            city,
            json,
        } => {
            data.apply(&mut config);
            let dataset = load_dataset(&config)?;
            let Some(b) = dataset.buildings.iter().find(|b| b.id == building) else {
                bail!("building \"{building}\" not found");
            };
            let city_id = city.unwrap_or_else(|| b.city_id.clone());
            let proposal = generate_proposal(b, &city_id);
            if json {
                println!("{}", serde_json::to_string_pretty(&proposal)?);
            } else {
                println!("{proposal}");
            }
            Ok(())
        }
        Commands::Forecast {
            values,
            periods,
            alpha,
        } => {
            let forecast = regenerax::forecast::forecast(&values, periods, alpha)?;
            println!("{}", serde_json::json!({ "forecast": forecast }));
            Ok(())
        }
        #[cfg(feature = "tui")]
        Commands::Dashboard { data, city } => {
            data.apply(&mut config);
            let dataset = load_dataset(&config)?;
            let Some(app) = regenerax::tui::runtime::App::new(&dataset, city.as_deref()) else {
                bail!("no matching city in the dataset");
            };
            regenerax::tui::run(app).context("dashboard failed")
        }
    }
}

/// Installs the `fmt` subscriber; `RUST_LOG` overrides the `info` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl DataArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(path) = self.dataset {
            config.dataset.path = Some(path);
        } else if let Some(preset) = self.preset {
            config.dataset.preset = preset;
            config.dataset.path = None;
        }
    }
}

/// Loads the configuration file, or defaults when none is given, and
/// rejects it if any field is invalid.
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => AppConfig::from_toml_file(p)?,
        None => AppConfig::default(),
    };
    let errors = config.validate();
    if !errors.is_empty() {
        let list: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration:\n  {}", list.join("\n  "));
    }
    Ok(config)
}

fn load_dataset(config: &AppConfig) -> Result<Dataset> {
    let dataset = config.dataset.load()?;
    let errors = dataset.validate();
    if !errors.is_empty() {
        let list: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid dataset:\n  {}", list.join("\n  "));
    }
    Ok(dataset)
}

fn select_city<'a>(dataset: &'a Dataset, id: Option<&str>) -> Result<&'a City> {
    match id {
        Some(id) => dataset
            .cities
            .iter()
            .find(|c| c.id == id)
            .with_context(|| format!("city \"{id}\" not found")),
        None => dataset
            .cities
            .first()
            .context("dataset has no cities"),
    }
}

#[cfg(feature = "api")]
fn serve(config: &AppConfig) -> Result<()> {
    use std::net::ToSocketAddrs;
    use std::sync::Arc;

    use regenerax::api::{self, AppState};
    use regenerax::assistant::{Assistant, AssistantError};
    use regenerax::store::MemoryStore;

    // Re-validate after CLI overrides.
    let errors = config.validate();
    if !errors.is_empty() {
        let list: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration:\n  {}", list.join("\n  "));
    }

    let dataset = load_dataset(config)?;
    tracing::info!(
        cities = dataset.cities.len(),
        buildings = dataset.buildings.len(),
        sensors = dataset.sensors.len(),
        "dataset loaded"
    );

    let assistant = match Assistant::from_config(&config.assistant) {
        Ok(a) => a,
        Err(AssistantError::MissingApiKey(var)) => {
            tracing::warn!("{var} is not set, falling back to the offline assistant");
            Assistant::offline()
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!("assistant backend: {}", assistant.backend_name());

    let addr = (config.server.host.as_str(), config.server.port)
        .to_socket_addrs()?
        .next()
        .with_context(|| format!("cannot resolve \"{}\"", config.server.host))?;

    let state = AppState::new(Arc::new(MemoryStore::new(dataset)), assistant);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime
        .block_on(api::serve(state, addr))
        .with_context(|| format!("server on {addr} failed"))
}
