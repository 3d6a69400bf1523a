use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;

use sat_o_rfi::catalog::{Catalog, CatalogLoader};
use sat_o_rfi::compliance::{check_threshold, ComplianceVerdict};
use sat_o_rfi::config::Config;
use sat_o_rfi::link_budget::{compute_ci_at, LinkBudgetResult};
use sat_o_rfi::ngso::{simulate_interference, SimulationParams, Summation};
use sat_o_rfi::web::run_server;

#[derive(Parser)]
#[command(name = "sat-o-rfi")]
#[command(about = "Satellite interference analysis")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog and report accepted and rejected records
    Validate,
    /// Carrier-to-interference for one station and satellite pair
    Ci {
        #[arg(long)]
        station: String,
        #[arg(long)]
        serving: String,
        #[arg(long)]
        interferer: String,
        /// Frequency reuse in effect
        #[arg(long)]
        reuse: bool,
        /// Evaluation instant (RFC3339), defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Inertial position of a non-geostationary satellite
    Orbit {
        #[arg(long)]
        satellite: String,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Aggregate NGSO interference over a time window
    Ngso {
        #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
        step: Duration,
        #[arg(long, default_value = "24h", value_parser = humantime::parse_duration)]
        duration: Duration,
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        #[arg(long, value_enum)]
        summation: Option<SummationArg>,
    },
    /// Start the HTTP API
    Serve,
}

#[derive(Clone, Copy, ValueEnum)]
enum SummationArg {
    Power,
    Decibel,
}

impl From<SummationArg> for Summation {
    fn from(arg: SummationArg) -> Self {
        match arg {
            SummationArg::Power => Summation::Power,
            SummationArg::Decibel => Summation::Decibel,
        }
    }
}

#[derive(Serialize)]
struct CiReport {
    result: LinkBudgetResult,
    verdict: ComplianceVerdict,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Validate => validate(&config),
        Commands::Ci {
            station,
            serving,
            interferer,
            reuse,
            at,
        } => ci(&config, &station, &serving, &interferer, reuse, at),
        Commands::Orbit { satellite, at } => orbit(&config, &satellite, at),
        Commands::Ngso {
            step,
            duration,
            start,
            summation,
        } => ngso(&config, step, duration, start, summation),
        Commands::Serve => serve(config),
    }
}

fn load_catalog(config: &Config) -> Option<Catalog> {
    let mut loader = CatalogLoader::new(config.catalog.clone());
    match loader.load() {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            eprintln!("Error loading catalog: {}", e);
            None
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate(config: &Config) -> ExitCode {
    let mut loader = CatalogLoader::new(config.catalog.clone());
    let catalog = match loader.load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Catalog: {} stations, {} satellites, {} antennas",
        catalog.stations.len(),
        catalog.satellites.len(),
        catalog.antennas.len()
    );
    let rejected = loader.rejected();
    if rejected.is_empty() {
        return ExitCode::SUCCESS;
    }
    println!("{} rejected records:", rejected.len());
    for record in rejected {
        println!("  {} / {}: {}", record.registry, record.id, record.reason);
    }
    ExitCode::FAILURE
}

fn ci(
    config: &Config,
    station_id: &str,
    serving_id: &str,
    interferer_id: &str,
    reuse: bool,
    at: Option<DateTime<Utc>>,
) -> ExitCode {
    let Some(catalog) = load_catalog(config) else {
        return ExitCode::FAILURE;
    };

    let records = catalog.station(station_id).and_then(|station| {
        Ok((
            station,
            catalog.satellite(serving_id)?,
            catalog.satellite(interferer_id)?,
        ))
    });
    let (station, serving, interferer) = match records {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match compute_ci_at(
        station,
        serving,
        interferer,
        &catalog.antennas,
        at.unwrap_or_else(Utc::now),
        &config.analysis.kepler,
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Link budget error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let verdict = check_threshold(&result, reuse || config.analysis.reuse);

    print_json(&CiReport { result, verdict })
}

fn orbit(config: &Config, satellite_id: &str, at: Option<DateTime<Utc>>) -> ExitCode {
    let Some(catalog) = load_catalog(config) else {
        return ExitCode::FAILURE;
    };
    let satellite = match catalog.satellite(satellite_id) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let Some(elements) = satellite.keplerian() else {
        eprintln!("{} is geostationary and has no Keplerian elements", satellite_id);
        return ExitCode::FAILURE;
    };

    match elements.propagate(at.unwrap_or_else(Utc::now), &config.analysis.kepler) {
        Ok(position) => print_json(&position),
        Err(e) => {
            eprintln!("Propagation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn ngso(
    config: &Config,
    step: Duration,
    duration: Duration,
    start: Option<DateTime<Utc>>,
    summation: Option<SummationArg>,
) -> ExitCode {
    let Some(catalog) = load_catalog(config) else {
        return ExitCode::FAILURE;
    };

    let (step, duration) = match (
        chrono::Duration::from_std(step),
        chrono::Duration::from_std(duration),
    ) {
        (Ok(s), Ok(d)) => (s, d),
        _ => {
            eprintln!("Step or duration out of range");
            return ExitCode::FAILURE;
        }
    };

    let start = start.unwrap_or_else(|| {
        let now = Utc::now();
        log::info!("No --start given, anchoring analysis at {}", now);
        now
    });

    let mut params = SimulationParams::new(start, step, duration);
    params.summation = summation.map_or(config.analysis.summation, Summation::from);
    params.solver = config.analysis.kepler;

    match simulate_interference(&catalog.satellites, &catalog.stations, &params, None) {
        Ok(series) => print_json(&series),
        Err(e) => {
            eprintln!("Simulation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn serve(config: Config) -> ExitCode {
    let Some(catalog) = load_catalog(&config) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run_server(config, catalog)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
