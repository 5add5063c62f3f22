mod config;
mod heatmap;
mod store;
mod web;

use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::Config;
use crate::heatmap::EstimationPipeline;
use crate::store::{OverviewFilter, ScanStore};

#[derive(Parser)]
#[command(name = "ap-locator")]
#[command(about = "Locate Wi-Fi access points from scan data and draw signal heatmaps")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve,
    /// Render the heatmap of one transmitter to a PNG file
    Render {
        bssid: String,
        /// Output file, defaults to <BSSID>.png
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the estimated location of one transmitter
    Estimate { bssid: String },
    /// List networks and the transmitters broadcasting them
    Overview {
        #[arg(long, conflicts_with = "bssid")]
        ssid: Option<String>,
        #[arg(long)]
        bssid: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match Config::from_file(&cli.config) {
        Ok(c) => c,
        Err(e) => return fail(&format!("Error reading {}", cli.config.display()), e),
    };

    match cli.command {
        Commands::Serve => serve(config),
        Commands::Render { bssid, output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.png", bssid)));
            render(&config, &bssid, &output)
        }
        Commands::Estimate { bssid } => estimate(&config, &bssid),
        Commands::Overview { ssid, bssid } => {
            let filter = match (ssid, bssid) {
                (Some(ssid), _) => OverviewFilter::Ssid(ssid),
                (None, Some(bssid)) => OverviewFilter::Bssid(bssid),
                (None, None) => OverviewFilter::All,
            };
            overview(&config, &filter)
        }
    }
}

fn fail(context: &str, err: impl Display) -> ExitCode {
    eprintln!("{}: {}", context, err);
    ExitCode::FAILURE
}

fn build_pipeline(config: &Config) -> Result<EstimationPipeline, ExitCode> {
    config
        .heatmap
        .build_pipeline()
        .map_err(|e| fail("Invalid heatmap configuration", e))
}

fn serve(config: Config) -> ExitCode {
    let pipeline = match build_pipeline(&config) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => return fail("Error starting runtime", e),
    };

    match runtime.block_on(web::run_server(config, pipeline)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail("Server error", e),
    }
}

fn render(config: &Config, bssid: &str, output: &Path) -> ExitCode {
    let pipeline = match build_pipeline(config) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let store = ScanStore::new(config.store.base_folder.clone());

    let heatmap = match pipeline.generate_heatmap(&store, bssid) {
        Ok(h) => h,
        Err(e) => return fail("Error generating heatmap", e),
    };
    let png = match heatmap.encode_png() {
        Ok(bytes) => bytes,
        Err(e) => return fail("Error encoding heatmap", e),
    };
    if let Err(e) = fs::write(output, png) {
        return fail(&format!("Error writing {}", output.display()), e);
    }

    match heatmap.estimate() {
        Some(estimate) => println!("Estimated location of {}: {}", bssid, estimate),
        None => println!("Not enough observations of {} for a heatmap", bssid),
    }
    println!("Wrote {}", output.display());
    ExitCode::SUCCESS
}

fn estimate(config: &Config, bssid: &str) -> ExitCode {
    let store = ScanStore::new(config.store.base_folder.clone());
    let samples = match store.fetch_samples(bssid) {
        Ok(s) => s,
        Err(e) => return fail("Error loading samples", e),
    };

    match heatmap::estimate(&samples) {
        Ok(estimate) => {
            println!(
                "{}: {} ({} observations)",
                bssid,
                estimate,
                samples.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail("Error estimating location", e),
    }
}

fn overview(config: &Config, filter: &OverviewFilter) -> ExitCode {
    let store = ScanStore::new(config.store.base_folder.clone());
    let overview = match store.ssid_overview(filter) {
        Ok(o) => o,
        Err(e) => return fail("Error reading scans", e),
    };

    for (ssid, bssids) in &overview {
        println!("{}", ssid);
        for summary in bssids {
            println!("  {} ({} scans)", summary.bssid, summary.scans);
        }
    }
    ExitCode::SUCCESS
}
