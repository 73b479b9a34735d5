use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use geospectre::{
    config::{ConfigLoader, Settings},
    opentopo::{Bounds, OpenTopoClient},
    web::{self, WebServerConfig},
    AnalysisEngine,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "GeoSpectre geospatial dashboard")]
struct Cli {
    /// Path to the settings YAML file
    #[arg(long, global = true, default_value = "config/geospectre.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the interactive dashboard
    Serve {
        /// Override the listen host
        #[arg(long)]
        host: Option<String>,

        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,

        /// Seed the terrain generator for reproducible maps
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a single request and print its statistics
    Analyze {
        /// Free-text request, e.g. "show flood risk in Kerala"
        text: String,

        /// Write the map as a standalone HTML page
        #[arg(long)]
        out: Option<PathBuf>,

        /// Seed the terrain generator for reproducible maps
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Download a real DEM tile from OpenTopography
    FetchDem {
        #[arg(long, allow_hyphen_values = true)]
        north: f64,
        #[arg(long, allow_hyphen_values = true)]
        south: f64,
        #[arg(long, allow_hyphen_values = true)]
        east: f64,
        #[arg(long, allow_hyphen_values = true)]
        west: f64,

        /// DEM product (uses the configured default when omitted)
        #[arg(long)]
        dem_type: Option<String>,

        /// Where to write the GeoTIFF
        #[arg(long, default_value = "dem.tif")]
        out: PathBuf,
    },
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ConfigLoader::new(".");
    let mut settings = loader.load_or_default(&cli.config)?;
    settings.apply_env();
    init_logging(&settings);

    match cli.command {
        Command::Serve { host, port, seed } => {
            if seed.is_some() {
                settings.analysis.seed = seed;
            }
            web::run(WebServerConfig {
                analysis: settings.analysis,
                host: host.unwrap_or(settings.server.host),
                port: port.unwrap_or(settings.server.port),
            })
            .await
        }
        Command::Analyze { text, out, seed } => {
            if seed.is_some() {
                settings.analysis.seed = seed;
            }
            let mut engine = AnalysisEngine::new(settings.analysis);
            let analysis = engine.analyze(&text);
            let stats = analysis.statistics();

            println!("{}", analysis.reply());
            println!(
                "Center: {} ({:.4}, {:.4})",
                analysis.request.place.name,
                analysis.request.place.latitude,
                analysis.request.place.longitude
            );
            println!("Area covered: {:.1} sq km", stats.area_covered_sq_km);
            println!("Data points: {}", stats.data_points);
            if let (Some(min), Some(max)) = (stats.min_elevation, stats.max_elevation) {
                println!("Elevation: {min:.0}m - {max:.0}m");
            }
            if let Some(percent) = stats.high_risk_percent {
                println!("High risk: {percent:.1}%");
            }
            println!("Accuracy: {}%", stats.accuracy_percent);

            if let Some(path) = out {
                let html = analysis.map().to_html()?;
                std::fs::write(&path, html)
                    .with_context(|| format!("Failed to write map to {}", path.display()))?;
                println!("Map written to {}", path.display());
            }
            Ok(())
        }
        Command::FetchDem {
            north,
            south,
            east,
            west,
            dem_type,
            out,
        } => {
            let client = OpenTopoClient::new(&settings.opentopo);
            let dem_type = dem_type.unwrap_or_else(|| settings.opentopo.dem_type.clone());
            let bounds = Bounds {
                north,
                south,
                east,
                west,
            };
            let tile = client.fetch(bounds, &dem_type).await?;
            std::fs::write(&out, &tile)
                .with_context(|| format!("Failed to write tile to {}", out.display()))?;
            println!("Saved {} bytes to {}", tile.len(), out.display());
            Ok(())
        }
    }
}
