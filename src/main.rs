use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use inatator::config::Config;
use inatator::domain::{AnnotationState, BoundingBox, CellId, Viewport};
use inatator::session::{Session, ViewportEvent, ViewportGridController};
use inatator::sync::{
    AnnotationSync, HttpBackend, LoadAnnotationRequest, Outcome, PredictionRequest,
    SaveAnnotationRequest, api,
};
use inatator::{grid, taxa};

#[derive(Parser, Debug)]
#[command(
    name = "inatator",
    version,
    about = "Annotate species presence/absence on a hexagonal grid"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the grid cells covering a viewport
    Cells(CellsArgs),
    /// Print the boundary of one cell as lat,lng lines
    Boundary {
        cell: String,
    },
    /// Generate a prediction for a taxon
    Predict(PredictArgs),
    /// Load the latest saved annotation for a taxon
    Load {
        /// Taxon id or "Name (id)" label
        taxon: String,
    },
    /// Save an annotation file for a taxon
    Save {
        /// Taxon id or "Name (id)" label
        taxon: String,
        /// JSON file with {"presence": [...], "absence": [...]}
        #[arg(long)]
        file: PathBuf,
    },
    /// Show the current settings, updating and saving any given
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct CellsArgs {
    #[arg(long, allow_hyphen_values = true)]
    south: f64,
    #[arg(long, allow_hyphen_values = true)]
    west: f64,
    #[arg(long, allow_hyphen_values = true)]
    north: f64,
    #[arg(long, allow_hyphen_values = true)]
    east: f64,
    #[arg(long)]
    zoom: f64,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Base URL of the prediction backend
    #[arg(long)]
    api_url: Option<String>,
    /// Grid resolution (0-15)
    #[arg(long)]
    resolution: Option<u8>,
    /// Zoom level at or below which the grid is hidden
    #[arg(long)]
    min_zoom: Option<u8>,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Taxon id or "Name (id)" label
    taxon: String,
    #[arg(long, default_value = "v2")]
    model: String,
    #[arg(long, default_value_t = api::DEFAULT_THRESHOLD)]
    threshold: f64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Commands::Cells(args) => print_cells(&config, &args),
        Commands::Config(args) => update_config(config, args),
        Commands::Boundary { cell } => {
            for point in grid::boundary_of(&CellId::new(cell))? {
                println!("{},{}", point.lat, point.lng);
            }
            Ok(())
        }
        Commands::Predict(args) => {
            let request = PredictionRequest {
                taxa_id: taxon_id(&args.taxon),
                taxa_name: args.taxon.split_once('(').map(|(name, _)| name.trim().to_string()),
                model: args.model,
                threshold: args.threshold,
                hexagon_resolution: config.hexagon_resolution,
            };
            block_on(async {
                let (sync, session) = connect(&config)?;
                let outcome = sync.run_generate_prediction(&session, &request).await;
                let state = session.snapshot();
                println!(
                    "prediction cells: {}",
                    state.prediction_cells.map_or(0, |cells| cells.len())
                );
                finish(outcome, &session)
            })
        }
        Commands::Load { taxon } => {
            let request = LoadAnnotationRequest {
                taxa_id: taxon_id(&taxon),
            };
            block_on(async {
                let (sync, session) = connect(&config)?;
                let outcome = sync.run_load_annotation(&session, &request).await;
                println!("{}", serde_json::to_string_pretty(&session.annotations())?);
                finish(outcome, &session)
            })
        }
        Commands::Save { taxon, file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let state: AnnotationState = serde_json::from_str(&json)
                .with_context(|| format!("Invalid annotation file {}", file.display()))?;
            let request = SaveAnnotationRequest::new(taxon_id(&taxon), &state);
            block_on(async {
                let (sync, session) = connect(&config)?;
                let outcome = sync.run_save_annotation(&session, &request).await;
                finish(outcome, &session)
            })
        }
    }
}

fn print_cells(config: &Config, args: &CellsArgs) -> Result<()> {
    let bounds = BoundingBox::from_edges(args.south, args.west, args.north, args.east);
    let mut controller = ViewportGridController::new(config.resolution()?, config.min_grid_zoom);
    let event = ViewportEvent::move_end(Viewport::new(bounds, args.zoom));
    if let Some(cells) = controller.handle_event(&event) {
        for cell in cells {
            println!("{cell}");
        }
    }
    Ok(())
}

fn update_config(mut config: Config, args: ConfigArgs) -> Result<()> {
    let changed = args.api_url.is_some() || args.resolution.is_some() || args.min_zoom.is_some();
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    if let Some(level) = args.resolution {
        grid::resolution(level)?;
        config.hexagon_resolution = level;
    }
    if let Some(zoom) = args.min_zoom {
        config.min_grid_zoom = zoom;
    }
    if changed {
        config.save();
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn taxon_id(label: &str) -> String {
    taxa::parse_taxa_id(label).unwrap_or(label).trim().to_string()
}

fn connect(config: &Config) -> Result<(AnnotationSync<HttpBackend>, Session)> {
    let backend = HttpBackend::from_config(config)?;
    Ok((AnnotationSync::new(backend), Session::new(config.resolution()?)))
}

fn finish(outcome: Outcome, session: &Session) -> Result<()> {
    match outcome {
        Outcome::Completed => Ok(()),
        Outcome::Failed(_) => {
            let notice = session.snapshot().last_notice.unwrap_or_default();
            bail!("{notice}")
        }
    }
}

fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?
        .block_on(future)
}
