use cf_core::timing::{self, stage_timing};
use cf_core::Real;
use cf_results::{RunManifest, RunStatus, RunStore, compute_run_id, records_from_history};
use cf_sim::{CavityConfig, History, SimProgress, advective_courant, run_with_progress};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(about = "CavityFlow CLI - 2D lid-driven cavity Navier-Stokes solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a cavity simulation
    Run(RunArgs),
    /// List stored runs
    Runs {
        /// Run store directory
        store_dir: PathBuf,
    },
    /// Show details of a stored run
    ShowRun {
        /// Run store directory
        store_dir: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export one snapshot as cell-centered CSV
    ExportSnapshot {
        /// Run store directory
        store_dir: PathBuf,
        /// Run ID
        run_id: String,
        /// Snapshot index (0-based)
        index: usize,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// YAML configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Cells along x
    #[arg(long)]
    nx: Option<usize>,
    /// Cells along y
    #[arg(long)]
    ny: Option<usize>,
    /// Reynolds number
    #[arg(long)]
    re: Option<Real>,
    /// Number of time steps
    #[arg(long)]
    steps: Option<usize>,
    /// Time step
    #[arg(long)]
    dt: Option<Real>,
    /// Lid velocity
    #[arg(long, alias = "lid_vel")]
    lid_vel: Option<Real>,
    /// Run store directory
    #[arg(long, default_value = "cavity_runs")]
    output: PathBuf,
    /// Do not store the run
    #[arg(long)]
    no_store: bool,
    /// Print per-stage timing after the run
    #[arg(long)]
    timing: bool,
}

impl RunArgs {
    fn resolve_config(&self) -> CliResult<CavityConfig> {
        let mut config = match &self.config {
            Some(path) => CavityConfig::load(path)?,
            None => CavityConfig::default(),
        };
        if let Some(nx) = self.nx {
            config.nx = nx;
        }
        if let Some(ny) = self.ny {
            config.ny = ny;
        }
        if let Some(re) = self.re {
            config.reynolds = re;
        }
        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(dt) = self.dt {
            config.dt = dt;
        }
        if let Some(lid) = self.lid_vel {
            config.lid_velocity = lid;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Sim(#[from] cf_sim::SimError),

    #[error("{0}")]
    Results(#[from] cf_results::ResultsError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::Runs { store_dir } => cmd_runs(&store_dir),
        Commands::ShowRun { store_dir, run_id } => cmd_show_run(&store_dir, &run_id),
        Commands::ExportSnapshot {
            store_dir,
            run_id,
            index,
            output,
        } => cmd_export_snapshot(&store_dir, &run_id, index, output.as_deref()),
    }
}

fn cmd_run(args: &RunArgs) -> CliResult<()> {
    let config = args.resolve_config()?;
    if args.timing {
        timing::enable_timing();
    }

    println!(
        "Initializing Grid: {}x{}, Re={}, steps={}",
        config.nx, config.ny, config.reynolds, config.steps
    );
    let mut grid = config.build_grid()?;
    let run_id = compute_run_id(&config, SOLVER_VERSION);

    println!("Starting simulation...");
    let started = Instant::now();
    let mut last_emit = Instant::now();
    let mut on_progress = |event: SimProgress| {
        if let Some(div) = event.max_divergence {
            clear_progress_line();
            println!("Step {:4}/{} - Max Div: {:.6e}", event.step, event.steps, div);
        } else if last_emit.elapsed().as_millis() >= 100 {
            render_progress(&event);
            last_emit = Instant::now();
        }
    };
    let result = run_with_progress(
        &mut grid,
        &config.sim_options(),
        Some(&mut on_progress as &mut dyn FnMut(SimProgress)),
    );
    clear_progress_line();

    let history = match result {
        Ok(history) => history,
        Err(err) => {
            if !args.no_store {
                let store = RunStore::new(args.output.clone())?;
                let manifest =
                    RunManifest::failed(run_id, SOLVER_VERSION, &config, err.to_string());
                store.save_run(&manifest, &[])?;
            }
            return Err(err.into());
        }
    };

    let elapsed = started.elapsed().as_secs_f64();
    print_run_summary(&config, &grid, &history, elapsed);

    if args.timing {
        stage_timing::print_summary();
    }

    if !args.no_store {
        let store = RunStore::new(args.output.clone())?;
        let manifest = RunManifest::completed(run_id.clone(), SOLVER_VERSION, &config, &history);
        store.save_run(&manifest, &records_from_history(&history))?;
        println!("✓ Stored run {} in {}", run_id, store.root().display());
    }

    println!("Done.");
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(80));
    let _ = io::stdout().flush();
}

fn render_progress(event: &SimProgress) {
    let width = 28usize;
    let fraction = event.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    print!(
        "\r[{}{}] {:>6.2}%  step={}  t={:.4}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled)),
        fraction * 100.0,
        event.step,
        event.sim_time
    );
    let _ = io::stdout().flush();
}

fn print_run_summary(
    config: &CavityConfig,
    grid: &cf_core::Grid,
    history: &History,
    elapsed: f64,
) {
    println!("\nRun summary:");
    println!("  Snapshots:      {}", history.len());
    if let Some(last) = history.last() {
        println!("  Final max div:  {:.6e}", last.max_divergence);
        println!("  Kinetic energy: {:.6e}", last.kinetic_energy);
    }
    let courant = advective_courant(&grid.u, &grid.v, grid.dx(), grid.dy(), config.dt);
    println!("  Courant number: {:.4}", courant);
    if let Some(warning) = history.stability_warning() {
        println!("  WARNING: {}", warning);
    }
    println!("  Wall time:      {:.3}s", elapsed);
}

fn cmd_runs(store_dir: &Path) -> CliResult<()> {
    let store = RunStore::new(store_dir.to_path_buf())?;
    let runs = store.list_runs()?;

    if runs.is_empty() {
        println!("No stored runs in {}", store_dir.display());
    } else {
        println!("Stored runs in {}:", store_dir.display());
        for manifest in runs {
            println!(
                "  {} ({}) {}x{} Re={} steps={} - {}",
                manifest.run_id,
                manifest.timestamp,
                manifest.config.nx,
                manifest.config.ny,
                manifest.config.reynolds,
                manifest.config.steps,
                status_label(&manifest.status)
            );
        }
    }
    Ok(())
}

fn status_label(status: &RunStatus) -> String {
    match status {
        RunStatus::Completed => "completed".to_string(),
        RunStatus::Failed { message } => format!("failed: {}", message),
    }
}

fn cmd_show_run(store_dir: &Path, run_id: &str) -> CliResult<()> {
    let store = RunStore::new(store_dir.to_path_buf())?;
    let manifest = store.load_manifest(run_id)?;

    println!("Run {}", manifest.run_id);
    println!("  Timestamp:      {}", manifest.timestamp);
    println!("  Solver version: {}", manifest.solver_version);
    println!("  Status:         {}", status_label(&manifest.status));
    println!(
        "  Grid:           {}x{} over {}x{}",
        manifest.config.nx, manifest.config.ny, manifest.config.lx, manifest.config.ly
    );
    println!(
        "  Re={}  dt={}  steps={}  lid={}",
        manifest.config.reynolds,
        manifest.config.dt,
        manifest.config.steps,
        manifest.config.lid_velocity
    );
    if let Some(warning) = &manifest.stability_warning {
        println!("  WARNING: {}", warning);
    }

    if manifest.status != RunStatus::Completed {
        return Ok(());
    }

    let records = store.load_snapshots(run_id)?;
    println!(
        "\n  {:>5}  {:>6}  {:>10}  {:>14}  {:>14}",
        "index", "step", "time", "max div", "kinetic energy"
    );
    for (index, record) in records.iter().enumerate() {
        println!(
            "  {:>5}  {:>6}  {:>10.4}  {:>14.6e}  {:>14.6e}",
            index, record.step, record.time_s, record.max_divergence, record.kinetic_energy
        );
    }
    Ok(())
}

fn cmd_export_snapshot(
    store_dir: &Path,
    run_id: &str,
    index: usize,
    output: Option<&Path>,
) -> CliResult<()> {
    let store = RunStore::new(store_dir.to_path_buf())?;
    let manifest = store.load_manifest(run_id)?;
    let record = store.load_snapshot(run_id, index)?;
    let csv = record.cell_centered_csv(manifest.config.lx, manifest.config.ly)?;

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported snapshot {} (step {}) to {}",
            index,
            record.step,
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}
