//! Well-Tegra - Well Intervention Live-Operation Simulator
//!
//! Plans one intervention job from the catalog, runs it through the
//! simulation clock, and streams the live snapshot to stdout.
//!
//! # Usage
//!
//! ```bash
//! # Slickline insert valve job on W666 in real time
//! welltegra
//!
//! # Plan from a diagnosed problem, 60x faster, CSV output
//! welltegra --problem prob1 --speed 60 --format csv
//!
//! # Run as fast as possible, summary only
//! welltegra --objective obj2 --speed 0 --format none
//!
//! # Show what the catalog contains
//! welltegra --list
//! ```
//!
//! # Environment Variables
//!
//! - `WELLTEGRA_CONFIG`: Path to the simulator config (default: ./welltegra.toml)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};

use welltegra::config::defaults;
use welltegra::simulation::SimulationClock;
use welltegra::{
    Catalog, JobObserver, JobPlan, JobReport, LiveData, SimulatorConfig, Simulator, TraceSample,
    WeightUnit,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "welltegra")]
#[command(about = "Well intervention live-operation simulator")]
#[command(version)]
struct CliArgs {
    /// Well to run the job on
    #[arg(long, default_value = defaults::DEFAULT_WELL_ID)]
    well: String,

    /// Objective to plan the job from (default: obj3)
    #[arg(long, conflicts_with = "problem")]
    objective: Option<String>,

    /// Diagnosed problem; the highest-confidence recommendation picks the objective
    #[arg(long)]
    problem: Option<String>,

    /// Speed multiplier (1 = real time, 60 = 60x faster, 0 = no pacing)
    #[arg(long)]
    speed: Option<f64>,

    /// Snapshot output format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Simulator config file (overrides the standard search order)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog JSON file (default: built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// List wells, problems and objectives, then exit
    #[arg(long)]
    list: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One JSON object per tick
    Json,
    /// CSV with a header row
    Csv,
    /// Summary only
    None,
}

// ============================================================================
// Snapshot Output
// ============================================================================

/// Writes each live snapshot to stdout.
struct StdoutObserver {
    format: OutputFormat,
    unit: WeightUnit,
    header_written: bool,
}

impl StdoutObserver {
    const fn new(format: OutputFormat, unit: WeightUnit) -> Self {
        Self {
            format,
            unit,
            header_written: false,
        }
    }

    fn emit(&mut self, live: &LiveData) {
        match self.format {
            OutputFormat::Json => match serde_json::to_string(live) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "Failed to serialize snapshot"),
            },
            OutputFormat::Csv => {
                if !self.header_written {
                    println!(
                        "op_time_s,depth_ft,weight_{},speed_ft_min,step,job_running",
                        self.unit.label()
                    );
                    self.header_written = true;
                }
                println!(
                    "{:.0},{:.2},{:.2},{:.1},{},{}",
                    live.op_time,
                    live.depth,
                    live.weight,
                    live.speed,
                    live.current_step + 1,
                    live.job_running
                );
            }
            OutputFormat::None => {}
        }
    }
}

#[async_trait]
impl JobObserver for StdoutObserver {
    async fn on_snapshot(&mut self, live: &LiveData, _sample: &TraceSample) {
        self.emit(live);
    }

    async fn on_complete(&mut self, report: &JobReport) {
        info!(job_id = %report.job_id, "Job complete, {} snapshots streamed", report.ticks);
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    match path {
        Some(p) => Catalog::load_from_file(p)
            .with_context(|| format!("Failed to load catalog from {}", p.display())),
        None => Catalog::builtin().context("Built-in catalog is malformed"),
    }
}

fn load_config(args: &CliArgs) -> Result<SimulatorConfig> {
    let mut config = match &args.config {
        Some(path) => SimulatorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SimulatorConfig::load(),
    };
    if let Some(speed) = args.speed {
        config.simulation.speed_multiplier = speed;
    }
    config.validate().context("Invalid simulator config")?;
    Ok(config)
}

fn plan_job(catalog: &Catalog, args: &CliArgs) -> Result<JobPlan> {
    let plan = match (&args.problem, &args.objective) {
        (Some(problem), _) => catalog.plan_from_problem(&args.well, problem)?,
        (None, Some(objective)) => catalog.plan(&args.well, objective)?,
        (None, None) => catalog.plan(&args.well, defaults::DEFAULT_OBJECTIVE_ID)?,
    };
    Ok(plan)
}

fn print_catalog(catalog: &Catalog) {
    println!("Wells:");
    for well in &catalog.wells {
        let ready = if well.is_simulation_ready() {
            ""
        } else {
            "  (no survey/completion)"
        };
        println!("  {:<6} {} [{}]{}", well.id, well.name, well.status, ready);
    }
    println!("Problems:");
    for problem in &catalog.problems {
        println!(
            "  {:<6} {} -> {}",
            problem.id,
            problem.name,
            problem.linked_objectives.join(", ")
        );
    }
    println!("Objectives:");
    for objective in &catalog.objectives {
        let conveyance = catalog
            .procedures
            .get(&objective.id)
            .map_or("no procedure", |p| p.conveyance.display_name());
        println!("  {:<6} {} ({})", objective.id, objective.name, conveyance);
    }
}

fn log_summary(report: &JobReport) {
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        "  Job summary: {} on {} ({})",
        report.procedure_name, report.well_name, report.well_id
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        "  Operational time: {:.2} h | NPT: {:.2} h | Ticks: {}",
        report.op_time_hours(),
        report.npt_hours(),
        report.ticks
    );
    info!(
        "  Final depth: {:.1} ft | Final weight: {:.2} {}",
        report.final_state.depth,
        report.final_state.weight,
        report.weight_unit.label()
    );
    if let Some(peak) = report.envelope.peak {
        info!(
            "  Peak weight: {:.2} {} at {:.0} ft",
            peak.weight,
            report.weight_unit.label(),
            peak.depth
        );
    }
    if report.envelope.excursions() > 0 {
        warn!(
            above_upper = report.envelope.above_upper,
            below_lower = report.envelope.below_lower,
            "  Weight left the planned alarm envelope on {} of {} samples",
            report.envelope.excursions(),
            report.envelope.samples_checked
        );
    }
    for lesson in &report.lessons {
        info!("  Lesson: {}", lesson);
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let catalog = load_catalog(args.catalog.as_ref())?;
    if args.list {
        print_catalog(&catalog);
        return Ok(());
    }

    let config = load_config(&args)?;
    let plan = plan_job(&catalog, &args)?;

    if !plan.well.is_simulation_ready() {
        warn!(
            well = %plan.well.id,
            "Well has no survey or completion on record; running as vertical and unrestricted"
        );
    }
    if let Some(rec) = &plan.recommendation {
        info!("Recommended: {} ({}% confidence): {}", rec.outcome, rec.confidence, rec.reason);
    }

    let simulator = Simulator::new(&plan.well, &plan.procedure, &config);
    let unit = simulator.weight_unit();

    let report = if args.format == OutputFormat::None && config.tick_period().is_none() {
        let mut simulator = simulator;
        simulator.run_to_completion()?
    } else {
        let observer = StdoutObserver::new(args.format, unit);
        let (clock, _handle) = SimulationClock::new(simulator, observer);
        clock.run().await?
    };

    log_summary(&report);
    Ok(())
}
