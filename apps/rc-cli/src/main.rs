use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rc_app::{
    AppError, AppResult, DataRow, Layout, ReplayStep, Runner, STATE_CATALOG, Session,
    SessionObserver, SessionOptions, Signal,
};
use rc_core::ComponentKind;
use rc_graph::ProposalOutcome;
use rc_remote::{ConfigureRequest, FileSource, HttpSource, SimulationResult, SimulationSource};
use rc_sim::{Phase, RunFlag};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rc-cli")]
#[command(about = "coldloop CLI - Refrigeration cycle puzzle", long_about = None)]
struct Cli {
    /// Session options YAML (lives, pacing, particles, remote endpoint)
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a layout and report whether the cycle can start
    Check {
        /// Path to the layout YAML file
        layout_path: PathBuf,
    },
    /// Fetch cycle state data and print it
    Configure {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Configure, start and stream data-table rows
    Play {
        /// Path to the layout YAML file
        layout_path: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
        /// Stop after this many full revolutions
        #[arg(long, default_value_t = 1)]
        cycles: u64,
        /// Run on virtual time instead of the wall clock
        #[arg(long)]
        fast: bool,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Simulation service URL
    #[arg(long, conflicts_with = "states")]
    endpoint: Option<String>,
    /// Recorded simulation result (JSON) to use instead of a service
    #[arg(long)]
    states: Option<PathBuf>,
    /// Refrigerant name
    #[arg(long, default_value = "R134a")]
    refrigerant: String,
    /// Evaporation temperature in °C
    #[arg(long, allow_negative_numbers = true)]
    evap: f64,
    /// Condensation temperature in °C
    #[arg(long, allow_negative_numbers = true)]
    cond: f64,
}

impl SourceArgs {
    fn request(&self) -> ConfigureRequest {
        ConfigureRequest::new(self.refrigerant.clone(), self.evap, self.cond)
    }

    fn build(&self, options: &SessionOptions) -> AppResult<Box<dyn SimulationSource + Send>> {
        if let Some(path) = &self.states {
            return Ok(Box::new(FileSource::new(path)));
        }
        let endpoint = self
            .endpoint
            .clone()
            .or_else(|| options.remote.endpoint.clone())
            .ok_or_else(|| {
                AppError::InvalidInput(
                    "no simulation source: pass --endpoint or --states".to_string(),
                )
            })?;
        Ok(Box::new(
            HttpSource::new(endpoint).with_timeout(options.remote.timeout()),
        ))
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = match &cli.options {
        Some(path) => SessionOptions::load(path)?,
        None => SessionOptions::default(),
    };

    match cli.command {
        Commands::Check { layout_path } => cmd_check(&layout_path, options),
        Commands::Configure { source } => cmd_configure(&source, &options),
        Commands::Play {
            layout_path,
            source,
            cycles,
            fast,
        } => cmd_play(&layout_path, &source, options, cycles, fast),
    }
}

fn cmd_check(layout_path: &Path, options: SessionOptions) -> AppResult<()> {
    println!("Checking layout: {}", layout_path.display());
    let layout = Layout::load(layout_path)?;
    let mut session = Session::new(options)?;
    print_replay(&layout.replay(&mut session));

    let lives = session.lives();
    println!("Lives: {}/{}", lives.remaining(), lives.max());
    if session.is_game_over() {
        println!("✗ Game over");
        return Ok(());
    }
    match session.graph().check_startable() {
        Ok(()) => println!("✓ Cycle is complete and ready to start"),
        Err(reason) => println!("✗ {}", reason),
    }
    Ok(())
}

fn cmd_configure(source: &SourceArgs, options: &SessionOptions) -> AppResult<()> {
    let request = source.request();
    request.validate()?;
    let backend = source.build(options)?;
    println!(
        "Configuring {} (evaporation {:.1} °C, condensation {:.1} °C) from {}",
        request.refrigerant,
        request.evaporation_temp,
        request.condensation_temp,
        backend.describe()
    );

    let result = backend.fetch(&request)?;
    println!("✓ Configuration received");
    print_result(&result);
    Ok(())
}

fn cmd_play(
    layout_path: &Path,
    source: &SourceArgs,
    options: SessionOptions,
    cycles: u64,
    fast: bool,
) -> AppResult<()> {
    let backend = source.build(&options)?;
    let table_interval = options.table_interval();
    let mut session = Session::new(options)?;

    let layout = Layout::load(layout_path)?;
    print_replay(&layout.replay(&mut session));
    session.drain_signals();

    let worker = session.spawn_configuration(backend, source.request())?;
    let started = Instant::now();
    let outcome = loop {
        if let Some(outcome) = worker.wait_timeout(Duration::from_millis(100)) {
            break outcome;
        }
        render_spinner(started.elapsed());
    };
    clear_progress_line();
    let configured = session.complete_configuration(outcome);
    for signal in session.drain_signals() {
        print_signal(&signal);
    }
    configured?;

    let mut runner = Runner::new(session);
    runner.start(Duration::ZERO)?;
    println!(
        "Running {} revolution(s){}",
        cycles,
        if fast { " on virtual time" } else { "" }
    );
    print_header();

    let mut printer = RowPrinter;
    let completed = if fast {
        // Generous bound so a result with missing states cannot spin forever.
        let limit = table_interval.saturating_mul(40 * cycles.clamp(1, 10_000) as u32);
        runner.run_virtual(&mut printer, cycles, limit)
    } else {
        let flag = RunFlag::running();
        runner.run_realtime(&flag, &mut printer, Some(cycles))
    };
    runner.stop();

    println!("✓ Completed {} revolution(s)", completed);
    if completed < cycles {
        println!("  (stopped early: some states were missing)");
    }
    Ok(())
}

struct RowPrinter;

impl SessionObserver for RowPrinter {
    fn on_row(&mut self, row: &DataRow) {
        println!("{}", row);
    }

    fn on_skipped(&mut self, phase: Phase) {
        tracing::debug!(?phase, "row skipped; retrying");
    }

    fn on_history_cleared(&mut self) {
        println!("{}", "-".repeat(100));
    }

    fn on_signal(&mut self, signal: &Signal) {
        print_signal(signal);
    }
}

fn print_header() {
    println!(
        "{:<28} {:>10} {:>9} {:>9} {:>8}  {:<18} {}",
        "State", "P [kPa]", "T [°C]", "h [kJ/kg]", "s", "Phase", "Component"
    );
}

fn print_result(result: &SimulationResult) {
    print_header();
    for (index, slot) in STATE_CATALOG.iter().enumerate() {
        let active = Phase::ALL[index].next();
        match result
            .state(index)
            .and_then(|s| DataRow::from_state(index, s, active))
        {
            Some(row) => println!("{}", row),
            None => println!("{:<28} (incomplete)", slot.name),
        }
    }

    let fmt = |v: Option<f64>| {
        v.filter(|x| x.is_finite())
            .map(|x| format!("{:.2}", x))
            .unwrap_or_else(|| "N/A".to_string())
    };
    println!();
    println!("  COP:             {}", fmt(result.cop));
    println!("  Heat absorbed:   {} kW", fmt(result.heat_absorbed));
    println!("  Heat rejected:   {} kW", fmt(result.heat_rejected));
    println!("  Compressor work: {} kW", fmt(result.compressor_work));
    if let Some(message) = &result.message {
        println!("  Message: {}", message);
    }
}

fn print_replay(steps: &[ReplayStep]) {
    for step in steps {
        match step {
            ReplayStep::Placed(kind) => println!("  ✓ placed {}", kind),
            ReplayStep::PlacementRejected { reason, .. } => println!("  ✗ {}", reason),
            ReplayStep::Proposed { link, outcome } => {
                println!(
                    "  {} {}",
                    outcome_mark(*outcome),
                    describe_link(link.from, link.to, *outcome)
                );
            }
            ReplayStep::ProposalFailed { link, reason } => {
                println!("  ✗ {} -> {}: {}", link.from, link.to, reason);
            }
        }
    }
}

fn outcome_mark(outcome: ProposalOutcome) -> &'static str {
    match outcome {
        ProposalOutcome::Accepted => "✓",
        ProposalOutcome::AlreadyConnected | ProposalOutcome::Ignored => "·",
        ProposalOutcome::Rejected { .. } | ProposalOutcome::GameOver => "✗",
    }
}

fn describe_link(from: ComponentKind, to: ComponentKind, outcome: ProposalOutcome) -> String {
    match outcome {
        ProposalOutcome::Accepted => format!("{} -> {}", from, to),
        ProposalOutcome::AlreadyConnected => format!("{} -> {} (already connected)", from, to),
        ProposalOutcome::Rejected { lives_left } => {
            format!("{} -> {} is the wrong order ({} lives left)", from, to, lives_left)
        }
        ProposalOutcome::GameOver => format!("{} -> {} is the wrong order; game over", from, to),
        ProposalOutcome::Ignored => format!("{} -> {} ignored (game over)", from, to),
    }
}

fn print_signal(signal: &Signal) {
    let mark = if signal.is_error() { "✗" } else { "✓" };
    println!("{} {}", mark, signal);
}

fn clear_progress_line() {
    print!("\r{:<60}\r", "");
    let _ = io::stdout().flush();
}

fn render_spinner(elapsed: Duration) {
    let spinner = ['|', '/', '-', '\\'];
    let spin_idx = ((elapsed.as_secs_f64() * 10.0) as usize) % spinner.len();
    print!(
        "\r{} Fetching cycle data... {:.1}s",
        spinner[spin_idx],
        elapsed.as_secs_f64()
    );
    let _ = io::stdout().flush();
}
