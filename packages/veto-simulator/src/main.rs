//! Veto simulator CLI - runs complete map vetoes in memory through the real
//! veto service and writes one record per veto.

mod metrics;
mod output;
mod simulator;
mod types;

use std::time::Instant;

use clap::Parser;
use metrics::{build_veto_metrics, Summary};
use output::OutputWriter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simulator::{default_pool, default_pool_size, Simulator};
use tracing::{info, warn};
use types::{FormatArg, OutputFormat};
use veto_backend::domain::{RoundFormat, Team};
use veto_backend::{build_state, VetoConfig};

#[derive(Parser)]
#[command(name = "veto-simulator")]
#[command(about = "In-memory map veto simulator")]
struct Args {
    /// Number of vetoes to simulate
    #[arg(short = 'n', long, default_value = "1")]
    vetoes: u32,

    /// Round format
    #[arg(short, long, default_value = "bo3")]
    format: FormatArg,

    /// Explicit map pool (comma separated); overrides --maps
    #[arg(long, value_delimiter = ',')]
    pool: Vec<String>,

    /// Pool size when no explicit pool is given (defaults to picks + 4)
    #[arg(short, long)]
    maps: Option<usize>,

    /// Probability of throwing in an illegal move before each legal one
    #[arg(long, default_value = "0.0")]
    mistake_rate: f64,

    /// Seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Output directory for results
    #[arg(long, default_value = "./veto-results")]
    output_dir: String,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    veto_backend::telemetry::init_tracing(filter, args.json_logs);

    let format = RoundFormat::from(args.format);
    let pool = if args.pool.is_empty() {
        default_pool(args.maps.unwrap_or_else(|| default_pool_size(format)))
    } else {
        args.pool.clone()
    };

    // Allow whatever pool the caller asks for; the service still enforces format minimums.
    let config = VetoConfig {
        max_pool_size: pool.len().max(VetoConfig::default().max_pool_size),
        ..VetoConfig::from_env()?
    };
    let app = build_state().with_config(config).build()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(vetoes = args.vetoes, format = %format, maps = pool.len(), seed, "Starting veto simulator");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut simulator = Simulator::new(app, StdRng::seed_from_u64(seed), args.mistake_rate);
    let mut writer = OutputWriter::new(&args.output_dir, args.output_format.clone())?;
    let mut summary = Summary::default();
    let mut errors = 0u32;
    let start = Instant::now();

    for veto_num in 1..=args.vetoes {
        let veto_start = Instant::now();
        match runtime.block_on(simulator.simulate_veto(format, pool.clone())) {
            Ok(result) => {
                let duration_ms = veto_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_veto_metrics(veto_num, seed, &result, duration_ms);
                if let Err(e) = writer.write_veto(&metrics) {
                    warn!(veto_num, error = %e, "Failed to write veto record");
                }
                summary.record(&result);
            }
            Err(e) => {
                errors += 1;
                warn!(veto_num, code = %e.code(), error = %e, "Veto failed");
            }
        }
    }

    let path = writer.finish()?;
    print_summary(&summary, errors, start.elapsed(), args.vetoes, &path);
    Ok(())
}

fn print_summary(
    summary: &Summary,
    errors: u32,
    elapsed: std::time::Duration,
    total: u32,
    path: &std::path::Path,
) {
    println!("\n=== Veto Simulation Summary ===");
    println!("Vetoes completed: {}/{}", summary.vetoes, total);
    if errors > 0 {
        println!("Errors: {errors}");
    }
    println!("Total time: {elapsed:?}");
    println!("Maps played: {}", summary.maps_played);
    println!("Rejected moves: {}", summary.rejected);
    println!(
        "Attack starts: A={:.1}% B={:.1}%",
        summary.attack_share(Team::A) * 100.0,
        summary.attack_share(Team::B) * 100.0
    );
    println!(
        "Side choices taking defense: {}",
        summary.defense_choices
    );
    println!("Results written to: {}", path.display());
}
