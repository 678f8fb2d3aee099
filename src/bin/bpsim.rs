//! Replay a branch trace through one of the predictors.

use bpsim::*;
use bpsim::stats::*;
use bpsim::synth::*;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{ debug, error, info, trace };
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bpsim", about = "Evaluate a conditional branch predictor")]
struct Args {
    /// Predictor scheme: static, gshare[:g], tournament[:g:l:p], custom,
    /// or perceptron
    #[arg(long, default_value = "static")]
    bp: PredictorConfig,

    /// Log per-branch detail and list the worst-predicted branches
    #[arg(short, long)]
    verbose: bool,

    /// Number of branches to list with --verbose
    #[arg(long, default_value_t = 8)]
    worst: usize,

    /// Replay a built-in synthetic program for this many branches instead
    /// of reading a trace
    #[arg(long, value_name = "BRANCHES", conflicts_with = "trace")]
    synthetic: Option<usize>,

    /// Seed used for random branches in the synthetic program
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Trace file (read from stdin when omitted)
    trace: Option<PathBuf>,
}

/// A small program mixing biased, periodic, random and correlated branches.
fn synthetic_program(seed: u64) -> SyntheticProgram {
    let mut p = SyntheticProgram::new(0x0040_0000, 4, seed);
    let loop_exit = p.add_branch(BranchPattern::TakenPeriodic(8));
    p.add_branch(BranchPattern::AlwaysTaken);
    p.add_branch(BranchPattern::NeverTaken);
    p.pad(0x40);
    p.add_branch(BranchPattern::Pattern(
        vec![Outcome::T, Outcome::T, Outcome::N, Outcome::T, Outcome::N]
    ));
    let coin = p.add_branch(BranchPattern::Random(0.5));
    p.add_branch(BranchPattern::Correlated(coin));
    p.add_branch(BranchPattern::NotTakenPeriodic(3));
    p.add_branch(BranchPattern::Correlated(loop_exit));
    p
}

fn load_records(args: &Args) -> Result<Vec<BranchRecord>, TraceError> {
    if let Some(n) = args.synthetic {
        info!("generating {} synthetic branches (seed {})", n, args.seed);
        return Ok(synthetic_program(args.seed).simulate_for(n));
    }

    match &args.trace {
        Some(path) => {
            info!("reading trace from {}", path.display());
            TraceReader::from_file(path)?.collect()
        },
        None => {
            info!("reading trace from stdin");
            TraceReader::new(io::stdin().lock()).collect()
        },
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut bp = BranchPredictor::new(&args.bp)?;
    info!(scheme = %bp.scheme(), "built {}", bp.name());
    debug!("configuration: {}", args.bp);

    let records = load_records(args)?;
    info!("loaded {} records", records.len());

    let start = Instant::now();
    let mut stat = TraceStats::new();
    for record in records.iter() {
        let prediction = sim::step(&mut bp, record);
        trace!("{:08x} predicted {:?}, resolved {:?}",
            record.pc, prediction, record.outcome);
        stat.update(record, prediction);
    }
    debug!("simulated in {:.3?}", start.elapsed());

    println!("{}", "=".repeat(40));
    println!("Predictor:          {}", args.bp);
    println!("Storage:            {} bits", bp.storage_bits());
    println!("Branches:           {:10}", stat.global_brns());
    println!("Incorrect:          {:10}", stat.global_miss());
    println!("Misprediction Rate: {:10.3}", stat.misprediction_rate());

    if args.verbose {
        println!();
        println!("Unique branches:    {:10}", stat.num_unique_branches());
        println!("Worst branches:");
        for (pc, data) in stat.get_worst_branches(args.worst) {
            println!("  {:08x} {:8}/{:8} miss ({:.4} hit rate, {} taken)",
                pc, data.misses(), data.occ, data.hit_rate(),
                data.times_taken()
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
