//! Recover the clock offset between two TUM trajectory files.
//!
//! Sweeps candidate clock offsets, scores each one by tolerance-gated
//! nearest-timestamp matches and writes the matched halves of both
//! trajectories at the best offset.
//!
//! # Usage
//!
//! ```bash
//! traj_align groundtruth.txt estimated.txt out/ --offset-range -30 30 --step 0.5
//! ```
//!
//! # Output Files
//!
//! - `aligned_ref.txt`: matched reference poses (TUM format)
//! - `aligned_target.txt`: matched target poses on the shifted clock
//! - `offset_trace.csv`: match count per candidate offset, for plotting

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::{Parser, ValueEnum};

use samaya_align::{
    AlignmentStats, MatchPolicy, OffsetCandidate, SearchConfig, load_trajectory, save_records,
    search_offset,
};

#[derive(Parser)]
#[command(name = "traj_align")]
#[command(about = "Recover the clock offset between two TUM trajectory files")]
struct Args {
    /// Reference trajectory (TUM format)
    reference: String,

    /// Target trajectory to align against the reference (TUM format)
    target: String,

    /// Directory for aligned outputs
    output_dir: String,

    /// Matching tolerance in seconds
    #[arg(long, default_value = "0.5")]
    max_time_diff: f64,

    /// Candidate offset range in seconds
    #[arg(
        long,
        num_args = 2,
        value_names = ["MIN", "MAX"],
        default_values_t = [-3000.0, 3000.0],
        allow_negative_numbers = true
    )]
    offset_range: Vec<f64>,

    /// Offset grid spacing in seconds
    #[arg(long, default_value = "1.0")]
    step: f64,

    /// How matched target poses may be claimed
    #[arg(long, value_enum, default_value = "greedy")]
    policy: PolicyArg,

    /// Shift both trajectories to start at time zero before searching
    #[arg(long)]
    rebase: bool,

    /// Score candidate offsets across all CPU cores
    #[arg(long)]
    parallel: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Several reference poses may claim the same target pose
    Greedy,
    /// Each target pose may be claimed at most once
    OneToOne,
}

impl From<PolicyArg> for MatchPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Greedy => MatchPolicy::Greedy,
            PolicyArg::OneToOne => MatchPolicy::OneToOne,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let reference = load_trajectory(&args.reference)?;
    let target = load_trajectory(&args.target)?;

    let (reference, target) = if args.rebase {
        (reference.rebased(), target.rebased())
    } else {
        (reference, target)
    };

    let config = SearchConfig {
        offset_min: args.offset_range[0],
        offset_max: args.offset_range[1],
        step: args.step,
        max_time_diff: args.max_time_diff,
        policy: args.policy.into(),
        use_parallel: args.parallel,
    };

    println!("Reference: {} ({} poses)", args.reference, reference.len());
    println!("Target:    {} ({} poses)", args.target, target.len());
    println!(
        "Offset grid: [{}, {}] s, step {} s, tolerance {} s",
        config.offset_min, config.offset_max, config.step, config.max_time_diff
    );
    println!();

    let result = search_offset(&reference, &target, config)?;

    std::fs::create_dir_all(&args.output_dir)?;
    let trace_path = Path::new(&args.output_dir).join("offset_trace.csv");
    write_trace(&trace_path, &result.trace)?;

    if !result.has_matches() {
        println!("No candidate offset produced a single match.");
        println!(
            "Checked {} offsets; try widening --offset-range or raising --max-time-diff.",
            result.trace.len()
        );
        println!("Offset trace: {}", trace_path.display());
        std::process::exit(2);
    }

    let ref_path = Path::new(&args.output_dir).join("aligned_ref.txt");
    let target_path = Path::new(&args.output_dir).join("aligned_target.txt");
    save_records(&ref_path, &result.aligned_reference())?;
    save_records(&target_path, &result.aligned_target())?;

    let stats = AlignmentStats::from_matches(&result.best_matches);

    println!("=== Offset Search ===");
    println!("Best offset: {:+.2} s", result.best_offset);
    println!(
        "Matches: {} of {} reference poses",
        result.best_match_count,
        reference.len()
    );
    println!();
    stats.print();
    println!();
    println!("Output files:");
    println!("  Aligned reference: {}", ref_path.display());
    println!("  Aligned target: {}", target_path.display());
    println!("  Offset trace: {}", trace_path.display());

    Ok(())
}

fn write_trace(path: &Path, trace: &[OffsetCandidate]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "offset,match_count")?;
    for candidate in trace {
        writeln!(writer, "{:.6},{}", candidate.offset, candidate.match_count)?;
    }
    writer.flush()
}
