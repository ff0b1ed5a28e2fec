//! Evaluate a branch direction predictor against a text trace.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use bpsim::predictor::{build_predictor, PredictorConfig, PredictorKind};
use bpsim::sim;
use bpsim::stats::TraceStats;
use bpsim::trace::TraceReader;

/// Evaluate a branch direction predictor against a text trace.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a trace file (reads stdin when omitted)
    trace: Option<PathBuf>,

    /// Predictor variant: static, not-taken, random, gshare,
    /// tournament, yags
    #[arg(short, long, default_value = "static")]
    predictor: PredictorKind,

    /// Index width of the gshare/global/base counter tables
    #[arg(long, default_value_t = 17)]
    history_bits: usize,

    /// Width of each tracked per-address history value
    #[arg(long, default_value_t = 10)]
    local_history_bits: usize,

    /// Index width of the local history table
    #[arg(long, default_value_t = 10)]
    local_index_bits: usize,

    /// Index width of the tournament chooser table
    #[arg(long, default_value_t = 12)]
    chooser_bits: usize,

    /// Index width of the YAGS exception tables
    #[arg(long, default_value_t = 10)]
    exception_bits: usize,

    /// Print each prediction (1 = taken) on stdout
    #[arg(short, long)]
    verbose: bool,

    /// Print a per-branch summary after the run
    #[arg(long)]
    report: bool,
}

fn print_summary(stats: &TraceStats) {
    println!("[*] Global statistics:");
    println!("      Branches:  {:10}", stats.global_brns());
    println!("      Incorrect: {:10}", stats.global_miss());
    if stats.global_brns() > 0 {
        println!(
            "      Global hit rate: {}/{} ({:.2}% correct)",
            stats.global_hits(),
            stats.global_brns(),
            stats.hit_rate() * 100.0,
        );
        println!(
            "      Misprediction rate: {:7.3} miss/kbrn",
            stats.mpkb()
        );
    }
}

fn print_report(stats: &TraceStats) {
    println!("[*] Per-branch statistics:");
    println!(
        "      Unique branches: {} ({} always taken, {} never taken)",
        stats.num_unique_branches(),
        stats.num_always_taken(),
        stats.num_never_taken(),
    );

    println!("      Most common branches:");
    for (pc, data) in stats.get_common_branches(8) {
        println!(
            "        {:016x} {:8}/{:8} {:.4}",
            pc,
            data.hits,
            data.occ,
            data.hit_rate()
        );
    }

    let low_rate = stats.get_low_rate_branches(8);
    if !low_rate.is_empty() {
        println!("      Low hit-rate branches:");
        for (pc, data) in low_rate {
            println!(
                "        {:016x} {:8}/{:8} {:.4}",
                pc,
                data.hits,
                data.occ,
                data.hit_rate()
            );
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let cfg = PredictorConfig {
        history_bits: args.history_bits,
        local_history_bits: args.local_history_bits,
        local_index_bits: args.local_index_bits,
        chooser_bits: args.chooser_bits,
        exception_bits: args.exception_bits,
    };
    let mut predictor = build_predictor(args.predictor, &cfg)?;

    let stream: Box<dyn BufRead> = match &args.trace {
        Some(path) => Box::new(BufReader::new(
            File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let records = TraceReader::new(stream);

    println!("[*] {} predictor", predictor.name());
    let storage_bits = predictor.storage_bits();
    if storage_bits > 0 {
        println!(
            "      Storage bits: {}b, {:.2}KiB",
            storage_bits,
            storage_bits as f64 / 1024.0 / 8.0
        );
    }

    let stats = if args.verbose {
        sim::run_with(predictor.as_mut(), records, |_, predicted| {
            println!("{}", predicted as u32);
        })
    } else {
        sim::run(predictor.as_mut(), records)
    };

    print_summary(&stats);
    if args.report {
        print_report(&stats);
    }

    Ok(())
}
