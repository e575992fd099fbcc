//! skipkv Stress Binary
//!
//! Hammers a single store from several threads: a write phase of random
//! inserts followed by a read phase of random searches.

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skipkv::{Config, InsertOutcome, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// skipkv stress test
#[derive(Parser, Debug)]
#[command(name = "skipkv-stress")]
#[command(about = "Multi-threaded insert/search throughput test for skipkv")]
#[command(version)]
struct Args {
    /// Number of worker threads
    #[arg(short, long, default_value = "4")]
    threads: usize,

    /// Operations per phase, split across threads
    #[arg(short, long, default_value = "100000")]
    ops: usize,

    /// Maximum skip list level
    #[arg(short, long, default_value = "18")]
    max_level: usize,

    /// Base RNG seed; thread `i` uses `seed + i`
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,skipkv=warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    if args.threads == 0 {
        tracing::error!("--threads must be at least 1");
        return ExitCode::FAILURE;
    }

    tracing::info!("skipkv stress v{}", skipkv::VERSION);
    tracing::info!(
        "threads={} ops={} max_level={}",
        args.threads,
        args.ops,
        args.max_level
    );

    let config = Config::builder().max_level(args.max_level).build();
    let store: Store<u64, String> = match Store::new(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to create store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let per_thread = args.ops / args.threads;
    let key_space = args.ops.max(1) as u64;

    // Write phase
    let start = Instant::now();
    let inserted = run_phase(args.threads, |t| {
        let mut rng = StdRng::seed_from_u64(args.seed.wrapping_add(t as u64));
        let mut inserted = 0;
        for _ in 0..per_thread {
            let key = rng.gen_range(0..key_space);
            if store.insert(key, key.to_string()) == InsertOutcome::Inserted {
                inserted += 1;
            }
        }
        inserted
    });
    let Some(inserted) = inserted else {
        return ExitCode::FAILURE;
    };
    report("insert", per_thread * args.threads, start.elapsed());
    tracing::info!("{} new keys, size={}", inserted, store.size());

    // Read phase
    let start = Instant::now();
    let hits = run_phase(args.threads, |t| {
        let mut rng = StdRng::seed_from_u64(args.seed.wrapping_mul(31).wrapping_add(t as u64));
        let mut hits = 0;
        for _ in 0..per_thread {
            let key = rng.gen_range(0..key_space);
            if store.search(&key).is_some() {
                hits += 1;
            }
        }
        hits
    });
    let Some(hits) = hits else {
        return ExitCode::FAILURE;
    };
    report("search", per_thread * args.threads, start.elapsed());
    tracing::info!("{} hits", hits);

    let top_level = store.with_list(|list| list.top_level());
    tracing::info!("top level reached: {}", top_level);

    ExitCode::SUCCESS
}

/// Run `work` on `threads` scoped threads and sum their counts
///
/// Returns `None` if any worker panicked.
fn run_phase<F>(threads: usize, work: F) -> Option<u64>
where
    F: Fn(usize) -> u64 + Sync,
{
    let work = &work;
    let result = crossbeam::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|t| s.spawn(move |_| work(t)))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join())
            .collect::<std::thread::Result<Vec<u64>>>()
    });

    match result {
        Ok(Ok(counts)) => Some(counts.into_iter().sum()),
        _ => {
            tracing::error!("A worker thread panicked");
            None
        }
    }
}

fn report(phase: &str, ops: usize, elapsed: Duration) {
    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 { ops as f64 / secs } else { 0.0 };
    tracing::info!(
        "{}: {} ops in {:.3}s ({:.0} ops/s)",
        phase,
        ops,
        secs,
        rate
    );
}
