use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_chrome::{ChromeLayerBuilder, FlushGuard};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use polygon_pi::reference::reference_pi;
use polygon_pi::render::matching_decimals;
use polygon_pi::{render, BenchmarkRunner, PolygonPiEngine, PrecisionConfig};

#[derive(Parser, Debug)]
#[command(name = "polygon-pi")]
#[command(about = "High-precision π from nested half-angle radicals (polygon doubling)", long_about = None)]
struct Args {
    /// Number of doublings, starting from the hexagon
    #[arg(short = 'm', long, default_value_t = 10)]
    iterations: u32,

    /// Fixed-point fractional bits
    #[arg(short, long, default_value_t = 4096)]
    shift: u32,

    /// Decimal digits to print [default: estimated precision]
    #[arg(short, long)]
    digits: Option<usize>,

    /// Extra bits carried through the recurrence and dropped at the end
    #[arg(short, long, default_value_t = 0)]
    guard_bits: u32,

    /// Also run at half and double the shift, in parallel
    #[arg(short, long)]
    benchmark_multiprecision: bool,

    /// Worker threads for the benchmark [default: one per precision]
    #[arg(short, long)]
    threads: Option<usize>,

    /// Write a Chrome trace to this file
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let _guard = init_tracing(args.trace.as_deref());

    let cfg = PrecisionConfig::new(args.shift)?;
    let approx_digits = cfg.estimate_precision_digits();
    let digits = args.digits.unwrap_or(approx_digits as usize);

    println!("Estimated decimal precision: ~{approx_digits} digits");
    info!(
        iterations = args.iterations,
        shift = args.shift,
        guard_bits = args.guard_bits,
        "running nested-radical polygon pi"
    );

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(args.iterations as u64)
    };
    progress.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40} {pos}/{len} doublings",
    )?);

    let engine = PolygonPiEngine::new(cfg.clone()).with_guard_bits(args.guard_bits);
    let start = Instant::now();
    let estimate = engine.compute_with_progress(args.iterations, |_| progress.inc(1));
    progress.finish_and_clear();
    let estimate = estimate?;
    let elapsed = start.elapsed();

    let rendered = estimate.render(digits)?;
    let reference = render(&reference_pi(&cfg), &cfg, digits)?;

    println!(
        "Completed: iterations={}, SHIFT={}, sides={}, time={:.3}s",
        args.iterations,
        args.shift,
        estimate.sides(),
        elapsed.as_secs_f64()
    );
    println!("pi ≈");
    println!("{rendered}");
    println!(
        "{} of {digits} decimals agree with π",
        matching_decimals(&rendered, &reference)
    );

    if args.benchmark_multiprecision {
        let mut runner = BenchmarkRunner::multiprecision(args.iterations, args.shift)?
            .with_guard_bits(args.guard_bits);
        if let Some(threads) = args.threads {
            runner = runner.with_threads(threads);
        }

        for run in runner.run()? {
            println!();
            println!(
                "Completed: iterations={}, SHIFT={}, time={:.3}s",
                run.iterations,
                run.shift,
                run.elapsed.as_secs_f64()
            );
            println!("Estimated decimal precision: ~{} digits", run.approx_digits);
            match run.outcome {
                Ok(pi) => println!("pi ≈\n{pi}"),
                Err(err) => println!("failed: {err}"),
            }
        }
    }

    Ok(())
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `info`). With `trace` set,
/// spans are also recorded for chrome://tracing; the returned guard flushes the
/// file when dropped.
fn init_tracing(trace: Option<&Path>) -> Option<FlushGuard> {
    let (chrome_layer, guard) = match trace {
        Some(path) => {
            let (layer, guard) = ChromeLayerBuilder::new()
                .file(path)
                .include_args(true)
                .build();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(chrome_layer)
        .init();

    guard
}
