use std::time::{Duration, Instant};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{info, warn};

use crate::error::Result;
use crate::polygon::PolygonPiEngine;
use crate::precision::PrecisionConfig;

/// Digits rendered per run unless the caller asks for a specific count.
const DEFAULT_RENDER_CAP: u64 = 80;

/// One precision level of a benchmark.
#[derive(Debug)]
pub struct BenchmarkRun {
    pub shift: u32,
    pub iterations: u32,
    pub approx_digits: u64,
    pub elapsed: Duration,
    /// The rendered estimate, or why this level failed.
    pub outcome: Result<String>,
}

/// Runs the compute-and-render pipeline at several precisions, each on its own
/// rayon task. Runs share nothing but their inputs, and a failing run does not
/// stop the others.
#[derive(Debug, Clone)]
pub struct BenchmarkRunner {
    iterations: u32,
    configs: Vec<PrecisionConfig>,
    threads: usize,
    guard_bits: u32,
    digits: Option<usize>,
}

impl BenchmarkRunner {
    pub fn new(iterations: u32, configs: Vec<PrecisionConfig>) -> Self {
        Self {
            iterations,
            threads: configs.len(),
            configs,
            guard_bits: 0,
            digits: None,
        }
    }

    /// Half, base and double of `shift`.
    pub fn multiprecision(iterations: u32, shift: u32) -> Result<Self> {
        let configs = [shift / 2, shift, shift.saturating_mul(2)]
            .into_iter()
            .map(PrecisionConfig::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(iterations, configs))
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_guard_bits(mut self, guard_bits: u32) -> Self {
        self.guard_bits = guard_bits;
        self
    }

    /// Render exactly `digits` digits instead of `min(80, estimated precision)`.
    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = Some(digits);
        self
    }

    pub fn configs(&self) -> &[PrecisionConfig] {
        &self.configs
    }

    pub fn run(&self) -> Result<Vec<BenchmarkRun>> {
        let threads = self.threads.clamp(1, self.configs.len().max(1));
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;

        let runs: Vec<BenchmarkRun> = pool.install(|| {
            self.configs
                .par_iter()
                .map(|config| self.run_one(config))
                .collect()
        });

        Ok(runs)
    }

    fn run_one(&self, config: &PrecisionConfig) -> BenchmarkRun {
        let approx_digits = config.estimate_precision_digits();
        let digits = self
            .digits
            .unwrap_or(approx_digits.min(DEFAULT_RENDER_CAP) as usize);

        let engine = PolygonPiEngine::new(config.clone()).with_guard_bits(self.guard_bits);
        let start = Instant::now();
        let outcome = engine
            .compute(self.iterations)
            .and_then(|estimate| estimate.render(digits));
        let elapsed = start.elapsed();

        match &outcome {
            Ok(_) => info!(
                shift = config.shift(),
                iterations = self.iterations,
                ?elapsed,
                "benchmark run completed"
            ),
            Err(err) => warn!(shift = config.shift(), %err, "benchmark run failed"),
        }

        BenchmarkRun {
            shift: config.shift(),
            iterations: self.iterations,
            approx_digits,
            elapsed,
            outcome,
        }
    }
}
