use crate::algorithms::a_star::OpenSetPolicy;
use crate::algorithms::common::NoopObserver;
use crate::algorithms::heuristic::Heuristic;
use crate::config::Config;
use crate::error::{Result, SimulationError};
use crate::simulation::Simulation;
use crate::statistics::RunStatus;
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

/// Engine variants compared on every grid.
pub const ENGINES: [(&str, Heuristic, OpenSetPolicy); 2] = [
    ("faithful", Heuristic::Manhattan, OpenSetPolicy::SinglePush),
    ("corrected", Heuristic::Chebyshev, OpenSetPolicy::LazyReinsert),
];

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub run_id: usize,
    pub seed: u64,
    pub engine: &'static str,
    pub grid_size: usize,
    pub num_obstacles: usize,
    pub status: RunStatus,
    pub path_steps: usize,
    pub optimal_steps: Option<usize>,
    pub iterations: usize,
    pub pushed: usize,
    pub stale_skipped: usize,
    pub search_time_us: u64,
}

/// Runs the same seeded grids through every engine variant.
pub struct BatchSimulation {
    config: Config,
    results: Vec<BatchResult>,
    skipped: usize,
}

impl BatchSimulation {
    pub fn new(config: Config) -> Self {
        BatchSimulation {
            config,
            results: Vec::new(),
            skipped: 0,
        }
    }

    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    /// Grids abandoned because obstacle placement was exhausted.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn run(&mut self) -> Result<()> {
        let base_seed = self.config.seed.unwrap_or_else(rand::random::<u64>);
        let started = Instant::now();
        info!(
            "batch of {} grids ({}x{}), base seed {}",
            self.config.runs, self.config.grid_size, self.config.grid_size, base_seed
        );

        for run_id in 0..self.config.runs {
            let seed = base_seed.wrapping_add(run_id as u64);
            for (name, heuristic, policy) in ENGINES {
                let run_config = Config {
                    seed: Some(seed),
                    heuristic,
                    open_set: policy,
                    no_visualization: true,
                    ..self.config.clone()
                };

                let mut simulation = match Simulation::new(run_config) {
                    Ok(simulation) => simulation,
                    Err(SimulationError::PlacementExhausted { attempts }) => {
                        warn!("seed {}: placement exhausted after {} attempts, skipping", seed, attempts);
                        self.skipped += 1;
                        break;
                    }
                    Err(e) => return Err(e),
                };

                let report = simulation.solve(&mut NoopObserver)?;
                let stats = &report.statistics;
                self.results.push(BatchResult {
                    run_id,
                    seed,
                    engine: name,
                    grid_size: self.config.grid_size,
                    num_obstacles: stats.num_obstacles,
                    status: stats.status,
                    path_steps: stats.path_steps,
                    optimal_steps: stats.optimal_steps,
                    iterations: stats.iterations,
                    pushed: stats.pushed,
                    stale_skipped: stats.stale_skipped,
                    search_time_us: stats.elapsed.as_micros() as u64,
                });
            }
        }

        if let Some(path) = self.config.output_file.clone() {
            self.write_csv(&path)?;
        }

        info!(
            "batch finished: {} results in {:.2?}",
            self.results.len(),
            started.elapsed()
        );
        Ok(())
    }

    pub fn write_csv(&self, path: &str) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        writeln!(
            file,
            "run_id,seed,engine,grid_size,num_obstacles,status,path_steps,optimal_steps,iterations,pushed,stale_skipped,search_time_us"
        )?;
        for r in &self.results {
            writeln!(
                file,
                "{},{},{},{},{},{},{},{},{},{},{},{}",
                r.run_id,
                r.seed,
                r.engine,
                r.grid_size,
                r.num_obstacles,
                r.status,
                r.path_steps,
                r.optimal_steps.map(|s| s.to_string()).unwrap_or_default(),
                r.iterations,
                r.pushed,
                r.stale_skipped,
                r.search_time_us
            )?;
        }
        file.flush()?;
        info!("wrote {} rows to {}", self.results.len(), path);
        Ok(())
    }

    pub fn print_summary(&self) {
        if self.results.is_empty() {
            println!("No results to summarize.");
            return;
        }

        println!("\n=== BATCH SIMULATION SUMMARY ===");
        if self.skipped > 0 {
            println!("Grids skipped (placement exhausted): {}", self.skipped);
        }

        let mut by_engine: BTreeMap<&str, Vec<&BatchResult>> = BTreeMap::new();
        for result in &self.results {
            by_engine.entry(result.engine).or_default().push(result);
        }

        for (engine, results) in by_engine {
            let found: Vec<_> = results
                .iter()
                .filter(|r| r.status == RunStatus::Found)
                .collect();
            let total = results.len();

            println!("\n{} engine:", engine);
            println!(
                "  Paths found: {}/{} ({:.1}%)",
                found.len(),
                total,
                found.len() as f64 / total as f64 * 100.0
            );

            if found.is_empty() {
                continue;
            }

            let avg_steps = found.iter().map(|r| r.path_steps as f64).sum::<f64>() / found.len() as f64;
            let avg_iterations = found.iter().map(|r| r.iterations as f64).sum::<f64>() / found.len() as f64;
            let suboptimal = found
                .iter()
                .filter(|r| r.optimal_steps.is_some_and(|opt| r.path_steps > opt))
                .count();
            let total_excess: usize = found
                .iter()
                .filter_map(|r| r.optimal_steps.map(|opt| r.path_steps.saturating_sub(opt)))
                .sum();

            println!("  Average path steps: {:.1}", avg_steps);
            println!("  Average iterations: {:.1}", avg_iterations);
            println!("  Suboptimal paths: {} (total excess steps: {})", suboptimal, total_excess);
        }
    }
}
