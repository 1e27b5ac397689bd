use crate::algorithms::a_star::AStar;
use crate::algorithms::common::{NoopObserver, SearchOutcome, StepObserver};
use crate::algorithms::reference::optimal_steps;
use crate::config::Config;
use crate::error::{Result, SimulationError};
use crate::generator::{Circle, ObstacleGenerator};
use crate::grid::{CellState, Grid};
use crate::statistics::Statistics;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::thread;
use std::time::{Duration, Instant};

/// Redraws the grid in the terminal after every step.
pub struct TerminalRenderer {
    delay: Duration,
    frame: usize,
}

impl TerminalRenderer {
    pub fn new(delay: Duration) -> Self {
        TerminalRenderer { delay, frame: 0 }
    }

    fn clear_screen(&self) {
        print!("\x1B[2J\x1B[1;1H");
    }
}

impl StepObserver for TerminalRenderer {
    fn on_step(&mut self, grid: &Grid) {
        self.frame += 1;
        self.clear_screen();
        println!("=== A* SIMULATION === Frame: {}", self.frame);
        println!("Legend: S=Start, E=End, #=Barrier, o=Open, x=Closed, *=Path");
        print!("{}", grid);
        thread::sleep(self.delay);
    }
}

/// Wraps another observer and requests a stop once `remaining` steps have run.
pub struct IterationBudget<'a, O: StepObserver + ?Sized> {
    inner: &'a mut O,
    remaining: usize,
}

impl<'a, O: StepObserver + ?Sized> IterationBudget<'a, O> {
    pub fn new(inner: &'a mut O, budget: usize) -> Self {
        IterationBudget {
            inner,
            remaining: budget,
        }
    }
}

impl<O: StepObserver + ?Sized> StepObserver for IterationBudget<'_, O> {
    fn on_step(&mut self, grid: &Grid) {
        self.remaining = self.remaining.saturating_sub(1);
        self.inner.on_step(grid);
    }

    fn should_stop(&self) -> bool {
        self.remaining == 0 || self.inner.should_stop()
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: SearchOutcome,
    pub statistics: Statistics,
}

/// One simulation session: the grid, its obstacles and the search engine.
///
/// The caller owns this value and drives it; grid edits, rebuilds and
/// searches all go through it.
pub struct Simulation {
    config: Config,
    rng: StdRng,
    grid: Grid,
    generator: ObstacleGenerator,
    engine: AStar,
    obstacle_count: usize,
    circles: Vec<Circle>,
}

impl Simulation {
    /// Build a session and populate its first grid.
    pub fn new(config: Config) -> Result<Self> {
        // Use seed for reproducible results
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let generator = ObstacleGenerator::from_config(&config);
        let obstacle_count = Self::obstacle_count_for(&config, &generator, &mut rng)?;

        let mut simulation = Simulation {
            grid: Grid::new(config.grid_size)?,
            engine: AStar::new(config.heuristic, config.open_set),
            config,
            rng,
            generator,
            obstacle_count,
            circles: Vec::new(),
        };
        simulation.populate()?;
        Ok(simulation)
    }

    /// Fixed count from the config, checked against `1..=max_obstacles`, or a fresh roll.
    fn obstacle_count_for(config: &Config, generator: &ObstacleGenerator, rng: &mut StdRng) -> Result<usize> {
        match config.obstacles {
            Some(count) if count == 0 || count > config.max_obstacles => {
                Err(SimulationError::InvalidObstacleCount {
                    count,
                    max: config.max_obstacles,
                })
            }
            Some(count) => Ok(count),
            None => Ok(generator.roll_count(rng)),
        }
    }

    fn populate(&mut self) -> Result<()> {
        self.generator.place_endpoints(
            &mut self.grid,
            &mut self.rng,
            self.config.start,
            self.config.end,
        )?;

        self.circles = self
            .generator
            .populate(&mut self.grid, self.obstacle_count, &mut self.rng)?;
        info!(
            "grid {}x{} ready: {} obstacles, start {:?}, end {:?}",
            self.grid.size(),
            self.grid.size(),
            self.circles.len(),
            self.grid.start(),
            self.grid.end()
        );
        Ok(())
    }

    /// Replace the grid with a fresh one and re-roll the obstacle count.
    pub fn rebuild(&mut self) -> Result<()> {
        self.grid = self.grid.rebuild(self.config.grid_size)?;
        self.obstacle_count = Self::obstacle_count_for(&self.config, &self.generator, &mut self.rng)?;
        self.circles.clear();
        self.populate()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacle_count
    }

    pub fn engine(&self) -> &AStar {
        &self.engine
    }

    pub fn set_start(&mut self, row: usize, col: usize) -> Result<()> {
        self.grid.set_start(row, col)
    }

    pub fn set_end(&mut self, row: usize, col: usize) -> Result<()> {
        self.grid.set_end(row, col)
    }

    pub fn set_barrier(&mut self, row: usize, col: usize) -> Result<()> {
        self.grid.set_barrier(row, col)
    }

    pub fn toggle_barrier(&mut self, row: usize, col: usize) -> Result<()> {
        self.grid.toggle_barrier(row, col)
    }

    pub fn clear(&mut self, row: usize, col: usize) -> Result<()> {
        self.grid.clear(row, col)
    }

    /// Refresh adjacency and run one search, reporting to `observer`.
    pub fn solve<O: StepObserver + ?Sized>(&mut self, observer: &mut O) -> Result<RunReport> {
        let start = self
            .grid
            .start()
            .ok_or(SimulationError::MissingEndpoint("start"))?;
        let end = self.grid.end().ok_or(SimulationError::MissingEndpoint("end"))?;

        self.grid.clear_search_marks();
        self.grid.refresh_adjacency();
        let optimal = optimal_steps(&self.grid, start, end);

        let search_start = Instant::now();
        let outcome = match self.config.max_iterations {
            Some(budget) => {
                let mut bounded = IterationBudget::new(observer, budget);
                self.engine.search(&mut self.grid, start, end, &mut bounded)?
            }
            None => self.engine.search(&mut self.grid, start, end, observer)?,
        };
        let elapsed = search_start.elapsed();

        let statistics = Statistics::new(
            &outcome,
            self.engine.stats(),
            optimal,
            self.circles.len(),
            self.grid.count(CellState::Barrier),
            elapsed,
        );
        info!("search {} in {:.2?}", statistics.status, elapsed);
        Ok(RunReport {
            outcome,
            statistics,
        })
    }

    /// Solve with the configured visualization.
    pub fn run(&mut self) -> Result<RunReport> {
        if self.config.no_visualization {
            return self.solve(&mut NoopObserver);
        }

        let mut renderer = TerminalRenderer::new(Duration::from_millis(self.config.delay_ms));
        let report = self.solve(&mut renderer)?;

        renderer.clear_screen();
        println!("=== SIMULATION COMPLETE ===");
        match &report.outcome {
            SearchOutcome::Found(path) => println!("SUCCESS: path of {} steps", path.steps()),
            SearchOutcome::NoPath => println!("FAILED: end is unreachable"),
            SearchOutcome::Cancelled => println!("STOPPED: iteration budget exhausted"),
        }
        print!("{}", self.grid);
        Ok(report)
    }
}
