use crate::algorithms::a_star::SearchStats;
use crate::algorithms::common::SearchOutcome;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Found,
    NoPath,
    Cancelled,
}

impl From<&SearchOutcome> for RunStatus {
    fn from(outcome: &SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Found(_) => RunStatus::Found,
            SearchOutcome::NoPath => RunStatus::NoPath,
            SearchOutcome::Cancelled => RunStatus::Cancelled,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStatus::Found => "found",
            RunStatus::NoPath => "no_path",
            RunStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct Statistics {
    pub status: RunStatus,
    pub iterations: usize,
    pub pushed: usize,
    pub closed: usize,
    pub stale_skipped: usize,
    pub path_steps: usize,
    pub optimal_steps: Option<usize>,
    pub num_obstacles: usize,
    pub barrier_cells: usize,
    pub elapsed: Duration,
    pub route_efficiency: f64,
}

impl Statistics {
    pub fn new(
        outcome: &SearchOutcome,
        search: &SearchStats,
        optimal_steps: Option<usize>,
        num_obstacles: usize,
        barrier_cells: usize,
        elapsed: Duration,
    ) -> Self {
        let mut stats = Statistics {
            status: RunStatus::from(outcome),
            iterations: search.iterations,
            pushed: search.pushed,
            closed: search.closed,
            stale_skipped: search.stale_skipped,
            path_steps: outcome.path().map_or(0, |p| p.steps()),
            optimal_steps,
            num_obstacles,
            barrier_cells,
            elapsed,
            route_efficiency: 0.0,
        };
        stats.calculate_efficiency();
        stats
    }

    /// Path steps over optimal steps; 1.0 is optimal, 0.0 when undefined.
    pub fn calculate_efficiency(&mut self) {
        self.route_efficiency = match self.optimal_steps {
            Some(optimal) if optimal > 0 && self.status == RunStatus::Found => {
                self.path_steps as f64 / optimal as f64
            }
            _ => 0.0,
        };
    }

    /// Steps beyond the optimal route, when both are known.
    pub fn excess_steps(&self) -> Option<usize> {
        match (self.status, self.optimal_steps) {
            (RunStatus::Found, Some(optimal)) => Some(self.path_steps.saturating_sub(optimal)),
            _ => None,
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Outcome: {}", self.status)?;
        writeln!(f, "Path Steps: {}", self.path_steps)?;
        match self.optimal_steps {
            Some(optimal) => writeln!(f, "Optimal Steps: {}", optimal)?,
            None => writeln!(f, "Optimal Steps: unreachable")?,
        }
        writeln!(f, "Iterations: {}", self.iterations)?;
        writeln!(f, "Queue Pushes: {}", self.pushed)?;
        writeln!(f, "Cells Closed: {}", self.closed)?;
        writeln!(f, "Stale Entries Skipped: {}", self.stale_skipped)?;
        writeln!(f, "Obstacles: {} ({} barrier cells)", self.num_obstacles, self.barrier_cells)?;
        writeln!(f, "Search Time: {:.2?}", self.elapsed)?;

        if self.route_efficiency > 0.0 {
            writeln!(f, "Route Efficiency: {:.3}", self.route_efficiency)?;
            if self.route_efficiency > 1.0 {
                writeln!(f, "Note: path is longer than optimal (inadmissible heuristic or stale queue keys)")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(status: RunStatus, path_steps: usize, optimal: Option<usize>) -> Statistics {
        let mut s = Statistics {
            status,
            iterations: 10,
            pushed: 12,
            closed: 9,
            stale_skipped: 0,
            path_steps,
            optimal_steps: optimal,
            num_obstacles: 3,
            barrier_cells: 40,
            elapsed: Duration::from_micros(5),
            route_efficiency: 0.0,
        };
        s.calculate_efficiency();
        s
    }

    #[test]
    fn test_efficiency() {
        let s = stats(RunStatus::Found, 12, Some(10));
        assert!((s.route_efficiency - 1.2).abs() < 1e-9);
        assert_eq!(s.excess_steps(), Some(2));
        assert!(s.to_string().contains("longer than optimal"));
    }

    #[test]
    fn test_no_path_has_no_efficiency() {
        let s = stats(RunStatus::NoPath, 0, None);
        assert_eq!(s.route_efficiency, 0.0);
        assert_eq!(s.excess_steps(), None);
        assert!(s.to_string().contains("Outcome: no_path"));
    }
}
