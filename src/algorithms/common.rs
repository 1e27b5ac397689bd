use crate::grid::{Grid, Position};

/// Hook invoked once per search iteration and once per reconstruction step.
///
/// The observer only ever sees the grid by shared reference, so it can redraw
/// but never edit cells while a search is running.
pub trait StepObserver {
    fn on_step(&mut self, grid: &Grid);

    /// Polled at the top of every search iteration. Returning `true` stops
    /// the search with [`SearchOutcome::Cancelled`].
    fn should_stop(&self) -> bool {
        false
    }
}

impl<F: FnMut(&Grid)> StepObserver for F {
    fn on_step(&mut self, grid: &Grid) {
        self(grid)
    }
}

/// Observer that does nothing, for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _grid: &Grid) {}
}

/// Ordered route from start to end, both included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Position>,
}

impl Path {
    pub(crate) fn new(cells: Vec<Position>) -> Self {
        Path { cells }
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Number of moves, i.e. cells minus one.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// Cells strictly between start and end, ordered from the end side.
    pub fn interior_from_end(&self) -> Vec<Position> {
        if self.cells.len() < 2 {
            return Vec::new();
        }
        self.cells[1..self.cells.len() - 1].iter().rev().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Path),
    NoPath,
    Cancelled,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}
