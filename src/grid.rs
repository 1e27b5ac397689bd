use crate::error::{Result, SimulationError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// True when `other` is one of the 8 surrounding cells.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr.max(dc) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Empty,
    Barrier,
    Start,
    End,
    Open,
    Closed,
    Path,
}

impl CellState {
    pub fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Barrier => '#',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Open => 'o',
            CellState::Closed => 'x',
            CellState::Path => '*',
        }
    }

    fn is_search_mark(self) -> bool {
        matches!(self, CellState::Open | CellState::Closed | CellState::Path)
    }
}

/// (row, col) deltas in neighbour order: down, up, right, left,
/// top-left, bottom-left, bottom-right, top-right.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (-1, -1),
    (-1, 1),
    (1, 1),
    (1, -1),
];

/// Square grid of cells with a cached 8-directional adjacency.
///
/// The adjacency cache is only rebuilt by [`Grid::refresh_adjacency`]. Barrier
/// edits mark it stale but never refresh it on their own.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<CellState>,
    adjacency: Vec<Vec<Position>>,
    adjacency_stale: bool,
    start: Option<Position>,
    end: Option<Position>,
}

impl Grid {
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 {
            return Err(SimulationError::InvalidGridSize(size));
        }

        Ok(Grid {
            size,
            cells: vec![CellState::Empty; size * size],
            adjacency: vec![Vec::new(); size * size],
            adjacency_stale: true,
            start: None,
            end: None,
        })
    }

    /// Build a fresh, empty grid. The current grid is left untouched so any
    /// reader still holding it keeps a consistent view.
    pub fn rebuild(&self, size: usize) -> Result<Grid> {
        Grid::new(size)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn end(&self) -> Option<Position> {
        self.end
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if self.contains(row, col) {
            Ok(row * self.size + col)
        } else {
            Err(SimulationError::OutOfBounds {
                row,
                col,
                size: self.size,
            })
        }
    }

    pub fn state(&self, row: usize, col: usize) -> Result<CellState> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// State lookup for positions already known to be in bounds.
    pub fn state_at(&self, pos: Position) -> CellState {
        self.cells
            .get(pos.row * self.size + pos.col)
            .copied()
            .unwrap_or(CellState::Barrier)
    }

    /// Overwrite one cell, keeping the single-start / single-end bookkeeping.
    pub fn set_state(&mut self, row: usize, col: usize, state: CellState) -> Result<()> {
        let idx = self.index(row, col)?;
        let pos = Position::new(row, col);
        let previous = self.cells[idx];

        if previous == CellState::Start && state != CellState::Start {
            self.start = None;
        }
        if previous == CellState::End && state != CellState::End {
            self.end = None;
        }

        match state {
            CellState::Start => {
                if let Some(old) = self.start.filter(|old| *old != pos) {
                    self.cells[old.row * self.size + old.col] = CellState::Empty;
                }
                self.start = Some(pos);
            }
            CellState::End => {
                if let Some(old) = self.end.filter(|old| *old != pos) {
                    self.cells[old.row * self.size + old.col] = CellState::Empty;
                }
                self.end = Some(pos);
            }
            _ => {}
        }

        if (previous == CellState::Barrier) != (state == CellState::Barrier) {
            self.adjacency_stale = true;
        }

        self.cells[idx] = state;
        Ok(())
    }

    pub fn set_start(&mut self, row: usize, col: usize) -> Result<()> {
        self.set_state(row, col, CellState::Start)
    }

    pub fn set_end(&mut self, row: usize, col: usize) -> Result<()> {
        self.set_state(row, col, CellState::End)
    }

    /// Mark a barrier. Start and end cells are never overwritten.
    pub fn set_barrier(&mut self, row: usize, col: usize) -> Result<()> {
        match self.state(row, col)? {
            CellState::Start | CellState::End => {
                log::debug!("refusing barrier on endpoint ({}, {})", row, col);
                Ok(())
            }
            _ => self.set_state(row, col, CellState::Barrier),
        }
    }

    pub fn toggle_barrier(&mut self, row: usize, col: usize) -> Result<()> {
        if self.state(row, col)? == CellState::Barrier {
            self.clear(row, col)
        } else {
            self.set_barrier(row, col)
        }
    }

    pub fn clear(&mut self, row: usize, col: usize) -> Result<()> {
        self.set_state(row, col, CellState::Empty)
    }

    /// Reset every Open, Closed and Path cell back to Empty.
    pub fn clear_search_marks(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.is_search_mark()) {
            *cell = CellState::Empty;
        }
    }

    /// Set a search marker (Open, Closed, Path). Endpoints keep their own markers.
    pub(crate) fn mark(&mut self, pos: Position, state: CellState) {
        debug_assert!(state.is_search_mark());
        if Some(pos) == self.start || Some(pos) == self.end {
            return;
        }
        if let Some(cell) = self.cells.get_mut(pos.row * self.size + pos.col) {
            *cell = state;
        }
    }

    /// Live neighbour lookup against the current barrier layout.
    pub fn neighbors_of(&self, row: usize, col: usize) -> Result<Vec<Position>> {
        self.index(row, col)?;
        Ok(self.live_neighbors(Position::new(row, col)))
    }

    fn live_neighbors(&self, pos: Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(8);
        let (row, col) = (pos.row as isize, pos.col as isize);
        let size = self.size as isize;

        for (dr, dc) in NEIGHBOR_OFFSETS {
            let nr = row + dr;
            let nc = col + dc;
            if nr < 0 || nr >= size || nc < 0 || nc >= size {
                continue;
            }
            let next = Position::new(nr as usize, nc as usize);
            if self.state_at(next) != CellState::Barrier {
                neighbors.push(next);
            }
        }
        neighbors
    }

    /// Recompute the cached neighbour list of every cell.
    pub fn refresh_adjacency(&mut self) {
        let adjacency: Vec<Vec<Position>> = self.positions().map(|p| self.live_neighbors(p)).collect();
        self.adjacency = adjacency;
        self.adjacency_stale = false;
    }

    /// Cached neighbours from the last [`Grid::refresh_adjacency`].
    pub fn adjacency(&self, pos: Position) -> &[Position] {
        if !self.contains(pos.row, pos.col) {
            return &[];
        }
        &self.adjacency[pos.row * self.size + pos.col]
    }

    pub fn is_adjacency_stale(&self) -> bool {
        self.adjacency_stale
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Position::new(row, col)))
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| **c == state).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.size {
            write!(f, "{:2}", col % 10)?;
        }
        writeln!(f)?;

        for row in 0..self.size {
            write!(f, "{:2} ", row)?;
            for col in 0..self.size {
                write!(f, "{} ", self.cells[row * self.size + col].symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(10).unwrap();
        assert_eq!(grid.size(), 10);
        assert_eq!(grid.count(CellState::Empty), 100);
        assert!(grid.start().is_none());
        assert!(grid.end().is_none());
    }

    #[test]
    fn test_rejects_degenerate_size() {
        assert!(matches!(Grid::new(1), Err(SimulationError::InvalidGridSize(1))));
    }

    #[test]
    fn test_out_of_bounds_edit() {
        let mut grid = Grid::new(5).unwrap();
        let err = grid.set_barrier(5, 0).unwrap_err();
        assert!(matches!(err, SimulationError::OutOfBounds { row: 5, col: 0, size: 5 }));
        assert!(grid.neighbors_of(0, 7).is_err());
        assert_eq!(grid.count(CellState::Barrier), 0);
    }

    #[test]
    fn test_neighbor_order_in_interior() {
        let grid = Grid::new(5).unwrap();
        let neighbors = grid.neighbors_of(2, 2).unwrap();
        let expected = vec![
            Position::new(3, 2),
            Position::new(1, 2),
            Position::new(2, 3),
            Position::new(2, 1),
            Position::new(1, 1),
            Position::new(1, 3),
            Position::new(3, 3),
            Position::new(3, 1),
        ];
        assert_eq!(neighbors, expected);
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        let grid = Grid::new(5).unwrap();
        assert_eq!(grid.neighbors_of(0, 0).unwrap().len(), 3);
        assert_eq!(grid.neighbors_of(4, 4).unwrap().len(), 3);
        assert_eq!(grid.neighbors_of(0, 2).unwrap().len(), 5);
    }

    #[test]
    fn test_neighbors_skip_barriers() {
        let mut grid = Grid::new(5).unwrap();
        grid.set_barrier(1, 1).unwrap();
        grid.set_barrier(3, 2).unwrap();
        let neighbors = grid.neighbors_of(2, 2).unwrap();
        assert_eq!(neighbors.len(), 6);
        assert!(!neighbors.contains(&Position::new(1, 1)));
        assert!(!neighbors.contains(&Position::new(3, 2)));
    }

    #[test]
    fn test_single_start_and_end() {
        let mut grid = Grid::new(5).unwrap();
        grid.set_start(0, 0).unwrap();
        grid.set_start(1, 1).unwrap();
        grid.set_end(4, 4).unwrap();
        grid.set_end(3, 3).unwrap();

        assert_eq!(grid.count(CellState::Start), 1);
        assert_eq!(grid.count(CellState::End), 1);
        assert_eq!(grid.state(0, 0).unwrap(), CellState::Empty);
        assert_eq!(grid.start(), Some(Position::new(1, 1)));
        assert_eq!(grid.end(), Some(Position::new(3, 3)));
    }

    #[test]
    fn test_clearing_endpoint_forgets_it() {
        let mut grid = Grid::new(5).unwrap();
        grid.set_start(2, 2).unwrap();
        grid.clear(2, 2).unwrap();
        assert!(grid.start().is_none());

        grid.set_end(1, 1).unwrap();
        grid.set_start(1, 1).unwrap();
        assert!(grid.end().is_none());
        assert_eq!(grid.start(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_barrier_never_replaces_endpoint() {
        let mut grid = Grid::new(5).unwrap();
        grid.set_start(0, 0).unwrap();
        grid.set_end(4, 4).unwrap();
        grid.set_barrier(0, 0).unwrap();
        grid.toggle_barrier(4, 4).unwrap();
        assert_eq!(grid.state(0, 0).unwrap(), CellState::Start);
        assert_eq!(grid.state(4, 4).unwrap(), CellState::End);
    }

    #[test]
    fn test_toggle_barrier() {
        let mut grid = Grid::new(5).unwrap();
        grid.toggle_barrier(2, 3).unwrap();
        assert_eq!(grid.state(2, 3).unwrap(), CellState::Barrier);
        grid.toggle_barrier(2, 3).unwrap();
        assert_eq!(grid.state(2, 3).unwrap(), CellState::Empty);
    }

    #[test]
    fn test_refresh_removes_new_barrier_from_all_neighbors() {
        let mut grid = Grid::new(5).unwrap();
        grid.refresh_adjacency();
        let target = Position::new(2, 2);
        let around = grid.neighbors_of(2, 2).unwrap();
        for n in &around {
            assert!(grid.adjacency(*n).contains(&target));
        }

        grid.set_barrier(2, 2).unwrap();
        assert!(grid.is_adjacency_stale());
        // cache is not maintained automatically
        assert!(grid.adjacency(around[0]).contains(&target));

        grid.refresh_adjacency();
        assert!(!grid.is_adjacency_stale());
        assert_eq!(around.len(), 8);
        for n in &around {
            assert!(!grid.adjacency(*n).contains(&target));
        }
    }

    #[test]
    fn test_clear_search_marks_keeps_layout() {
        let mut grid = Grid::new(4).unwrap();
        grid.set_start(0, 0).unwrap();
        grid.set_barrier(1, 1).unwrap();
        grid.mark(Position::new(2, 2), CellState::Closed);
        grid.mark(Position::new(3, 3), CellState::Path);
        grid.mark(Position::new(0, 0), CellState::Open);

        grid.clear_search_marks();
        assert_eq!(grid.state(0, 0).unwrap(), CellState::Start);
        assert_eq!(grid.state(1, 1).unwrap(), CellState::Barrier);
        assert_eq!(grid.count(CellState::Empty), 14);
    }

    #[test]
    fn test_display_renders_symbols() {
        let mut grid = Grid::new(3).unwrap();
        grid.set_start(0, 0).unwrap();
        grid.set_end(2, 2).unwrap();
        grid.set_barrier(1, 1).unwrap();
        let text = grid.to_string();
        assert!(text.contains("S . ."));
        assert!(text.contains(". # ."));
        assert!(text.contains(". . E"));
    }
}
