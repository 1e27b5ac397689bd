use crate::algorithms::common::{Path, StepObserver};
use crate::grid::{CellState, Grid, Position};
use rustc_hash::FxHashMap;

/// Predecessor map produced by a search: cell -> the cell it was reached from.
pub type CameFrom = FxHashMap<Position, Position>;

/// Walk `came_from` back from `end`, marking every predecessor as Path and
/// notifying the observer after each move. The start cell keeps its marker.
pub fn reconstruct<O: StepObserver + ?Sized>(
    came_from: &CameFrom,
    end: Position,
    grid: &mut Grid,
    observer: &mut O,
) -> Path {
    let mut cells = vec![end];
    let mut current = end;

    while let Some(&previous) = came_from.get(&current) {
        current = previous;
        grid.mark(current, CellState::Path);
        cells.push(current);
        observer.on_step(grid);
    }

    cells.reverse();
    Path::new(cells)
}
