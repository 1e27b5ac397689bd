use crate::grid::{Grid, Position};
use pathfinding::prelude::astar;

/// Shortest step count between two cells on the live barrier layout, computed
/// with the `pathfinding` crate and an admissible heuristic. Used as the
/// optimality baseline for reports and tests.
pub fn optimal_steps(grid: &Grid, start: Position, goal: Position) -> Option<usize> {
    let result = astar(
        &start,
        |p| {
            grid.neighbors_of(p.row, p.col)
                .unwrap_or_default()
                .into_iter()
                .map(|successor| (successor, 1u32))
                .collect::<Vec<_>>()
        },
        |p| p.row.abs_diff(goal.row).max(p.col.abs_diff(goal.col)) as u32,
        |p| *p == goal,
    );

    result.map(|(path, _)| path.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_shortcut() {
        let grid = Grid::new(6).unwrap();
        assert_eq!(
            optimal_steps(&grid, Position::new(0, 0), Position::new(5, 3)),
            Some(5)
        );
    }

    #[test]
    fn test_wall_with_single_gap() {
        let mut grid = Grid::new(10).unwrap();
        for row in 0..9 {
            grid.set_barrier(row, 5).unwrap();
        }
        assert_eq!(
            optimal_steps(&grid, Position::new(0, 0), Position::new(0, 9)),
            Some(18)
        );
    }

    #[test]
    fn test_unreachable() {
        let mut grid = Grid::new(4).unwrap();
        for col in 0..4 {
            grid.set_barrier(2, col).unwrap();
        }
        assert_eq!(
            optimal_steps(&grid, Position::new(0, 0), Position::new(3, 3)),
            None
        );
    }
}
