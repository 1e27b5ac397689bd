//! Random circular obstacles and endpoint placement.
//!
//! Circles are rasterized in two passes: the outline via 8-way octant symmetry
//! and the interior via a distance test over the bounding box. Every draw is
//! bounded by `max_attempts`; running out yields
//! [`SimulationError::PlacementExhausted`] instead of looping.

use crate::config::Config;
use crate::error::{Result, SimulationError};
use crate::grid::{Grid, Position};
use log::{debug, trace, warn};
use rand::Rng;

/// One rasterized obstacle. Radii are always `k + 0.5` so the circle sits
/// between cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Position,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Position, radius: f64) -> Self {
        Circle { center, radius }
    }

    pub fn distance_to(&self, pos: Position) -> f64 {
        let dr = pos.row as f64 - self.center.row as f64;
        let dc = pos.col as f64 - self.center.col as f64;
        (dr * dr + dc * dc).sqrt()
    }

    /// True when `pos` is farther than `radius + 1` from the center.
    pub fn clears(&self, pos: Position) -> bool {
        self.distance_to(pos) > self.radius + 1.0
    }

    fn outline(&self) -> Vec<(isize, isize)> {
        let (cx, cy) = (self.center.row as isize, self.center.col as isize);
        let r = self.radius;
        let last = (r * 0.5f64.sqrt()).floor() as isize;
        let mut points = Vec::new();

        for off in 0..=last {
            let d = (r * r - (off * off) as f64).sqrt().floor() as isize;
            points.extend_from_slice(&[
                (cx - d, cy + off),
                (cx + d, cy + off),
                (cx - d, cy - off),
                (cx + d, cy - off),
                (cx + off, cy - d),
                (cx + off, cy + d),
                (cx - off, cy - d),
                (cx - off, cy + d),
            ]);
        }
        points
    }

    fn interior(&self) -> Vec<(isize, isize)> {
        let (cx, cy) = (self.center.row as f64, self.center.col as f64);
        let r = self.radius;
        let limit = r - 0.5;
        let mut points = Vec::new();

        for y in (cy - r - 0.5).floor() as isize..(cy + r + 1.5).floor() as isize {
            for x in (cx - r - 0.5).floor() as isize..(cx + r + 1.5).floor() as isize {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                if (dx * dx + dy * dy).sqrt() <= limit {
                    points.push((x, y));
                }
            }
        }
        points
    }

    /// Every cell covered by the outline and the interior, sorted and deduplicated.
    pub fn cells(&self) -> Vec<Position> {
        let mut cells: Vec<Position> = self
            .outline()
            .into_iter()
            .chain(self.interior())
            .filter(|(row, col)| *row >= 0 && *col >= 0)
            .map(|(row, col)| Position::new(row as usize, col as usize))
            .collect();
        cells.sort();
        cells.dedup();
        cells
    }
}

#[derive(Debug, Clone)]
pub struct ObstacleGenerator {
    max_obstacles: usize,
    min_radius: u32,
    max_radius: u32,
    max_attempts: usize,
}

impl Default for ObstacleGenerator {
    fn default() -> Self {
        ObstacleGenerator {
            max_obstacles: 12,
            min_radius: 0,
            max_radius: 6,
            max_attempts: 1000,
        }
    }
}

impl ObstacleGenerator {
    pub fn new(max_obstacles: usize, min_radius: u32, max_radius: u32, max_attempts: usize) -> Self {
        ObstacleGenerator {
            max_obstacles: max_obstacles.max(1),
            min_radius: min_radius.min(max_radius),
            max_radius,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_obstacles,
            config.min_radius,
            config.max_radius,
            config.max_placement_attempts,
        )
    }

    /// Obstacle count for a freshly built grid, uniform in `1..=max_obstacles`.
    pub fn roll_count<R: Rng>(&self, rng: &mut R) -> usize {
        rng.gen_range(1..=self.max_obstacles)
    }

    /// Place start and end. Fixed cells are used as given; a missing one is
    /// drawn at random until it differs from the other endpoint.
    pub fn place_endpoints<R: Rng>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        start: Option<Position>,
        end: Option<Position>,
    ) -> Result<(Position, Position)> {
        for pos in start.into_iter().chain(end) {
            if !grid.contains(pos.row, pos.col) {
                return Err(SimulationError::OutOfBounds {
                    row: pos.row,
                    col: pos.col,
                    size: grid.size(),
                });
            }
        }
        if let (Some(s), Some(e)) = (start, end) {
            if s == e {
                return Err(SimulationError::CoincidentEndpoints(s));
            }
        }

        let start = match start {
            Some(start) => start,
            None => self.draw_cell(grid.size(), end, rng)?,
        };
        let end = match end {
            Some(end) => end,
            None => self.draw_cell(grid.size(), Some(start), rng)?,
        };

        grid.set_start(start.row, start.col)?;
        grid.set_end(end.row, end.col)?;
        debug!("endpoints placed: start {}, end {}", start, end);
        Ok((start, end))
    }

    fn draw_cell<R: Rng>(&self, size: usize, avoid: Option<Position>, rng: &mut R) -> Result<Position> {
        for _ in 0..self.max_attempts {
            let pos = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
            if Some(pos) != avoid {
                return Ok(pos);
            }
        }

        warn!("no cell distinct from {:?} after {} draws", avoid, self.max_attempts);
        Err(SimulationError::PlacementExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Carve `count` circles into the grid, keeping clear of its start and end.
    ///
    /// On failure the circles placed so far stay on the grid.
    pub fn populate<R: Rng>(&self, grid: &mut Grid, count: usize, rng: &mut R) -> Result<Vec<Circle>> {
        let mut circles = Vec::with_capacity(count);
        for _ in 0..count {
            let circle = self.place_circle(grid, rng)?;
            for cell in circle.cells() {
                if grid.contains(cell.row, cell.col) {
                    grid.set_barrier(cell.row, cell.col)?;
                }
            }
            circles.push(circle);
        }
        debug!(
            "placed {} obstacles covering {} cells",
            circles.len(),
            grid.count(crate::grid::CellState::Barrier)
        );
        Ok(circles)
    }

    fn place_circle<R: Rng>(&self, grid: &Grid, rng: &mut R) -> Result<Circle> {
        let size = grid.size();
        let endpoints: Vec<Position> = grid.start().into_iter().chain(grid.end()).collect();

        for attempt in 0..self.max_attempts {
            let radius = rng.gen_range(self.min_radius..=self.max_radius) as f64 + 0.5;
            let margin = (radius + 0.5).ceil() as usize;
            if 2 * margin >= size {
                continue;
            }

            let center = Position::new(
                rng.gen_range(margin..size - margin),
                rng.gen_range(margin..size - margin),
            );
            let circle = Circle::new(center, radius);
            if endpoints.iter().all(|p| circle.clears(*p)) {
                trace!(
                    "circle at {} radius {} after {} rejections",
                    center,
                    radius,
                    attempt
                );
                return Ok(circle);
            }
        }

        warn!("obstacle placement exhausted after {} attempts", self.max_attempts);
        Err(SimulationError::PlacementExhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_smallest_circle_is_one_cell() {
        let circle = Circle::new(Position::new(5, 5), 0.5);
        assert_eq!(circle.cells(), vec![Position::new(5, 5)]);
    }

    #[test]
    fn test_radius_two_and_a_half() {
        let circle = Circle::new(Position::new(5, 5), 2.5);
        let cells = circle.cells();
        assert_eq!(cells.len(), 21);
        assert!(cells.contains(&Position::new(7, 6)));
        assert!(cells.contains(&Position::new(4, 3)));
        assert!(!cells.contains(&Position::new(7, 7)));
        assert!(!cells.contains(&Position::new(8, 5)));
    }

    #[test]
    fn test_cells_stay_within_radius() {
        for k in 0..=6 {
            let circle = Circle::new(Position::new(10, 10), k as f64 + 0.5);
            for cell in circle.cells() {
                assert!(circle.distance_to(cell) <= circle.radius);
            }
        }
    }

    #[test]
    fn test_roll_count_range() {
        let generator = ObstacleGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let n = generator.roll_count(&mut rng);
            assert!((1..=12).contains(&n));
        }
    }

    #[test]
    fn test_endpoints_are_distinct() {
        let generator = ObstacleGenerator::default();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = Grid::new(4).unwrap();
            let (start, end) = generator
                .place_endpoints(&mut grid, &mut rng, None, None)
                .unwrap();
            assert_ne!(start, end);
            assert_eq!(grid.start(), Some(start));
            assert_eq!(grid.end(), Some(end));
        }
    }

    #[test]
    fn test_fixed_endpoint_is_avoided() {
        let generator = ObstacleGenerator::default();
        let fixed = Position::new(1, 0);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = Grid::new(2).unwrap();
            let (start, end) = generator
                .place_endpoints(&mut grid, &mut rng, Some(fixed), None)
                .unwrap();
            assert_eq!(start, fixed);
            assert_ne!(end, fixed);

            let mut grid = Grid::new(2).unwrap();
            let (start, end) = generator
                .place_endpoints(&mut grid, &mut rng, None, Some(fixed))
                .unwrap();
            assert_eq!(end, fixed);
            assert_ne!(start, fixed);
            assert_eq!(grid.start(), Some(start));
            assert_eq!(grid.end(), Some(end));
        }
    }

    #[test]
    fn test_shared_or_outside_endpoints_rejected() {
        let generator = ObstacleGenerator::default();
        let mut rng = StdRng::seed_from_u64(0);
        let mut grid = Grid::new(5).unwrap();
        let p = Position::new(2, 2);

        let err = generator
            .place_endpoints(&mut grid, &mut rng, Some(p), Some(p))
            .unwrap_err();
        assert!(matches!(err, SimulationError::CoincidentEndpoints(pos) if pos == p));

        let err = generator
            .place_endpoints(&mut grid, &mut rng, Some(Position::new(0, 9)), None)
            .unwrap_err();
        assert!(matches!(err, SimulationError::OutOfBounds { .. }));
        assert!(grid.start().is_none());
        assert!(grid.end().is_none());
    }

    #[test]
    fn test_obstacles_respect_clearance() {
        let generator = ObstacleGenerator::default();
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = Grid::new(50).unwrap();
            let (start, end) = generator
                .place_endpoints(&mut grid, &mut rng, None, None)
                .unwrap();
            let circles = generator.populate(&mut grid, 12, &mut rng).unwrap();

            assert_eq!(circles.len(), 12);
            assert_eq!(grid.state_at(start), CellState::Start);
            assert_eq!(grid.state_at(end), CellState::End);
            for circle in &circles {
                assert!(circle.clears(start));
                assert!(circle.clears(end));
                for cell in circle.cells() {
                    assert!(grid.contains(cell.row, cell.col));
                    assert_eq!(grid.state_at(cell), CellState::Barrier);
                    assert!(Circle::new(cell, 0.0).distance_to(start) > 1.0);
                    assert!(Circle::new(cell, 0.0).distance_to(end) > 1.0);
                }
            }
        }
    }

    #[test]
    fn test_placement_exhausted_on_cramped_grid() {
        let generator = ObstacleGenerator::new(12, 0, 6, 50);
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = Grid::new(3).unwrap();
        grid.set_start(0, 0).unwrap();
        grid.set_end(2, 2).unwrap();

        let err = generator.populate(&mut grid, 1, &mut rng).unwrap_err();
        assert!(matches!(err, SimulationError::PlacementExhausted { attempts: 50 }));
        assert_eq!(grid.count(CellState::Barrier), 0);
    }
}
