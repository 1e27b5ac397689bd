//! Error types for the simulation core

use crate::grid::Position;
use thiserror::Error;

/// Errors surfaced by grid edits, obstacle generation and batch output.
///
/// A search that cannot reach the end is not an error; see
/// [`SearchOutcome::NoPath`](crate::algorithms::common::SearchOutcome::NoPath).
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("could not place obstacle or endpoint after {attempts} attempts")]
    PlacementExhausted { attempts: usize },

    #[error("start and end cannot share cell {0}")]
    CoincidentEndpoints(Position),

    #[error("obstacle count {count} is outside 1..={max}")]
    InvalidObstacleCount { count: usize, max: usize },

    #[error("grid size must be at least 2, got {0}")]
    InvalidGridSize(usize),

    #[error("search requires a {0} cell")]
    MissingEndpoint(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
