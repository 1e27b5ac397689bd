//! Grid pathfinding simulation: circular obstacle generation and a
//! best-first A* search with step-by-step observation.

pub mod algorithms;
pub mod batch_simulation;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod simulation;
pub mod statistics;

pub use algorithms::a_star::{AStar, OpenSetPolicy};
pub use algorithms::common::{NoopObserver, Path, SearchOutcome, StepObserver};
pub use algorithms::heuristic::Heuristic;
pub use error::{Result, SimulationError};
pub use grid::{CellState, Grid, Position};
