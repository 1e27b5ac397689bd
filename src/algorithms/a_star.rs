use crate::algorithms::common::{SearchOutcome, StepObserver};
use crate::algorithms::heuristic::Heuristic;
use crate::algorithms::reconstruct::{reconstruct, CameFrom};
use crate::error::{Result, SimulationError};
use crate::grid::{CellState, Grid, Position};
use clap::ValueEnum;
use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// How the open set treats a cell whose score improves while it is queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OpenSetPolicy {
    /// A queued cell is never pushed again; its queue key may go stale.
    #[default]
    SinglePush,
    /// Every improvement pushes a fresh entry; outdated ones are skipped on pop.
    LazyReinsert,
}

/// Counters from the most recent search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub iterations: usize,
    pub pushed: usize,
    pub closed: usize,
    pub stale_skipped: usize,
}

/// Queue key. `seq` breaks `f` ties in first-discovered order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    f: u32,
    seq: u64,
    pos: Position,
}

/// Per-search bookkeeping, dropped when the search returns.
struct SearchState {
    g_score: FxHashMap<Position, u32>,
    f_score: FxHashMap<Position, u32>,
    came_from: CameFrom,
    open_set: BinaryHeap<Reverse<QueueEntry>>,
    open_membership: FxHashSet<Position>,
    counter: u64,
}

impl SearchState {
    fn new() -> Self {
        SearchState {
            g_score: FxHashMap::default(),
            f_score: FxHashMap::default(),
            came_from: CameFrom::default(),
            open_set: BinaryHeap::new(),
            open_membership: FxHashSet::default(),
            counter: 0,
        }
    }

    fn g(&self, pos: Position) -> u32 {
        self.g_score.get(&pos).copied().unwrap_or(u32::MAX)
    }

    fn f(&self, pos: Position) -> u32 {
        self.f_score.get(&pos).copied().unwrap_or(u32::MAX)
    }

    fn push(&mut self, pos: Position, f: u32) {
        self.open_set.push(Reverse(QueueEntry {
            f,
            seq: self.counter,
            pos,
        }));
        self.counter += 1;
        self.open_membership.insert(pos);
    }
}

/// Best-first grid search over the adjacency cached in [`Grid`].
///
/// Moves cost 1 in all 8 directions. Cells move Empty -> Open -> Closed as
/// the search runs; start and end keep their markers.
#[derive(Debug, Clone, Default)]
pub struct AStar {
    heuristic: Heuristic,
    policy: OpenSetPolicy,
    stats: SearchStats,
}

impl AStar {
    pub fn new(heuristic: Heuristic, policy: OpenSetPolicy) -> Self {
        AStar {
            heuristic,
            policy,
            stats: SearchStats::default(),
        }
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn policy(&self) -> OpenSetPolicy {
        self.policy
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Search between the grid's own start and end cells.
    pub fn search_grid<O: StepObserver + ?Sized>(
        &mut self,
        grid: &mut Grid,
        observer: &mut O,
    ) -> Result<SearchOutcome> {
        let start = grid.start().ok_or(SimulationError::MissingEndpoint("start"))?;
        let end = grid.end().ok_or(SimulationError::MissingEndpoint("end"))?;
        self.search(grid, start, end, observer)
    }

    /// Run one search from `start` to `end`.
    ///
    /// Reads neighbours from the cached adjacency, so callers must run
    /// [`Grid::refresh_adjacency`] after any barrier edit. Reaching the end of
    /// the open set without finding `end` yields [`SearchOutcome::NoPath`].
    pub fn search<O: StepObserver + ?Sized>(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        observer: &mut O,
    ) -> Result<SearchOutcome> {
        for pos in [start, end] {
            if !grid.contains(pos.row, pos.col) {
                return Err(SimulationError::OutOfBounds {
                    row: pos.row,
                    col: pos.col,
                    size: grid.size(),
                });
            }
        }
        if grid.is_adjacency_stale() {
            warn!("searching with stale adjacency; call refresh_adjacency after barrier edits");
        }

        self.stats = SearchStats::default();
        let mut state = SearchState::new();
        state.g_score.insert(start, 0);
        let start_f = self.heuristic.estimate(start, end);
        state.f_score.insert(start, start_f);
        state.push(start, start_f);
        self.stats.pushed += 1;

        let mut neighbors = Vec::with_capacity(8);

        loop {
            if observer.should_stop() {
                debug!("search cancelled after {} iterations", self.stats.iterations);
                return Ok(SearchOutcome::Cancelled);
            }

            let Some(Reverse(entry)) = state.open_set.pop() else {
                break;
            };
            let current = entry.pos;

            if self.policy == OpenSetPolicy::LazyReinsert && entry.f != state.f(current) {
                self.stats.stale_skipped += 1;
                continue;
            }
            state.open_membership.remove(&current);

            if current == end {
                let path = reconstruct(&state.came_from, end, grid, observer);
                debug!(
                    "path found: {} steps, {} iterations, {} pushes",
                    path.steps(),
                    self.stats.iterations,
                    self.stats.pushed
                );
                return Ok(SearchOutcome::Found(path));
            }

            neighbors.clear();
            neighbors.extend_from_slice(grid.adjacency(current));

            let tentative_g = state.g(current).saturating_add(1);
            for &neighbor in &neighbors {
                if tentative_g >= state.g(neighbor) {
                    continue;
                }

                state.came_from.insert(neighbor, current);
                state.g_score.insert(neighbor, tentative_g);
                let f = tentative_g.saturating_add(self.heuristic.estimate(neighbor, end));
                state.f_score.insert(neighbor, f);

                let queued = state.open_membership.contains(&neighbor);
                match self.policy {
                    OpenSetPolicy::SinglePush if queued => {}
                    _ => {
                        state.push(neighbor, f);
                        self.stats.pushed += 1;
                        grid.mark(neighbor, CellState::Open);
                    }
                }
            }

            observer.on_step(grid);
            self.stats.iterations += 1;

            if current != start {
                grid.mark(current, CellState::Closed);
                self.stats.closed += 1;
            }
        }

        debug!(
            "no path from {} to {} after {} iterations",
            start, end, self.stats.iterations
        );
        Ok(SearchOutcome::NoPath)
    }
}
