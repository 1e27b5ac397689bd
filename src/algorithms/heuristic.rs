use crate::grid::Position;
use clap::ValueEnum;

/// Remaining-cost estimate between two cells.
///
/// Every step costs 1 whether it is orthogonal or diagonal, so `Manhattan`
/// can overestimate along diagonal routes and is not admissible here.
/// `Chebyshev` is the exact obstacle-free distance under that cost model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Heuristic {
    #[default]
    Manhattan,
    Chebyshev,
}

impl Heuristic {
    pub fn estimate(self, a: Position, b: Position) -> u32 {
        let dr = a.row.abs_diff(b.row) as u32;
        let dc = a.col.abs_diff(b.col) as u32;
        match self {
            Heuristic::Manhattan => dr + dc,
            Heuristic::Chebyshev => dr.max(dc),
        }
    }

    pub fn is_admissible(self) -> bool {
        matches!(self, Heuristic::Chebyshev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric() {
        for h in [Heuristic::Manhattan, Heuristic::Chebyshev] {
            for (a, b) in [((0, 0), (3, 7)), ((9, 2), (4, 4)), ((5, 5), (5, 5))] {
                let a = Position::new(a.0, a.1);
                let b = Position::new(b.0, b.1);
                assert_eq!(h.estimate(a, b), h.estimate(b, a));
            }
        }
    }

    #[test]
    fn test_manhattan_overestimates_diagonal() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 3);
        assert_eq!(Heuristic::Manhattan.estimate(a, b), 6);
        assert_eq!(Heuristic::Chebyshev.estimate(a, b), 3);
        assert!(!Heuristic::Manhattan.is_admissible());
    }

    #[test]
    fn test_straight_line_agrees() {
        let a = Position::new(2, 0);
        let b = Position::new(2, 5);
        assert_eq!(Heuristic::Manhattan.estimate(a, b), 5);
        assert_eq!(Heuristic::Chebyshev.estimate(a, b), 5);
    }
}
