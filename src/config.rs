use crate::algorithms::a_star::OpenSetPolicy;
use crate::algorithms::heuristic::Heuristic;
use crate::grid::Position;
use clap::builder::RangedU64ValueParser;
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 50)]
    pub grid_size: usize,

    /// Seed for obstacle and endpoint placement; entropy when absent.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fixed obstacle count in 1..=max-obstacles. Rolled in that range when absent.
    #[arg(long, value_parser = at_least_one())]
    pub obstacles: Option<usize>,

    #[arg(long, default_value_t = 12, value_parser = at_least_one())]
    pub max_obstacles: usize,

    #[arg(long, default_value_t = 0)]
    pub min_radius: u32,

    #[arg(long, default_value_t = 6)]
    pub max_radius: u32,

    #[arg(long, default_value_t = 1000)]
    pub max_placement_attempts: usize,

    #[arg(long, value_enum, default_value_t = Heuristic::Manhattan)]
    pub heuristic: Heuristic,

    #[arg(long, value_enum, default_value_t = OpenSetPolicy::SinglePush)]
    pub open_set: OpenSetPolicy,

    /// Start cell as ROW,COL instead of a random one.
    #[arg(long, value_parser = parse_position)]
    pub start: Option<Position>,

    /// End cell as ROW,COL instead of a random one.
    #[arg(long, value_parser = parse_position)]
    pub end: Option<Position>,

    /// Stop the search after this many iterations.
    #[arg(long)]
    pub max_iterations: Option<usize>,

    #[arg(long, default_value_t = 20)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Number of seeded grids; more than one switches to batch comparison.
    #[arg(long, default_value_t = 1)]
    pub runs: usize,

    /// CSV file for batch results.
    #[arg(long)]
    pub output_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["astar_simulation"])
    }
}

fn at_least_one() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

fn parse_position(value: &str) -> Result<Position, String> {
    let (row, col) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{}'", value))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("invalid row '{}': {}", row, e))?;
    let col = col
        .trim()
        .parse()
        .map_err(|e| format!("invalid column '{}': {}", col, e))?;
    Ok(Position::new(row, col))
}
