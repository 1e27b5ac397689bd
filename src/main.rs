use clap::Parser;

use astar_simulation::batch_simulation::BatchSimulation;
use astar_simulation::config::Config;
use astar_simulation::simulation::Simulation;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    if !config.quiet {
        println!("Starting A* simulation...");
        println!("Grid size: {}x{}", config.grid_size, config.grid_size);
        println!(
            "Heuristic: {:?}, Open set: {:?}",
            config.heuristic, config.open_set
        );
        if config.no_visualization || config.runs > 1 {
            println!("Visualization disabled - running in fast mode");
        } else {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
        }
        println!();
    }

    if config.runs > 1 {
        let mut batch = BatchSimulation::new(config.clone());
        match batch.run() {
            Ok(()) => {
                if !config.quiet {
                    batch.print_summary();
                }
            }
            Err(e) => {
                eprintln!("Batch simulation failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut simulation = match Simulation::new(config) {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("Failed to create simulation: {}", e);
            eprintln!("Try lowering --max-radius or --obstacles, or use a larger --grid-size");
            std::process::exit(1);
        }
    };

    match simulation.run() {
        Ok(report) => {
            println!("\n=== FINAL RESULTS ===");
            println!("{}", report.statistics);
        }
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}
