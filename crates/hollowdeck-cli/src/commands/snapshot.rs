use std::fs;
use std::time::Instant;

use hollowdeck_core::{Mulberry32, PortRegistry};

/// Write a seeded registry as JSON to a file or stdout.
pub fn run(output: Option<&str>, seed: u32, include_egress: bool) {
    let mut rng = Mulberry32::new(seed);
    let registry = PortRegistry::seed(&mut rng, Instant::now());
    let snapshot = registry.list(include_egress);

    let json = match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialize snapshot: {e}");
            std::process::exit(1);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Failed to write {path}: {e}");
                std::process::exit(1);
            }
            println!("Snapshot written to {path} ({} ports)", snapshot.len());
        }
        None => println!("{json}"),
    }
}
