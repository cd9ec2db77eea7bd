use hollowdeck_core::{DriftStore, FileDriftStore, DRIFT_MAX};

/// Print the persisted drift scalar, optionally raising it first.
pub fn run(file: &str, bump: Option<f64>) {
    let mut store = FileDriftStore::new(file);
    let current = store.load().unwrap_or(0.0);

    match bump {
        Some(delta) => {
            if !delta.is_finite() || delta < 0.0 {
                eprintln!("Bump must be a non-negative number");
                std::process::exit(1);
            }
            let raised = (current + delta).clamp(0.0, DRIFT_MAX);
            if let Err(e) = store.store(raised) {
                eprintln!("Failed to write {file}: {e}");
                std::process::exit(1);
            }
            println!("{current:.4} -> {raised:.4}");
        }
        None => println!("{current:.4}"),
    }
}
