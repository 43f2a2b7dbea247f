use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

use cellular_core::prelude::*;

const RULE_110_CONFIG: &str = r#"{
    "rule": { "kind": "wolfram", "rule": 110 },
    "neighborhood": { "kind": "offsets", "offsets": ["x-1", "x+1"] },
    "density": 0.5,
    "rng_seed": 110,
    "shape": { "x": 4096 }
}"#;

const LIFE_CONFIG: &str = r#"{
    "rule": { "kind": "descriptor", "descriptor": "B3/S2,3" },
    "density": 0.35,
    "rng_seed": 1,
    "shape": { "x": 256, "y": 256 }
}"#;

const CUBIC_CONFIG: &str = r#"{
    "rule": { "kind": "lifelike", "survive": [4, 5], "born": [5] },
    "neighborhood": { "kind": "lattice", "topology": "cubic" },
    "density": 0.2,
    "rng_seed": 3,
    "shape": { "x": 32, "y": 32, "z": 32 }
}"#;

const TRIANGULAR_CONFIG: &str = r#"{
    "rule": { "kind": "descriptor", "descriptor": "B4,5S4,5,6" },
    "neighborhood": { "kind": "lattice", "topology": "triangular", "radius": 2 },
    "density": 0.3,
    "rng_seed": 4,
    "shape": { "x": 128, "y": 128 }
}"#;

/// Runs a session configured from a JSON file given on the command line, or a
/// few canned sessions otherwise.
pub fn main() -> Result<()> {
    simple_logger::SimpleLogger::new().init()?;

    if let Some(path) = std::env::args().nth(1) {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("unable to read config file {:?}", path))?;
        return run(&path, &json, 100);
    }

    run("Rule 110", RULE_110_CONFIG, 1000)?;
    run("Conway's Game of Life", LIFE_CONFIG, 200)?;
    run("3D Life (4555)", CUBIC_CONFIG, 20)?;
    run("Triangular (radius 2)", TRIANGULAR_CONFIG, 50)?;
    Ok(())
}

fn run(name: &str, config_json: &str, gens: usize) -> Result<()> {
    let config: SessionConfig =
        serde_json::from_str(config_json).with_context(|| format!("bad config for {}", name))?;
    let mut session = Session::from_config(&config)?;
    if session.current_population().is_none() {
        anyhow::bail!("config for {} has no shape", name);
    }

    info!(
        "Running {} with rule {} for {} gens ...",
        name,
        session.rule(),
        gens,
    );

    let start = Instant::now();
    let mut live_count = 0;
    for _ in 0..gens {
        live_count = session.step()?.live_count();
    }
    let end = Instant::now();

    info!(
        "{} live cells; {:?} over the last {} gens",
        live_count,
        session.check_stability(config.history_capacity),
        session.total_generations(),
    );
    info!("Took {:.3?}", end - start);
    Ok(())
}
