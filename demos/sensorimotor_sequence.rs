//! Sensorimotor sequence learning on a one-dimensional world
//! -----------------------------------------------------------------
//! world:   [ A  B  C  D  E  F ]   one feature per position
//!
//! step 1:  an agent stands on a position and senses its feature (feed-forward columns)
//!         │
//! step 2:  it decides on a move (left / right) which is fed as external (motor) input
//!         │
//! step 3:  the Sensorimotor Temporal Memory predicts the feature it will sense next
//!         │
//!          loop 1. to 3. for a random walk, reset between episodes
//!
//! After training, random walks that were never seen should be predicted from
//! the combination of the current feature and the motor command alone.
//! -----------------------------------------------------------------
//!
//! Run: cargo run --example sensorimotor_sequence [-- params.json]

use anyhow::{Context, Result};
use htm_sensorimotor::core::{
    monitor::StepTrace, sensorimotor::SensorimotorTemporalMemory,
    temporal_memory::TemporalMemoryParams, Cell, Column,
};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{env, fs};

const WORLD: [usize; 6] = [0, 1, 2, 3, 4, 5];
const COLUMNS_PER_FEATURE: usize = 8;
const CELLS_PER_MOTOR: usize = 8;
const TRAIN_EPISODES: usize = 60;
const TEST_EPISODES: usize = 10;
const STEPS_PER_EPISODE: usize = 12;

fn default_params() -> TemporalMemoryParams {
    TemporalMemoryParams {
        column_dimensions: vec![WORLD.len() * COLUMNS_PER_FEATURE],
        cells_per_column: 8,
        activation_threshold: 6,
        min_threshold: 4,
        max_new_synapse_count: 12,
        initial_permanence: 0.5,
        connected_permanence: 0.6,
        permanence_increment: 0.1,
        permanence_decrement: 0.02,
        ..Default::default()
    }
}

fn load_params() -> Result<TemporalMemoryParams> {
    match env::args().nth(1) {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config {}", path))?;
            serde_json::from_str(&raw).with_context(|| format!("invalid config {}", path))
        }
        None => Ok(default_params()),
    }
}

fn feature_columns(feature: usize) -> Vec<Column> {
    (feature * COLUMNS_PER_FEATURE..(feature + 1) * COLUMNS_PER_FEATURE).collect()
}

/// Motor command `-1` maps to the first block of external cells, `+1` to the second.
fn motor_cells(delta: isize) -> Vec<Cell> {
    let block = if delta < 0 { 0 } else { 1 };
    (block * CELLS_PER_MOTOR..(block + 1) * CELLS_PER_MOTOR).collect()
}

/// Runs one random walk and records the layer's diagnostics after every step.
fn run_episode(
    layer: &mut SensorimotorTemporalMemory,
    rng: &mut StdRng,
    trace: &mut StepTrace,
    learn: bool,
) -> Result<()> {
    layer.reset();
    let mut position = rng.random_range(0..WORLD.len());

    for _ in 0..STEPS_PER_EPISODE {
        let step_right = rng.random_bool(0.5);
        let delta: isize = match position {
            0 => 1,
            p if p == WORLD.len() - 1 => -1,
            _ if step_right => 1,
            _ => -1,
        };

        let columns = feature_columns(WORLD[position]);
        let motor = motor_cells(delta);
        layer.compute(&columns, Some(motor.as_slice()), true, learn)?;
        trace.record(layer);

        position = (position as isize + delta) as usize;
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let params = load_params()?;
    info!("Using parameters: {:?}", params);

    let mut layer = SensorimotorTemporalMemory::new(params, true)?;
    let mut rng = StdRng::seed_from_u64(7);
    let mut trace = StepTrace::new();

    for episode in 0..TRAIN_EPISODES {
        run_episode(&mut layer, &mut rng, &mut trace, true)?;

        if (episode + 1) % 20 == 0 {
            let summary = trace.summary();
            info!(
                "Episodes {}-{}: mean anomaly {:.3}",
                episode + 2 - 20,
                episode + 1,
                summary.anomaly_score.map_or(0.0, |metric| metric.mean)
            );
            trace.clear();
        }
    }

    trace.clear();
    for _ in 0..TEST_EPISODES {
        run_episode(&mut layer, &mut rng, &mut trace, false)?;
    }

    let connections = layer.temporal_memory().connections();
    println!(
        "Learned {} segments with {} synapses",
        connections.num_segments(),
        connections.num_synapses()
    );
    println!("{}", serde_json::to_string_pretty(&trace.summary())?);

    Ok(())
}
