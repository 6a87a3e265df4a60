//! Per-generation statistics.
//!
//! Computed from the population table after each generation so runs can
//! be compared and plotted. Only evaluated individuals contribute to the
//! fitness figures; fresh offspring are counted in the layer sizes.

use coevo_core::population::PopulationTable;
use coevo_core::types::{Individual, RobotId};
use coevo_operators::diversity::mean_diversity;
use serde::{Deserialize, Serialize};

/// Snapshot of one arm's populations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotStats {
    pub robot: RobotId,
    pub best_fitness: Option<f64>,
    pub best_collision: Option<u32>,
    pub best_distance: Option<f64>,
    /// Mean fitness of evaluated individuals.
    pub mean_fitness: Option<f64>,
    /// Mean diversity of evaluated individuals.
    pub mean_diversity: f64,
    /// Individuals per layer, youngest first.
    pub layer_sizes: Vec<usize>,
    pub evaluated: usize,
}

/// Snapshot of both arms after a generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: u32,
    pub robots: Vec<RobotStats>,
}

impl GenerationStats {
    pub fn robot(&self, robot: RobotId) -> Option<&RobotStats> {
        self.robots.iter().find(|s| s.robot == robot)
    }
}

/// Compute statistics for one arm.
pub fn robot_stats(table: &PopulationTable, robot: RobotId) -> RobotStats {
    let evaluated: Vec<&Individual> = table.individuals(robot).filter(|ind| ind.is_evaluated()).collect();
    let best = table.best(robot).filter(|ind| ind.is_evaluated());

    let mean_fitness = if evaluated.is_empty() {
        None
    } else {
        Some(evaluated.iter().filter_map(|ind| ind.fitness()).sum::<f64>() / evaluated.len() as f64)
    };

    RobotStats {
        robot,
        best_fitness: best.and_then(|ind| ind.fitness()),
        best_collision: best.map(|ind| ind.collision),
        best_distance: best.map(|ind| ind.distance),
        mean_fitness,
        mean_diversity: mean_diversity(evaluated.iter().copied()),
        layer_sizes: table.layer_sizes(robot),
        evaluated: evaluated.len(),
    }
}

/// Compute statistics for both arms.
pub fn generation_stats(generation: u32, table: &PopulationTable) -> GenerationStats {
    GenerationStats {
        generation,
        robots: RobotId::ALL.iter().map(|&robot| robot_stats(table, robot)).collect(),
    }
}
