//! Run reports: best paths and statistics history as JSON.

use crate::metrics::GenerationStats;
use coevo_core::config::EvolutionConfig;
use coevo_core::error::Result;
use coevo_core::types::{Individual, IndividualId, Point2, RobotId, Task};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An evaluated best path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPath {
    pub robot: RobotId,
    pub id: IndividualId,
    pub fitness: f64,
    pub collision: u32,
    pub distance: f64,
    pub age: u32,
    pub waypoints: Vec<Point2>,
}

impl BestPath {
    /// `None` for an unevaluated individual.
    pub fn from_individual(ind: &Individual) -> Option<Self> {
        Some(Self {
            robot: ind.robot,
            id: ind.id,
            fitness: ind.fitness()?,
            collision: ind.collision,
            distance: ind.distance,
            age: ind.age,
            waypoints: ind.path.clone(),
        })
    }

    pub fn is_collision_free(&self) -> bool {
        self.collision == 0
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub config: EvolutionConfig,
    pub tasks: Vec<Task>,
    pub generations: u32,
    pub history: Vec<GenerationStats>,
    pub best: Vec<BestPath>,
}

impl RunReport {
    pub fn best_for(&self, robot: RobotId) -> Option<&BestPath> {
        self.best.iter().find(|b| b.robot == robot)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write `report` as pretty JSON, creating parent directories.
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = report.to_json()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    Ok(())
}
