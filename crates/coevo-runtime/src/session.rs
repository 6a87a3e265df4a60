//! Save and resume a run.
//!
//! A checkpoint holds the configuration, tasks, generation counter, full
//! population table and statistics history as JSON. The random number
//! generator is not part of it: a resumed run draws from whatever RNG the
//! caller supplies.

use crate::metrics::GenerationStats;
use coevo_core::config::EvolutionConfig;
use coevo_core::error::Result;
use coevo_core::population::PopulationTable;
use coevo_core::types::Task;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Serializable controller state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub config: EvolutionConfig,
    pub tasks: [Task; 2],
    pub generation: u32,
    pub table: PopulationTable,
    #[serde(default)]
    pub history: Vec<GenerationStats>,
}

/// Write a checkpoint as pretty JSON, creating parent directories.
pub fn save_checkpoint(checkpoint: &Checkpoint, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(checkpoint)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    debug!("saved checkpoint at generation {} to {}", checkpoint.generation, path.display());
    Ok(())
}

/// Load a checkpoint written by `save_checkpoint`.
pub fn load_checkpoint(path: &Path) -> Result<Checkpoint> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coevo_core::types::{EvalState, Individual, LayerIndex, Point2, RobotId};

    #[test]
    fn checkpoint_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("checkpoint.json");

        let mut table = PopulationTable::new(vec![3, 6]);
        let mut ind = Individual::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 2.0)], RobotId::Second, &mut rand::rng());
        ind.eval = EvalState::Evaluated { fitness: 2.5 };
        ind.age = 4;
        table.replace(RobotId::Second, LayerIndex(1), vec![ind]).unwrap();

        let checkpoint = Checkpoint {
            config: EvolutionConfig::default(),
            tasks: [Task::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)); 2],
            generation: 7,
            table,
            history: Vec::new(),
        };
        save_checkpoint(&checkpoint, &path).unwrap();
        let loaded = load_checkpoint(&path).unwrap();
        assert_eq!(loaded, checkpoint);
    }

    #[test]
    fn missing_checkpoint_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_checkpoint(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, coevo_core::error::EvolutionError::Io(_)));
    }
}
