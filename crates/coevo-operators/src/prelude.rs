//! Coevo Operators Prelude — convenient imports for common usage.
//!
//! ```rust
//! use coevo_operators::prelude::*;
//! ```

pub use crate::fitness::{fitness_value, path_length, FitnessEvaluator};
pub use crate::diversity::{mean_diversity, pairwise_distance, update_diversity};
pub use crate::selection::{
    age_threshold_selection, elitist_selection, migrate_overaged, roulette_selection,
    sort_by_fitness, tournament_selection, AgePartition, MigrationSummary,
};
pub use crate::variation::{crossover, mut_normal, mutate, one_point_crossover, splice};

// Re-export from core
pub use coevo_core::prelude::*;
