//! # Coevo
//!
//! Coevolution of collision-free joint-space paths for two robot arms.
//!
//! Each arm owns an age-layered population of spline-encoded paths from its
//! start to its goal configuration. A path is scored against the other arm's
//! current best path: its cost is the combined path length plus a penalty
//! for every sampled instant at which the arms touch. Over generations the
//! two populations adapt to each other.
//!
//! ## Quick Start
//!
//! ```rust
//! use coevo::prelude::*;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! // Each arm is a single point at its joint configuration.
//! struct PointArm;
//!
//! impl ForwardKinematics for PointArm {
//!     fn forward_kinematics(&self, robot: RobotId, q: Point2) -> Result<Vec<Point2>> {
//!         let base = if robot == RobotId::First { -4.0 } else { 4.0 };
//!         Ok(vec![Point2::new(base, 0.0), Point2::new(base, 0.5), Point2::new(base + q.x, q.y)])
//!     }
//! }
//!
//! struct NoContact;
//!
//! impl CollisionGeometry for NoContact {
//!     fn roughly_intersect(&self, _: &Segment, _: &Segment) -> Result<bool> { Ok(false) }
//!     fn segments_intersect(&self, _: &Segment, _: &Segment) -> Result<bool> { Ok(false) }
//!     fn segment_intersects_circle(&self, _: &Segment, _: Point2, _: f64) -> Result<bool> { Ok(false) }
//! }
//!
//! let config = EvolutionConfig { n_gen: 3, n_pop: 6, ..EvolutionConfig::default() };
//! let tasks = [
//!     Task::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)),
//!     Task::new(Point2::new(1.0, 0.0), Point2::new(-1.0, 0.5)),
//! ];
//! let mut coevo = Coevolution::new(config, PointArm, NoContact, tasks).unwrap();
//! let report = coevo.run(&mut StdRng::seed_from_u64(7)).unwrap();
//!
//! for best in &report.best {
//!     println!("{}: fitness {:.3}", best.robot, best.fitness);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`coevo_core`] - shared types, configuration, collaborator traits, splines
//! - [`coevo_operators`] - fitness, diversity, selection, crossover, mutation
//! - [`coevo_runtime`] - the generation loop, statistics, reports, checkpoints
//!
//! ## Age Layers
//!
//! | Layer | Default age ceiling |
//! |-------|---------------------|
//! | 0 | 3 |
//! | 1 | 6 |
//! | 2 | 12 |
//! | 3 | 24 |
//! | 4 | 48 |
//!
//! Every evaluation ages an individual by one. Individuals past their
//! layer's ceiling move up one layer, and past the last ceiling they are
//! dropped. Every `age_gap` generations layer 0 is handed up and reseeded
//! with random paths.
//!
//! Kinematics and collision predicates are supplied by the caller through
//! [`ForwardKinematics`](coevo_core::robot::ForwardKinematics) and
//! [`CollisionGeometry`](coevo_core::robot::CollisionGeometry).

// Re-export all subcrates
pub use coevo_core as core;
pub use coevo_operators as operators;
pub use coevo_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use coevo::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use coevo_core::types::{
        EvalState, Individual, IndividualId, LayerIndex, Point2, Population, RobotId, Segment, Task,
    };
    pub use coevo_core::population::PopulationTable;

    // Configuration
    pub use coevo_core::config::{EvolutionConfig, FitnessConfig, MutationConfig, SelectionScheme};

    // Collaborator traits
    pub use coevo_core::robot::{CollisionGeometry, ForwardKinematics};

    // Error types
    pub use coevo_core::error::{EvolutionError, Result};

    // Splines
    pub use coevo_core::spline::{adjust_point_count, create_path, ferguson_spline};

    // Operators
    pub use coevo_operators::fitness::{fitness_value, path_length, FitnessEvaluator};
    pub use coevo_operators::selection::{
        elitist_selection, migrate_overaged, roulette_selection, tournament_selection,
    };
    pub use coevo_operators::variation::{crossover, mut_normal, mutate, one_point_crossover};

    // Runtime
    pub use coevo_runtime::controller::{Coevolution, EvolutionEvent};
    pub use coevo_runtime::export::{write_report, BestPath, RunReport};
    pub use coevo_runtime::metrics::{GenerationStats, RobotStats};
    pub use coevo_runtime::session::{load_checkpoint, save_checkpoint, Checkpoint};
}
