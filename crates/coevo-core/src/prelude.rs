//! Coevo Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use coevo_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    Point2, Segment,
    RobotId, IndividualId, LayerIndex,
    EvalState, Individual, Population,
    Task,
};

pub use crate::config::{EvolutionConfig, FitnessConfig, MutationConfig, SelectionScheme};
pub use crate::population::PopulationTable;

// Re-export the collaborator traits
pub use crate::robot::{CollisionGeometry, ForwardKinematics};

// Re-export spline operations
pub use crate::spline::{adjust_point_count, create_path, ferguson_spline};

// Re-export error types
pub use crate::error::{EvolutionError, Result};
