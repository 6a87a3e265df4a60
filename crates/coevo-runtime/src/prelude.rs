//! Coevo Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use coevo_runtime::prelude::*;
//! ```

// Re-export controller
pub use crate::controller::{Coevolution, EvolutionEvent};

// Re-export statistics and reports
pub use crate::export::{write_report, BestPath, RunReport};
pub use crate::metrics::{generation_stats, robot_stats, GenerationStats, RobotStats};

// Re-export checkpoints
pub use crate::session::{load_checkpoint, save_checkpoint, Checkpoint};

// Re-export from operators
pub use coevo_operators::prelude::*;
