//! # Coevo Core
//!
//! Core types and geometry for coevolving joint-space trajectories of two
//! robot arms that share a workspace.
//!
//! This crate defines what the rest of the workspace builds on:
//!
//! - **Genotype model**: `Individual`, `Population`, and the age-layered
//!   `PopulationTable` keyed by `(RobotId, LayerIndex)`
//! - **PathSpline**: Ferguson/Hermite spline expansion, periodic goal
//!   selection, and waypoint-count restoration
//! - **Collaborators**: `ForwardKinematics` and `CollisionGeometry` traits
//!   the evaluator calls instead of computing geometry itself
//! - **Configuration**: `EvolutionConfig` with validated defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use coevo_core::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let path = create_path(Point2::new(0.0, 0.0), Point2::new(1.0, 2.0), 3, &mut rng).unwrap();
//! assert_eq!(path.len(), 7);
//! ```

pub mod types;
pub mod error;
pub mod config;
pub mod robot;
pub mod spline;
pub mod population;
pub mod prelude;
