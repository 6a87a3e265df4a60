//! # Coevo Operators
//!
//! The genetic operators of the coevolutionary path planner. Each works on
//! one owned population batch at a time, with randomness passed in:
//!
//! - **Fitness**: path length plus a collision penalty against the other
//!   arm's current best path
//! - **Diversity**: mean waypoint-wise distance within a population
//! - **Selection**: elitist, tournament, roulette, and age-threshold
//!   selection with layer migration
//! - **Variation**: geometric one-point crossover and bounded mutation

pub mod fitness;
pub mod diversity;
pub mod selection;
pub mod variation;
pub mod prelude;
