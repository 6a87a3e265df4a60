//! # Coevo Runtime
//!
//! Drives the age-layered coevolution of two arms.
//!
//! The runtime owns the populations: `Coevolution` runs generations over a
//! `PopulationTable`, records per-generation statistics, and produces a
//! `RunReport`. Checkpoints let a long run stop and resume.

pub mod controller;
pub mod export;
pub mod metrics;
pub mod prelude;
pub mod session;
