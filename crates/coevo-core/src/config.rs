//! Evolution parameters.
//!
//! Passed by value into the controller and by reference into operators.
//! Every field has a serde default so partial TOML files load cleanly.

use crate::error::{EvolutionError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Parent selection scheme used to refill each layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionScheme {
    #[default]
    Tournament,
    Roulette,
}

/// Top-level evolution configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of generations.
    #[serde(default = "default_n_gen")]
    pub n_gen: u32,
    /// Nominal individuals per layer.
    #[serde(default = "default_n_pop")]
    pub n_pop: usize,
    /// Spline samples per control segment; a genotype has `2 * n_spline + 1` waypoints.
    #[serde(default = "default_n_spline")]
    pub n_spline: usize,
    /// Joints per arm; kinematics must return `n_joint + 1` chain points.
    #[serde(default = "default_n_joint")]
    pub n_joint: usize,
    #[serde(default = "default_n_elites")]
    pub n_elites: usize,
    #[serde(default = "default_n_tournament")]
    pub n_tournament: usize,
    /// Per-individual mutation probability.
    #[serde(default = "default_p_mut")]
    pub p_mut: f64,
    /// Generations between reseeds of the youngest layer.
    #[serde(default = "default_age_gap")]
    pub age_gap: u32,
    /// Age ceiling per layer, youngest first.
    #[serde(default = "default_max_age")]
    pub max_age: Vec<u32>,
    #[serde(default)]
    pub selection: SelectionScheme,
    /// RNG seed; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub fitness: FitnessConfig,
    #[serde(default)]
    pub mutation: MutationConfig,
}

/// Cost model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessConfig {
    /// Cost added per colliding instant.
    #[serde(default = "default_collision_penalty")]
    pub collision_penalty: f64,
    /// Link/joint clearance used by the line-circle checks.
    #[serde(default = "default_clearance_radius")]
    pub clearance_radius: f64,
    /// Spline samples per segment when densifying paths for collision checks.
    #[serde(default = "default_collision_samples")]
    pub collision_samples: usize,
    /// Radius within which a crossover partner waypoint is accepted.
    #[serde(default = "default_cx_radius")]
    pub cx_radius: f64,
}

/// Bounded-perturbation mutation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability that a waypoint is perturbed.
    #[serde(default = "default_point_rate")]
    pub point_rate: f64,
    /// Half-width of the uniform offset added per coordinate.
    #[serde(default = "default_step")]
    pub step: f64,
}

// Default value functions
fn default_n_gen() -> u32 { 10 }
fn default_n_pop() -> usize { 30 }
fn default_n_spline() -> usize { 3 }
fn default_n_joint() -> usize { 2 }
fn default_n_elites() -> usize { 1 }
fn default_n_tournament() -> usize { 3 }
fn default_p_mut() -> f64 { 0.3 }
fn default_age_gap() -> u32 { 3 }
fn default_max_age() -> Vec<u32> { vec![3, 6, 12, 24, 48] }
fn default_collision_penalty() -> f64 { 100.0 }
fn default_clearance_radius() -> f64 { 0.1 }
fn default_collision_samples() -> usize { 10 }
fn default_cx_radius() -> f64 { PI / 10.0 }
fn default_point_rate() -> f64 { 0.3 }
fn default_step() -> f64 { 0.1 }

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            n_gen: default_n_gen(),
            n_pop: default_n_pop(),
            n_spline: default_n_spline(),
            n_joint: default_n_joint(),
            n_elites: default_n_elites(),
            n_tournament: default_n_tournament(),
            p_mut: default_p_mut(),
            age_gap: default_age_gap(),
            max_age: default_max_age(),
            selection: SelectionScheme::default(),
            seed: None,
            fitness: FitnessConfig::default(),
            mutation: MutationConfig::default(),
        }
    }
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            collision_penalty: default_collision_penalty(),
            clearance_radius: default_clearance_radius(),
            collision_samples: default_collision_samples(),
            cx_radius: default_cx_radius(),
        }
    }
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            point_rate: default_point_rate(),
            step: default_step(),
        }
    }
}

impl EvolutionConfig {
    /// Waypoints per genotype.
    pub fn n_pts(&self) -> usize {
        2 * self.n_spline + 1
    }

    /// Number of age layers.
    pub fn n_layers(&self) -> usize {
        self.max_age.len()
    }

    /// Reject values the operators cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.n_pop < 2 {
            return Err(EvolutionError::invalid_config("n_pop", self.n_pop, "must be at least 2"));
        }
        if self.n_elites > self.n_pop {
            return Err(EvolutionError::invalid_config(
                "n_elites",
                self.n_elites,
                format!("must not exceed n_pop ({})", self.n_pop),
            ));
        }
        if self.n_tournament == 0 {
            return Err(EvolutionError::invalid_config("n_tournament", 0, "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.p_mut) {
            return Err(EvolutionError::invalid_config("p_mut", self.p_mut, "must be within 0.0-1.0"));
        }
        if self.n_spline == 0 {
            return Err(EvolutionError::invalid_config("n_spline", 0, "must be at least 1"));
        }
        if self.n_joint == 0 {
            return Err(EvolutionError::invalid_config("n_joint", 0, "must be at least 1"));
        }
        if self.age_gap == 0 {
            return Err(EvolutionError::invalid_config("age_gap", 0, "must be at least 1"));
        }
        if self.max_age.is_empty() {
            return Err(EvolutionError::invalid_config("max_age", "[]", "needs at least one layer"));
        }
        if self.max_age.windows(2).any(|w| w[0] >= w[1]) {
            return Err(EvolutionError::invalid_config(
                "max_age",
                format!("{:?}", self.max_age),
                "ceilings must be strictly increasing",
            ));
        }
        if !(self.fitness.collision_penalty > 0.0) {
            return Err(EvolutionError::invalid_config(
                "fitness.collision_penalty",
                self.fitness.collision_penalty,
                "must be positive",
            ));
        }
        if !(self.fitness.clearance_radius > 0.0) {
            return Err(EvolutionError::invalid_config(
                "fitness.clearance_radius",
                self.fitness.clearance_radius,
                "must be positive",
            ));
        }
        if self.fitness.collision_samples == 0 {
            return Err(EvolutionError::invalid_config("fitness.collision_samples", 0, "must be at least 1"));
        }
        if !(self.fitness.cx_radius > 0.0) {
            return Err(EvolutionError::invalid_config("fitness.cx_radius", self.fitness.cx_radius, "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.mutation.point_rate) {
            return Err(EvolutionError::invalid_config(
                "mutation.point_rate",
                self.mutation.point_rate,
                "must be within 0.0-1.0",
            ));
        }
        if !(self.mutation.step >= 0.0) {
            return Err(EvolutionError::invalid_config("mutation.step", self.mutation.step, "must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_parameters() {
        let config = EvolutionConfig::default();
        assert_eq!(config.n_pts(), 7);
        assert_eq!(config.n_layers(), 5);
        assert_eq!(config.max_age, vec![3, 6, 12, 24, 48]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_elites_above_population() {
        let config = EvolutionConfig {
            n_pop: 4,
            n_elites: 5,
            ..EvolutionConfig::default()
        };
        assert!(matches!(config.validate(), Err(EvolutionError::Config { ref field, .. }) if field == "n_elites"));
    }

    #[test]
    fn rejects_non_increasing_ceilings() {
        let config = EvolutionConfig {
            max_age: vec![3, 3, 12],
            ..EvolutionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EvolutionConfig =
            serde_json::from_str(r#"{"n_pop": 12, "selection": "roulette"}"#).unwrap();
        assert_eq!(config.n_pop, 12);
        assert_eq!(config.selection, SelectionScheme::Roulette);
        assert_eq!(config.n_gen, 10);
        assert_eq!(config.fitness.collision_samples, 10);
    }
}
