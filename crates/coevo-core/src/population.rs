//! Age-layered population storage for both arms.
//!
//! Each arm owns one population per age layer. Layers are addressed by
//! `(RobotId, LayerIndex)` rather than by parallel arrays.

use crate::error::{EvolutionError, Result};
use crate::types::{Individual, LayerIndex, Population, RobotId};
use serde::{Deserialize, Serialize};

/// Populations for both arms across all age layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationTable {
    /// Age ceiling per layer, youngest first.
    ceilings: Vec<u32>,
    /// `layers[robot.index()][layer]`.
    layers: [Vec<Population>; 2],
}

impl PopulationTable {
    /// Empty layers for both arms with the given age ceilings.
    pub fn new(ceilings: Vec<u32>) -> Self {
        let n = ceilings.len();
        Self {
            layers: [vec![Vec::new(); n], vec![Vec::new(); n]],
            ceilings,
        }
    }

    pub fn n_layers(&self) -> usize {
        self.ceilings.len()
    }

    pub fn layer_indices(&self) -> impl Iterator<Item = LayerIndex> {
        (0..self.ceilings.len()).map(LayerIndex)
    }

    /// Age ceiling of `layer`.
    pub fn ceiling(&self, layer: LayerIndex) -> Option<u32> {
        self.ceilings.get(layer.0).copied()
    }

    pub fn ceilings(&self) -> &[u32] {
        &self.ceilings
    }

    /// The next-older layer, if `layer` is not the last one.
    pub fn next_layer(&self, layer: LayerIndex) -> Option<LayerIndex> {
        let next = layer.next();
        (next.0 < self.ceilings.len()).then_some(next)
    }

    pub fn get(&self, robot: RobotId, layer: LayerIndex) -> Result<&Population> {
        self.layers[robot.index()]
            .get(layer.0)
            .ok_or_else(|| missing_layer(robot, layer))
    }

    pub fn get_mut(&mut self, robot: RobotId, layer: LayerIndex) -> Result<&mut Population> {
        self.layers[robot.index()]
            .get_mut(layer.0)
            .ok_or_else(|| missing_layer(robot, layer))
    }

    /// Replace a layer's population, returning the previous one.
    pub fn replace(&mut self, robot: RobotId, layer: LayerIndex, population: Population) -> Result<Population> {
        let slot = self.get_mut(robot, layer)?;
        Ok(std::mem::replace(slot, population))
    }

    /// Take a layer's population out, leaving it empty.
    pub fn take(&mut self, robot: RobotId, layer: LayerIndex) -> Result<Population> {
        self.replace(robot, layer, Vec::new())
    }

    /// All layers of one arm, youngest first.
    pub fn layers(&self, robot: RobotId) -> &[Population] {
        &self.layers[robot.index()]
    }

    /// Every individual of one arm across all layers.
    pub fn individuals(&self, robot: RobotId) -> impl Iterator<Item = &Individual> {
        self.layers[robot.index()].iter().flatten()
    }

    /// Individuals per layer, youngest first.
    pub fn layer_sizes(&self, robot: RobotId) -> Vec<usize> {
        self.layers[robot.index()].iter().map(Vec::len).collect()
    }

    pub fn total_size(&self, robot: RobotId) -> usize {
        self.layers[robot.index()].iter().map(Vec::len).sum()
    }

    /// The arm's current best: the lowest evaluated fitness across all layers,
    /// or the first individual of the youngest non-empty layer when nothing
    /// has been evaluated yet.
    pub fn best(&self, robot: RobotId) -> Option<&Individual> {
        self.individuals(robot)
            .filter_map(|ind| ind.fitness().map(|f| (f, ind)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, ind)| ind)
            .or_else(|| self.layers[robot.index()].iter().find_map(|pop| pop.first()))
    }
}

fn missing_layer(robot: RobotId, layer: LayerIndex) -> EvolutionError {
    EvolutionError::precondition(format!("{} has no {}", robot, layer))
}
