//! The age-layered generation loop for two arms.
//!
//! Each generation evaluates every layer of one arm against the other
//! arm's best path from the start of the generation, breeds the next
//! layer population, migrates over-aged individuals upward, and every
//! `age_gap` generations reseeds the youngest layer with random paths.
//!
//! The controller owns the configuration and the population table. Nothing
//! is global: two controllers with different configs can run side by side.

use crate::export::{BestPath, RunReport};
use crate::metrics::{generation_stats, GenerationStats};
use crate::session::Checkpoint;
use coevo_core::config::{EvolutionConfig, SelectionScheme};
use coevo_core::error::{EvolutionError, Result};
use coevo_core::population::PopulationTable;
use coevo_core::robot::{CollisionGeometry, ForwardKinematics};
use coevo_core::spline::create_path;
use coevo_core::types::*;
use coevo_operators::fitness::FitnessEvaluator;
use coevo_operators::selection::{
    elitist_selection, migrate_overaged, roulette_selection, sort_by_fitness, tournament_selection,
};
use coevo_operators::variation::{crossover, mut_normal, mutate, one_point_crossover};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Events emitted during a generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EvolutionEvent {
    /// A layer was filled with fresh random individuals.
    Seeded { robot: RobotId, layer: LayerIndex, individuals: usize },
    /// A layer was evaluated against the other arm's best.
    Evaluated { robot: RobotId, layer: LayerIndex, scored: usize, size: usize },
    /// A layer was replaced by its bred successor.
    Bred { robot: RobotId, layer: LayerIndex, size: usize },
    /// Over-aged individuals moved up one layer.
    Promoted { robot: RobotId, from: LayerIndex, count: usize },
    /// Over-aged individuals dropped from the oldest layer.
    Culled { robot: RobotId, count: usize },
    /// Layer 0 was handed to layer 1 and reseeded.
    Reseeded { robot: RobotId, moved_up: usize, individuals: usize },
    /// A generation finished.
    GenerationComplete { generation: u32, best_fitness: [Option<f64>; 2] },
}

/// Age-layered coevolution of two arms' joint-space paths.
pub struct Coevolution<K, G> {
    config: EvolutionConfig,
    kinematics: K,
    geometry: G,
    tasks: [Task; 2],
    table: PopulationTable,
    generation: u32,
    history: Vec<GenerationStats>,
    events: Vec<EvolutionEvent>,
}

impl<K, G> Coevolution<K, G>
where
    K: ForwardKinematics,
    G: CollisionGeometry,
{
    /// Create a controller. `tasks` is indexed by `RobotId::index()`.
    pub fn new(config: EvolutionConfig, kinematics: K, geometry: G, tasks: [Task; 2]) -> Result<Self> {
        config.validate()?;
        for (robot, task) in RobotId::ALL.iter().zip(&tasks) {
            if !task.start.is_finite() || !task.goal.is_finite() {
                return Err(EvolutionError::invalid_config(
                    "task",
                    robot,
                    "start and goal must be finite",
                ));
            }
        }
        let table = PopulationTable::new(config.max_age.clone());
        Ok(Self {
            config,
            kinematics,
            geometry,
            tasks,
            table,
            generation: 0,
            history: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Rebuild a controller from a checkpoint.
    pub fn resume(checkpoint: Checkpoint, kinematics: K, geometry: G) -> Result<Self> {
        checkpoint.config.validate()?;
        if checkpoint.table.ceilings() != checkpoint.config.max_age.as_slice() {
            return Err(EvolutionError::invalid_config(
                "max_age",
                format!("{:?}", checkpoint.config.max_age),
                "does not match the checkpointed layer ceilings",
            ));
        }
        Ok(Self {
            config: checkpoint.config,
            kinematics,
            geometry,
            tasks: checkpoint.tasks,
            table: checkpoint.table,
            generation: checkpoint.generation,
            history: checkpoint.history,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn tasks(&self) -> &[Task; 2] {
        &self.tasks
    }

    pub fn table(&self) -> &PopulationTable {
        &self.table
    }

    /// Generations completed so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Events from the most recent `initialize`, `step`, or final evaluation.
    pub fn events(&self) -> &[EvolutionEvent] {
        &self.events
    }

    /// Current best of one arm. See `PopulationTable::best`.
    pub fn best(&self, robot: RobotId) -> Option<&Individual> {
        self.table.best(robot)
    }

    /// Whether any layer holds individuals.
    pub fn is_initialized(&self) -> bool {
        RobotId::ALL.iter().any(|&robot| self.table.total_size(robot) > 0)
    }

    /// Fill layer 0 of each arm with `n_pop` random paths. Other layers
    /// start empty.
    pub fn initialize<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        self.events.clear();
        for robot in RobotId::ALL {
            let population = self.random_population(robot, rng)?;
            let individuals = population.len();
            self.table.replace(robot, LayerIndex(0), population)?;
            debug!("{}: seeded {} with {} individuals", robot, LayerIndex(0), individuals);
            self.events.push(EvolutionEvent::Seeded { robot, layer: LayerIndex(0), individuals });
        }
        Ok(())
    }

    /// Run one generation and return its statistics.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Result<GenerationStats> {
        if !self.is_initialized() {
            self.initialize(rng)?;
        }
        self.events.clear();
        for robot in RobotId::ALL {
            if self.table.total_size(robot) == 0 {
                warn!("{}: every layer is empty, reseeding", robot);
                self.reseed(robot, rng)?;
            }
        }

        let bests = self.snapshot_bests()?;
        for robot in RobotId::ALL {
            self.breed_robot(robot, &bests[robot.other().index()], rng)?;
        }

        for robot in RobotId::ALL {
            let summary = migrate_overaged(&mut self.table, robot)?;
            for (from, count) in summary.promoted {
                self.events.push(EvolutionEvent::Promoted { robot, from, count });
            }
            if summary.culled > 0 {
                self.events.push(EvolutionEvent::Culled { robot, count: summary.culled });
            }
        }

        self.generation += 1;
        if self.generation % self.config.age_gap == 0 {
            for robot in RobotId::ALL {
                self.reseed(robot, rng)?;
            }
        }

        let stats = generation_stats(self.generation, &self.table);
        let best_fitness = [
            stats.robot(RobotId::First).and_then(|s| s.best_fitness),
            stats.robot(RobotId::Second).and_then(|s| s.best_fitness),
        ];
        info!(
            "generation {}: best fitness {} / {}",
            self.generation,
            format_fitness(best_fitness[0]),
            format_fitness(best_fitness[1]),
        );
        self.events.push(EvolutionEvent::GenerationComplete { generation: self.generation, best_fitness });
        self.history.push(stats.clone());
        Ok(stats)
    }

    /// Run up to `n_gen` generations, then evaluate whatever is left
    /// unscored so both returned bests carry a fitness.
    pub fn run<R: Rng>(&mut self, rng: &mut R) -> Result<RunReport> {
        self.run_with(rng, |_| {})
    }

    /// `run`, calling `on_generation` after each step.
    pub fn run_with<R, F>(&mut self, rng: &mut R, mut on_generation: F) -> Result<RunReport>
    where
        R: Rng,
        F: FnMut(&GenerationStats),
    {
        if !self.is_initialized() {
            self.initialize(rng)?;
        }
        while self.generation < self.config.n_gen {
            let stats = self.step(rng)?;
            on_generation(&stats);
        }
        self.evaluate_all()?;
        Ok(self.report())
    }

    /// Evaluate every layer of both arms against the current bests without
    /// breeding.
    pub fn evaluate_all(&mut self) -> Result<()> {
        self.events.clear();
        let bests = self.snapshot_bests()?;
        let evaluator = FitnessEvaluator::new(&self.kinematics, &self.geometry, &self.config);
        for robot in RobotId::ALL {
            let opponent = &bests[robot.other().index()];
            for layer in self.table.layer_indices().collect::<Vec<_>>() {
                let population = self.table.get_mut(robot, layer)?;
                if population.is_empty() {
                    continue;
                }
                let scored = evaluator.evaluate(population, opponent)?;
                let size = population.len();
                self.events.push(EvolutionEvent::Evaluated { robot, layer, scored, size });
            }
        }
        Ok(())
    }

    /// Build a report from the history and current bests.
    pub fn report(&self) -> RunReport {
        RunReport {
            config: self.config.clone(),
            tasks: self.tasks.to_vec(),
            generations: self.generation,
            history: self.history.clone(),
            best: RobotId::ALL
                .iter()
                .filter_map(|&robot| self.best(robot).and_then(BestPath::from_individual))
                .collect(),
        }
    }

    /// Serializable state for `session::save_checkpoint`.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            config: self.config.clone(),
            tasks: self.tasks,
            generation: self.generation,
            table: self.table.clone(),
            history: self.history.clone(),
        }
    }

    fn snapshot_bests(&self) -> Result<[Individual; 2]> {
        let best_of = |robot: RobotId| {
            self.table
                .best(robot)
                .cloned()
                .ok_or_else(|| EvolutionError::precondition(format!("{} has no individuals", robot)))
        };
        Ok([best_of(RobotId::First)?, best_of(RobotId::Second)?])
    }

    fn breed_robot<R: Rng>(&mut self, robot: RobotId, opponent: &Individual, rng: &mut R) -> Result<()> {
        let evaluator = FitnessEvaluator::new(&self.kinematics, &self.geometry, &self.config);
        for layer in self.table.layer_indices().collect::<Vec<_>>() {
            let mut population = self.table.take(robot, layer)?;
            if population.is_empty() {
                continue;
            }
            let scored = evaluator.evaluate(&mut population, opponent)?;
            let size = population.len();
            self.events.push(EvolutionEvent::Evaluated { robot, layer, scored, size });

            sort_by_fitness(&mut population)?;
            let next = breed_layer(&self.config, &population, rng)?;
            debug!("{}: {} bred {} -> {} individuals", robot, layer, size, next.len());
            self.events.push(EvolutionEvent::Bred { robot, layer, size: next.len() });
            self.table.replace(robot, layer, next)?;
        }
        Ok(())
    }

    fn reseed<R: Rng>(&mut self, robot: RobotId, rng: &mut R) -> Result<()> {
        let youngest = LayerIndex(0);
        let previous = self.table.take(robot, youngest)?;
        let moved_up = previous.len();
        match self.table.next_layer(youngest) {
            Some(next) => self.table.get_mut(robot, next)?.extend(previous),
            None if moved_up > 0 => warn!("{}: single layer, discarding {} on reseed", robot, moved_up),
            None => {}
        }
        let fresh = self.random_population(robot, rng)?;
        let individuals = fresh.len();
        self.table.replace(robot, youngest, fresh)?;
        debug!("{}: reseeded {} ({} handed up)", robot, youngest, moved_up);
        self.events.push(EvolutionEvent::Reseeded { robot, moved_up, individuals });
        Ok(())
    }

    fn random_population<R: Rng>(&self, robot: RobotId, rng: &mut R) -> Result<Population> {
        let task = &self.tasks[robot.index()];
        let samples = self.config.n_spline;
        (0..self.config.n_pop)
            .map(|_| {
                let path = create_path(task.start, task.goal, samples, &mut *rng)?;
                Ok(Individual::new(path, robot, &mut *rng))
            })
            .collect()
    }
}

/// Elites, then selection up to `n_pop`, then crossover and mutation.
/// `sorted` must be evaluated and sorted ascending by fitness.
fn breed_layer<R: Rng>(config: &EvolutionConfig, sorted: &[Individual], rng: &mut R) -> Result<Population> {
    let n_elites = config.n_elites.min(sorted.len());
    if n_elites < config.n_elites {
        warn!("layer of {} is smaller than n_elites {}, keeping {}", sorted.len(), config.n_elites, n_elites);
    }
    let mut next: Population = elitist_selection(sorted, n_elites)?.to_vec();

    let count = config.n_pop.saturating_sub(n_elites);
    let selected = match config.selection {
        SelectionScheme::Tournament => tournament_selection(sorted, config.n_tournament, count, rng)?,
        SelectionScheme::Roulette => roulette_selection(sorted, count, rng)?,
    };
    next.extend(selected);

    let radius = config.fitness.cx_radius;
    crossover(
        &mut next,
        |lead, all, rng| one_point_crossover(lead, all, radius, rng),
        config.n_pts(),
        rng,
    )?;
    mutate(&mut next, config.p_mut, |parent, rng| mut_normal(parent, &config.mutation, rng), rng);
    Ok(next)
}

fn format_fitness(fitness: Option<f64>) -> String {
    fitness.map(|f| format!("{:.3}", f)).unwrap_or_else(|| "-".to_string())
}
