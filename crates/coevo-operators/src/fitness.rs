//! Fitness evaluation against the opposing arm's current best path.
//!
//! Cost = own path length + opposing best's path length
//!      + collision_penalty × colliding instants.
//!
//! Lower is better. Only unevaluated individuals are scored, but every
//! individual ages by one round per `evaluate` call.

use crate::diversity::update_diversity;
use coevo_core::config::{EvolutionConfig, FitnessConfig};
use coevo_core::error::{EvolutionError, Result};
use coevo_core::robot::{CollisionGeometry, ForwardKinematics};
use coevo_core::spline::ferguson_spline;
use coevo_core::types::{EvalState, Individual, Point2, Segment};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sum of Euclidean distances between consecutive raw waypoints.
pub fn path_length(path: &[Point2]) -> f64 {
    path.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
}

/// Scalar cost for a distance and a collision count.
pub fn fitness_value(distance: f64, collision: u32, collision_penalty: f64) -> f64 {
    distance + collision as f64 * collision_penalty
}

/// Scores individuals through the kinematics and geometry collaborators.
pub struct FitnessEvaluator<'a, K: ?Sized, G: ?Sized> {
    kinematics: &'a K,
    geometry: &'a G,
    n_pts: usize,
    n_joint: usize,
    config: FitnessConfig,
}

impl<'a, K, G> FitnessEvaluator<'a, K, G>
where
    K: ForwardKinematics + ?Sized,
    G: CollisionGeometry + ?Sized,
{
    pub fn new(kinematics: &'a K, geometry: &'a G, config: &EvolutionConfig) -> Self {
        Self {
            kinematics,
            geometry,
            n_pts: config.n_pts(),
            n_joint: config.n_joint,
            config: config.fitness.clone(),
        }
    }

    /// Evaluate a population against the other arm's best individual.
    ///
    /// Updates `diversity` for everyone, scores every unevaluated individual,
    /// then increments every individual's age. Returns how many were scored.
    /// Every path, including `other_best`'s, must have exactly `n_pts` waypoints.
    pub fn evaluate(&self, population: &mut [Individual], other_best: &Individual) -> Result<usize> {
        self.check_waypoints(other_best)?;
        for ind in population.iter() {
            self.check_waypoints(ind)?;
        }

        update_diversity(population);

        let scored = self.score_pending(population, other_best)?;

        for ind in population.iter_mut() {
            ind.age += 1;
        }

        debug!(
            "Evaluated {} of {} individuals against {}",
            scored,
            population.len(),
            other_best.robot
        );
        Ok(scored)
    }

    #[cfg(not(feature = "parallel"))]
    fn score_pending(&self, population: &mut [Individual], other_best: &Individual) -> Result<usize> {
        let mut scored = 0;
        for ind in population.iter_mut().filter(|ind| !ind.is_evaluated()) {
            self.score(ind, other_best)?;
            scored += 1;
        }
        Ok(scored)
    }

    #[cfg(feature = "parallel")]
    fn score_pending(&self, population: &mut [Individual], other_best: &Individual) -> Result<usize> {
        let pending: Vec<&mut Individual> = population.iter_mut().filter(|ind| !ind.is_evaluated()).collect();
        let scored = pending.len();
        pending
            .into_par_iter()
            .try_for_each(|ind| self.score(ind, other_best))?;
        Ok(scored)
    }

    /// Compute distance, collision count, and fitness for one individual.
    pub fn score(&self, ind: &mut Individual, other_best: &Individual) -> Result<()> {
        let distance = path_length(&ind.path) + path_length(&other_best.path);
        let collision = self.collision_count(ind, other_best)?;
        ind.distance = distance;
        ind.collision = collision;
        ind.eval = EvalState::Evaluated {
            fitness: fitness_value(distance, collision, self.config.collision_penalty),
        };
        Ok(())
    }

    /// Count sampled instants at which the two arms touch.
    ///
    /// Both paths are densified with the configured samples per segment and
    /// walked in lockstep. Each instant counts at most once. Both paths
    /// must have exactly `n_pts` waypoints.
    pub fn collision_count(&self, a: &Individual, b: &Individual) -> Result<u32> {
        self.check_waypoints(a)?;
        self.check_waypoints(b)?;
        let samples = self.config.collision_samples;
        let dense_a = ferguson_spline(&a.path, samples)?;
        let dense_b = ferguson_spline(&b.path, samples)?;

        let mut count = 0;
        for (qa, qb) in dense_a.iter().zip(dense_b.iter()) {
            let links_a = self.links(a, *qa)?;
            let links_b = self.links(b, *qb)?;
            if self.instant_collides(&links_a, &links_b)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Link segments of `ind`'s arm at joint configuration `q`.
    fn links(&self, ind: &Individual, q: Point2) -> Result<Vec<Segment>> {
        let chain = self.kinematics.forward_kinematics(ind.robot, q)?;
        if chain.len() != self.n_joint + 1 {
            return Err(EvolutionError::kinematics(
                ind.robot,
                format!("expected {} chain points, got {}", self.n_joint + 1, chain.len()),
            ));
        }
        Ok(chain.windows(2).map(|w| Segment::new(w[0], w[1])).collect())
    }

    /// First-match search over all link pairs of one sampled instant.
    fn instant_collides(&self, links_a: &[Segment], links_b: &[Segment]) -> Result<bool> {
        let radius = self.config.clearance_radius;
        for la in links_a {
            for lb in links_b {
                if !self.geometry.roughly_intersect(la, lb)? {
                    continue;
                }
                if self.geometry.segments_intersect(la, lb)?
                    || self.geometry.segment_intersects_circle(la, lb.end, radius)?
                    || self.geometry.segment_intersects_circle(lb, la.end, radius)?
                {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn check_waypoints(&self, ind: &Individual) -> Result<()> {
        if ind.path.len() != self.n_pts {
            return Err(EvolutionError::invalid_genotype(format!(
                "{} individual has {} waypoints, expected {}",
                ind.robot,
                ind.path.len(),
                self.n_pts
            )));
        }
        Ok(())
    }
}
