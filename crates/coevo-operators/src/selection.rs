//! Selection over fitness-sorted populations.
//!
//! Every operator here expects a non-empty population sorted ascending by
//! fitness (lower is better) with every individual evaluated. Call
//! [`sort_by_fitness`] first. The check is a single linear pass and fails
//! with `PreconditionViolation`.
//!
//! Age-threshold selection implements the age-layered (ALPS) migration:
//! individuals older than their layer's ceiling move to the next layer,
//! keeping their age, or are culled when no older layer exists.

use coevo_core::error::{EvolutionError, Result};
use coevo_core::population::PopulationTable;
use coevo_core::types::{Individual, LayerIndex, Population, RobotId};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

/// Sort ascending by fitness. Fails if any individual is unevaluated.
pub fn sort_by_fitness(population: &mut [Individual]) -> Result<()> {
    if let Some(ind) = population.iter().find(|ind| !ind.is_evaluated()) {
        return Err(EvolutionError::precondition(format!(
            "cannot sort: individual {:?} is unevaluated",
            ind.id
        )));
    }
    population.sort_by(|a, b| {
        a.fitness()
            .unwrap_or(f64::INFINITY)
            .total_cmp(&b.fitness().unwrap_or(f64::INFINITY))
    });
    Ok(())
}

/// Verify the shared selection precondition.
pub fn check_sorted(population: &[Individual]) -> Result<()> {
    if population.is_empty() {
        return Err(EvolutionError::precondition("selection on an empty population"));
    }
    let mut previous = f64::NEG_INFINITY;
    for (i, ind) in population.iter().enumerate() {
        let fitness = ind.fitness().ok_or_else(|| {
            EvolutionError::precondition(format!("individual {} is unevaluated", i))
        })?;
        if fitness < previous {
            return Err(EvolutionError::precondition(format!(
                "population is not sorted by fitness at index {}",
                i
            )));
        }
        previous = fitness;
    }
    Ok(())
}

/// The first `k` individuals, borrowed in place.
pub fn elitist_selection(population: &[Individual], k: usize) -> Result<&[Individual]> {
    check_sorted(population)?;
    if k > population.len() {
        return Err(EvolutionError::precondition(format!(
            "cannot take {} elites from {} individuals",
            k,
            population.len()
        )));
    }
    Ok(&population[..k])
}

/// Fill `count` slots; each slot keeps the fittest of `tournament_size`
/// uniform draws. On a sorted population that is the smallest drawn index.
pub fn tournament_selection<R: Rng>(
    population: &[Individual],
    tournament_size: usize,
    count: usize,
    rng: &mut R,
) -> Result<Population> {
    check_sorted(population)?;
    if tournament_size == 0 {
        return Err(EvolutionError::precondition("tournament size must be at least 1"));
    }
    let n = population.len();
    let offspring = (0..count)
        .map(|_| {
            let winner = (0..tournament_size)
                .map(|_| rng.random_range(0..n))
                .min()
                .unwrap_or(0);
            population[winner].clone()
        })
        .collect();
    Ok(offspring)
}

/// Fitness-proportional selection weighted by `1 / fitness`.
///
/// Draws `count` values over the total weight and assigns them in one
/// sweep over the sorted population. Every fitness must be positive.
pub fn roulette_selection<R: Rng>(population: &[Individual], count: usize, rng: &mut R) -> Result<Population> {
    check_sorted(population)?;
    let weights = population
        .iter()
        .map(|ind| match ind.fitness() {
            Some(f) if f > 0.0 && f.is_finite() => Ok(1.0 / f),
            other => Err(EvolutionError::precondition(format!(
                "roulette weight needs a positive finite fitness, got {:?}",
                other
            ))),
        })
        .collect::<Result<Vec<f64>>>()?;
    let total: f64 = weights.iter().sum();

    let mut draws: Vec<f64> = (0..count).map(|_| rng.random_range(0.0..total)).collect();
    // Descending, so the smallest pending draw sits at the end.
    draws.sort_by(|a, b| b.total_cmp(a));

    let mut offspring = Vec::with_capacity(count);
    let mut threshold = 0.0;
    for (ind, weight) in population.iter().zip(&weights) {
        threshold += weight;
        while let Some(&draw) = draws.last() {
            if draw < threshold {
                offspring.push(ind.clone());
                draws.pop();
            } else {
                break;
            }
        }
    }
    // Rounding can leave draws just under `total` unassigned.
    if let Some(last) = population.last() {
        offspring.extend(draws.iter().map(|_| last.clone()));
    }
    Ok(offspring)
}

/// A layer split by its age ceiling.
#[derive(Debug, Clone, Default)]
pub struct AgePartition {
    /// `age <= ceiling`
    pub retained: Population,
    /// `age > ceiling`
    pub overflow: Population,
}

/// Split a layer into individuals that may stay and those that must leave.
pub fn age_threshold_selection(population: Population, ceiling: u32) -> AgePartition {
    let (retained, overflow) = population.into_iter().partition(|ind| ind.age <= ceiling);
    AgePartition { retained, overflow }
}

/// Outcome of one migration pass for one arm.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationSummary {
    /// `(from_layer, count)` for every layer that promoted individuals.
    pub promoted: Vec<(LayerIndex, usize)>,
    /// Individuals removed from the oldest layer.
    pub culled: usize,
}

/// Apply age-threshold selection to every layer of one arm, youngest first.
///
/// Overflow moves to the next layer with its age unchanged, so an
/// individual can cascade through several layers in one pass. Overflow
/// from the oldest layer is discarded.
pub fn migrate_overaged(table: &mut PopulationTable, robot: RobotId) -> Result<MigrationSummary> {
    let mut summary = MigrationSummary::default();
    let layers: Vec<LayerIndex> = table.layer_indices().collect();

    for layer in layers {
        let ceiling = table
            .ceiling(layer)
            .ok_or_else(|| EvolutionError::precondition(format!("no ceiling for {}", layer)))?;
        let population = table.take(robot, layer)?;
        let AgePartition { retained, overflow } = age_threshold_selection(population, ceiling);
        table.replace(robot, layer, retained)?;

        if overflow.is_empty() {
            continue;
        }
        match table.next_layer(layer) {
            Some(next) => {
                debug!("{}: promoting {} individuals from {} to {}", robot, overflow.len(), layer, next);
                summary.promoted.push((layer, overflow.len()));
                table.get_mut(robot, next)?.extend(overflow);
            }
            None => {
                debug!("{}: culling {} individuals past the last ceiling", robot, overflow.len());
                summary.culled += overflow.len();
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coevo_core::types::{EvalState, Point2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn evaluated(fitness: f64) -> Individual {
        let mut ind = Individual::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)], RobotId::First, &mut rand::rng());
        ind.eval = EvalState::Evaluated { fitness };
        ind
    }

    fn sorted_population(n: usize) -> Population {
        (1..=n).map(|i| evaluated(i as f64)).collect()
    }

    fn aged(age: u32) -> Individual {
        let mut ind = evaluated(1.0);
        ind.age = age;
        ind
    }

    #[test]
    fn sort_orders_ascending_and_rejects_unevaluated() {
        let mut pop = vec![evaluated(3.0), evaluated(1.0), evaluated(2.0)];
        sort_by_fitness(&mut pop).unwrap();
        let order: Vec<f64> = pop.iter().filter_map(|i| i.fitness()).collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0]);

        pop.push(Individual::new(vec![Point2::new(0.0, 0.0); 2], RobotId::First, &mut rand::rng()));
        assert!(matches!(sort_by_fitness(&mut pop), Err(EvolutionError::PreconditionViolation(_))));
    }

    #[test]
    fn elites_are_borrowed_not_copied() {
        let pop = sorted_population(5);
        let elites = elitist_selection(&pop, 2).unwrap();
        assert_eq!(elites.len(), 2);
        assert!(std::ptr::eq(&elites[0], &pop[0]));
        assert!(std::ptr::eq(&elites[1], &pop[1]));
        assert!(elitist_selection(&pop, 6).is_err());
    }

    #[test]
    fn selection_rejects_unsorted_and_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let unsorted = vec![evaluated(2.0), evaluated(1.0)];
        assert!(matches!(elitist_selection(&unsorted, 1), Err(EvolutionError::PreconditionViolation(_))));
        assert!(tournament_selection(&unsorted, 3, 4, &mut rng).is_err());
        assert!(roulette_selection(&unsorted, 4, &mut rng).is_err());

        let empty: Population = Vec::new();
        assert!(elitist_selection(&empty, 0).is_err());
        assert!(tournament_selection(&empty, 3, 4, &mut rng).is_err());
        assert!(roulette_selection(&empty, 4, &mut rng).is_err());
    }

    #[test]
    fn tournament_fills_requested_slots() {
        let mut rng = StdRng::seed_from_u64(7);
        let pop = sorted_population(10);
        let offspring = tournament_selection(&pop, 3, 29, &mut rng).unwrap();
        assert_eq!(offspring.len(), 29);
        assert!(offspring.iter().all(|o| pop.iter().any(|p| p.id == o.id)));
    }

    #[test]
    fn larger_tournaments_favor_the_front() {
        let mut rng = StdRng::seed_from_u64(7);
        let pop = sorted_population(20);
        let mean = |offspring: &Population| {
            offspring.iter().filter_map(|o| o.fitness()).sum::<f64>() / offspring.len() as f64
        };
        let weak = tournament_selection(&pop, 1, 400, &mut rng).unwrap();
        let strong = tournament_selection(&pop, 5, 400, &mut rng).unwrap();
        assert!(mean(&strong) < mean(&weak));
    }

    #[test]
    fn roulette_fills_requested_slots_and_prefers_low_cost() {
        let mut rng = StdRng::seed_from_u64(13);
        let pop = vec![evaluated(1.0), evaluated(100.0)];
        let offspring = roulette_selection(&pop, 500, &mut rng).unwrap();
        assert_eq!(offspring.len(), 500);
        let cheap = offspring.iter().filter(|o| o.id == pop[0].id).count();
        assert!(cheap > 400, "expected ~99% low-cost picks, got {}", cheap);
    }

    #[test]
    fn roulette_rejects_zero_fitness() {
        let mut rng = StdRng::seed_from_u64(13);
        let pop = vec![evaluated(0.0), evaluated(2.0)];
        assert!(matches!(roulette_selection(&pop, 3, &mut rng), Err(EvolutionError::PreconditionViolation(_))));
    }

    #[test]
    fn age_threshold_partitions_on_ceiling() {
        let pop = vec![aged(1), aged(3), aged(4), aged(9)];
        let split = age_threshold_selection(pop, 3);
        assert_eq!(split.retained.iter().map(|i| i.age).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(split.overflow.iter().map(|i| i.age).collect::<Vec<_>>(), vec![4, 9]);
    }

    #[test]
    fn migration_promotes_with_age_and_culls_at_the_top() {
        let mut table = PopulationTable::new(vec![3, 6, 12]);
        table.replace(RobotId::First, LayerIndex(0), vec![aged(2), aged(4), aged(8)]).unwrap();
        table.replace(RobotId::First, LayerIndex(2), vec![aged(12), aged(13)]).unwrap();

        let summary = migrate_overaged(&mut table, RobotId::First).unwrap();

        // age 4 lands in layer 1; age 8 cascades through layer 1 into layer 2
        assert_eq!(table.layer_sizes(RobotId::First), vec![1, 1, 2]);
        let layer2: Vec<u32> = table.get(RobotId::First, LayerIndex(2)).unwrap().iter().map(|i| i.age).collect();
        assert_eq!(layer2, vec![12, 8]);
        assert_eq!(summary.promoted, vec![(LayerIndex(0), 2), (LayerIndex(1), 1)]);
        assert_eq!(summary.culled, 1);
        assert_eq!(table.total_size(RobotId::Second), 0);
    }
}
