//! Population diversity as averaged pairwise waypoint distance.
//!
//! Purely descriptive: fitness never reads `diversity`. A caller that wants
//! diversity-aware selection has to add that policy itself.

use coevo_core::types::Individual;

/// Sum of distances between corresponding waypoints of two paths.
pub fn pairwise_distance(a: &Individual, b: &Individual) -> f64 {
    a.path
        .iter()
        .zip(b.path.iter())
        .map(|(p, q)| p.distance_to(q))
        .sum()
}

/// Set each individual's `diversity` to its mean pairwise distance to the
/// rest of the population. Populations of fewer than two get zero.
pub fn update_diversity(population: &mut [Individual]) {
    let n = population.len();
    let mut totals = vec![0.0; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let d = pairwise_distance(&population[i], &population[j]);
            totals[i] += d;
            totals[j] += d;
        }
    }

    let denominator = if n > 1 { (n - 1) as f64 } else { 1.0 };
    for (ind, total) in population.iter_mut().zip(totals) {
        ind.diversity = total / denominator;
    }
}

/// Mean diversity of a population (0.0 when empty).
pub fn mean_diversity<'a>(population: impl IntoIterator<Item = &'a Individual>) -> f64 {
    let (sum, n) = population
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), ind| (sum + ind.diversity, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coevo_core::types::{Point2, RobotId};

    fn at(offset: f64) -> Individual {
        let path = (0..7).map(|i| Point2::new(i as f64, offset)).collect();
        Individual::new(path, RobotId::First, &mut rand::rng())
    }

    #[test]
    fn pair_diversity_is_symmetric_and_summed() {
        let mut pop = vec![at(0.0), at(0.5)];
        update_diversity(&mut pop);
        assert_eq!(pop[0].diversity, pop[1].diversity);
        assert!((pop[0].diversity - 7.0 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn diversity_zero_for_identical_paths() {
        let mut pop = vec![at(1.0), at(1.0), at(1.0)];
        update_diversity(&mut pop);
        assert!(pop.iter().all(|ind| ind.diversity == 0.0));
    }

    #[test]
    fn diversity_averages_over_others() {
        let mut pop = vec![at(0.0), at(1.0), at(3.0)];
        update_diversity(&mut pop);
        // individual 0: (7 * 1 + 7 * 3) / 2
        assert!((pop[0].diversity - 14.0).abs() < 1e-12);
        // individual 1: (7 * 1 + 7 * 2) / 2
        assert!((pop[1].diversity - 10.5).abs() < 1e-12);
        assert!((mean_diversity(&pop) - (14.0 + 10.5 + 17.5) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn singleton_and_empty_populations_are_safe() {
        let mut one = vec![at(2.0)];
        update_diversity(&mut one);
        assert_eq!(one[0].diversity, 0.0);
        let mut none: Vec<Individual> = Vec::new();
        update_diversity(&mut none);
        assert_eq!(mean_diversity(&none), 0.0);
    }
}
