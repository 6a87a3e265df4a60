//! Crossover and mutation.
//!
//! Both operators append children and keep the parents. Crossover can
//! change path lengths, so it finishes by restoring every path to the
//! fixed waypoint count with `adjust_point_count`.

use coevo_core::config::MutationConfig;
use coevo_core::error::Result;
use coevo_core::spline::adjust_point_count;
use coevo_core::types::{Individual, Population};
use rand::Rng;

/// With probability `probability`, append `perturb(parent)` for each
/// individual present at call time. Returns the number of children added.
pub fn mutate<R, F>(population: &mut Population, probability: f64, mut perturb: F, rng: &mut R) -> usize
where
    R: Rng,
    F: FnMut(&Individual, &mut R) -> Individual,
{
    let mut children = Vec::new();
    for parent in population.iter() {
        if rng.random::<f64>() < probability {
            children.push(perturb(parent, &mut *rng));
        }
    }
    let added = children.len();
    population.extend(children);
    added
}

/// Bounded uniform perturbation.
///
/// Every waypoint except the last is perturbed with probability
/// `point_rate` by an independent offset in `[-step, step]` per coordinate.
/// The child keeps the parent's age and robot and starts unevaluated.
pub fn mut_normal<R: Rng>(parent: &Individual, config: &MutationConfig, rng: &mut R) -> Individual {
    let mut path = parent.path.clone();
    let movable = path.len().saturating_sub(1);
    for point in path.iter_mut().take(movable) {
        if rng.random::<f64>() < config.point_rate {
            point.x += rng.random_range(-config.step..=config.step);
            point.y += rng.random_range(-config.step..=config.step);
        }
    }
    Individual::offspring(path, parent.age, parent.robot, rng)
}

/// Run `cx` once per individual present at call time, append all children,
/// then restore every path to `n_pts` waypoints. Returns the number of
/// children added.
pub fn crossover<R, F>(population: &mut Population, mut cx: F, n_pts: usize, rng: &mut R) -> Result<usize>
where
    R: Rng,
    F: FnMut(&Individual, &[Individual], &mut R) -> Vec<Individual>,
{
    let mut children = Vec::new();
    {
        let all: &[Individual] = population;
        for lead in all {
            children.extend(cx(lead, all, &mut *rng));
        }
    }
    let added = children.len();
    population.extend(children);

    for ind in population.iter_mut() {
        let path = std::mem::take(&mut ind.path);
        ind.path = adjust_point_count(path, n_pts, rng)?;
    }
    Ok(added)
}

/// Splice two parents at the given cut indices.
///
/// Child A is `lead[..lead_cut] + mate[mate_cut..]`, child B is
/// `mate[..mate_cut] + lead[lead_cut..]`. Both take the older parent's age;
/// each keeps its own leading parent's robot. Child ids are drawn from `rng`.
pub fn splice<R: Rng>(
    lead: &Individual,
    lead_cut: usize,
    mate: &Individual,
    mate_cut: usize,
    rng: &mut R,
) -> [Individual; 2] {
    let age = lead.age.max(mate.age);

    let mut path_a = lead.path[..lead_cut].to_vec();
    path_a.extend_from_slice(&mate.path[mate_cut..]);

    let mut path_b = mate.path[..mate_cut].to_vec();
    path_b.extend_from_slice(&lead.path[lead_cut..]);

    [
        Individual::offspring(path_a, age, lead.robot, rng),
        Individual::offspring(path_b, age, mate.robot, rng),
    ]
}

/// Geometric one-point crossover.
///
/// Picks a random interior cut in `lead`, then searches every waypoint of
/// every other individual for the one nearest the cut waypoint, within
/// `radius`. Candidates sharing `lead`'s id (the lead itself and its
/// selection clones) are skipped. Returns two children or none.
pub fn one_point_crossover<R: Rng>(
    lead: &Individual,
    population: &[Individual],
    radius: f64,
    rng: &mut R,
) -> Vec<Individual> {
    let n = lead.path.len();
    if n < 3 {
        return Vec::new();
    }
    let lead_cut = rng.random_range(1..=n - 2);
    let cut_point = lead.path[lead_cut];

    let mut nearest: Option<(&Individual, usize)> = None;
    let mut min_dist = radius;
    for candidate in population.iter().filter(|c| c.id != lead.id) {
        for (j, point) in candidate.path.iter().enumerate() {
            let d = cut_point.distance_to(point);
            if d < min_dist {
                min_dist = d;
                nearest = Some((candidate, j));
            }
        }
    }

    match nearest {
        Some((mate, mate_cut)) => splice(lead, lead_cut, mate, mate_cut, rng).into(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coevo_core::types::{EvalState, Point2, RobotId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn line(y: f64, robot: RobotId) -> Individual {
        Individual::new((0..7).map(|i| Point2::new(i as f64, y)).collect(), robot, &mut rand::rng())
    }

    #[test]
    fn splice_lengths_follow_cut_points() {
        let a = line(0.0, RobotId::First);
        let b = line(0.1, RobotId::First);
        let mut rng = StdRng::seed_from_u64(2);
        let [c1, c2] = splice(&a, 3, &b, 4, &mut rng);
        assert_eq!(c1.path.len(), 3 + (7 - 4));
        assert_eq!(c2.path.len(), 4 + (7 - 3));
        assert_eq!(c1.path[2], a.path[2]);
        assert_eq!(c1.path[3], b.path[4]);
        assert_eq!(c2.path[4], a.path[3]);

        for child in [c1, c2] {
            let fixed = adjust_point_count(child.path, 7, &mut rng).unwrap();
            assert_eq!(fixed.len(), 7);
        }
    }

    #[test]
    fn splice_children_take_older_age_and_own_robot() {
        let mut a = line(0.0, RobotId::First);
        a.age = 2;
        let mut b = line(0.1, RobotId::Second);
        b.age = 5;
        let [c1, c2] = splice(&a, 2, &b, 2, &mut StdRng::seed_from_u64(3));
        assert_eq!((c1.age, c2.age), (5, 5));
        assert_eq!(c1.robot, RobotId::First);
        assert_eq!(c2.robot, RobotId::Second);
        assert!(!c1.is_evaluated() && !c2.is_evaluated());
        assert_ne!(c1.id, a.id);
    }

    #[test]
    fn crossover_skips_self_and_clones() {
        let mut rng = StdRng::seed_from_u64(4);
        let a = line(0.0, RobotId::First);
        let clone = a.clone();
        let pop = vec![a.clone(), clone];
        for _ in 0..20 {
            assert!(one_point_crossover(&a, &pop, 1.0, &mut rng).is_empty());
        }
    }

    #[test]
    fn crossover_finds_near_partner_despite_equal_distance() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut a = line(0.0, RobotId::First);
        let mut b = line(0.05, RobotId::First);
        // Equal cached distances must not hide a distinct partner.
        a.distance = 12.0;
        b.distance = 12.0;
        let pop = vec![a.clone(), b.clone()];
        let children = one_point_crossover(&a, &pop, std::f64::consts::PI / 10.0, &mut rng);
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn crossover_needs_partner_within_radius() {
        let mut rng = StdRng::seed_from_u64(4);
        let a = line(0.0, RobotId::First);
        let far = line(5.0, RobotId::First);
        let pop = vec![a.clone(), far];
        assert!(one_point_crossover(&a, &pop, 0.3, &mut rng).is_empty());
    }

    #[test]
    fn crossover_restores_waypoint_count() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut pop: Population = (0..6).map(|i| line(i as f64 * 0.05, RobotId::First)).collect();
        let added = crossover(
            &mut pop,
            |ind, all, rng| one_point_crossover(ind, all, 0.5, rng),
            7,
            &mut rng,
        )
        .unwrap();
        assert!(added > 0);
        assert_eq!(added % 2, 0);
        assert_eq!(pop.len(), 6 + added);
        assert!(pop.iter().all(|ind| ind.path.len() == 7));
    }

    #[test]
    fn mutation_appends_children_and_keeps_parents() {
        let mut rng = StdRng::seed_from_u64(21);
        let parents: Population = (0..10).map(|i| line(i as f64, RobotId::Second)).collect();
        let mut pop = parents.clone();
        let config = MutationConfig::default();
        let added = mutate(&mut pop, 1.0, |p, rng| mut_normal(p, &config, rng), &mut rng);
        assert_eq!(added, 10);
        assert_eq!(pop.len(), 20);
        assert_eq!(&pop[..10], &parents[..]);

        let mut none = parents.clone();
        assert_eq!(mutate(&mut none, 0.0, |p, rng| mut_normal(p, &config, rng), &mut rng), 0);
    }

    #[test]
    fn mut_normal_is_bounded_and_keeps_goal() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut parent = line(1.0, RobotId::First);
        parent.age = 4;
        parent.eval = EvalState::Evaluated { fitness: 3.0 };
        parent.collision = 2;
        let config = MutationConfig { point_rate: 1.0, step: 0.1 };
        let child = mut_normal(&parent, &config, &mut rng);

        assert_eq!(child.path.last(), parent.path.last());
        for (c, p) in child.path.iter().zip(&parent.path) {
            assert!((c.x - p.x).abs() <= 0.1 + 1e-9 && (c.y - p.y).abs() <= 0.1 + 1e-9);
        }
        assert_eq!(child.age, 4);
        assert_eq!(child.eval, EvalState::Unevaluated);
        assert_eq!(child.collision, 0);
        assert_eq!(child.distance, 0.0);
        assert_eq!(child.diversity, 0.0);
    }
}
