//! Ferguson (cubic Hermite) path splines.
//!
//! A genotype is a short polyline in joint space. These functions expand
//! sparse control points into a dense smooth curve, build initial paths
//! with periodic goal selection, and restore a fixed waypoint count after
//! recombination has changed it.

use crate::error::{EvolutionError, Result};
use crate::types::Point2;
use rand::Rng;
use std::f64::consts::PI;

/// Joint angles are sampled from the open interval `(-JOINT_LIMIT, JOINT_LIMIT)`.
pub const JOINT_LIMIT: f64 = 2.0 * PI;

/// Period of a revolute joint angle.
pub const JOINT_PERIOD: f64 = 2.0 * PI;

/// Hermite blending matrix for the geometry vector `[P_i; T_i; P_i+1; T_i+1]`.
pub const HERMITE_BASIS: [[f64; 4]; 4] = [
    [2.0, 1.0, -2.0, 1.0],
    [-3.0, -2.0, 3.0, -1.0],
    [0.0, 1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 0.0],
];

/// Expand `points` into a dense curve with `samples` points per segment.
///
/// Each segment is sampled at `s = i / samples` for `i in 0..samples`, so
/// `s = 1` is never produced and segment starts are not duplicated. The
/// final control point is appended verbatim. The first and last output
/// points are exactly `points[0]` and `points[last]`.
///
/// Output length is `(points.len() - 1) * samples + 1`.
pub fn ferguson_spline(points: &[Point2], samples: usize) -> Result<Vec<Point2>> {
    let n = points.len();
    if n < 2 {
        return Err(EvolutionError::invalid_genotype(format!(
            "spline needs at least 2 control points, got {}",
            n
        )));
    }
    if samples == 0 {
        return Err(EvolutionError::invalid_genotype("spline needs at least 1 sample per segment"));
    }
    if let Some(i) = points.iter().position(|p| !p.is_finite()) {
        return Err(EvolutionError::invalid_genotype(format!(
            "control point {} is not finite",
            i
        )));
    }

    let tangents = tangents(points);
    let weights = basis_weights(samples);

    let mut curve = Vec::with_capacity((n - 1) * samples + 1);
    for i in 0..n - 1 {
        let geometry = [points[i], tangents[i], points[i + 1], tangents[i + 1]];
        for w in &weights {
            let mut x = 0.0;
            let mut y = 0.0;
            for (wk, g) in w.iter().zip(geometry.iter()) {
                x += wk * g.x;
                y += wk * g.y;
            }
            curve.push(Point2::new(x, y));
        }
    }
    curve.push(points[n - 1]);
    Ok(curve)
}

/// Central differences inside, one-sided differences at the two ends.
fn tangents(points: &[Point2]) -> Vec<Point2> {
    let n = points.len();
    (0..n)
        .map(|i| {
            if i == 0 {
                Point2::new(points[1].x - points[0].x, points[1].y - points[0].y)
            } else if i == n - 1 {
                Point2::new(points[i].x - points[i - 1].x, points[i].y - points[i - 1].y)
            } else {
                Point2::new(
                    (points[i + 1].x - points[i - 1].x) / 2.0,
                    (points[i + 1].y - points[i - 1].y) / 2.0,
                )
            }
        })
        .collect()
}

/// `[s^3, s^2, s, 1] * HERMITE_BASIS` for every sampled parameter value.
fn basis_weights(samples: usize) -> Vec<[f64; 4]> {
    (0..samples)
        .map(|i| {
            let s = i as f64 / samples as f64;
            let powers = [s * s * s, s * s, s, 1.0];
            let mut w = [0.0; 4];
            for (col, wc) in w.iter_mut().enumerate() {
                *wc = powers
                    .iter()
                    .zip(HERMITE_BASIS.iter())
                    .map(|(p, row)| p * row[col])
                    .sum();
            }
            w
        })
        .collect()
}

/// All images `goal + JOINT_PERIOD * (i, j)`, `i, j ∈ {-1, 0, 1}`, that lie
/// strictly inside the joint domain.
pub fn periodic_images(goal: Point2) -> Vec<Point2> {
    let mut images = Vec::with_capacity(9);
    for i in -1..=1 {
        for j in -1..=1 {
            let image = Point2::new(
                goal.x + JOINT_PERIOD * i as f64,
                goal.y + JOINT_PERIOD * j as f64,
            );
            if in_domain(image.x) && in_domain(image.y) {
                images.push(image);
            }
        }
    }
    images
}

fn in_domain(angle: f64) -> bool {
    -JOINT_LIMIT < angle && angle < JOINT_LIMIT
}

/// The periodic image of `goal` closest to `via`, if any lies in the domain.
pub fn nearest_goal_image(goal: Point2, via: Point2) -> Option<Point2> {
    periodic_images(goal)
        .into_iter()
        .min_by(|a, b| a.distance_to(&via).total_cmp(&b.distance_to(&via)))
}

/// Build a random initial path from `start` to the periodic image of `goal`
/// nearest a random via point, expanded to `2 * samples + 1` waypoints.
pub fn create_path<R: Rng>(
    start: Point2,
    goal: Point2,
    samples: usize,
    rng: &mut R,
) -> Result<Vec<Point2>> {
    let via = Point2::new(
        rng.random_range(-JOINT_LIMIT..JOINT_LIMIT),
        rng.random_range(-JOINT_LIMIT..JOINT_LIMIT),
    );
    let target = nearest_goal_image(goal, via).ok_or_else(|| {
        EvolutionError::invalid_genotype(format!(
            "goal ({:.3}, {:.3}) has no periodic image inside the joint domain",
            goal.x, goal.y
        ))
    })?;
    ferguson_spline(&[start, via, target], samples)
}

/// Resize `path` to exactly `target` waypoints.
///
/// Short paths are re-splined with `ceil((target - 1) / (len - 1))` samples
/// per segment; any overshoot, like any over-long input, is removed by
/// deleting uniformly random interior points. Endpoints are never removed.
pub fn adjust_point_count<R: Rng>(
    path: Vec<Point2>,
    target: usize,
    rng: &mut R,
) -> Result<Vec<Point2>> {
    if target < 2 {
        return Err(EvolutionError::invalid_genotype(format!(
            "target waypoint count must be at least 2, got {}",
            target
        )));
    }
    if path.len() < 2 {
        return Err(EvolutionError::invalid_genotype(format!(
            "cannot resize a path of {} points",
            path.len()
        )));
    }

    let mut path = if path.len() < target {
        let k = (target - 1).div_ceil(path.len() - 1);
        ferguson_spline(&path, k)?
    } else {
        path
    };

    while path.len() > target {
        let index = rng.random_range(1..path.len() - 1);
        path.remove(index);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn polyline() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.5, -0.5),
            Point2::new(2.0, 2.0),
            Point2::new(-1.0, 3.0),
        ]
    }

    #[test]
    fn spline_keeps_endpoints_exactly() {
        let pts = polyline();
        for k in 1..6 {
            let curve = ferguson_spline(&pts, k).unwrap();
            assert_eq!(curve[0], pts[0]);
            assert_eq!(*curve.last().unwrap(), *pts.last().unwrap());
        }
    }

    #[test]
    fn spline_output_length() {
        let pts = polyline();
        assert_eq!(ferguson_spline(&pts, 3).unwrap().len(), 3 * 3 + 1);
        assert_eq!(ferguson_spline(&pts[..2], 10).unwrap().len(), 11);
    }

    #[test]
    fn spline_passes_through_interior_control_points() {
        let pts = polyline();
        let curve = ferguson_spline(&pts, 4).unwrap();
        // Segment i starts at index 4 * i with s = 0.
        assert_eq!(curve[4], pts[1]);
        assert_eq!(curve[8], pts[2]);
    }

    #[test]
    fn spline_of_straight_line_stays_on_line() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)];
        for p in ferguson_spline(&pts, 5).unwrap() {
            assert!((p.x - p.y).abs() < 1e-12);
        }
    }

    #[test]
    fn spline_rejects_degenerate_input() {
        assert!(matches!(
            ferguson_spline(&[Point2::new(0.0, 0.0)], 3),
            Err(EvolutionError::InvalidGenotype(_))
        ));
        assert!(ferguson_spline(&[], 3).is_err());
        assert!(ferguson_spline(&polyline(), 0).is_err());
        let nan = vec![Point2::new(0.0, 0.0), Point2::new(f64::NAN, 1.0)];
        assert!(ferguson_spline(&nan, 3).is_err());
    }

    #[test]
    fn goal_outside_domain_picks_wrapped_image() {
        let goal = Point2::new(3.0 * PI, 0.0);
        let images = periodic_images(goal);
        assert!(!images.is_empty());
        for image in &images {
            assert!(image.x > -JOINT_LIMIT && image.x < JOINT_LIMIT);
            assert!(image.y > -JOINT_LIMIT && image.y < JOINT_LIMIT);
        }

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let path = create_path(Point2::new(0.0, 0.0), goal, 3, &mut rng).unwrap();
            let end = *path.last().unwrap();
            assert!(end.x > -JOINT_LIMIT && end.x < JOINT_LIMIT);
            assert!((end.x - PI).abs() < 1e-9 || (end.x + PI).abs() < 1e-9);
        }
    }

    #[test]
    fn nearest_image_is_closest_to_via() {
        let goal = Point2::new(1.0, 1.0);
        let via = Point2::new(-5.0, -5.0);
        let chosen = nearest_goal_image(goal, via).unwrap();
        assert!((chosen.x - (1.0 - JOINT_PERIOD)).abs() < 1e-12);
        assert!((chosen.y - (1.0 - JOINT_PERIOD)).abs() < 1e-12);
    }

    #[test]
    fn create_path_has_fixed_length_and_starts_at_start() {
        let mut rng = StdRng::seed_from_u64(11);
        let start = Point2::new(0.5, -0.5);
        let path = create_path(start, Point2::new(1.0, 2.0), 3, &mut rng).unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(path[0], start);
    }

    #[test]
    fn create_path_rejects_unreachable_goal() {
        let mut rng = StdRng::seed_from_u64(1);
        let far = Point2::new(100.0, 0.0);
        assert!(create_path(Point2::new(0.0, 0.0), far, 3, &mut rng).is_err());
    }

    #[test]
    fn adjust_reaches_any_target() {
        let mut rng = StdRng::seed_from_u64(5);
        for len in 2..12 {
            for target in 2..15 {
                let path: Vec<Point2> = (0..len).map(|i| Point2::new(i as f64, (i * i) as f64)).collect();
                let first = path[0];
                let last = *path.last().unwrap();
                let adjusted = adjust_point_count(path, target, &mut rng).unwrap();
                assert_eq!(adjusted.len(), target, "len {} -> target {}", len, target);
                assert_eq!(adjusted[0], first);
                assert_eq!(*adjusted.last().unwrap(), last);
            }
        }
    }

    #[test]
    fn adjust_rejects_short_paths() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(adjust_point_count(vec![Point2::new(0.0, 0.0)], 7, &mut rng).is_err());
        assert!(adjust_point_count(polyline(), 1, &mut rng).is_err());
    }
}
