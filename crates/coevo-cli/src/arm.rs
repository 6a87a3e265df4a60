//! Demo collaborators: a planar two-link arm and segment predicates.
//!
//! These make the binary runnable end to end. Library users bring their
//! own kinematics and geometry.

use crate::config::{ArmEntry, ArmsConfig};
use coevo::prelude::*;

/// Two revolute joints per arm. Joint 1 is absolute, joint 2 is relative
/// to link 1.
#[derive(Debug, Clone)]
pub struct PlanarArm {
    arms: [ArmEntry; 2],
}

impl PlanarArm {
    pub fn new(config: &ArmsConfig) -> Self {
        Self { arms: [config.first, config.second] }
    }
}

impl ForwardKinematics for PlanarArm {
    fn forward_kinematics(&self, robot: RobotId, q: Point2) -> Result<Vec<Point2>> {
        let arm = &self.arms[robot.index()];
        let base = Point2::from(arm.base);
        let elbow = Point2::new(base.x + arm.links[0] * q.x.cos(), base.y + arm.links[0] * q.x.sin());
        let theta = q.x + q.y;
        let tip = Point2::new(elbow.x + arm.links[1] * theta.cos(), elbow.y + arm.links[1] * theta.sin());
        if !tip.is_finite() {
            return Err(EvolutionError::kinematics(robot, format!("non-finite joint configuration {:?}", q)));
        }
        Ok(vec![base, elbow, tip])
    }
}

/// Bounding-box broad phase plus exact segment and circle tests.
#[derive(Debug, Clone)]
pub struct PlanarGeometry {
    /// Boxes are grown by this much so circle checks near an endpoint
    /// are not skipped.
    margin: f64,
}

impl PlanarGeometry {
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }
}

impl CollisionGeometry for PlanarGeometry {
    fn roughly_intersect(&self, a: &Segment, b: &Segment) -> Result<bool> {
        let m = self.margin;
        let overlap = |a0: f64, a1: f64, b0: f64, b1: f64| a0.min(a1) - m <= b0.max(b1) && b0.min(b1) - m <= a0.max(a1);
        Ok(overlap(a.start.x, a.end.x, b.start.x, b.end.x) && overlap(a.start.y, a.end.y, b.start.y, b.end.y))
    }

    fn segments_intersect(&self, a: &Segment, b: &Segment) -> Result<bool> {
        let d1 = orientation(b.start, b.end, a.start);
        let d2 = orientation(b.start, b.end, a.end);
        let d3 = orientation(a.start, a.end, b.start);
        let d4 = orientation(a.start, a.end, b.end);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0)) && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0)) {
            return Ok(true);
        }
        Ok((d1 == 0.0 && on_segment(b, a.start))
            || (d2 == 0.0 && on_segment(b, a.end))
            || (d3 == 0.0 && on_segment(a, b.start))
            || (d4 == 0.0 && on_segment(a, b.end)))
    }

    fn segment_intersects_circle(&self, segment: &Segment, center: Point2, radius: f64) -> Result<bool> {
        if radius < 0.0 {
            return Err(EvolutionError::Geometry(format!("negative radius {}", radius)));
        }
        Ok(distance_to_segment(segment, center) <= radius)
    }
}

/// Twice the signed area of the triangle `(p, q, r)`.
fn orientation(p: Point2, q: Point2, r: Point2) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

/// Whether collinear point `p` lies within `s`'s bounding box.
fn on_segment(s: &Segment, p: Point2) -> bool {
    p.x >= s.start.x.min(s.end.x)
        && p.x <= s.start.x.max(s.end.x)
        && p.y >= s.start.y.min(s.end.y)
        && p.y <= s.start.y.max(s.end.y)
}

fn distance_to_segment(s: &Segment, p: Point2) -> f64 {
    let (dx, dy) = (s.end.x - s.start.x, s.end.y - s.start.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return s.start.distance_to(&p);
    }
    let t = (((p.x - s.start.x) * dx + (p.y - s.start.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(&Point2::new(s.start.x + t * dx, s.start.y + t * dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::new(Point2::new(x0, y0), Point2::new(x1, y1))
    }

    #[test]
    fn planar_arm_reaches_expected_points() {
        let arm = PlanarArm::new(&ArmsConfig::default());
        let chain = arm.forward_kinematics(RobotId::First, Point2::new(0.0, 0.0)).unwrap();
        assert_eq!(chain.len(), 3);
        assert!((chain[2].x - 1.8).abs() < 1e-12 && chain[2].y.abs() < 1e-12);

        let up = arm.forward_kinematics(RobotId::Second, Point2::new(FRAC_PI_2, 0.0)).unwrap();
        assert!((up[0].x - 2.0).abs() < 1e-12);
        assert!((up[2].x - 2.0).abs() < 1e-12 && (up[2].y - 1.8).abs() < 1e-12);
    }

    #[test]
    fn crossing_and_touching_segments_intersect() {
        let g = PlanarGeometry::new(0.1);
        assert!(g.segments_intersect(&seg(0.0, 0.0, 2.0, 2.0), &seg(0.0, 2.0, 2.0, 0.0)).unwrap());
        assert!(g.segments_intersect(&seg(0.0, 0.0, 1.0, 0.0), &seg(1.0, 0.0, 1.0, 1.0)).unwrap());
        assert!(g.segments_intersect(&seg(0.0, 0.0, 2.0, 0.0), &seg(1.0, 0.0, 3.0, 0.0)).unwrap());
        assert!(!g.segments_intersect(&seg(0.0, 0.0, 1.0, 0.0), &seg(0.0, 1.0, 1.0, 1.0)).unwrap());
        assert!(!g.segments_intersect(&seg(0.0, 0.0, 1.0, 0.0), &seg(2.0, 0.0, 3.0, 0.0)).unwrap());
    }

    #[test]
    fn circle_test_uses_closest_point() {
        let g = PlanarGeometry::new(0.1);
        let s = seg(0.0, 0.0, 1.0, 0.0);
        assert!(g.segment_intersects_circle(&s, Point2::new(0.5, 0.05), 0.1).unwrap());
        assert!(g.segment_intersects_circle(&s, Point2::new(1.05, 0.0), 0.1).unwrap());
        assert!(!g.segment_intersects_circle(&s, Point2::new(1.5, 0.0), 0.1).unwrap());
        assert!(g.segment_intersects_circle(&s, Point2::new(0.0, 0.0), -1.0).is_err());
    }

    #[test]
    fn broad_phase_respects_margin() {
        let tight = PlanarGeometry::new(0.0);
        let loose = PlanarGeometry::new(0.1);
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(1.05, 0.0, 2.0, 0.0);
        assert!(!tight.roughly_intersect(&a, &b).unwrap());
        assert!(loose.roughly_intersect(&a, &b).unwrap());
    }
}
