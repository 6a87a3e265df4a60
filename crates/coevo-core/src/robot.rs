//! Collaborator traits for arm kinematics and collision geometry.
//!
//! The evolutionary engine never computes link positions or intersections
//! itself. It calls these traits, and any error they return aborts the
//! evaluation of the individual being scored.

use crate::error::Result;
use crate::types::{Point2, RobotId, Segment};

/// Maps a joint configuration to the chain of link endpoints.
pub trait ForwardKinematics: Send + Sync {
    /// Link-chain endpoints, base first. A 2-joint arm returns 3 points.
    fn forward_kinematics(&self, robot: RobotId, config: Point2) -> Result<Vec<Point2>>;
}

/// Intersection predicates between arm links.
pub trait CollisionGeometry: Send + Sync {
    /// Cheap bounding pre-filter. A `false` here skips the exact tests.
    fn roughly_intersect(&self, a: &Segment, b: &Segment) -> Result<bool>;

    /// Exact segment-segment intersection.
    fn segments_intersect(&self, a: &Segment, b: &Segment) -> Result<bool>;

    /// Whether `segment` passes within `radius` of `center`.
    fn segment_intersects_circle(&self, segment: &Segment, center: Point2, radius: f64) -> Result<bool>;
}

impl<T: ForwardKinematics + ?Sized> ForwardKinematics for &T {
    fn forward_kinematics(&self, robot: RobotId, config: Point2) -> Result<Vec<Point2>> {
        (**self).forward_kinematics(robot, config)
    }
}

impl<T: CollisionGeometry + ?Sized> CollisionGeometry for &T {
    fn roughly_intersect(&self, a: &Segment, b: &Segment) -> Result<bool> {
        (**self).roughly_intersect(a, b)
    }

    fn segments_intersect(&self, a: &Segment, b: &Segment) -> Result<bool> {
        (**self).segments_intersect(a, b)
    }

    fn segment_intersects_circle(&self, segment: &Segment, center: Point2, radius: f64) -> Result<bool> {
        (**self).segment_intersects_circle(segment, center, radius)
    }
}
