//! Shared types used across the evaluator, operators, and controller.

use serde::{Deserialize, Serialize};
use rand::Rng;
use uuid::{Builder, Uuid};

/// A point in the two-dimensional joint space of a 2-joint arm,
/// or a point in the planar workspace when produced by kinematics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point2 {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

/// A link of an arm between two consecutive kinematic-chain endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point2,
    pub end: Point2,
}

impl Segment {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }
}

/// Which of the two coevolving arms a genotype controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum RobotId {
    First,
    Second,
}

impl RobotId {
    pub const ALL: [RobotId; 2] = [RobotId::First, RobotId::Second];

    /// The opposing arm, whose best individual this arm is evaluated against.
    pub fn other(self) -> RobotId {
        match self {
            RobotId::First => RobotId::Second,
            RobotId::Second => RobotId::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            RobotId::First => 0,
            RobotId::Second => 1,
        }
    }
}

impl std::fmt::Display for RobotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "robot-{}", self.index())
    }
}

/// Identity of a genotype.
///
/// Clones produced by selection keep their parent's id; every child
/// produced by crossover or mutation gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndividualId(pub Uuid);

impl IndividualId {
    /// A version-4 id whose random bits come from `rng`, so seeded runs
    /// assign the same ids.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self(Builder::from_random_bytes(rng.random()).into_uuid())
    }

    /// Deterministic id (for testing).
    pub fn from_seed(seed: u64) -> Self {
        Self(Uuid::from_u128(seed as u128))
    }
}

/// Whether an individual's cost has been computed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum EvalState {
    #[default]
    Unevaluated,
    Evaluated { fitness: f64 },
}

/// A candidate trajectory plus its cached evaluation metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub id: IndividualId,
    /// Waypoints in joint space.
    pub path: Vec<Point2>,
    pub eval: EvalState,
    /// Own path length plus the opposing best's path length.
    pub distance: f64,
    /// Sampled instants at which the two arms collide.
    pub collision: u32,
    /// Mean waypoint-wise distance to the rest of the population.
    pub diversity: f64,
    /// Evaluation rounds survived.
    pub age: u32,
    pub robot: RobotId,
}

impl Individual {
    /// A fresh, unevaluated, age-0 individual.
    pub fn new<R: Rng>(path: Vec<Point2>, robot: RobotId, rng: &mut R) -> Self {
        Self::offspring(path, 0, robot, rng)
    }

    /// A child genotype with cleared evaluation fields and the given age.
    pub fn offspring<R: Rng>(path: Vec<Point2>, age: u32, robot: RobotId, rng: &mut R) -> Self {
        Self {
            id: IndividualId::random(rng),
            path,
            eval: EvalState::Unevaluated,
            distance: 0.0,
            collision: 0,
            diversity: 0.0,
            age,
            robot,
        }
    }

    pub fn fitness(&self) -> Option<f64> {
        match self.eval {
            EvalState::Evaluated { fitness } => Some(fitness),
            EvalState::Unevaluated => None,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        matches!(self.eval, EvalState::Evaluated { .. })
    }
}

/// An ordered sequence of individuals for one robot and one age layer.
pub type Population = Vec<Individual>;

/// Position of an age layer, 0 being the youngest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct LayerIndex(pub usize);

impl LayerIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }

    /// The next-older layer.
    pub fn next(&self) -> LayerIndex {
        LayerIndex(self.0 + 1)
    }
}

impl std::fmt::Display for LayerIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// Start and goal joint configurations for one arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub start: Point2,
    pub goal: Point2,
}

impl Task {
    pub fn new(start: Point2, goal: Point2) -> Self {
        Self { start, goal }
    }
}
