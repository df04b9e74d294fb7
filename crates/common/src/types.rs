use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Index tag of a block in the tower.
///
/// Block ids are dense: a tower of `n` blocks uses ids `0..n`, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub usize);

impl BlockId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rigid placement in world space: position plus orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Whether two poses describe the same placement within `eps`.
    ///
    /// `q` and `-q` are the same rotation, so orientation is compared by the
    /// absolute dot product.
    pub fn approx_eq(&self, other: &Pose, eps: f32) -> bool {
        self.position.distance(other.position) <= eps
            && 1.0 - self.rotation.dot(other.rotation).abs() <= eps
    }
}

/// Round to one decimal place, halves rounding up (towards +inf).
pub fn round_tenths(value: f32) -> f32 {
    (value * 10.0 + 0.5).floor() / 10.0
}
