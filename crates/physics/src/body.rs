use glam::{Quat, Vec3};
use jenga_common::Pose;
use serde::{Deserialize, Serialize};

/// Stable handle to a body inside a physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub usize);

/// Collision shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Oriented box given by its half-extents in body space.
    Cuboid { half_extents: Vec3 },
    /// Infinite static half-space below the body's y, surface normal +Y.
    Ground,
}

impl Shape {
    pub fn cuboid(size: Vec3) -> Self {
        Self::Cuboid {
            half_extents: size * 0.5,
        }
    }

    /// Radius of a sphere around the body origin enclosing the shape.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Cuboid { half_extents } => half_extents.length(),
            Self::Ground => f32::INFINITY,
        }
    }
}

/// Surface response coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.0,
        }
    }
}

impl PhysicsMaterial {
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
        }
    }

    /// Coefficients used when two materials touch.
    pub fn combine(&self, other: &PhysicsMaterial) -> PhysicsMaterial {
        PhysicsMaterial {
            friction: (self.friction + other.friction) * 0.5,
            restitution: self.restitution.max(other.restitution),
        }
    }
}

/// A rigid body as stored by a world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Zero means static.
    pub mass: f32,
    pub shape: Shape,
    pub material: PhysicsMaterial,
}

impl RigidBody {
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    pub fn inverse_mass(&self) -> f32 {
        if self.is_static() { 0.0 } else { 1.0 / self.mass }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }
}

/// Construction parameters for a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub mass: f32,
    pub shape: Shape,
    pub material: PhysicsMaterial,
    pub pose: Pose,
}

impl BodyDesc {
    pub fn dynamic(mass: f32, shape: Shape) -> Self {
        Self {
            mass,
            shape,
            material: PhysicsMaterial::default(),
            pose: Pose::default(),
        }
    }

    /// Static ground whose surface sits at `height`.
    pub fn ground(height: f32) -> Self {
        Self {
            mass: 0.0,
            shape: Shape::Ground,
            material: PhysicsMaterial::default(),
            pose: Pose::from_position(Vec3::new(0.0, height, 0.0)),
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn build(&self) -> RigidBody {
        RigidBody {
            position: self.pose.position,
            orientation: self.pose.rotation,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: self.mass.max(0.0),
            shape: self.shape,
            material: self.material,
        }
    }
}
