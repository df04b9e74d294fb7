use glam::Vec3;
use jenga_common::{BlockId, Pose};
use serde::{Deserialize, Serialize};

use crate::palette::{NO_EMISSIVE, rgb};
use crate::pick::{Intersection, Ray, ray_box, ray_plane};

/// Float RGB triple in `0.0..=1.0`.
pub type Rgb = [f32; 3];

/// Stable handle to a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHandle(pub usize);

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene node {0:?} not found")]
    UnknownNode(NodeHandle),
}

/// Geometry of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Box with full edge lengths `size`, centred on the node pose.
    Box { size: Vec3 },
    /// Horizontal square at the pose height, extending `half_extent` on x and z.
    Plane { half_extent: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub base_color: Rgb,
    pub emissive: Rgb,
}

impl Material {
    pub fn new(base_color: Rgb) -> Self {
        Self {
            base_color,
            emissive: NO_EMISSIVE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub pose: Pose,
    pub material: Material,
    /// Block this node stands for, if any.
    pub user_data: Option<BlockId>,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Node {
    pub fn cuboid(size: Vec3, material: Material) -> Self {
        Self {
            kind: NodeKind::Box { size },
            pose: Pose::default(),
            material,
            user_data: None,
            visible: true,
            cast_shadow: true,
            receive_shadow: true,
        }
    }

    pub fn plane(half_extent: f32, height: f32, material: Material) -> Self {
        Self {
            kind: NodeKind::Plane { half_extent },
            pose: Pose::from_position(Vec3::new(0.0, height, 0.0)),
            material,
            user_data: None,
            visible: true,
            cast_shadow: false,
            receive_shadow: true,
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_user_data(mut self, id: BlockId) -> Self {
        self.user_data = Some(id);
        self
    }

    /// Ray parameter of the nearest hit on this node, if any.
    pub fn hit_distance(&self, ray: &Ray) -> Option<f32> {
        match self.kind {
            NodeKind::Box { size } => ray_box(ray, &self.pose, size * 0.5),
            NodeKind::Plane { half_extent } => ray_plane(ray, &self.pose, half_extent),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Rgb,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub position: Vec3,
    pub target: Vec3,
    pub intensity: f32,
    /// Cone half-angle in radians.
    pub angle: f32,
    pub cast_shadow: bool,
}

/// Environment: background, fog and lights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    pub background: Rgb,
    pub fog: Fog,
    pub ambient_intensity: f32,
    pub spot: SpotLight,
}

impl Default for SceneSettings {
    fn default() -> Self {
        let background = rgb(0x222222);
        Self {
            background,
            fog: Fog {
                color: background,
                near: 100.0,
                far: 200.0,
            },
            ambient_intensity: 0.5,
            spot: SpotLight {
                position: Vec3::new(0.0, 200.0, 0.0),
                target: Vec3::ZERO,
                intensity: 0.5,
                angle: std::f32::consts::FRAC_PI_8,
                cast_shadow: true,
            },
        }
    }
}

/// Flat scene graph. Nodes are addressed by handles that survive removal of
/// other nodes.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    pub settings: SceneSettings,
}

impl Scene {
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            nodes: Vec::new(),
            settings,
        }
    }

    pub fn add(&mut self, node: Node) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(Some(node));
        tracing::trace!(?handle, kind = ?node.kind, "node added");
        handle
    }

    pub fn remove(&mut self, handle: NodeHandle) -> Option<Node> {
        self.nodes.get_mut(handle.0).and_then(Option::take)
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle.0).and_then(Option::as_mut)
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Result<&mut Node, SceneError> {
        self.get_mut(handle).ok_or(SceneError::UnknownNode(handle))
    }

    pub fn pose(&self, handle: NodeHandle) -> Option<Pose> {
        self.get(handle).map(|n| n.pose)
    }

    pub fn set_pose(&mut self, handle: NodeHandle, pose: Pose) -> Result<(), SceneError> {
        self.node_mut(handle)?.pose = pose;
        Ok(())
    }

    pub fn set_emissive(&mut self, handle: NodeHandle, emissive: Rgb) -> Result<(), SceneError> {
        self.node_mut(handle)?.material.emissive = emissive;
        Ok(())
    }

    /// Live nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeHandle(i), n)))
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Every visible node the ray hits, nearest first.
    pub fn intersect(&self, ray: &Ray) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = self
            .nodes()
            .filter(|(_, node)| node.visible)
            .filter_map(|(handle, node)| {
                node.hit_distance(ray).map(|distance| Intersection {
                    node: handle,
                    distance,
                    point: ray.at(distance),
                    user_data: node.user_data,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
