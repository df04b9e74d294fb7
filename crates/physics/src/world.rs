use std::collections::HashSet;

use glam::{Quat, Vec3};
use jenga_common::Pose;
use serde::{Deserialize, Serialize};

use crate::backend::{PhysicsBackend, PhysicsError};
use crate::body::{BodyDesc, BodyHandle, PhysicsMaterial, RigidBody};
use crate::contact::contact_between;

/// World-wide solver settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub gravity: Vec3,
    /// Maximum projection passes per step.
    pub solver_iterations: u32,
    /// A pass whose largest correction is at or below this ends the solve early.
    pub tolerance: f32,
    /// Fraction of linear velocity lost per second.
    pub linear_damping: f32,
    /// Fraction of angular velocity lost per second.
    pub angular_damping: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -10.0, 0.0),
            solver_iterations: 50,
            tolerance: 0.0,
            linear_damping: 0.01,
            angular_damping: 0.01,
        }
    }
}

/// Impact speed below which contacts do not bounce.
const BOUNCE_THRESHOLD: f32 = 0.5;

/// A contact seen during one step, from one body's point of view.
#[derive(Debug, Clone, Copy)]
struct ContactRecord {
    /// Direction the body was pushed.
    normal: Vec3,
    material: PhysicsMaterial,
}

/// Position-based rigid box world.
///
/// Each step integrates velocities, projects penetrations apart in
/// Gauss-Seidel passes, then re-derives velocities from the corrected motion.
#[derive(Debug, Clone, Default)]
pub struct BoxWorld {
    config: WorldConfig,
    bodies: Vec<Option<RigidBody>>,
    steps: u64,
}

impl BoxWorld {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            steps: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Handles of all live bodies in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_some())
            .map(|(i, _)| BodyHandle(i))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        self.bodies
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        let linear_keep = (1.0 - self.config.linear_damping).clamp(0.0, 1.0).powf(dt);
        let angular_keep = (1.0 - self.config.angular_damping).clamp(0.0, 1.0).powf(dt);

        for body in self.bodies.iter_mut().flatten() {
            if body.is_static() {
                continue;
            }
            body.velocity = (body.velocity + gravity * dt) * linear_keep;
            body.angular_velocity *= angular_keep;
            body.position += body.velocity * dt;
            body.orientation =
                (Quat::from_scaled_axis(body.angular_velocity * dt) * body.orientation).normalize();
        }
    }

    /// Project overlapping pairs apart. Returns the contacts touched per body slot.
    fn solve(&mut self) -> Vec<Vec<ContactRecord>> {
        let live: Vec<usize> = self
            .bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_some())
            .map(|(i, _)| i)
            .collect();
        let mut contacts: Vec<Vec<ContactRecord>> = vec![Vec::new(); self.bodies.len()];
        let mut recorded: HashSet<(usize, usize)> = HashSet::new();

        for pass in 0..self.config.solver_iterations {
            let mut largest = 0.0_f32;

            for (n, &i) in live.iter().enumerate() {
                for &j in &live[n + 1..] {
                    let (Some(a), Some(b)) = (self.bodies[i], self.bodies[j]) else {
                        continue;
                    };
                    let (wa, wb) = (a.inverse_mass(), b.inverse_mass());
                    if wa + wb == 0.0 {
                        continue;
                    }
                    let Some(contact) = contact_between(&a, &b) else {
                        continue;
                    };

                    let push = contact.normal * (contact.depth / (wa + wb));
                    if let Some(body) = self.bodies[i].as_mut() {
                        body.position -= push * wa;
                    }
                    if let Some(body) = self.bodies[j].as_mut() {
                        body.position += push * wb;
                    }
                    largest = largest.max(contact.depth);

                    if recorded.insert((i, j)) {
                        let material = a.material.combine(&b.material);
                        contacts[i].push(ContactRecord {
                            normal: -contact.normal,
                            material,
                        });
                        contacts[j].push(ContactRecord {
                            normal: contact.normal,
                            material,
                        });
                    }
                }
            }

            if largest <= self.config.tolerance {
                tracing::trace!(pass, "solver converged");
                break;
            }
        }
        contacts
    }
}

impl PhysicsBackend for BoxWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len());
        self.bodies.push(Some(desc.build()));
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        self.bodies.get_mut(handle.0).and_then(Option::take)
    }

    fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.0).and_then(Option::as_ref)
    }

    fn set_pose(&mut self, handle: BodyHandle, pose: Pose) -> Result<(), PhysicsError> {
        let body = self.body_mut(handle)?;
        body.position = pose.position;
        body.orientation = pose.rotation;
        Ok(())
    }

    fn set_velocity(
        &mut self,
        handle: BodyHandle,
        linear: Vec3,
        angular: Vec3,
    ) -> Result<(), PhysicsError> {
        let body = self.body_mut(handle)?;
        body.velocity = linear;
        body.angular_velocity = angular;
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let _span = tracing::trace_span!("physics_step", step = self.steps).entered();

        let before: Vec<Option<Vec3>> = self.bodies.iter().map(|b| b.map(|b| b.position)).collect();

        self.integrate(dt);
        // Velocities going into the solve, for restitution.
        let incoming: Vec<Option<Vec3>> =
            self.bodies.iter().map(|b| b.map(|b| b.velocity)).collect();
        let contacts = self.solve();

        for (slot, body) in self.bodies.iter_mut().enumerate() {
            let Some(body) = body.as_mut() else { continue };
            if body.is_static() {
                continue;
            }
            let (Some(start), Some(v_in)) = (before[slot], incoming[slot]) else {
                continue;
            };

            let mut velocity = (body.position - start) / dt;
            for record in &contacts[slot] {
                let n = record.normal;
                let approach = v_in.dot(n);
                let normal_speed = velocity.dot(n);
                let rebound = if approach < -BOUNCE_THRESHOLD {
                    -approach * record.material.restitution
                } else {
                    0.0
                };
                let tangential = velocity - n * normal_speed;
                let friction = record.material.friction.clamp(0.0, 1.0);
                velocity = n * normal_speed.max(rebound) + tangential * (1.0 - friction);
            }
            body.velocity = velocity;
        }

        self.steps += 1;
    }

    fn clear(&mut self) {
        self.bodies.clear();
    }

    fn body_count(&self) -> usize {
        self.bodies.iter().flatten().count()
    }
}
