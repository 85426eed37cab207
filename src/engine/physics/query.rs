// The two physics primitives the locomotion controller consumes: a body it
// can read and overwrite, and an environment it can probe for overlaps.

use glam::Vec2;
use rapier2d::prelude::*;

use super::collision::LayerMask;
use super::world::{PhysicsWorld, RigidBodyHandle};

/// A physical body whose velocity and gravity scale the controller drives
pub trait Body {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    fn gravity_scale(&self) -> f32;
    fn set_gravity_scale(&mut self, scale: f32);
}

/// Spatial overlap queries against the level
pub trait EnvironmentQuery {
    /// True if a box of full extent `size` centred on `center` touches
    /// anything in `mask`
    fn overlaps(&self, center: Vec2, size: Vec2, mask: LayerMask) -> bool;
}

/// Detached copy of a rigid body's kinematic state
///
/// The controller runs against this copy so it can hold a mutable body and a
/// shared view of the physics world at the same time; the result is written
/// back with [`BodyState::apply_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
        }
    }
}

impl BodyState {
    pub fn new(position: Vec2, velocity: Vec2, gravity_scale: f32) -> Self {
        Self {
            position,
            velocity,
            gravity_scale,
        }
    }

    /// Snapshot a rapier rigid body
    pub fn from_rigid_body(body: &RigidBody) -> Self {
        let translation = body.translation();
        let linvel = body.linvel();
        Self {
            position: Vec2::new(translation.x, translation.y),
            velocity: Vec2::new(linvel.x, linvel.y),
            gravity_scale: body.gravity_scale(),
        }
    }

    /// Write velocity and gravity scale back. Position is owned by the solver.
    pub fn apply_to(&self, body: &mut RigidBody) {
        body.set_linvel(vector![self.velocity.x, self.velocity.y], true);
        if body.gravity_scale() != self.gravity_scale {
            body.set_gravity_scale(self.gravity_scale, true);
        }
    }
}

impl Body for BodyState {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }
}

/// Overlap queries against a [`PhysicsWorld`], ignoring the querying body
pub struct WorldProbe<'a> {
    world: &'a PhysicsWorld,
    exclude: Option<RigidBodyHandle>,
}

impl<'a> WorldProbe<'a> {
    pub fn new(world: &'a PhysicsWorld, exclude: Option<RigidBodyHandle>) -> Self {
        Self { world, exclude }
    }
}

impl EnvironmentQuery for WorldProbe<'_> {
    fn overlaps(&self, center: Vec2, size: Vec2, mask: LayerMask) -> bool {
        self.world.overlap_box(center, size, mask, self.exclude)
    }
}
