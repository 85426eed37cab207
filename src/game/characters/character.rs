// Character entity: one locomotion controller bound to one rapier body

use glam::Vec2;

use crate::engine::input::IntentEvent;
use crate::engine::physics::{
    body::presets, BodyState, ColliderHandle, DebugColor, DebugGeometry, PhysicsWorld,
    RigidBodyHandle, WorldProbe,
};

use super::animation::{clips, AnimationEvent, AnimationPlayer, PresentationAdapter};
use super::locomotion::{LocomotionController, ProbeKind};
use super::state::{LocomotionSnapshot, LocomotionState};
use super::stats::{ConfigError, LocomotionConfig};

const GROUND_PROBE_COLOR: DebugColor = [1.0, 0.85, 0.0, 0.9];
const WALL_PROBE_COLOR: DebugColor = [1.0, 0.3, 0.3, 0.9];

/// A player-controlled character in the level
#[derive(Debug)]
pub struct Character {
    /// Display name, used in logs
    pub name: String,

    // Physics
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,

    pub controller: LocomotionController,
    pub animation: AnimationPlayer,
}

impl Character {
    /// Validate `config`, then create the body and collider in `physics`
    pub fn new(
        name: &str,
        config: LocomotionConfig,
        physics: &mut PhysicsWorld,
        spawn_x: f32,
        spawn_y: f32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let body_handle = physics.add_rigid_body(presets::player_body(spawn_x, spawn_y));
        let collider = presets::player_collider(config.width, config.height);
        let collider_handle = physics.add_collider(collider, body_handle);

        log::info!("Spawned '{}' at ({:.2}, {:.2})", name, spawn_x, spawn_y);

        Ok(Self {
            name: name.to_string(),
            body_handle,
            collider_handle,
            controller: LocomotionController::new(config),
            animation: AnimationPlayer::with_standard_animations(),
        })
    }

    /// Apply an intent immediately against the live body
    pub fn handle_intent(&mut self, event: IntentEvent, physics: &mut PhysicsWorld) {
        let Some(body) = physics.get_rigid_body_mut(self.body_handle) else {
            return;
        };

        let mut state = BodyState::from_rigid_body(body);
        self.controller.handle_intent(event, &mut state);
        state.apply_to(body);
    }

    /// Run one controller step. Call before `PhysicsWorld::step`.
    pub fn fixed_update(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        let Some(mut state) = physics
            .get_rigid_body(self.body_handle)
            .map(BodyState::from_rigid_body)
        else {
            return;
        };

        let probe = WorldProbe::new(physics, Some(self.body_handle));
        self.controller.fixed_update(dt, &mut state, &probe);

        if let Some(body) = physics.get_rigid_body_mut(self.body_handle) {
            state.apply_to(body);
        }
    }

    /// Push the snapshot to the animator, advance it, and route clip
    /// completions back into the controller
    pub fn update_animation(&mut self, physics: &PhysicsWorld, dt: f32) {
        let snapshot = self.snapshot(physics);
        PresentationAdapter::sync(&snapshot, &mut self.animation);
        self.animation.update(dt);

        for event in self.animation.drain_events() {
            let AnimationEvent::Finished { clip } = event;
            if clip == clips::ROLL {
                self.controller.end_roll();
            } else if clip == clips::ATTACK {
                self.controller.end_attack();
            }
        }
    }

    pub fn snapshot(&self, physics: &PhysicsWorld) -> LocomotionSnapshot {
        let vertical_speed = self.velocity(physics).map(|v| v.y).unwrap_or(0.0);
        self.controller.state().snapshot(vertical_speed)
    }

    pub fn state(&self) -> &LocomotionState {
        self.controller.state()
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.get_rigid_body(self.body_handle).map(|body| {
            let pos = body.translation();
            Vec2::new(pos.x, pos.y)
        })
    }

    pub fn velocity(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.get_rigid_body(self.body_handle).map(|body| {
            let vel = body.linvel();
            Vec2::new(vel.x, vel.y)
        })
    }

    /// Draw the ground and wall probes at the body's current position
    pub fn draw_debug(&self, physics: &PhysicsWorld, geometry: &mut DebugGeometry) {
        let Some(body) = physics.get_rigid_body(self.body_handle) else {
            return;
        };

        let state = BodyState::from_rigid_body(body);
        for region in self.controller.probe_regions(&state) {
            let color = match region.kind {
                ProbeKind::Ground => GROUND_PROBE_COLOR,
                ProbeKind::Wall => WALL_PROBE_COLOR,
            };
            geometry.draw_box(region.center, region.size, color);
        }
    }
}
