use glam::Vec2;
use rapier2d::parry::shape::Cuboid;
use rapier2d::prelude::*;

use super::collision::LayerMask;

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier2d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier2d::prelude::ColliderHandle;

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for probe overlap tests
    query_pipeline: QueryPipeline,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,
}

impl PhysicsWorld {
    /// Gravity tuned for platformer jumps (stronger than real-world)
    pub const PLATFORMER_GRAVITY: f32 = -30.0;

    /// Create a new physics world with platformer gravity
    pub fn new() -> Self {
        Self::with_gravity(vector![0.0, Self::PLATFORMER_GRAVITY])
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    ///
    /// The query pipeline is refreshed as part of the step, so overlap
    /// queries only see colliders inserted before the most recent step.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable reference to a rigid body
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Test whether an axis-aligned box overlaps any collider in `mask`
    ///
    /// `size` is the full extent of the box, not the half extent. An empty
    /// mask never overlaps anything.
    pub fn overlap_box(
        &self,
        center: Vec2,
        size: Vec2,
        mask: LayerMask,
        exclude: Option<RigidBodyHandle>,
    ) -> bool {
        if mask.is_empty() {
            return false;
        }

        let shape = Cuboid::new(vector![size.x * 0.5, size.y * 0.5]);
        let shape_pos = Isometry::translation(center.x, center.y);

        let mut filter = QueryFilter::default().groups(mask.query_groups());
        if let Some(handle) = exclude {
            filter = filter.exclude_rigid_body(handle);
        }

        self.query_pipeline
            .intersection_with_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &shape,
                filter,
            )
            .is_some()
    }

    /// Set the timestep for physics simulation
    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }

    /// Get references to internal components for debug rendering
    pub fn debug_data(&self) -> DebugData<'_> {
        DebugData {
            rigid_bodies: &self.rigid_body_set,
            colliders: &self.collider_set,
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Data structure for debug rendering
pub struct DebugData<'a> {
    pub rigid_bodies: &'a RigidBodySet,
    pub colliders: &'a ColliderSet,
}
