// Rigid body and collider construction for the level and the character

use super::collision::CollisionGroups;
use rapier2d::prelude::*;

/// Builder for the two kinds of body the level uses
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    /// Dynamic body, moved by the solver
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Isometry::identity(),
            can_sleep: true,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Fixed body for floors and walls
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            ..Self::new_dynamic()
        }
    }

    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Keep the body upright regardless of contacts
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build()
    }
}

/// Builder for colliders tagged with a [`CollisionGroups`] category
pub struct ColliderBuilder2D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    friction: Real,
}

impl ColliderBuilder2D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            collision_groups: CollisionGroups::Default,
            friction: 0.5,
        }
    }

    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self::with_shape(SharedShape::cuboid(half_width, half_height))
    }

    /// Vertical capsule; `half_height` is the half length of the inner segment
    pub fn capsule(half_height: Real, radius: Real) -> Self {
        let a = point![0.0, -half_height];
        let b = point![0.0, half_height];
        Self::with_shape(SharedShape::capsule(a, b, radius))
    }

    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    pub fn build(self) -> Collider {
        ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .friction(self.friction)
            .restitution(0.0)
            .density(1.0)
            .build()
    }
}

/// Ready-made bodies and colliders for the character and the level
pub mod presets {
    use super::*;

    /// Upright dynamic body that never sleeps
    pub fn player_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .lock_rotation()
            .can_sleep(false)
            .build()
    }

    /// Capsule spanning `width` x `height`
    pub fn player_collider(width: Real, height: Real) -> Collider {
        let radius = width / 2.0;
        let half_height = ((height / 2.0) - radius).max(0.0);

        // Zero friction so the player does not stick to walls while sliding
        ColliderBuilder2D::capsule(half_height, radius)
            .collision_groups(CollisionGroups::Player)
            .friction(0.0)
            .build()
    }

    pub fn fixed_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Floor or platform the ground probe detects
    pub fn ground_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(CollisionGroups::Ground)
            .friction(0.3)
            .build()
    }

    /// Surface the wall probe detects
    pub fn wall_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(CollisionGroups::Wall)
            .friction(0.0)
            .build()
    }
}
