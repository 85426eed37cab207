// Physics system using rapier2d

pub mod body;
mod collision;
mod debug;
mod query;
mod world;

pub use collision::{CollisionGroups, LayerMask};
pub use debug::{DebugColor, DebugGeometry, DebugVertex};
pub use query::{Body, BodyState, EnvironmentQuery, WorldProbe};
pub use world::{ColliderHandle, PhysicsWorld, RigidBodyHandle};

