use glam::Vec2;
use rapier2d::prelude::*;

use super::world::PhysicsWorld;

pub type DebugColor = [f32; 4];

pub const COLOR_DYNAMIC: DebugColor = [0.0, 1.0, 0.0, 0.8];
pub const COLOR_FIXED: DebugColor = [0.5, 0.5, 0.5, 0.8];
pub const COLOR_KINEMATIC: DebugColor = [0.0, 0.5, 1.0, 0.8];
pub const COLOR_DETACHED: DebugColor = [1.0, 1.0, 1.0, 0.8];

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Renderer-agnostic debug wireframes as an indexed line list
///
/// Collects collider outlines and arbitrary boxes (such as the locomotion
/// probes); an external renderer uploads `vertex_bytes`/`indices` as-is.
#[derive(Debug, Default)]
pub struct DebugGeometry {
    vertices: Vec<DebugVertex>,
    indices: Vec<u16>,
}

impl DebugGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn vertices(&self) -> &[DebugVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Vertex data ready for a GPU upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn line_count(&self) -> usize {
        self.indices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Outline every collider in the world, coloured by body type
    pub fn draw_colliders(&mut self, world: &PhysicsWorld) {
        let data = world.debug_data();

        for (_handle, collider) in data.colliders.iter() {
            let color = match collider.parent().and_then(|h| data.rigid_bodies.get(h)) {
                Some(body) => match body.body_type() {
                    RigidBodyType::Dynamic => COLOR_DYNAMIC,
                    RigidBodyType::Fixed => COLOR_FIXED,
                    RigidBodyType::KinematicPositionBased
                    | RigidBodyType::KinematicVelocityBased => COLOR_KINEMATIC,
                },
                None => COLOR_DETACHED,
            };

            self.draw_collider_shape(collider, color);
        }
    }

    /// Axis-aligned box given its centre and full size
    pub fn draw_box(&mut self, center: Vec2, size: Vec2, color: DebugColor) {
        let transform = Isometry::translation(center.x, center.y);
        self.draw_box_with(&transform, vector![size.x * 0.5, size.y * 0.5], color);
    }

    fn draw_collider_shape(&mut self, collider: &Collider, color: DebugColor) {
        let transform = *collider.position();
        let shape = collider.shape();

        if let Some(cuboid) = shape.as_cuboid() {
            self.draw_box_with(&transform, cuboid.half_extents, color);
        } else if let Some(ball) = shape.as_ball() {
            self.draw_circle(&transform, ball.radius, color);
        } else if let Some(capsule) = shape.as_capsule() {
            let a = transform * Translation::from(capsule.segment.a.coords);
            let b = transform * Translation::from(capsule.segment.b.coords);
            self.draw_circle(&a, capsule.radius, color);
            self.draw_circle(&b, capsule.radius, color);

            let perp = vector![capsule.radius, 0.0];
            self.push_segment(
                &transform,
                capsule.segment.a + perp,
                capsule.segment.b + perp,
                color,
            );
            self.push_segment(
                &transform,
                capsule.segment.a - perp,
                capsule.segment.b - perp,
                color,
            );
        } else {
            self.draw_cross(&transform, 0.5, color);
        }
    }

    fn draw_box_with(
        &mut self,
        transform: &Isometry<Real>,
        half_extents: Vector<Real>,
        color: DebugColor,
    ) {
        let start_idx = self.vertices.len() as u16;

        let corners = [
            point![-half_extents.x, -half_extents.y],
            point![half_extents.x, -half_extents.y],
            point![half_extents.x, half_extents.y],
            point![-half_extents.x, half_extents.y],
        ];
        for corner in &corners {
            self.push_vertex(transform * corner, color);
        }

        for i in 0..4 {
            self.indices.push(start_idx + i);
            self.indices.push(start_idx + (i + 1) % 4);
        }
    }

    fn draw_circle(&mut self, transform: &Isometry<Real>, radius: Real, color: DebugColor) {
        const SEGMENTS: u16 = 16;
        let start_idx = self.vertices.len() as u16;

        for i in 0..SEGMENTS {
            let angle = (i as f32 / SEGMENTS as f32) * std::f32::consts::TAU;
            let point = transform * point![angle.cos() * radius, angle.sin() * radius];
            self.push_vertex(point, color);

            self.indices.push(start_idx + i);
            self.indices.push(start_idx + (i + 1) % SEGMENTS);
        }
    }

    fn draw_cross(&mut self, transform: &Isometry<Real>, size: Real, color: DebugColor) {
        self.push_segment(transform, point![-size, 0.0], point![size, 0.0], color);
        self.push_segment(transform, point![0.0, -size], point![0.0, size], color);
    }

    fn push_segment(
        &mut self,
        transform: &Isometry<Real>,
        a: Point<Real>,
        b: Point<Real>,
        color: DebugColor,
    ) {
        let start_idx = self.vertices.len() as u16;
        self.push_vertex(transform * a, color);
        self.push_vertex(transform * b, color);
        self.indices.push(start_idx);
        self.indices.push(start_idx + 1);
    }

    fn push_vertex(&mut self, point: Point<Real>, color: DebugColor) {
        self.vertices.push(DebugVertex {
            position: [point.x, point.y],
            color,
        });
    }
}
