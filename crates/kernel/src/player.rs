use blockspace_common::Aabb;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Vertical motion state of an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    #[default]
    Airborne,
    Grounded,
}

/// Kinematic state of the player, advanced once per tick by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Centre of the bounding box.
    pub position: Vec3,
    pub velocity: Vec3,
    /// Heading in degrees around +Z; 0 looks along +Y.
    pub yaw: f32,
    /// Degrees above the horizon.
    pub pitch: f32,
    pub motion: MotionState,
    pub half_extents: Vec3,
}

impl PlayerState {
    /// A player at rest, airborne until the first step finds ground.
    pub fn new(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            motion: MotionState::Airborne,
            half_extents,
        }
    }

    /// Player standing with its feet at `feet`.
    pub fn standing_at(feet: Vec3, half_extents: Vec3) -> Self {
        Self::new(feet + Vec3::Z * half_extents.z, half_extents)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents)
    }

    /// Height of the bottom face.
    pub fn feet(&self) -> f32 {
        self.position.z - self.half_extents.z
    }

    pub fn is_grounded(&self) -> bool {
        self.motion == MotionState::Grounded
    }

    /// Unit view direction from yaw and pitch.
    pub fn look_direction(&self) -> Vec3 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        Vec3::new(-sy * cp, cy * cp, sp)
    }

    /// Turn by a look delta in degrees. Pitch is clamped to `±max_pitch`, yaw
    /// wraps into `[0, 360)`.
    pub fn apply_look(&mut self, delta_yaw: f32, delta_pitch: f32, max_pitch: f32) {
        if !delta_yaw.is_finite() || !delta_pitch.is_finite() {
            tracing::warn!(delta_yaw, delta_pitch, "ignoring non-finite look delta");
            return;
        }
        self.yaw = (self.yaw + delta_yaw).rem_euclid(360.0);
        self.pitch = (self.pitch + delta_pitch).clamp(-max_pitch, max_pitch);
    }

    /// World-space horizontal velocity for movement axes relative to the
    /// heading: `x` strafes right, `y` moves forward. Input longer than 1 is
    /// scaled down so diagonals are not faster.
    pub fn wish_velocity(&self, axes: Vec2, speed: f32) -> Vec2 {
        let axes = if axes.length_squared() > 1.0 {
            axes.normalize()
        } else {
            axes
        };
        let (s, c) = self.yaw.to_radians().sin_cos();
        Vec2::new(axes.x * c - axes.y * s, axes.x * s + axes.y * c) * speed
    }
}
