//! Player physics against the block grid.
//!
//! # Invariants
//! - After a step the player's box does not overlap any solid cell; it is kept
//!   at least [`PhysicsConfig::skin`] away from blocked cell boundaries.
//! - Horizontal motion is resolved x first, then y, then vertical motion, each
//!   against the grid as left by the previous axis.
//! - Jumping is only possible from the ground; otherwise it is ignored.

use crate::grid::WorldGrid;
use crate::player::{MotionState, PlayerState};
use blockspace_common::{Aabb, BlockPos};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Tunables for the solver. Distances in blocks, times in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration.
    pub gravity: f32,
    /// Upward speed given by a jump.
    pub jump_speed: f32,
    /// Horizontal speed at full movement input.
    pub walk_speed: f32,
    /// Maximum falling speed.
    pub terminal_speed: f32,
    /// Gap kept between the player and a blocking cell.
    pub skin: f32,
    /// How far below the feet a solid cell still counts as ground.
    pub ground_epsilon: f32,
    /// Cap on every velocity component, so one step sweeps a bounded distance.
    pub max_speed: f32,
    /// Longer steps are shortened to this.
    pub max_dt: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 19.6,
            jump_speed: 7.0,
            walk_speed: 5.0,
            terminal_speed: 50.0,
            skin: 1e-3,
            ground_epsilon: 1e-2,
            max_speed: 100.0,
            max_dt: 1.0,
        }
    }
}

/// Per-step movement request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepInput {
    /// Desired horizontal velocity in world space.
    pub wish_velocity: Vec2,
    pub jump: bool,
}

/// What happened during a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub jumped: bool,
    pub landed: bool,
    pub left_ground: bool,
    /// Axes (x, y, z) on which movement was cut short by a block.
    pub blocked: [bool; 3],
}

/// Physics failures. These indicate a bug upstream, never a gameplay outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhysicsError {
    #[error("invalid physics state: {0} is not finite")]
    InvalidState(&'static str),
    #[error("invalid physics state: {0} must be positive")]
    NonPositive(&'static str),
    #[error("invalid physics state: {0} must not be negative")]
    Negative(&'static str),
}

/// Collision and gravity solver for axis-aligned actors.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: PhysicsConfig,
}

impl Solver {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advance `player` by `dt` seconds.
    ///
    /// Inputs are validated before anything is written; on error the player is
    /// left untouched.
    pub fn step(
        &self,
        player: &mut PlayerState,
        grid: &WorldGrid,
        input: &StepInput,
        dt: f32,
    ) -> Result<StepReport, PhysicsError> {
        validate(player, input, dt)?;

        let cfg = &self.config;
        if dt > cfg.max_dt {
            tracing::debug!(dt, max_dt = cfg.max_dt, "shortening long step");
        }
        let dt = dt.min(cfg.max_dt);
        let mut report = StepReport::default();
        let mut motion = player.motion;
        let mut vel = player.velocity;

        if input.jump {
            if motion == MotionState::Grounded {
                vel.z = cfg.jump_speed;
                motion = MotionState::Airborne;
                report.jumped = true;
            } else {
                tracing::trace!("jump ignored while airborne");
            }
        }

        match motion {
            MotionState::Grounded => vel.z = 0.0,
            MotionState::Airborne => {
                vel.z = (vel.z - cfg.gravity * dt).max(-cfg.terminal_speed);
            }
        }
        vel.x = input.wish_velocity.x;
        vel.y = input.wish_velocity.y;
        vel = vel.clamp(Vec3::splat(-cfg.max_speed), Vec3::splat(cfg.max_speed));

        let mut aabb = player.aabb();
        for axis in 0..3 {
            let wanted = vel[axis] * dt;
            let (moved, blocked) = self.sweep_axis(grid, &aabb, axis, wanted);
            aabb = translate_axis(&aabb, axis, moved);
            if blocked {
                report.blocked[axis] = true;
                if axis == 2 && wanted < 0.0 && motion == MotionState::Airborne {
                    motion = MotionState::Grounded;
                    report.landed = true;
                }
                vel[axis] = 0.0;
            }
        }

        let supported = self.has_support(grid, &aabb);
        match motion {
            MotionState::Airborne if supported && vel.z <= 0.0 => {
                motion = MotionState::Grounded;
                vel.z = 0.0;
                report.landed = true;
            }
            MotionState::Grounded if !supported => {
                motion = MotionState::Airborne;
                report.left_ground = true;
            }
            _ => {}
        }
        if motion == MotionState::Grounded {
            // Settle onto the surface so resting height does not drift.
            let (moved, _) = self.sweep_axis(grid, &aabb, 2, -cfg.ground_epsilon);
            aabb = translate_axis(&aabb, 2, moved);
        }

        if report.landed {
            tracing::debug!(feet = aabb.min.z, "player landed");
        }

        player.position = aabb.center();
        player.velocity = vel;
        player.motion = motion;
        Ok(report)
    }

    /// True if a solid cell lies directly beneath the box, within the ground
    /// epsilon of its bottom face.
    pub fn has_support(&self, grid: &WorldGrid, aabb: &Aabb) -> bool {
        let feet = aabb.min.z;
        let Some(layer) = cell_index(feet - self.config.ground_epsilon) else {
            return false;
        };
        if layer as f32 + 1.0 > feet + self.config.skin {
            // The candidate layer overlaps the box instead of lying under it.
            return false;
        }
        layer_has_solid(grid, aabb, 2, layer)
    }

    /// Move `aabb` by `delta` along `axis`, stopping short of the first solid
    /// layer of cells in the way. Returns the distance actually moved and
    /// whether a block was hit.
    fn sweep_axis(
        &self,
        grid: &WorldGrid,
        aabb: &Aabb,
        axis: usize,
        delta: f32,
    ) -> (f32, bool) {
        let skin = self.config.skin;
        if delta > 0.0 {
            let hi = aabb.max[axis];
            let (Some(first), Some(last)) = (cell_index(hi), cell_index((hi + delta).ceil() - 1.0))
            else {
                return (delta, false);
            };
            for layer in first..=last {
                if layer_has_solid(grid, aabb, axis, layer) {
                    let allowed = (layer as f32 - skin - hi).max(0.0);
                    return (allowed.min(delta), true);
                }
            }
        } else if delta < 0.0 {
            let lo = aabb.min[axis];
            let (Some(first), Some(last)) = (cell_index(lo.ceil() - 1.0), cell_index(lo + delta))
            else {
                return (delta, false);
            };
            for layer in (last..=first).rev() {
                if layer_has_solid(grid, aabb, axis, layer) {
                    let allowed = ((layer + 1) as f32 + skin - lo).min(0.0);
                    return (allowed.max(delta), true);
                }
            }
        }
        (delta, false)
    }
}

/// Index of the cell layer containing `v`; `None` outside the `i32` range,
/// where no block can exist.
fn cell_index(v: f32) -> Option<i32> {
    let f = v.floor();
    (f >= i32::MIN as f32 && f < i32::MAX as f32).then_some(f as i32)
}

/// Is any cell solid in the slab `layer` along `axis`, restricted to the box's
/// footprint on the other two axes?
fn layer_has_solid(grid: &WorldGrid, aabb: &Aabb, axis: usize, layer: i32) -> bool {
    let (a, b) = match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };
    let (a0, a1) = aabb.cell_span(a);
    let (b0, b1) = aabb.cell_span(b);
    for i in a0..=a1 {
        for j in b0..=b1 {
            let mut c = [0i32; 3];
            c[axis] = layer;
            c[a] = i;
            c[b] = j;
            if grid.is_solid(BlockPos::new(c[0], c[1], c[2])) {
                return true;
            }
        }
    }
    false
}

fn translate_axis(aabb: &Aabb, axis: usize, amount: f32) -> Aabb {
    let mut delta = Vec3::ZERO;
    delta[axis] = amount;
    aabb.translated(delta)
}

fn validate(player: &PlayerState, input: &StepInput, dt: f32) -> Result<(), PhysicsError> {
    if !player.position.is_finite() {
        return Err(PhysicsError::InvalidState("position"));
    }
    if !player.velocity.is_finite() {
        return Err(PhysicsError::InvalidState("velocity"));
    }
    if !player.half_extents.is_finite() {
        return Err(PhysicsError::InvalidState("half extents"));
    }
    if player.half_extents.min_element() <= 0.0 {
        return Err(PhysicsError::NonPositive("half extents"));
    }
    if !input.wish_velocity.is_finite() {
        return Err(PhysicsError::InvalidState("wish velocity"));
    }
    if !dt.is_finite() {
        return Err(PhysicsError::InvalidState("time step"));
    }
    if dt < 0.0 {
        return Err(PhysicsError::Negative("time step"));
    }
    Ok(())
}
