//! Voxel ray traversal (grid DDA).
//!
//! The ray walks from cell to cell one boundary crossing at a time and stops at
//! the first solid cell it enters. When a crossing lies exactly on an edge or
//! corner, the axis with the smallest traversal parameter wins; exact ties go
//! to x, then y, then z. That order decides which face a placed block lands on,
//! so it is part of the contract.

use crate::grid::WorldGrid;
use blockspace_common::{BlockPos, Face};
use glam::Vec3;

/// Upper bound on boundary crossings per cast.
pub const MAX_TRAVERSAL_STEPS: u32 = 4096;

/// Result of a ray that entered a solid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The solid cell that was entered.
    pub block: BlockPos,
    /// The empty cell the ray came from; where a new block would be placed.
    pub face: BlockPos,
    /// Face of `block` the ray crossed, pointing back towards the origin.
    pub normal: Face,
    /// Distance along the ray to the crossing.
    pub distance: f32,
}

/// Cast a ray through the grid.
///
/// `direction` need not be normalised. Returns `None` (a miss) when nothing
/// solid is entered within `max_distance`, when the traversal cap is reached,
/// when the ray would step past the `i32` coordinate range, or when the inputs
/// are degenerate (zero or non-finite direction, non-finite origin or one
/// outside the coordinate range, negative distance). The origin cell itself is
/// never tested.
pub fn cast_ray(
    grid: &WorldGrid,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<RayHit> {
    if !origin.is_finite()
        || !direction.is_finite()
        || max_distance.is_nan()
        || max_distance < 0.0
    {
        return None;
    }
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }

    let mut cell = [0i32; 3];
    for axis in 0..3 {
        cell[axis] = cell_index(origin[axis])?;
    }
    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];

    for axis in 0..3 {
        let d = dir[axis];
        if d > 0.0 {
            step[axis] = 1;
            t_max[axis] = ((cell[axis] + 1) as f32 - origin[axis]) / d;
            t_delta[axis] = 1.0 / d;
        } else if d < 0.0 {
            step[axis] = -1;
            t_max[axis] = (cell[axis] as f32 - origin[axis]) / d;
            t_delta[axis] = -1.0 / d;
        }
    }

    for _ in 0..MAX_TRAVERSAL_STEPS {
        let axis = next_axis(&t_max);
        let t = t_max[axis];
        if t > max_distance {
            return None;
        }

        let previous = BlockPos::new(cell[0], cell[1], cell[2]);
        cell[axis] = cell[axis].checked_add(step[axis])?;
        t_max[axis] += t_delta[axis];

        let entered = BlockPos::new(cell[0], cell[1], cell[2]);
        if grid.is_solid(entered) {
            return Some(RayHit {
                block: entered,
                face: previous,
                normal: Face::from_axis(axis, step[axis] < 0),
                distance: t.max(0.0),
            });
        }
    }

    tracing::debug!(?origin, ?direction, "ray traversal cap reached");
    None
}

/// Index of the cell containing `v`, if it fits in `i32`.
fn cell_index(v: f32) -> Option<i32> {
    let f = v.floor();
    (f >= i32::MIN as f32 && f < i32::MAX as f32).then_some(f as i32)
}

/// Axis of the next boundary crossing: smallest parameter, ties to x, y, z.
fn next_axis(t_max: &[f32; 3]) -> usize {
    if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
        0
    } else if t_max[1] <= t_max[2] {
        1
    } else {
        2
    }
}
