use std::f32::consts::TAU;

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::angle::normalize;
use crate::grid::Grid;
use crate::motion::Agent;
use crate::ray::{self, RayResult};

/// Narrowest accepted field of view, in radians.
const MIN_FOV: f32 = 1e-4;

/// Cast `ray_count` rays spanning `fov_radians` centered on the agent's
/// facing, left to right. Each cast is an independent pure read of the
/// grid, so the fan is computed in parallel.
pub fn build_fan(
    grid: &Grid,
    agent: &Agent,
    fov_radians: f32,
    ray_count: usize,
    max_distance: f32,
) -> Vec<RayResult> {
    if ray_count == 0 {
        return Vec::new();
    }

    let fov = if fov_radians.is_finite() {
        fov_radians.clamp(MIN_FOV, TAU)
    } else {
        TAU
    };
    if fov != fov_radians {
        log::warn!("field of view {fov_radians} out of range, clamped to {fov}");
    }

    let origin = agent.center();
    let start = agent.facing - fov * 0.5;
    let angle_step = fov / ray_count as f32;

    (0..ray_count)
        .into_par_iter()
        .map(|i| {
            let angle = normalize(start + i as f32 * angle_step);
            ray::cast_with_angle(grid, origin, angle, max_distance)
        })
        .collect()
}
