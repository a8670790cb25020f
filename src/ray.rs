use thiserror::Error;

use crate::angle::normalize;
use crate::grid::Grid;

/// Direction components below this are treated as axis-parallel.
const DIR_EPSILON: f32 = 1e-6;

/// Stand-in reciprocal for a near-zero direction component. Large enough
/// that the axis is never picked, finite so no inf/NaN enters the math.
const FAR_RECIP: f32 = 1e30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSide {
    /// Crossed a vertical grid line (x-step).
    Vertical,
    /// Crossed a horizontal grid line (y-step).
    Horizontal,
}

#[derive(Debug, Clone, Copy)]
pub struct RayResult {
    /// Ray direction in radians, normalized to [0, 2*pi).
    pub angle: f32,
    /// World-unit distance to the wall, or `max_distance` on a miss.
    pub distance: f32,
    /// Which grid-line family was crossed; `None` on a miss.
    pub side: Option<HitSide>,
    /// World coordinates of the boundary crossing.
    pub point: [f32; 2],
}

impl RayResult {
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.side.is_some()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CastError {
    #[error("ray direction has near-zero length")]
    DegenerateDirection,
}

/// Cast a ray along `dir` and return the first solid-cell crossing within
/// `max_distance` world units. `dir` is normalized before use; a
/// (near-)zero vector is rejected instead of producing NaN.
pub fn cast_ray(
    grid: &Grid,
    origin: [f32; 2],
    dir: [f32; 2],
    max_distance: f32,
) -> Result<RayResult, CastError> {
    let len = (dir[0] * dir[0] + dir[1] * dir[1]).sqrt();
    if len < DIR_EPSILON {
        return Err(CastError::DegenerateDirection);
    }

    let unit = [dir[0] / len, dir[1] / len];
    let (distance, side) = cast_dda(grid, origin, unit, max_distance);
    Ok(RayResult {
        angle: normalize(unit[1].atan2(unit[0])),
        distance,
        side,
        point: [origin[0] + unit[0] * distance, origin[1] + unit[1] * distance],
    })
}

/// Cast from an angle in radians. The direction built from cos/sin is a
/// unit vector for any input, so this path cannot fail.
pub fn cast_with_angle(grid: &Grid, origin: [f32; 2], angle: f32, max_distance: f32) -> RayResult {
    let dir = [angle.cos(), angle.sin()];
    let (distance, side) = cast_dda(grid, origin, dir, max_distance);
    RayResult {
        angle: normalize(angle),
        distance,
        side,
        point: [origin[0] + dir[0] * distance, origin[1] + dir[1] * distance],
    }
}

#[inline]
fn safe_recip(d: f32) -> f32 {
    if d.abs() < DIR_EPSILON { FAR_RECIP } else { (1.0 / d).abs() }
}

/// Incremental grid traversal over cell coordinates. Walks the ray one grid
/// line at a time, always advancing the axis with the smaller accumulated
/// crossing distance, and stops at the first solid cell or once the next
/// crossing would exceed the search bound.
fn cast_dda(
    grid: &Grid,
    origin: [f32; 2],
    dir: [f32; 2],
    max_distance: f32,
) -> (f32, Option<HitSide>) {
    let cell = grid.cell_size();
    let ox = origin[0] / cell;
    let oy = origin[1] / cell;
    let max_cells = max_distance / cell;

    let mut map_x = ox.floor() as i32;
    let mut map_y = oy.floor() as i32;

    let step_x: i32 = if dir[0] < 0.0 { -1 } else { 1 };
    let step_y: i32 = if dir[1] < 0.0 { -1 } else { 1 };

    // World distance (in cells) spent crossing one full cell per axis.
    let delta_x = safe_recip(dir[0]);
    let delta_y = safe_recip(dir[1]);

    // Distance to the first grid line on each axis.
    let mut side_x = if dir[0] < 0.0 {
        (ox - map_x as f32) * delta_x
    } else {
        (map_x as f32 + 1.0 - ox) * delta_x
    };
    let mut side_y = if dir[1] < 0.0 {
        (oy - map_y as f32) * delta_y
    } else {
        (map_y as f32 + 1.0 - oy) * delta_y
    };

    loop {
        let side = if side_x < side_y {
            if side_x > max_cells {
                return (max_distance, None);
            }
            map_x += step_x;
            side_x += delta_x;
            HitSide::Vertical
        } else {
            if side_y > max_cells {
                return (max_distance, None);
            }
            map_y += step_y;
            side_y += delta_y;
            HitSide::Horizontal
        };

        if grid.is_solid(map_x, map_y) {
            // Perpendicular distance on the hit axis, no fisheye bias.
            let perp = match side {
                HitSide::Vertical => {
                    (map_x as f32 - ox + (1 - step_x) as f32 * 0.5) / dir[0]
                }
                HitSide::Horizontal => {
                    (map_y as f32 - oy + (1 - step_y) as f32 * 0.5) / dir[1]
                }
            };
            return (perp * cell, Some(side));
        }
    }
}
