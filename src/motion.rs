use std::f32::consts::FRAC_PI_2;

use crate::angle::normalize;
use crate::engine::{CollisionPolicy, EngineConfig};
use crate::grid::Grid;

/// The player pose. Owned by the engine, mutated only by [`step`].
#[derive(Debug, Clone)]
pub struct Agent {
    /// Top-left corner of the footprint, world units.
    pub x: f32,
    pub y: f32,
    /// Facing angle in radians, kept in [0, 2*pi).
    pub facing: f32,
    /// Footprint edge length in world units.
    pub size: f32,
    // Sub-unit displacement not yet applied, carried across steps.
    rx: f32,
    ry: f32,
}

impl Agent {
    pub fn new(x: f32, y: f32, facing: f32, size: f32) -> Self {
        Self { x, y, facing: normalize(facing), size, rx: 0.0, ry: 0.0 }
    }

    /// Center of the footprint, the origin for every cast.
    #[inline]
    pub fn center(&self) -> [f32; 2] {
        [self.x + self.size * 0.5, self.y + self.size * 0.5]
    }
}

/// One frame's worth of held movement keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// Advance the agent by one step: rotate, then translate with the summed
/// forward and strafe contributions. Displacement is quantized to whole
/// world units per step; the sub-unit remainder stays in the agent's carry
/// accumulators so a constant heading never loses ground to truncation.
pub fn step(agent: &mut Agent, grid: &Grid, input: InputState, config: &EngineConfig) {
    let mut turn = 0.0;
    if input.turn_left {
        turn -= 1.0;
    }
    if input.turn_right {
        turn += 1.0;
    }
    if turn != 0.0 {
        agent.facing = normalize(agent.facing + turn * config.rotation_speed);
    }

    let mut fwd = 0.0;
    if input.forward {
        fwd += 1.0;
    }
    if input.backward {
        fwd -= 1.0;
    }
    let mut strafe = 0.0;
    if input.strafe_right {
        strafe += 1.0;
    }
    if input.strafe_left {
        strafe -= 1.0;
    }

    if fwd == 0.0 && strafe == 0.0 {
        return;
    }

    let (sin, cos) = agent.facing.sin_cos();
    let (strafe_sin, strafe_cos) = (agent.facing + FRAC_PI_2).sin_cos();
    let dx = (cos * fwd + strafe_cos * strafe) * config.move_speed;
    let dy = (sin * fwd + strafe_sin * strafe) * config.move_speed;

    let want_x = agent.rx + dx;
    let want_y = agent.ry + dy;
    let apply_x = want_x.trunc();
    let apply_y = want_y.trunc();
    agent.rx = want_x - apply_x;
    agent.ry = want_y - apply_y;

    translate(agent, grid, apply_x, apply_y, config.collision);
}

fn translate(agent: &mut Agent, grid: &Grid, dx: f32, dy: f32, policy: CollisionPolicy) {
    match policy {
        CollisionPolicy::PassThrough => {
            agent.x += dx;
            agent.y += dy;
        }
        CollisionPolicy::Collide => {
            // Axis at a time, so a blocked axis still lets the agent slide
            // along the wall on the other one.
            let cell = grid.cell_size();
            let half = agent.size * 0.5;

            let cx = ((agent.x + dx + half) / cell).floor() as i32;
            let cy = ((agent.y + half) / cell).floor() as i32;
            if !grid.is_solid(cx, cy) {
                agent.x += dx;
            }

            let cx = ((agent.x + half) / cell).floor() as i32;
            let cy = ((agent.y + dy + half) / cell).floor() as i32;
            if !grid.is_solid(cx, cy) {
                agent.y += dy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_4, PI};

    fn config(move_speed: f32, collision: CollisionPolicy) -> EngineConfig {
        EngineConfig {
            tile_size: 1.0,
            move_speed,
            rotation_speed: PI / 60.0,
            agent_size: 0.0,
            collision,
            ..EngineConfig::default()
        }
    }

    fn open_grid() -> Grid {
        let row = "0".repeat(16);
        let rows: Vec<&str> = (0..16).map(|_| row.as_str()).collect();
        Grid::parse(&rows, 1.0).unwrap()
    }

    #[test]
    fn carry_accumulator_has_no_long_run_bias() {
        let grid = open_grid();
        let cfg = config(0.7, CollisionPolicy::PassThrough);
        let input = InputState { forward: true, ..InputState::default() };

        let heading = 0.6f32;
        let per_step = [heading.cos() * 0.7, heading.sin() * 0.7];

        for n in [1usize, 10, 1000] {
            let mut agent = Agent::new(0.0, 0.0, heading, 0.0);
            for _ in 0..n {
                step(&mut agent, &grid, input, &cfg);
            }
            assert!(
                (agent.x - n as f32 * per_step[0]).abs() <= 1.0,
                "x drifted after {n} steps: {}",
                agent.x
            );
            assert!(
                (agent.y - n as f32 * per_step[1]).abs() <= 1.0,
                "y drifted after {n} steps: {}",
                agent.y
            );
        }
    }

    #[test]
    fn sub_unit_movement_is_deferred_not_dropped() {
        let grid = open_grid();
        let cfg = config(0.7, CollisionPolicy::PassThrough);
        let input = InputState { forward: true, ..InputState::default() };

        let mut agent = Agent::new(2.0, 2.0, 0.0, 0.0);
        step(&mut agent, &grid, input, &cfg);
        assert_eq!(agent.x, 2.0);
        step(&mut agent, &grid, input, &cfg);
        assert_eq!(agent.x, 3.0);
    }

    #[test]
    fn strafe_moves_perpendicular_to_facing() {
        let grid = open_grid();
        let cfg = config(1.5, CollisionPolicy::PassThrough);
        let input = InputState { strafe_right: true, ..InputState::default() };

        let mut agent = Agent::new(4.0, 4.0, 0.0, 0.0);
        step(&mut agent, &grid, input, &cfg);
        assert_eq!(agent.x, 4.0);
        assert_eq!(agent.y, 5.0);
    }

    #[test]
    fn collide_blocks_wall_entry_and_pass_through_does_not() {
        let grid = Grid::parse(&["111", "101", "111"], 1.0).unwrap();
        let input = InputState { forward: true, ..InputState::default() };

        let mut agent = Agent::new(1.5, 1.5, 0.0, 0.0);
        step(&mut agent, &grid, input, &config(1.0, CollisionPolicy::Collide));
        assert_eq!(agent.x, 1.5);

        let mut agent = Agent::new(1.5, 1.5, 0.0, 0.0);
        step(&mut agent, &grid, input, &config(1.0, CollisionPolicy::PassThrough));
        assert_eq!(agent.x, 2.5);
    }

    #[test]
    fn blocked_axis_still_slides_along_the_open_one() {
        // Wall to the east, corridor running south.
        let grid = Grid::parse(&["111", "101", "101", "111"], 1.0).unwrap();
        let cfg = config(2.0, CollisionPolicy::Collide);

        let mut agent = Agent::new(1.5, 1.5, FRAC_PI_4, 0.0);
        let input = InputState { forward: true, ..InputState::default() };
        step(&mut agent, &grid, input, &cfg);
        assert_eq!(agent.x, 1.5);
        assert_eq!(agent.y, 2.5);
    }

    #[test]
    fn turning_a_full_circle_returns_to_the_start() {
        let grid = open_grid();
        let cfg = config(0.0, CollisionPolicy::PassThrough);
        let input = InputState { turn_right: true, ..InputState::default() };

        // 4*pi of total rotation at pi/60 per step.
        let steps = (4.0 * PI / cfg.rotation_speed).round() as usize;
        let mut agent = Agent::new(0.0, 0.0, FRAC_PI_2, 0.0);
        for _ in 0..steps {
            step(&mut agent, &grid, input, &cfg);
        }
        assert!((agent.facing - FRAC_PI_2).abs() < 1e-3);
    }
}
