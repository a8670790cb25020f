use std::f32::consts::PI;

use crate::angle::degrees_to_radians;
use crate::fan::build_fan;
use crate::grid::{Grid, MapError};
use crate::motion::{self, Agent, InputState};
use crate::ray::RayResult;

/// Symbolic movement keys, mapped to physical keys by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Quit,
}

/// Polled key-down state, queried once per step.
pub trait InputProvider {
    fn is_key_down(&self, key: Key) -> bool;
}

/// Receiver for the computed frame data.
pub trait FrameSink {
    /// The static grid, delivered once before the first frame.
    fn set_grid(&mut self, grid: &Grid);
    /// The finalized pose and the fan, delivered once per step.
    fn frame(&mut self, agent: &Agent, fan: &[RayResult]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Solid cells block movement, axis at a time.
    Collide,
    /// Movement ignores the grid, as the original prototypes did.
    PassThrough,
}

/// One parameterized engine instead of per-variant constant sets.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// World units per grid cell.
    pub tile_size: f32,
    pub fov_degrees: f32,
    pub ray_count: usize,
    /// World units per step.
    pub move_speed: f32,
    /// Radians per step.
    pub rotation_speed: f32,
    /// Ray search bound in world units.
    pub max_ray_distance: f32,
    /// Agent footprint edge in world units.
    pub agent_size: f32,
    pub collision: CollisionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_size: 80.0,
            fov_degrees: 60.0,
            ray_count: 60,
            move_speed: 6.0,
            rotation_speed: PI / 60.0,
            max_ray_distance: 80.0 * 32.0,
            agent_size: 10.0,
            collision: CollisionPolicy::Collide,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Quit,
}

pub struct Engine {
    grid: Grid,
    agent: Agent,
    config: EngineConfig,
}

impl Engine {
    /// Build the grid from a map description and place the agent with its
    /// footprint centered in `spawn_cell`.
    pub fn new(
        map: &[&str],
        spawn_cell: (usize, usize),
        facing: f32,
        config: EngineConfig,
    ) -> Result<Self, MapError> {
        let grid = Grid::parse(map, config.tile_size)?;

        let tile = config.tile_size;
        let x = (spawn_cell.0 as f32 + 0.5) * tile - config.agent_size * 0.5;
        let y = (spawn_cell.1 as f32 + 0.5) * tile - config.agent_size * 0.5;
        let agent = Agent::new(x, y, facing, config.agent_size);

        log::info!(
            "engine up: {}x{} cells, {} rays over {} degrees, collision {:?}",
            grid.width(),
            grid.height(),
            config.ray_count,
            config.fov_degrees,
            config.collision,
        );
        Ok(Self { grid, agent, config })
    }

    /// Deliver the static grid to the sink. Call once before stepping.
    pub fn start(&self, sink: &mut impl FrameSink) {
        sink.set_grid(&self.grid);
    }

    /// One frame: poll input, integrate the pose, cast the fan, emit. The
    /// pose is finalized before any ray is cast.
    pub fn step(&mut self, input: &impl InputProvider, sink: &mut impl FrameSink) -> StepOutcome {
        if input.is_key_down(Key::Quit) {
            return StepOutcome::Quit;
        }

        let state = InputState {
            forward: input.is_key_down(Key::Forward),
            backward: input.is_key_down(Key::Backward),
            strafe_left: input.is_key_down(Key::StrafeLeft),
            strafe_right: input.is_key_down(Key::StrafeRight),
            turn_left: input.is_key_down(Key::TurnLeft),
            turn_right: input.is_key_down(Key::TurnRight),
        };
        motion::step(&mut self.agent, &self.grid, state, &self.config);

        let fan = build_fan(
            &self.grid,
            &self.agent,
            degrees_to_radians(self.config.fov_degrees),
            self.config.ray_count,
            self.config.max_ray_distance,
        );
        sink.frame(&self.agent, &fan);
        StepOutcome::Continue
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
