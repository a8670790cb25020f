//! Grid-based raycasting and movement engine behind a thin windowing shell.

pub mod angle;
pub mod engine;
pub mod fan;
pub mod grid;
pub mod motion;
pub mod ray;
pub mod renderer;
pub mod scaler;

pub use engine::{
    CollisionPolicy, Engine, EngineConfig, FrameSink, InputProvider, Key, StepOutcome,
};
pub use grid::{Cell, Grid, MapError};
pub use motion::{Agent, InputState};
pub use ray::{CastError, HitSide, RayResult};
