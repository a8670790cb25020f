use crate::engine::FrameSink;
use crate::grid::Grid;
use crate::motion::Agent;
use crate::ray::{HitSide, RayResult};

/// Minimap pixels per grid cell.
const MINIMAP_SCALE: usize = 4;

#[inline]
fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

/// Frame sink that draws the fan as vertical wall columns into a fixed-size
/// framebuffer, plus a top-down minimap baked once from the grid.
pub struct ColumnRenderer {
    pub fb: Vec<u32>,
    pub width: usize,
    pub height: usize,

    minimap: Vec<u32>,
    mini_w: usize,
    mini_h: usize,
    cell_size: f32,
}

impl ColumnRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            fb: vec![0; width * height],
            width,
            height,
            minimap: Vec::new(),
            mini_w: 0,
            mini_h: 0,
            cell_size: 1.0,
        }
    }

    fn clear_background(&mut self) {
        let sky = pack_rgb(30, 30, 70);
        let ground = pack_rgb(40, 40, 40);

        let mid = self.height / 2;
        for y in 0..mid {
            let row = y * self.width;
            self.fb[row..row + self.width].fill(sky);
        }
        for y in mid..self.height {
            let row = y * self.width;
            self.fb[row..row + self.width].fill(ground);
        }
    }

    fn draw_columns(&mut self, agent: &Agent, fan: &[RayResult]) {
        if fan.is_empty() {
            return;
        }

        let light = pack_rgb(200, 200, 200);
        let dark = pack_rgb(140, 140, 140);
        let half_h = self.height as i32 / 2;

        for x in 0..self.width {
            let ray = &fan[x * fan.len() / self.width];
            let Some(side) = ray.side else {
                continue; // miss, leave sky and ground showing
            };

            // Project against the view plane so flat walls render flat.
            let depth = (ray.distance * (ray.angle - agent.facing).cos()).max(1e-3);
            let line_h = (self.height as f32 * self.cell_size / depth) as i32;

            let y0 = (half_h - line_h / 2).max(0);
            let y1 = (half_h + line_h / 2).min(self.height as i32 - 1);
            let color = match side {
                HitSide::Vertical => light,
                HitSide::Horizontal => dark,
            };

            let mut idx = (y0 as usize) * self.width + x;
            for _y in y0..=y1 {
                self.fb[idx] = color;
                idx += self.width;
            }
        }
    }

    fn draw_minimap(&mut self, agent: &Agent) {
        let mw = self.mini_w.min(self.width);
        let mh = self.mini_h.min(self.height);
        for y in 0..mh {
            let src = y * self.mini_w;
            let dst = y * self.width;
            self.fb[dst..dst + mw].copy_from_slice(&self.minimap[src..src + mw]);
        }

        let marker = pack_rgb(220, 40, 40);
        let center = agent.center();
        let px = (center[0] / self.cell_size * MINIMAP_SCALE as f32) as i32;
        let py = (center[1] / self.cell_size * MINIMAP_SCALE as f32) as i32;
        for dy in 0..2i32 {
            for dx in 0..2i32 {
                let (x, y) = (px + dx, py + dy);
                if x >= 0 && (x as usize) < mw && y >= 0 && (y as usize) < mh {
                    self.fb[y as usize * self.width + x as usize] = marker;
                }
            }
        }
    }
}

impl FrameSink for ColumnRenderer {
    fn set_grid(&mut self, grid: &Grid) {
        self.cell_size = grid.cell_size();
        self.mini_w = grid.width() * MINIMAP_SCALE;
        self.mini_h = grid.height() * MINIMAP_SCALE;

        // Same palette the prototype painted its top-down view with.
        let wall = pack_rgb(0x10, 0x10, 0x10);
        let floor = pack_rgb(0xA0, 0xA0, 0xA0);

        self.minimap = vec![floor; self.mini_w * self.mini_h];
        for cy in 0..grid.height() {
            for cx in 0..grid.width() {
                if !grid.is_solid(cx as i32, cy as i32) {
                    continue;
                }
                for py in 0..MINIMAP_SCALE {
                    let row = (cy * MINIMAP_SCALE + py) * self.mini_w + cx * MINIMAP_SCALE;
                    self.minimap[row..row + MINIMAP_SCALE].fill(wall);
                }
            }
        }
    }

    fn frame(&mut self, agent: &Agent, fan: &[RayResult]) {
        self.clear_background();
        self.draw_columns(agent, fan);
        if !self.minimap.is_empty() {
            self.draw_minimap(agent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CollisionPolicy, Engine, EngineConfig};

    #[test]
    fn a_frame_paints_walls_between_sky_and_ground() {
        let config = EngineConfig {
            tile_size: 1.0,
            ray_count: 32,
            agent_size: 0.0,
            max_ray_distance: 100.0,
            collision: CollisionPolicy::Collide,
            ..EngineConfig::default()
        };
        let mut engine =
            Engine::new(&["11111", "10001", "10001", "10001", "11111"], (2, 2), 0.0, config)
                .unwrap();
        let mut renderer = ColumnRenderer::new(64, 48);
        engine.start(&mut renderer);

        struct NoKeys;
        impl crate::engine::InputProvider for NoKeys {
            fn is_key_down(&self, _key: crate::engine::Key) -> bool {
                false
            }
        }
        let _ = engine.step(&NoKeys, &mut renderer);

        // Wall column at the screen center, sky at the top edge.
        let center = renderer.fb[(24 * 64) + 32];
        assert!(center == pack_rgb(200, 200, 200) || center == pack_rgb(140, 140, 140));
        assert_eq!(renderer.fb[63], pack_rgb(30, 30, 70));
    }
}
