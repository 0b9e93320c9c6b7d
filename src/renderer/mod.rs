//! Canvas 2D rendering module
//!
//! Paints a read-only view of the active simulation. Draw order matters:
//! obstacles sit under the snakes, food sits on top in modern mode.

pub mod palette;

pub use palette::Palette;

use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{GRID_SIZE, SNAKE_HALF_WIDTH};
use crate::sim::{ActiveSimulation, Cell, ClassicGame, ModernGame};

const FOOD_RADIUS: f64 = 12.0;
const OBSTACLE_OUTLINE: f64 = 2.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    /// Grab the 2D context of `canvas`; `None` when the browser refuses one
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    pub fn draw(&self, sim: &ActiveSimulation, palette: &Palette) {
        self.ctx.set_fill_style_str(palette.background);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);

        match sim {
            ActiveSimulation::Classic(game) => self.draw_classic(game, palette),
            ActiveSimulation::Modern(game) => self.draw_modern(game, palette),
        }
    }

    fn disc(&self, x: f64, y: f64, r: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        if self.ctx.arc(x, y, r.max(0.5), 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }

    fn cell_center(cell: Cell) -> (f64, f64) {
        let size = GRID_SIZE as f64;
        (
            cell.x as f64 * size + size / 2.0,
            cell.y as f64 * size + size / 2.0,
        )
    }

    fn draw_classic(&self, game: &ClassicGame, palette: &Palette) {
        let size = GRID_SIZE as f64;

        let (fx, fy) = Self::cell_center(game.food);
        self.disc(fx, fy, size / 2.0 - 2.0, palette.food);

        self.ctx.set_fill_style_str(palette.obstacle);
        for rect in &game.obstacles {
            self.ctx.fill_rect(
                rect.x as f64 * size + OBSTACLE_OUTLINE,
                rect.y as f64 * size + OBSTACLE_OUTLINE,
                rect.width as f64 * size - 2.0 * OBSTACLE_OUTLINE,
                rect.height as f64 * size - 2.0 * OBSTACLE_OUTLINE,
            );
        }

        for (i, &cell) in game.snake.iter().enumerate().rev() {
            let (x, y) = Self::cell_center(cell);
            let color = if i == 0 { palette.snake_head } else { palette.snake_body };
            self.disc(x, y, size / 2.0 - 1.0, color);
        }

        if let Some(bot) = &game.bot {
            for (i, &cell) in bot.segments.iter().enumerate().rev() {
                let (x, y) = Self::cell_center(cell);
                let color = if i == 0 { palette.bot_head } else { palette.bot_body };
                self.disc(x, y, size / 2.0 - 1.0, color);
            }
        }

        if let Some(special) = &game.special_food {
            let (x, y) = Self::cell_center(special.pos);
            self.disc(x, y, size / 2.0, palette.special_food);
        }
    }

    fn draw_modern(&self, game: &ModernGame, palette: &Palette) {
        for o in &game.obstacles {
            self.disc(o.center.x as f64, o.center.y as f64, o.radius as f64, palette.obstacle);
        }

        if let Some(bot) = &game.bot {
            for (i, p) in bot.segments.iter().enumerate().rev() {
                let color = if i == 0 { palette.bot_head } else { palette.bot_body };
                self.disc(p.x as f64, p.y as f64, SNAKE_HALF_WIDTH as f64, color);
            }
        }

        // Body tapers toward the tail
        let len = game.snake.segments.len().max(1) as f64;
        for (i, p) in game.snake.segments.iter().enumerate().rev() {
            let taper = 1.0 - 0.4 * (i as f64 / len);
            let color = if i == 0 { palette.snake_head } else { palette.snake_body };
            self.disc(p.x as f64, p.y as f64, SNAKE_HALF_WIDTH as f64 * taper, color);
        }

        self.disc(game.food.x as f64, game.food.y as f64, FOOD_RADIUS, palette.food);

        if let Some(special) = &game.special_food {
            self.disc(
                special.pos.x as f64,
                special.pos.y as f64,
                FOOD_RADIUS,
                palette.special_food,
            );
        }
    }
}
