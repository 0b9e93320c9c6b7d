//! Obstacle layout generation
//!
//! Layouts are drawn once per (re)start from the injected RNG, seeded by where the
//! snake and food already are. A slot that cannot be placed within its attempt
//! budget is dropped; fewer obstacles than requested is fine.

use glam::Vec2;
use rand::Rng;

use super::geometry::{Cell, Circle, GridRect, cell_in_rect, circles_within, points_within};
use crate::consts::PLACEMENT_ATTEMPTS;

/// Classic obstacles span 1..=MAX_SIDE cells per side
pub const CLASSIC_MAX_SIDE: i32 = 2;

/// Modern radius range: MIN + [0, SPREAD)
pub const MODERN_MIN_RADIUS: f32 = 12.0;
pub const MODERN_RADIUS_SPREAD: f32 = 8.0;
/// Gap kept between a modern obstacle and the canvas edge
pub const MODERN_EDGE_MARGIN: f32 = 25.0;
/// Clearances added to the obstacle radius
pub const MODERN_SNAKE_CLEARANCE: f32 = 15.0;
pub const MODERN_FOOD_CLEARANCE: f32 = 12.0;
/// Edge-to-edge gap between two modern obstacles
pub const MODERN_OBSTACLE_GAP: f32 = 10.0;

/// Boolean occupancy over the classic board
struct Occupancy {
    tile_count: i32,
    cells: Vec<bool>,
}

impl Occupancy {
    fn new(tile_count: i32) -> Self {
        let side = tile_count.max(0) as usize;
        Self {
            tile_count,
            cells: vec![false; side * side],
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        cell.in_bounds(self.tile_count)
            .then(|| (cell.y * self.tile_count + cell.x) as usize)
    }

    fn mark(&mut self, cell: Cell) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = true;
        }
    }

    fn is_occupied(&self, cell: Cell) -> bool {
        self.index(cell).map(|i| self.cells[i]).unwrap_or(true)
    }

    /// Rectangle fits on free cells and its one-cell border still has a gap
    fn can_place(&self, rect: &GridRect) -> bool {
        if rect.x < 0
            || rect.y < 0
            || rect.x + rect.width > self.tile_count
            || rect.y + rect.height > self.tile_count
        {
            return false;
        }
        if rect.cells().any(|c| self.is_occupied(c)) {
            return false;
        }

        let ring = GridRect::new(rect.x - 1, rect.y - 1, rect.width + 2, rect.height + 2);
        ring.cells()
            .filter(|c| c.in_bounds(self.tile_count))
            .filter(|c| !cell_in_rect(*c, rect))
            .any(|c| !self.is_occupied(c))
    }
}

/// Place up to `count` rectangles on the classic board
pub fn classic_layout(
    rng: &mut impl Rng,
    count: usize,
    tile_count: i32,
    snake: &[Cell],
    food: Cell,
) -> Vec<GridRect> {
    let mut grid = Occupancy::new(tile_count);
    for &segment in snake {
        grid.mark(segment);
    }
    grid.mark(food);

    let mut obstacles = Vec::with_capacity(count);
    for slot in 0..count {
        let mut placed = false;
        for _ in 0..PLACEMENT_ATTEMPTS {
            let width = rng.random_range(1..=CLASSIC_MAX_SIDE);
            let height = rng.random_range(1..=CLASSIC_MAX_SIDE);
            if tile_count - width <= 0 || tile_count - height <= 0 {
                continue;
            }
            let x = rng.random_range(0..tile_count - width);
            let y = rng.random_range(0..tile_count - height);
            let rect = GridRect::new(x, y, width, height);

            if grid.can_place(&rect) {
                for cell in rect.cells() {
                    grid.mark(cell);
                }
                obstacles.push(rect);
                placed = true;
                break;
            }
        }
        if !placed {
            log::debug!("Classic obstacle slot {} dropped after {} attempts", slot, PLACEMENT_ATTEMPTS);
        }
    }
    obstacles
}

/// Place up to `count` circles on the modern canvas
pub fn modern_layout(
    rng: &mut impl Rng,
    count: usize,
    width: f32,
    height: f32,
    snake: &[Vec2],
    food: Vec2,
) -> Vec<Circle> {
    let mut obstacles: Vec<Circle> = Vec::with_capacity(count);
    for slot in 0..count {
        let mut placed = false;
        for _ in 0..PLACEMENT_ATTEMPTS {
            let radius = rng.random::<f32>() * MODERN_RADIUS_SPREAD + MODERN_MIN_RADIUS;
            let inset = radius + MODERN_EDGE_MARGIN;
            let x = rng.random::<f32>() * (width - 2.0 * inset) + inset;
            let y = rng.random::<f32>() * (height - 2.0 * inset) + inset;
            let candidate = Circle::new(Vec2::new(x, y), radius);

            let near_snake = snake
                .iter()
                .any(|&s| points_within(s, candidate.center, radius + MODERN_SNAKE_CLEARANCE));
            let near_food = points_within(food, candidate.center, radius + MODERN_FOOD_CLEARANCE);
            let near_other = obstacles
                .iter()
                .any(|o| circles_within(o, &candidate, MODERN_OBSTACLE_GAP));

            if !near_snake && !near_food && !near_other {
                obstacles.push(candidate);
                placed = true;
                break;
            }
        }
        if !placed {
            log::debug!("Modern obstacle slot {} dropped after {} attempts", slot, PLACEMENT_ATTEMPTS);
        }
    }
    obstacles
}
