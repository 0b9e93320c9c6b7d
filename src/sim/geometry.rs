//! Geometry and collision tests shared by both movement models
//!
//! Classic mode works on integer grid cells and axis-aligned cell rectangles.
//! Modern mode works on continuous points and circles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A classic grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this cell by a step
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Inside a `tile_count × tile_count` board
    #[inline]
    pub fn in_bounds(self, tile_count: i32) -> bool {
        self.x >= 0 && self.x < tile_count && self.y >= 0 && self.y < tile_count
    }
}

/// Axis-aligned rectangle measured in cells (classic obstacle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl GridRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Cells covered by the rectangle, row by row
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| Cell::new(x, y)))
    }
}

/// A circle (modern obstacle)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Cell lies inside the rectangle (right/bottom edges exclusive)
#[inline]
pub fn cell_in_rect(cell: Cell, rect: &GridRect) -> bool {
    cell.x >= rect.x
        && cell.x < rect.x + rect.width
        && cell.y >= rect.y
        && cell.y < rect.y + rect.height
}

/// Point is strictly closer than `radius` to `center`
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// Two circles are closer than `gap` between their edges
#[inline]
pub fn circles_within(a: &Circle, b: &Circle, gap: f32) -> bool {
    a.center.distance(b.center) < a.radius + b.radius + gap
}

/// Point-point proximity test
#[inline]
pub fn points_within(a: Vec2, b: Vec2, distance: f32) -> bool {
    a.distance(b) < distance
}
