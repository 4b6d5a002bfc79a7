//! Axis-aligned rectangular arena
//!
//! Derived once from the host's camera/viewport bounds and immutable for the
//! rest of the match.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::InitError;

/// Raw bounds as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Rect {
    pub const fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Rectangle centered on the origin
    pub fn centered(half_width: f32, half_height: f32) -> Self {
        Self::new(-half_width, half_width, -half_height, half_height)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Play field with its spawn padding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub bounds: Rect,
    /// Margin kept between spawned content and the walls
    pub edge_padding: f32,
}

impl Arena {
    pub fn new(bounds: Rect, edge_padding: f32) -> Result<Self, InitError> {
        let finite = [bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || bounds.min_x >= bounds.max_x || bounds.min_y >= bounds.max_y {
            return Err(InitError::DegenerateBounds {
                min_x: bounds.min_x,
                max_x: bounds.max_x,
                min_y: bounds.min_y,
                max_y: bounds.max_y,
            });
        }
        let width = bounds.max_x - bounds.min_x;
        let height = bounds.max_y - bounds.min_y;
        if !(edge_padding >= 0.0) || edge_padding * 2.0 >= width || edge_padding * 2.0 >= height {
            return Err(InitError::PaddingTooLarge(edge_padding));
        }
        Ok(Self {
            bounds,
            edge_padding,
        })
    }

    /// Bounds shrunk by the edge padding
    pub fn spawn_area(&self) -> Rect {
        let p = self.edge_padding;
        Rect::new(
            self.bounds.min_x + p,
            self.bounds.max_x - p,
            self.bounds.min_y + p,
            self.bounds.max_y - p,
        )
    }

    /// Uniform random point inside the padded spawn area
    pub fn random_spawn_point<R: Rng>(&self, rng: &mut R) -> Vec2 {
        let area = self.spawn_area();
        Vec2::new(
            rng.random_range(area.min_x..=area.max_x),
            rng.random_range(area.min_y..=area.max_y),
        )
    }

    /// True once a head of radius `r` at `pos` crosses a wall
    ///
    /// Touching a wall exactly is still inside.
    pub fn is_out_of_bounds(&self, pos: Vec2, r: f32) -> bool {
        let b = &self.bounds;
        pos.x < b.min_x + r || pos.x > b.max_x - r || pos.y < b.min_y + r || pos.y > b.max_y - r
    }
}
