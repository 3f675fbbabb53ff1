//! Horizontally-looping parallax strips
//!
//! Each layer is two copies of one repeating tile, offset by exactly one
//! tile width and moving left at a constant rate. When a tile fully exits
//! the left boundary it is translated right by one tile width, so the pair
//! always covers the visible field with no gap.

use crate::consts::{BACKGROUND_SCROLL_SECS, FIELD_WIDTH, GROUND_SCROLL_SECS};

/// Which visual strip this layer draws as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Distant cavern wall, slow scroll
    Background,
    /// Ground strip, fast scroll (the hazard collider is separate)
    Ground,
}

#[derive(Debug, Clone)]
pub struct ScrollLayer {
    pub kind: LayerKind,
    /// Width of one tile; tiles span the full field width
    pub tile_width: f32,
    /// Leftward scroll speed (units/s)
    pub speed: f32,
    /// Left edge of the first tile, kept in (-tile_width, 0]
    pub offset: f32,
}

impl ScrollLayer {
    pub fn new(kind: LayerKind, tile_width: f32, speed: f32) -> Self {
        Self {
            kind,
            tile_width,
            speed,
            offset: 0.0,
        }
    }

    pub fn background(field_width: f32) -> Self {
        Self::new(
            LayerKind::Background,
            field_width,
            field_width / BACKGROUND_SCROLL_SECS,
        )
    }

    pub fn ground(field_width: f32) -> Self {
        Self::new(LayerKind::Ground, field_width, field_width / GROUND_SCROLL_SECS)
    }

    /// Scroll left, wrapping the lead tile once it has fully exited
    pub fn advance(&mut self, dt: f32) {
        self.offset -= self.speed * dt;
        while self.offset <= -self.tile_width {
            self.offset += self.tile_width;
        }
    }

    /// Left edges of the two tiles
    pub fn tile_positions(&self) -> [f32; 2] {
        [self.offset, self.offset + self.tile_width]
    }

    /// Invariant: the two tiles together span the visible field
    pub fn covers_field(&self) -> bool {
        let [first, second] = self.tile_positions();
        first <= 0.0 && second + self.tile_width >= FIELD_WIDTH
    }
}
