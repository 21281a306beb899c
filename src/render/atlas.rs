//! Atlas footprint measurement.
//!
//! Packs an atlas's sprites the way a shelf packer would (tallest first,
//! power-of-two width, padding between sprites) to estimate the size of the
//! packed texture. No pixels are produced.

use crate::discovery::AtlasConfig;

/// Placement of one sprite in the packed atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Packed atlas size and sprite placements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<Frame>,
}

impl Footprint {
    /// Whether both sides fit within `max_size`.
    pub fn fits(&self, max_size: u32) -> bool {
        self.width <= max_size && self.height <= max_size
    }
}

/// Shelf (row-based) packer.
#[derive(Debug, Clone, Copy)]
pub struct ShelfPacker {
    pub padding: u32,
}

impl ShelfPacker {
    pub fn new(padding: u32) -> Self {
        Self { padding }
    }

    /// Pack `(name, width, height)` sprites. Frames come back in input order.
    pub fn pack(&self, sprites: &[(String, u32, u32)]) -> Footprint {
        if sprites.is_empty() {
            return Footprint::default();
        }

        // Tallest first; ties keep input order.
        let mut order: Vec<usize> = (0..sprites.len()).collect();
        order.sort_by(|&a, &b| sprites[b].2.cmp(&sprites[a].2).then_with(|| a.cmp(&b)));

        let max_w = sprites.iter().map(|s| s.1).max().unwrap_or(1);
        let total_area: u64 = sprites
            .iter()
            .map(|s| u64::from(s.1 + self.padding) * u64::from(s.2 + self.padding))
            .sum();
        let sqrt_area = (total_area as f64).sqrt().ceil() as u32;
        let width = max_w.max(sqrt_area).max(1).next_power_of_two();

        let mut placements = vec![(0u32, 0u32); sprites.len()];
        let (mut cursor_x, mut cursor_y, mut row_height) = (0u32, 0u32, 0u32);

        for &idx in &order {
            let (_, w, h) = &sprites[idx];
            if cursor_x + w > width && cursor_x > 0 {
                cursor_y += row_height + self.padding;
                cursor_x = 0;
                row_height = 0;
            }
            placements[idx] = (cursor_x, cursor_y);
            row_height = row_height.max(*h);
            cursor_x += w + self.padding;
        }

        let frames = sprites
            .iter()
            .zip(&placements)
            .map(|((name, w, h), (x, y))| Frame {
                name: name.clone(),
                x: *x,
                y: *y,
                w: *w,
                h: *h,
            })
            .collect();

        Footprint {
            width,
            height: cursor_y + row_height,
            frames,
        }
    }
}

/// Measure the packed footprint of an atlas.
pub fn atlas_footprint(config: &AtlasConfig) -> Footprint {
    let sprites: Vec<(String, u32, u32)> = config
        .sprites
        .iter()
        .map(|(name, [w, h])| (name.clone(), *w, *h))
        .collect();
    ShelfPacker::new(config.padding).pack(&sprites)
}
