//! Grid placement of watermark tiles.
//!
//! The grid starts one step before the image and ends one step after it so
//! that rotation and jitter never leave a bare strip along an edge.

use rand::Rng;

/// Tunables for how tiles are scattered over the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilingOptions {
    /// Extra space between neighbouring grid cells, in pixels.
    pub margin: u32,
    /// Largest rotation applied to a tile, in degrees either way.
    pub max_rotation: f32,
    /// Largest offset from the nominal cell position, as a fraction of the
    /// tile's width (horizontally) or height (vertically).
    pub jitter: f32,
}

impl Default for TilingOptions {
    fn default() -> Self {
        Self {
            margin: 0,
            max_rotation: 45.0,
            jitter: 0.25,
        }
    }
}

/// Where one tile goes and how much it is turned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub angle: f32,
}

/// The implicit grid covering an image of `image_size` with tiles of
/// `tile_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub step_x: u32,
    pub step_y: u32,
    pub cols: i32,
    pub rows: i32,
}

impl TileGrid {
    pub fn new(image_size: (u32, u32), tile_size: (u32, u32), margin: u32) -> Self {
        let step_x = (tile_size.0 + margin).max(1);
        let step_y = (tile_size.1 + margin).max(1);
        Self {
            step_x,
            step_y,
            cols: (image_size.0 / step_x) as i32 + 2,
            rows: (image_size.1 / step_y) as i32 + 2,
        }
    }

    /// Nominal top-left corners of every cell, column-major, starting one
    /// step before the origin.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (-1..self.cols).flat_map(move |i| {
            (-1..self.rows).map(move |j| (i * self.step_x as i32, j * self.step_y as i32))
        })
    }

    pub fn cell_count(&self) -> usize {
        ((self.cols + 1) * (self.rows + 1)) as usize
    }
}

fn symmetric<R: Rng>(rng: &mut R, bound: i32) -> i32 {
    if bound <= 0 {
        0
    } else {
        rng.gen_range(-bound..=bound)
    }
}

/// Draw a rotation and jitter for every cell of the grid.
pub fn scatter<R: Rng>(
    grid: &TileGrid,
    tile_size: (u32, u32),
    options: &TilingOptions,
    rng: &mut R,
) -> Vec<Placement> {
    let jitter_x = (tile_size.0 as f32 * options.jitter) as i32;
    let jitter_y = (tile_size.1 as f32 * options.jitter) as i32;
    let max_rotation = options.max_rotation.abs();

    grid.cells()
        .map(|(x, y)| {
            let angle = if max_rotation > 0.0 {
                rng.gen_range(-max_rotation..=max_rotation)
            } else {
                0.0
            };
            Placement {
                x: x + symmetric(rng, jitter_x),
                y: y + symmetric(rng, jitter_y),
                angle,
            }
        })
        .collect()
}
