//! Contrast-limited adaptive histogram equalization
//!
//! The image is split into a grid of tiles (8x8 by default). Each tile gets
//! its own clipped histogram and lookup table; output pixels blend the four
//! nearest tile tables bilinearly so tile seams do not show.

use image::GrayImage;

/// Default number of tiles along each axis
pub const DEFAULT_TILE_GRID: u32 = 8;

/// Apply CLAHE with the given clip limit and tile grid
///
/// `clip_limit` is relative to the mean bin height: a tile of `n` pixels
/// clips every bin at `clip_limit * n / 256` and spreads the excess evenly.
/// A clip limit of 0 or less disables clipping.
pub fn clahe(gray: &GrayImage, clip_limit: f32, tile_grid: u32) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }

    let (tiles_x, tile_w) = tile_layout(width, tile_grid);
    let (tiles_y, tile_h) = tile_layout(height, tile_grid);

    let mut luts = vec![[0u8; 256]; (tiles_x * tiles_y) as usize];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);
            luts[(ty * tiles_x + tx) as usize] = tile_lut(gray, x0, y0, x1, y1, clip_limit);
        }
    }

    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        let (ty0, ty1, wy) = neighbours(y, tile_h, tiles_y);
        for x in 0..width {
            let (tx0, tx1, wx) = neighbours(x, tile_w, tiles_x);
            let v = gray.get_pixel(x, y)[0] as usize;

            let lut = |tx: u32, ty: u32| luts[(ty * tiles_x + tx) as usize][v] as f32;
            let top = lut(tx0, ty0) * (1.0 - wx) + lut(tx1, ty0) * wx;
            let bottom = lut(tx0, ty1) * (1.0 - wx) + lut(tx1, ty1) * wx;
            let blended = top * (1.0 - wy) + bottom * wy;

            out.put_pixel(x, y, image::Luma([blended.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out
}

/// Number of tiles and tile size along one axis, with no empty trailing tiles
fn tile_layout(extent: u32, grid: u32) -> (u32, u32) {
    let grid = grid.clamp(1, extent);
    let size = extent.div_ceil(grid);
    (extent.div_ceil(size), size)
}

/// Tile indices bracketing a coordinate and the weight of the second one
fn neighbours(coord: u32, tile_size: u32, tiles: u32) -> (u32, u32, f32) {
    let pos = (coord as f32 + 0.5) / tile_size as f32 - 0.5;
    if pos <= 0.0 {
        return (0, 0, 0.0);
    }
    let first = pos.floor() as u32;
    if first + 1 >= tiles {
        return (tiles - 1, tiles - 1, 0.0);
    }
    (first, first + 1, pos - first as f32)
}

fn tile_lut(gray: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, clip_limit: f32) -> [u8; 256] {
    let mut histogram = [0u32; 256];
    for y in y0..y1 {
        for x in x0..x1 {
            histogram[gray.get_pixel(x, y)[0] as usize] += 1;
        }
    }
    let area = (x1 - x0) * (y1 - y0);

    if clip_limit > 0.0 {
        let limit = ((clip_limit * area as f32 / 256.0) as u32).max(1);
        let mut excess = 0u32;
        for bin in histogram.iter_mut() {
            if *bin > limit {
                excess += *bin - limit;
                *bin = limit;
            }
        }

        let batch = excess / 256;
        let residual = (excess % 256) as usize;
        for bin in histogram.iter_mut() {
            *bin += batch;
        }
        if residual > 0 {
            let step = (256 / residual).max(1);
            for bin in histogram.iter_mut().step_by(step).take(residual) {
                *bin += 1;
            }
        }
    }

    let scale = 255.0 / area as f32;
    let mut lut = [0u8; 256];
    let mut cumulative = 0u32;
    for (value, &count) in histogram.iter().enumerate() {
        cumulative += count;
        lut[value] = (cumulative as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}
