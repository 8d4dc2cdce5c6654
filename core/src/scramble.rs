use crate::geometry::Point;
use crate::grid::GridSpec;

pub const SCRAMBLE_BASE: u32 = 0x5EED_2520;

pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Uniform sample in `[0, 1)` derived from `seed` and `salt`.
pub fn rand_unit(seed: u32, salt: u32) -> f64 {
    let mixed = splitmix32(seed ^ splitmix32(salt));
    let top = mixed >> 8;
    top as f64 / (1u32 << 24) as f64
}

pub fn rand_range(seed: u32, salt: u32, min: f64, max: f64) -> f64 {
    min + (max - min) * rand_unit(seed, salt)
}

pub fn scramble_seed(base: u32, nonce: u32, grid: GridSpec) -> u32 {
    let dims = (grid.columns << 16) ^ grid.rows;
    base ^ nonce.wrapping_mul(0x9E37_79B9) ^ dims ^ 0x5CA7_7EED
}

/// One fractional start position per tile, each inside `grid.scatter_bounds()`.
pub fn scatter_positions(seed: u32, grid: GridSpec) -> Vec<Point> {
    let bounds = grid.scatter_bounds();
    (0..grid.tile_count())
        .map(|id| {
            let salt = (id as u32) << 1;
            Point::new(
                rand_range(seed, salt, 0.0, bounds.width),
                rand_range(seed, salt + 1, 0.0, bounds.height),
            )
        })
        .collect()
}
