/// Largest accepted blur radius; bounds the per-rank halo working set.
pub const MAX_RADIUS: usize = 1000;

/// Rank that owns the image, performs I/O and roots every collective.
pub const ROOT_RANK: usize = 0;

/// Broadcast geometry: `width` and `height` as little-endian `u32`.
pub const GEOMETRY_BYTES: usize = 8;

/// Largest color component value an 8-bit channel can carry.
pub const MAX_COLOR_VALUE: u8 = u8::MAX;
