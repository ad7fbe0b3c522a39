// Ingestion caps for graph documents and GeoJSON shape collections

// Graph size caps
pub const MAX_NODES: usize = 500_000;
pub const MAX_EDGES: usize = 2_000_000;

// Shape collections
pub const MAX_FEATURES: usize = 500_000;
pub const MAX_RING_POINTS: usize = 1_000_000;

// Numeric bounds (covers geographic degrees and projected metres)
pub const COORD_MIN: f64 = -1.0e9;
pub const COORD_MAX: f64 = 1.0e9;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

/// Caps applied by one ingestion pass; readers use `DEFAULT`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IngestCaps {
    pub nodes: usize,
    pub edges: usize,
    pub features: usize,
    pub ring_points: usize,
}

impl IngestCaps {
    pub const DEFAULT: IngestCaps = IngestCaps {
        nodes: MAX_NODES,
        edges: MAX_EDGES,
        features: MAX_FEATURES,
        ring_points: MAX_RING_POINTS,
    };
}
