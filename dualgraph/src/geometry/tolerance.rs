// Tolerances for shared-boundary detection, in coordinate units

pub const EPS_POS: f64 = 1e-9;            // point-to-line distance for collinearity
pub const EPS_LEN: f64 = 1e-12;           // zero-length segment threshold
pub const EPS_OVERLAP: f64 = 1e-9;        // minimum shared span, as a fraction of the segment

#[inline] pub fn near_zero(x: f64, eps: f64) -> bool { x.abs() <= eps }
