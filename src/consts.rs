//! Shared numeric constants for the mask engine.

// ── Drafting ────────────────────────────────────────────────────

/// Minimum image-space distance between consecutive draft points.
pub const MIN_SEGMENT_PX: f64 = 1.5;

/// Points required to finalize a draft into a mask.
pub const MIN_DRAFT_POINTS: usize = 3;

// ── Mask invariants ─────────────────────────────────────────────

/// Minimum vertex count for a closed area mask.
pub const MIN_AREA_POINTS: usize = 3;

/// Minimum vertex count for an open linear mask.
pub const MIN_LINEAR_POINTS: usize = 2;

// ── Curves ──────────────────────────────────────────────────────

/// Fraction of the vector to each neighbour used when a corner becomes smooth.
pub const HANDLE_RATIO: f64 = 0.2;

/// Samples per cubic segment when flattening (t = 0, 0.1, …, 1.0).
pub const BEZIER_STEPS: usize = 10;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for vertices, handles and thin masks.
pub const HIT_SLOP_PX: f64 = 8.0;
