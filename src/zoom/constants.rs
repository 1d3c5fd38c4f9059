//! Reference values for zoom and DPI conversion.

// === Reference Values ===

/// Zoom percentage that means "no scaling".
pub const REFERENCE_ZOOM: i32 = 100;

/// DPI that corresponds to [`REFERENCE_ZOOM`].
pub const REFERENCE_DPI: u32 = 96;

/// Typographic points per inch, used to turn font points into pixels.
pub const POINTS_PER_INCH: u32 = 72;

// === Sentinels ===

/// "Unset" size value. Passed through every scalar conversion unchanged.
pub const UNSET: i32 = -1;

// === Explicit Zoom Limits ===

/// Smallest zoom accepted from an explicit percentage in the config.
pub const MIN_CONFIGURED_ZOOM: i32 = 25;

/// Largest zoom accepted from an explicit percentage in the config.
pub const MAX_CONFIGURED_ZOOM: i32 = 1600;
