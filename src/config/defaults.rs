//! Default constants for cluster index configuration.
//!
//! All magic numbers and tokens are centralized here with documentation.

// =============================================================================
// Precision Defaults
// =============================================================================

/// Default number of clustering steps per unit of distance.
/// 10 -> 0.1, 100 -> 0.01, 1000 -> 0.001.
pub const DEFAULT_PRECISION_STEPS: u32 = 100;

// =============================================================================
// File Format Defaults
// =============================================================================

/// Default separator between the fields of a row (cutoff, count, OTUs).
pub const DEFAULT_OTU_SEPARATOR: &str = "\t";

/// Default separator between the elements of one OTU.
pub const DEFAULT_ELEMENT_SEPARATOR: &str = ",";

/// Rows starting with this prefix are comments.
pub const COMMENT_PREFIX: &str = "#";

/// Rows starting with this token are the column header written by mothur.
pub const HEADER_PREFIX: &str = "label";

/// Cutoff token of the finest clustering level, one element per OTU.
pub const UNIQUE_THRESHOLD: &str = "unique";

// =============================================================================
// Rendering Defaults
// =============================================================================

/// Default column width for wrapped listings.
pub const DEFAULT_WRAP_WIDTH: usize = 80;

/// Separator used when joining elements for display.
pub const DISPLAY_SEPARATOR: &str = ", ";

// =============================================================================
// Environment
// =============================================================================

/// Prefix of environment variables overriding configuration values.
pub const ENV_PREFIX: &str = "OTU_INDEX_";
