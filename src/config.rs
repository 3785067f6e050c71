//! Application-level configuration constants.

// Submission
pub const SUBMIT_DELAY_MS: u32 = 1_500;
pub const DEFAULT_PHOTO_CONTENT_TYPE: &str = "application/octet-stream";

// Age slider limits
pub const MIN_AGE: u8 = 0;
pub const MAX_AGE: u8 = 100;
pub const MIN_VALID_AGE: u8 = 1;

// UI constants
pub const RANGE_TRACK_PADDING_PX: f64 = 16.0;
pub const BOUNDARY_LEN: usize = 24;
