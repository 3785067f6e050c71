//! Marathon application form: data model, validation, submission state
//! machine and the outbound payload. The Yew view lives in the binary.

use crate::config::RANGE_TRACK_PADDING_PX;

pub mod config;
pub mod controller;
pub mod form;
pub mod transport;
pub mod validators;

pub use controller::{submit_application, FormController, Phase, PhotoToken, SubmitOutcome};
pub use form::{Field, FieldError, FormErrors, FormValues, Level, Photo, TextField};
pub use transport::{Payload, SimulatedTransport, Transport, TransportError};

/// Pixels the range indicator moves per unit of value on a track that is
/// `track_width` pixels wide.
#[inline]
pub fn indicator_step(track_width: f64, max: u8) -> f64 {
    if max == 0 {
        return 0.0;
    }
    ((track_width - RANGE_TRACK_PADDING_PX) / max as f64).max(0.0)
}

/// Horizontal offset of the range indicator for `value`.
#[inline]
pub fn indicator_offset(value: u8, step: f64) -> f64 {
    value as f64 * step
}

/// Human-readable size of an attachment, e.g. `"1.5 KB"`.
pub fn format_file_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}
