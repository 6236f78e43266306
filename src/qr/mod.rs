//! QR code rendering for tracking URLs.
//!
//! Two styles exist: the plain two-tone rendering every deployment starts
//! with, and the branded rendering (shop colors, rounded modules, embedded
//! logo) used for customer-facing slips. Both are deterministic: the same
//! URL and style always produce byte-identical output.

mod encoder;
mod style;

pub use encoder::{QrEncodeError, encode, to_png_bytes, write_png};
pub use style::{ColoredStyle, ErrorCorrection, QrStyle};
