//! Icon generator for web apps - resizes one square logo into PWA icons
//!
//! Decodes a single source image, resamples it to each configured edge length
//! with a Lanczos filter, and writes size-optimized PNGs to an output directory.

pub mod app;
pub mod error;
pub mod icons;
pub mod models;

pub use error::{Error, Result};
