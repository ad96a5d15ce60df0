//! Image source implementations.
//!
//! - [`PicsumSource`] - Picsum Photos REST API

pub mod picsum;

pub use picsum::PicsumSource;
