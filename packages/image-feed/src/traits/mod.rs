//! Core trait abstractions for the image feed.
//!
//! These traits define the seams applications implement to plug in a
//! remote image source.

pub mod source;
