//! Carousel engine crate.
//!
//! This crate owns the platform + GPU runtime pieces and the faceted-cylinder
//! renderer used by the viewer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod camera;
pub mod render;
pub mod surface;
