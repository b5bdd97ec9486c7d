pub mod apply;
pub mod classify;
pub mod error;
pub mod geometry;
pub mod host;
pub mod mapping;
pub mod math;
pub mod memory;
pub mod paint;

pub use error::{FacePaintError, Result};
