pub mod canvas;
pub mod error;
pub mod math;
pub mod operations;
pub mod raster;
pub mod session;
pub mod shape;

pub use error::{BagError, Result};
pub use session::{PackVolume, PackedVolume, SessionConfig};
