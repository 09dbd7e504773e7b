pub mod placement;
pub mod rasterize;
