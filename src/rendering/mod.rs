//! Rendering module: raster images, slicing, text and chart painting

pub mod chart;
pub mod paint;
pub mod raster;
pub mod split;
pub mod text;

pub use raster::RasterImage;
pub use split::split;
pub use text::Font;
