//! Common types shared by the point cloud reader, the rasterizer and the CLI.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod zone;

pub use bbox::BoundingBox;
pub use error::{DsmError, DsmResult};
pub use grid::{rescale_to_index, GridMapping, RasterDims};
pub use zone::{Hemisphere, UtmZone, ZoneCode};
