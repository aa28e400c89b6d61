//! Core value types shared across the workspace: byte blobs, geographic bounding boxes,
//! and tile coordinates.

mod blob;
pub use blob::*;

mod geo_bbox;
pub use geo_bbox::*;

mod tile_coord;
pub use tile_coord::*;
