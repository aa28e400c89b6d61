//! Low-level PBF (protobuf) value readers and writers: varint/svarint, keys, and blobs.
//!
//! # Examples
//!
//! ```rust
//! use vectile_core::io::*;
//! ```

mod value_reader;
mod value_reader_blob;
mod value_reader_slice;
mod value_writer;
mod value_writer_blob;

pub use value_reader::*;
pub use value_reader_blob::*;
pub use value_reader_slice::*;
pub use value_writer::*;
pub use value_writer_blob::*;
