

#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused_extern_crates,
    unused,

    missing_copy_implementations,
    missing_debug_implementations,

    clippy::all,
    clippy::pedantic,
)]

#![deny(
    unused_variables,
    unused_assignments,
    dead_code,
    unused_must_use,
    trivial_numeric_casts,
    redundant_semicolon
)]

#![forbid(unsafe_code)]


pub mod io; // public to allow for custom bit-level framing elsewhere

pub mod error;
pub mod pixel;
pub mod raster;
pub mod filter;
pub mod block;
pub mod rle;
pub mod huffman;
pub mod header;
pub mod encode;
pub mod decode;

pub use encode::{encode_file, encode_raster};
pub use decode::{decode_bytes, decode_file};
pub use raster::Raster;
pub use filter::Filter;
pub use error::{Error, Result};

/// Re-exports of the types most callers need for a simple encode/decode round trip.
pub mod prelude {
    pub use crate::{decode_bytes, decode_file, encode_file, encode_raster};
    pub use crate::error::{Error, Result};
    pub use crate::filter::Filter;
    pub use crate::raster::Raster;
}

