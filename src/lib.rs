#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

//! Encoding and decoding of TCP headers.
//!
//! The crate centers on [`tcp::TcpHeader`], an owned record of the TCP
//! header fields that serializes to and deserializes from the big-endian
//! wire layout, computes the pseudo-header checksum against an enclosing
//! IPv4 header, and extracts the multipath capability option embedded in
//! the options region.

mod error;
pub use error::Error;

pub mod checksum_utils;
pub mod ipv4;
pub mod tcp;
