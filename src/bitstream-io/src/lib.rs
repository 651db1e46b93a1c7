//! Provides buffers for bit-level serialization and deserialization
//! of primitive values.
//!
//! Every operation on types from this crate starts at a byte's LSB,
//! working towards the MSB. Fields are packed tightly across byte
//! boundaries with no padding in between; only the final partial
//! byte of a [`BitWriter`] is zero-padded when it is finished.
//!
//! # Field layouts
//!
//! - Fixed-width integers are written LSB first.
//! - Signed integers are followed by a single sign bit which always
//!   comes last on the wire.
//! - Floating point values are split into an optional sign bit, the
//!   exponent bits and the mantissa bits, in that order. Exponent and
//!   mantissa may be truncated to custom widths.
//! - Variable-length integers are a sequence of fixed-size groups,
//!   each followed by a continuation bit.
//! - Fixed-point decimals store a sign bit, the integral part and the
//!   scaled fractional part as separate integers.
//!
//! [`BitReader`] and [`BitWriter`] mirror each other, so whatever one
//! of them produces, the other consumes.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
pub use error::*;

pub mod layout;

mod options;
pub use options::*;

mod reader;
pub use reader::BitReader;

mod writer;
pub use writer::BitWriter;
