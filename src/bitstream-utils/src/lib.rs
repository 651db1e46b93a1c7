//! Shared utility code for the bitstream crates.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use funty;

pub mod bits;
