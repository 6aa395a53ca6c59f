//! The canonical wire codec for the rollup compression engine.
//!
//! Both the rollup builder and the batch reconstructor go through this crate: the
//! [`CalldataRollupHeader`] layout, the delta encoding and the payload codec live here so the
//! two sides cannot drift apart. Every encoding is canonical, meaning two equal values always
//! produce byte-identical output.

pub use error::CodecError;
mod error;

pub mod decoding;
pub mod encoding;

pub mod delta;

pub use header::CalldataRollupHeader;
mod header;

pub use payload::{decode_batch_payloads, encode_batch_payloads};
mod payload;
