//! The digest type shared by every sprig crate.
//!
//! [`ObjectId`] names blobs and commits alike; the hashing itself lives in
//! `sprig-crypto`.

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::{is_hex_prefix, ObjectId, DIGEST_LEN, HEX_LEN};
