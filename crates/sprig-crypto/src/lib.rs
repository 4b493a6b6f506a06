//! Content hashing for sprig.
//!
//! Every digest in the system comes from a [`ContentHasher`]: BLAKE3 over the
//! raw bytes, prefixed with a domain tag so a blob and a commit with the same
//! bytes never share an id. All crypto wraps `blake3`; nothing is hand-rolled.

pub mod hasher;

pub use hasher::{ContentHasher, HasherError};
