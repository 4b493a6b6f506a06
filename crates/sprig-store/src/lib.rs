//! Content-addressed blob storage.
//!
//! A blob's name is the BLAKE3 digest of its bytes, so the same content is
//! kept once however many paths or commits refer to it. [`FsObjectStore`]
//! spreads blobs over two-hex-digit fan-out directories and publishes each
//! one with [`write_atomic`]: a reader either sees the complete object or
//! no object at all. Reads re-hash what they load, and a blob whose bytes no
//! longer match its name is reported rather than returned.
//!
//! [`InMemoryObjectStore`] implements the same [`ObjectStore`] trait for
//! tests of the layers above.

pub mod atomic;
pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use atomic::{write_atomic, write_atomic_in};
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::Blob;
pub use traits::ObjectStore;
