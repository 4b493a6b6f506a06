use sprig_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::Blob;

/// Where blobs live.
///
/// A blob is never changed after it is written; writing the same bytes again
/// returns the same id and leaves the store as it was. An object is visible
/// to `read` only once all of its bytes are durable, and readers may run
/// alongside a writer.
pub trait ObjectStore: Send + Sync {
    /// `Ok(None)` when nothing is filed under `id`. Damaged content is an
    /// error, never a blob.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Blob>>;

    fn write(&self, blob: &Blob) -> StoreResult<ObjectId>;

    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Every stored id in ascending order.
    fn ids(&self) -> StoreResult<Vec<ObjectId>>;

    fn len(&self) -> StoreResult<usize> {
        Ok(self.ids()?.len())
    }

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Store raw bytes and return their digest.
    fn put(&self, data: &[u8]) -> StoreResult<ObjectId> {
        self.write(&Blob::new(data.to_vec()))
    }

    /// Fetch raw bytes by digest, failing with [`StoreError::NotFound`] if
    /// the object is absent.
    fn get(&self, id: &ObjectId) -> StoreResult<Vec<u8>> {
        self.read(id)?
            .map(|blob| blob.data)
            .ok_or(StoreError::NotFound(*id))
    }
}
