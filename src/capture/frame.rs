use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::OwnedSemaphorePermit;
use uuid::Uuid;

/// A single camera frame: an opaque pixel buffer plus the rotation the
/// recognition engine needs to orient it.
///
/// Ownership moves into the decoder for the duration of processing. The
/// attached permit is the camera's in-flight slot; dropping the frame
/// returns it, so release happens exactly once no matter which path the
/// frame leaves the pipeline on. A leaked frame stalls frame delivery.
#[derive(Debug)]
pub struct Frame {
    image: Bytes,
    rotation_degrees: u32,
    captured_at: DateTime<Utc>,
    id: Uuid,
    permit: Option<OwnedSemaphorePermit>,
}

impl Frame {
    pub fn new(image: Bytes, rotation_degrees: u32, permit: Option<OwnedSemaphorePermit>) -> Self {
        Self {
            image,
            rotation_degrees,
            captured_at: Utc::now(),
            id: Uuid::new_v4(),
            permit,
        }
    }

    /// The raw pixel buffer. `Bytes` clones are reference-counted, so the
    /// engine can keep a view without copying.
    pub fn image(&self) -> Bytes {
        self.image.clone()
    }

    pub fn rotation_degrees(&self) -> u32 {
        self.rotation_degrees
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        if self.permit.take().is_some() {
            tracing::trace!(frame = %self.id, "frame released");
        }
    }
}
