use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use super::Frame;

/// Creates a keep-only-latest frame conduit.
///
/// The channel holds at most one frame. Publishing while a frame is still
/// pending replaces it, dropping (and thereby releasing) the stale one, so
/// the consumer always decodes the most current camera state and backlog
/// never accumulates. Frame loss under backpressure is intentional.
pub fn latest_channel() -> (FrameSender, FrameReceiver) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(None),
        notify: Notify::new(),
        sender_closed: AtomicBool::new(false),
        receiver_closed: AtomicBool::new(false),
    });
    (
        FrameSender {
            shared: shared.clone(),
        },
        FrameReceiver { shared },
    )
}

struct Shared {
    slot: Mutex<Option<Frame>>,
    notify: Notify,
    sender_closed: AtomicBool,
    receiver_closed: AtomicBool,
}

pub struct FrameSender {
    shared: Arc<Shared>,
}

impl FrameSender {
    /// Publishes a frame, replacing any unconsumed one.
    pub async fn publish(&self, frame: Frame) {
        if self.shared.receiver_closed.load(Ordering::Acquire) {
            tracing::trace!(frame = %frame.id(), "receiver gone; dropping frame");
            return;
        }
        let stale = self.shared.slot.lock().await.replace(frame);
        if let Some(stale) = stale {
            tracing::trace!(frame = %stale.id(), "replaced by newer frame before decode");
        }
        self.shared.notify.notify_one();
    }
}

impl Drop for FrameSender {
    fn drop(&mut self) {
        self.shared.sender_closed.store(true, Ordering::Release);
        self.shared.notify.notify_one();
    }
}

pub struct FrameReceiver {
    shared: Arc<Shared>,
}

impl FrameReceiver {
    /// Waits for the most recent unconsumed frame. Returns `None` once the
    /// sender is gone and nothing is pending.
    pub async fn recv(&mut self) -> Option<Frame> {
        loop {
            if let Some(frame) = self.shared.slot.lock().await.take() {
                return Some(frame);
            }
            if self.shared.sender_closed.load(Ordering::Acquire) {
                return self.shared.slot.lock().await.take();
            }
            self.shared.notify.notified().await;
        }
    }
}

impl Drop for FrameReceiver {
    fn drop(&mut self) {
        self.shared.receiver_closed.store(true, Ordering::Release);
    }
}
