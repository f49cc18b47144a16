use async_trait::async_trait;
use bytes::Bytes;
use image::{Rgb, RgbImage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use super::source::FrameSender;
use super::Frame;
use crate::error::CaptureError;

/// A captured image before it becomes a pipeline [`Frame`].
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub pixels: Bytes,
    pub rotation_degrees: u32,
}

/// Source of raw camera images.
///
/// Implementations own their pacing; [`CameraClient`] handles the in-flight
/// budget and teardown. A deterministic implementation ships with the crate
/// so the pipeline can run without hardware.
#[async_trait]
pub trait FrameProducer: Send + 'static {
    async fn produce(&mut self) -> Result<CapturedImage, CaptureError>;
}

/// A bound camera: the producer task runs until the client is stopped or
/// dropped, and every frame it emits carries an in-flight permit that the
/// downstream consumer returns by dropping the frame.
///
/// Binding, use and release are one scope: `bind` acquires, the task runs,
/// `stop` (or `Drop`) cancels the task and lets outstanding frames drain.
pub struct CameraClient {
    cancel_token: CancellationToken,
    producer_task: Option<tokio::task::JoinHandle<()>>,
    permits: Arc<Semaphore>,
}

impl CameraClient {
    pub fn bind(
        producer: Box<dyn FrameProducer>,
        frames: FrameSender,
        frame_in_flight: usize,
    ) -> Self {
        let cancel_token = CancellationToken::new();
        let permits = Arc::new(Semaphore::new(frame_in_flight));
        let producer_task = tokio::spawn(Self::run(
            producer,
            frames,
            permits.clone(),
            cancel_token.clone(),
        ));
        Self {
            cancel_token,
            producer_task: Some(producer_task),
            permits,
        }
    }

    async fn run(
        mut producer: Box<dyn FrameProducer>,
        frames: FrameSender,
        permits: Arc<Semaphore>,
        cancel_token: CancellationToken,
    ) {
        loop {
            let permit = tokio::select! {
                _ = cancel_token.cancelled() => break,
                permit = permits.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };
            let image = tokio::select! {
                _ = cancel_token.cancelled() => break,
                image = producer.produce() => match image {
                    Ok(image) => image,
                    Err(CaptureError::Disconnected(reason)) => {
                        tracing::error!("camera disconnected: {reason}");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("frame capture failed: {e}");
                        continue;
                    }
                },
            };
            frames
                .publish(Frame::new(image.pixels, image.rotation_degrees, Some(permit)))
                .await;
        }
        tracing::debug!("camera producer task finished");
    }

    pub fn stop(&mut self) {
        self.cancel_token.cancel();
        if let Some(task) = self.producer_task.take() {
            task.abort();
        }
    }

    /// The shared in-flight budget. Exposed so callers can observe slot
    /// accounting.
    pub fn permits(&self) -> Arc<Semaphore> {
        self.permits.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl Drop for CameraClient {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Deterministic camera that emits a moving synthetic gradient at a fixed
/// interval. Stands in for hardware in the demo binary and in tests.
pub struct TestPatternCamera {
    width: u32,
    height: u32,
    interval: Duration,
    sequence: u64,
}

impl TestPatternCamera {
    pub fn new(width: u32, height: u32, interval: Duration) -> Self {
        Self {
            width,
            height,
            interval,
            sequence: 0,
        }
    }
}

#[async_trait]
impl FrameProducer for TestPatternCamera {
    async fn produce(&mut self) -> Result<CapturedImage, CaptureError> {
        tokio::time::sleep(self.interval).await;
        self.sequence = self.sequence.wrapping_add(1);
        let sequence = self.sequence;
        let image = RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb([
                (x as u64 + sequence) as u8,
                (y as u64 ^ sequence) as u8,
                (x as u64 * y as u64 % 251) as u8,
            ])
        });
        Ok(CapturedImage {
            pixels: Bytes::from(image.into_raw()),
            rotation_degrees: 0,
        })
    }
}
