use futures::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::timeout::TimeoutLayer;
use tower::util::BoxService;
use tower::{BoxError, Service, ServiceBuilder, ServiceExt};

use super::engine::BarcodeEngine;
use super::payload::DecodedPayload;
use crate::capture::Frame;

/// Tower service around the recognition engine. The frame moves into the
/// call future, so its camera slot is released when the call resolves or is
/// torn down by the timeout layer.
#[derive(Clone)]
pub struct DecodeService {
    engine: Arc<dyn BarcodeEngine>,
}

impl DecodeService {
    pub fn new(engine: Arc<dyn BarcodeEngine>) -> Self {
        Self { engine }
    }
}

impl Service<Frame> for DecodeService {
    type Response = Vec<DecodedPayload>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, frame: Frame) -> Self::Future {
        let engine = self.engine.clone();
        Box::pin(async move {
            let raw = engine
                .detect(frame.image(), frame.rotation_degrees())
                .await?;
            Ok(raw.into_iter().map(DecodedPayload::from).collect())
        })
    }
}

/// Decoder adapter the coordinator consumes: engine behind an optional
/// timeout, failures logged and swallowed so the pipeline moves on to the
/// next frame.
pub struct DecoderAdapter {
    service: BoxService<Frame, Vec<DecodedPayload>, BoxError>,
}

impl DecoderAdapter {
    pub fn new(engine: Arc<dyn BarcodeEngine>, timeout: Option<Duration>) -> Self {
        let service = ServiceBuilder::new()
            .option_layer(timeout.map(TimeoutLayer::new))
            .service(DecodeService::new(engine));
        Self {
            service: BoxService::new(service),
        }
    }

    pub async fn decode(&mut self, frame: Frame) -> Vec<DecodedPayload> {
        let frame_id = frame.id();
        let ready = match self.service.ready().await {
            Ok(service) => service,
            Err(e) => {
                tracing::warn!(frame = %frame_id, "decoder unavailable: {e}");
                return Vec::new();
            }
        };
        match ready.call(frame).await {
            Ok(payloads) => payloads,
            Err(e) => {
                tracing::warn!(frame = %frame_id, "decode failed, skipping frame: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::engine::{RawBarcode, ScriptedEngine};
    use crate::decode::payload::PayloadKind;
    use crate::error::DecodeError;
    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio::sync::Semaphore;

    async fn frame_with_slot(permits: &Arc<Semaphore>) -> Frame {
        let permit = permits
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore open");
        Frame::new(Bytes::from_static(b"pixels"), 0, Some(permit))
    }

    #[tokio::test]
    async fn successful_decode_yields_payloads_and_releases_the_frame() {
        let permits = Arc::new(Semaphore::new(1));
        let mut adapter = DecoderAdapter::new(Arc::new(ScriptedEngine::reading(["QR-1"])), None);

        let payloads = adapter.decode(frame_with_slot(&permits).await).await;
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].display_text, "QR-1");
        assert_eq!(payloads[0].kind, PayloadKind::Text);
        assert_eq!(permits.available_permits(), 1);
    }

    #[tokio::test]
    async fn engine_failure_is_swallowed_and_still_releases_the_frame() {
        let permits = Arc::new(Semaphore::new(1));
        let engine = ScriptedEngine::new(vec![
            Err(DecodeError::Engine("corrupt frame".to_string())),
            Ok(vec![RawBarcode::text("after-failure")]),
        ]);
        let mut adapter = DecoderAdapter::new(Arc::new(engine), None);

        let payloads = adapter.decode(frame_with_slot(&permits).await).await;
        assert!(payloads.is_empty());
        assert_eq!(permits.available_permits(), 1);

        // The adapter keeps working after a failed frame.
        let payloads = adapter.decode(frame_with_slot(&permits).await).await;
        assert_eq!(payloads[0].display_text, "after-failure");
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_decode_is_swallowed_and_releases_the_frame() {
        struct StalledEngine;

        #[async_trait]
        impl BarcodeEngine for StalledEngine {
            async fn detect(
                &self,
                _image: Bytes,
                _rotation_degrees: u32,
            ) -> Result<Vec<RawBarcode>, DecodeError> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        }

        let permits = Arc::new(Semaphore::new(1));
        let mut adapter =
            DecoderAdapter::new(Arc::new(StalledEngine), Some(Duration::from_millis(50)));

        let payloads = adapter.decode(frame_with_slot(&permits).await).await;
        assert!(payloads.is_empty());
        assert_eq!(permits.available_permits(), 1);
    }

    #[tokio::test]
    async fn multiple_detections_come_back_in_engine_order() {
        let engine = ScriptedEngine::new(vec![Ok(vec![
            RawBarcode::text("first"),
            RawBarcode::text("second"),
        ])]);
        let mut adapter = DecoderAdapter::new(Arc::new(engine), None);

        let payloads = adapter
            .decode(Frame::new(Bytes::from_static(b"pixels"), 0, None))
            .await;
        let texts: Vec<_> = payloads.iter().map(|p| p.display_text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
    }
}
