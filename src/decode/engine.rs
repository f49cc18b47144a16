use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use tokio::sync::Mutex;

use super::payload::PayloadKind;
use crate::error::DecodeError;

/// A detection straight from the recognition engine, before payload mapping.
#[derive(Debug, Clone)]
pub struct RawBarcode {
    pub kind: PayloadKind,
    /// `None` when the engine found a code but could not read its text.
    pub value: Option<String>,
}

impl RawBarcode {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: PayloadKind::Text,
            value: Some(value.into()),
        }
    }
}

/// Barcode recognition seam. The adapter owns frame lifetime; an engine only
/// ever sees the pixel buffer and its orientation.
#[async_trait]
pub trait BarcodeEngine: Send + Sync + 'static {
    async fn detect(
        &self,
        image: Bytes,
        rotation_degrees: u32,
    ) -> Result<Vec<RawBarcode>, DecodeError>;
}

/// Replays a scripted sequence of detection results, one per frame, then
/// reports nothing found. Stands in for a real recognition engine in the
/// demo binary and in tests.
pub struct ScriptedEngine {
    script: Mutex<VecDeque<Result<Vec<RawBarcode>, DecodeError>>>,
}

impl ScriptedEngine {
    pub fn new(script: Vec<Result<Vec<RawBarcode>, DecodeError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }

    /// An engine that never detects anything.
    pub fn idle() -> Self {
        Self::new(Vec::new())
    }

    /// An engine that reads the given text codes, one frame each, in order.
    pub fn reading(codes: impl IntoIterator<Item = &'static str>) -> Self {
        Self::new(
            codes
                .into_iter()
                .map(|code| Ok(vec![RawBarcode::text(code)]))
                .collect(),
        )
    }
}

#[async_trait]
impl BarcodeEngine for ScriptedEngine {
    async fn detect(
        &self,
        _image: Bytes,
        _rotation_degrees: u32,
    ) -> Result<Vec<RawBarcode>, DecodeError> {
        match self.script.lock().await.pop_front() {
            Some(result) => result,
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_engine_replays_then_idles() {
        let engine = ScriptedEngine::reading(["A", "B"]);
        let first = engine
            .detect(Bytes::new(), 0)
            .await
            .expect("scripted success");
        assert_eq!(first[0].value.as_deref(), Some("A"));
        let second = engine
            .detect(Bytes::new(), 0)
            .await
            .expect("scripted success");
        assert_eq!(second[0].value.as_deref(), Some("B"));
        let exhausted = engine
            .detect(Bytes::new(), 0)
            .await
            .expect("exhausted script is a clean no-op");
        assert!(exhausted.is_empty());
    }
}
