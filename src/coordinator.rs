use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::client::AttendanceApi;
use crate::api::types::CheckInOutcome;
use crate::capture::{latest_channel, CameraClient, FrameProducer, FrameReceiver};
use crate::config::Configuration;
use crate::decode::{BarcodeEngine, DecoderAdapter, ScanCode};
use crate::error::AppError;
use crate::state::StateHandle;

/// Emitted once per distinct scan code, when the check-in fires (not when it
/// resolves). Callers typically leave the scan screen on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCompleted {
    pub code: ScanCode,
}

/// Bridges the camera to the remote check-in: decodes the freshest frame,
/// dedups on the trigger value, and fires one check-in per distinct code.
pub struct ScanCoordinator {
    pipeline_task: tokio::task::JoinHandle<()>,
    camera: CameraClient,
    cancel_token: CancellationToken,
}

impl ScanCoordinator {
    fn new(
        configuration: Configuration,
        api: Arc<dyn AttendanceApi>,
        engine: Arc<dyn BarcodeEngine>,
        producer: Box<dyn FrameProducer>,
        state: StateHandle,
    ) -> (Self, mpsc::Receiver<ScanCompleted>) {
        let cancel_token = CancellationToken::new();
        let (frame_tx, frame_rx) = latest_channel();
        let camera = CameraClient::bind(producer, frame_tx, configuration.frame_in_flight);
        let (event_tx, event_rx) = mpsc::channel(configuration.event_buffer_size);
        let decoder = DecoderAdapter::new(engine, configuration.decode_timeout());
        let pipeline_task = Self::start_pipeline_task(
            frame_rx,
            decoder,
            api,
            state,
            event_tx,
            cancel_token.clone(),
        );
        (
            Self {
                pipeline_task,
                camera,
                cancel_token,
            },
            event_rx,
        )
    }

    fn start_pipeline_task(
        mut frames: FrameReceiver,
        mut decoder: DecoderAdapter,
        api: Arc<dyn AttendanceApi>,
        state: StateHandle,
        events: mpsc::Sender<ScanCompleted>,
        cancel_token: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            // The sole dedup mechanism: a code re-triggers only once its
            // value changes. No debounce timer.
            let mut current_trigger = ScanCode::new();
            loop {
                let frame = tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    frame = frames.recv() => match frame {
                        Some(frame) => frame,
                        None => break,
                    },
                };
                let payloads = decoder.decode(frame).await;
                let Some(payload) = payloads.into_iter().next() else {
                    continue;
                };
                let code = payload.scan_code();
                if code.is_empty() || code == current_trigger {
                    continue;
                }
                current_trigger = code.clone();
                tracing::info!(code = %code, "scan trigger accepted");
                if events.try_send(ScanCompleted { code: code.clone() }).is_err() {
                    tracing::debug!("scan event receiver not keeping up; event dropped");
                }
                // One check-in per trigger, detached so a slow server never
                // stalls decoding. Failures keep the previous display state.
                let api = api.clone();
                let state = state.clone();
                tokio::spawn(async move {
                    match api.check_in(&code).await {
                        Ok(response) => state.apply_check_in(&CheckInOutcome::from(response)),
                        Err(e) => {
                            tracing::warn!(code = %code, "check-in failed, display state unchanged: {e}");
                        }
                    }
                });
            }
            tracing::debug!("scan pipeline task finished");
        })
    }

    /// Tears down the camera binding and pipeline. In-flight check-ins are
    /// left to finish on their own; their state writes land in the watch
    /// channel whether or not anyone still listens.
    pub fn stop(&mut self) {
        self.cancel_token.cancel();
        self.camera.stop();
        self.pipeline_task.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl Drop for ScanCoordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct ScanCoordinatorBuilder {
    configuration: Configuration,
    api: Option<Arc<dyn AttendanceApi>>,
    engine: Option<Arc<dyn BarcodeEngine>>,
    producer: Option<Box<dyn FrameProducer>>,
    state: StateHandle,
}

impl ScanCoordinatorBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            api: None,
            engine: None,
            producer: None,
            state: StateHandle::new(),
        }
    }

    // Overrides the configured in-flight frame budget.
    pub fn frame_in_flight(mut self, frame_in_flight: usize) -> Self {
        self.configuration.frame_in_flight = frame_in_flight;
        self
    }

    // Overrides the configured scan-event buffer size.
    pub fn event_buffer_size(mut self, event_buffer_size: usize) -> Self {
        self.configuration.event_buffer_size = event_buffer_size;
        self
    }

    pub fn api(mut self, api: Arc<dyn AttendanceApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn engine(mut self, engine: Arc<dyn BarcodeEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn producer(mut self, producer: Box<dyn FrameProducer>) -> Self {
        self.producer = Some(producer);
        self
    }

    pub fn state(mut self, state: StateHandle) -> Self {
        self.state = state;
        self
    }

    pub fn build(self) -> Result<(ScanCoordinator, mpsc::Receiver<ScanCompleted>), AppError> {
        let api = self
            .api
            .ok_or(AppError::Coordinator("Attendance api not set".to_string()))?;
        let engine = self
            .engine
            .ok_or(AppError::Coordinator("Barcode engine not set".to_string()))?;
        let producer = self
            .producer
            .ok_or(AppError::Coordinator("Frame producer not set".to_string()))?;
        Ok(ScanCoordinator::new(
            self.configuration,
            api,
            engine,
            producer,
            self.state,
        ))
    }
}
