use attendbot_rust::api::{AttendanceApi, HttpAttendanceApi};
use attendbot_rust::capture::TestPatternCamera;
use attendbot_rust::coordinator::ScanCoordinatorBuilder;
use attendbot_rust::decode::ScriptedEngine;
use attendbot_rust::error::AppError;
use attendbot_rust::roster::{RetryPolicy, RosterService};
use attendbot_rust::state::StateHandle;
use attendbot_rust::Configuration;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let configuration = Configuration::load()?;
    let state = StateHandle::new();
    let api: Arc<dyn AttendanceApi> = Arc::new(HttpAttendanceApi::new(&configuration)?);

    let roster = RosterService::new(api.clone(), state.clone(), RetryPolicy::from(&configuration));
    match roster.refresh().await {
        Ok(count) => tracing::info!(students = count, "roster loaded"),
        Err(e) => tracing::warn!("initial roster fetch failed: {e}"),
    }

    // No hardware camera binding exists on this target; the test-pattern
    // camera and a scripted engine drive the real pipeline end to end.
    let (mut coordinator, mut events) = ScanCoordinatorBuilder::new(configuration)
        .api(api)
        .state(state.clone())
        .engine(Arc::new(ScriptedEngine::idle()))
        .producer(Box::new(TestPatternCamera::new(
            640,
            480,
            Duration::from_millis(33),
        )))
        .build()?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Some(event) => tracing::info!(code = %event.code, "scan completed"),
                None => break,
            },
        }
    }
    coordinator.stop();
    Ok(())
}
