use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Base URL of the attendance service.
    pub base_url: String,
    /// Institutional mail domain suffix required on registration emails.
    pub college_domain: String,
    /// Maximum frames the camera may hold in flight before it must wait for
    /// a release. One processing plus one pending slot keeps latency flat.
    pub frame_in_flight: usize,
    /// Upper bound on a single decode call, in milliseconds. `None` disables
    /// the timeout layer.
    pub decode_timeout_ms: Option<u64>,
    /// Capacity of the scan-completed event channel.
    pub event_buffer_size: usize,
    /// Per-request HTTP timeout, in milliseconds.
    pub request_timeout_ms: u64,
    pub roster_max_attempts: u32,
    pub roster_initial_backoff_ms: u64,
    pub roster_max_backoff_ms: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            college_domain: "@nshm.edu.in".to_string(),
            frame_in_flight: 2,
            decode_timeout_ms: Some(1_000),
            event_buffer_size: 16,
            request_timeout_ms: 10_000,
            roster_max_attempts: 5,
            roster_initial_backoff_ms: 200,
            roster_max_backoff_ms: 5_000,
        }
    }
}

impl Configuration {
    /// Loads configuration from an optional `attendbot.toml` next to the
    /// binary, with `ATTEND_*` environment variables taking precedence.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("attendbot").required(false))
            .add_source(config::Environment::with_prefix("ATTEND"))
            .build()?
            .try_deserialize()
    }

    pub fn decode_timeout(&self) -> Option<Duration> {
        self.decode_timeout_ms.map(Duration::from_millis)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
