use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::api::client::AttendanceApi;
use crate::api::types::Student;
use crate::config::Configuration;
use crate::error::{ApiError, RosterError};
use crate::state::StateHandle;

/// Bounded retry with exponential backoff for roster fetches. The upstream
/// behavior this replaces retried immediately and forever; a flaky server
/// turned that into a request storm.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl From<&Configuration> for RetryPolicy {
    fn from(configuration: &Configuration) -> Self {
        Self {
            max_attempts: configuration.roster_max_attempts,
            initial_backoff: Duration::from_millis(configuration.roster_initial_backoff_ms),
            max_backoff: Duration::from_millis(configuration.roster_max_backoff_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following `attempt` (1-based): doubled each
    /// round, capped, with up to 50% jitter so synchronized clients spread
    /// out.
    fn backoff_for(&self, attempt: u32) -> Duration {
        let doubled = self
            .initial_backoff
            .saturating_mul(1u32 << (attempt - 1).min(16));
        let capped = doubled.min(self.max_backoff);
        let jitter_ms = rand::rng().random_range(0..=(capped.as_millis() as u64) / 2);
        capped + Duration::from_millis(jitter_ms)
    }
}

/// Fetches the registered-student roster and publishes it as a snapshot.
pub struct RosterService {
    api: Arc<dyn AttendanceApi>,
    state: StateHandle,
    policy: RetryPolicy,
}

impl RosterService {
    pub fn new(api: Arc<dyn AttendanceApi>, state: StateHandle, policy: RetryPolicy) -> Self {
        Self { api, state, policy }
    }

    /// Refreshes the roster, retrying per the policy. Returns the roster
    /// size, or the last error once the attempt budget is spent.
    pub async fn refresh(&self) -> Result<usize, RosterError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.api.fetch_roster().await {
                Ok(students) => {
                    let count = students.len();
                    tracing::debug!(students = count, attempt, "roster refreshed");
                    self.state.set_roster(students);
                    return Ok(count);
                }
                Err(e) if attempt >= self.policy.max_attempts => {
                    return Err(RosterError::Exhausted {
                        attempts: attempt,
                        source: e,
                    });
                }
                Err(e) => {
                    let delay = self.policy.backoff_for(attempt);
                    tracing::warn!(attempt, "roster fetch failed, retrying in {delay:?}: {e}");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Replaces one student record on the server and mirrors the change into
    /// the published snapshot. No retry; record edits are user-driven.
    pub async fn update_student(&self, id: u64, student: Student) -> Result<(), ApiError> {
        self.api.update_user(id, &student).await?;
        self.state.upsert_student(student);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::RecordingApi;

    fn quick_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(40),
        }
    }

    fn student(id: u64) -> Student {
        Student {
            name: format!("Student {id}"),
            college_id: id,
            college_email: format!("s{id}@nshm.edu.in"),
            is_present: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_recovers_within_the_retry_budget() {
        let api = Arc::new(RecordingApi::new());
        api.push_roster(Err(ApiError::Status(500))).await;
        api.push_roster(Err(ApiError::Status(500))).await;
        api.push_roster(Ok(vec![student(10000000001), student(10000000002)]))
            .await;
        let state = StateHandle::new();
        let service = RosterService::new(api.clone(), state.clone(), quick_policy(5));

        let count = service.refresh().await.expect("recovered");
        assert_eq!(count, 2);
        assert_eq!(api.roster_calls().await, 3);
        assert_eq!(state.snapshot().roster.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_stops_after_the_attempt_budget() {
        let api = Arc::new(RecordingApi::new());
        for _ in 0..3 {
            api.push_roster(Err(ApiError::Status(500))).await;
        }
        let state = StateHandle::new();
        let service = RosterService::new(api.clone(), state.clone(), quick_policy(3));

        let error = service.refresh().await.expect_err("budget spent");
        let RosterError::Exhausted { attempts, .. } = error;
        assert_eq!(attempts, 3);
        assert_eq!(api.roster_calls().await, 3);
        assert!(state.snapshot().roster.is_empty());
    }

    #[tokio::test]
    async fn update_student_patches_and_mirrors_the_snapshot() {
        let api = Arc::new(RecordingApi::new());
        let state = StateHandle::new();
        state.set_roster(vec![student(10000000001)]);
        let service = RosterService::new(api.clone(), state.clone(), RetryPolicy::default());

        let mut edited = student(10000000001);
        edited.is_present = true;
        service
            .update_student(10000000001, edited)
            .await
            .expect("patch accepted");

        assert_eq!(api.updates().await.len(), 1);
        let snapshot = state.snapshot();
        assert!(snapshot.roster[&10000000001].is_present);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(400),
        };
        // Jitter adds at most half the capped delay on top.
        for (attempt, base_ms) in [(1u32, 100u64), (2, 200), (3, 400), (4, 400), (8, 400)] {
            let delay = policy.backoff_for(attempt);
            assert!(delay >= Duration::from_millis(base_ms), "attempt {attempt}");
            assert!(
                delay <= Duration::from_millis(base_ms + base_ms / 2),
                "attempt {attempt}"
            );
        }
    }
}
