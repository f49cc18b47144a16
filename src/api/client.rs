use async_trait::async_trait;

use super::types::{RegistrationData, ScanResponse, Student};
use crate::error::ApiError;

/// Remote attendance service seam.
///
/// The HTTP implementation lives in [`super::http`]; tests swap in
/// [`super::mock::RecordingApi`].
#[async_trait]
pub trait AttendanceApi: Send + Sync + 'static {
    /// `GET /scan/{code}`: the check-in call behind a scan trigger.
    async fn check_in(&self, code: &str) -> Result<ScanResponse, ApiError>;

    /// `GET /users`: the full registered-student roster.
    async fn fetch_roster(&self) -> Result<Vec<Student>, ApiError>;

    /// `POST /register`: returns the server's message on success. A 400
    /// surfaces the body's message verbatim via [`ApiError::Rejected`].
    async fn register(&self, data: &RegistrationData) -> Result<String, ApiError>;

    /// `PATCH /users/{id}`: replace a student record.
    async fn update_user(&self, id: u64, user: &Student) -> Result<(), ApiError>;

    /// `POST /mail`: success iff the server answers 200.
    async fn send_mail(&self, college_id: u64) -> Result<(), ApiError>;
}
