use std::sync::Arc;

use crate::api::client::AttendanceApi;
use crate::error::ApiError;
use crate::state::StateHandle;

pub const MAIL_SENT_MESSAGE: &str = "Email Sent Successfully";
pub const MAIL_FAILED_MESSAGE: &str = "Failed to Send Mail";

/// Triggers the confirmation mail for a registered student and publishes the
/// outcome text.
pub struct Mailer {
    api: Arc<dyn AttendanceApi>,
    state: StateHandle,
}

impl Mailer {
    pub fn new(api: Arc<dyn AttendanceApi>, state: StateHandle) -> Self {
        Self { api, state }
    }

    pub async fn send(&self, college_id: u64) -> Result<(), ApiError> {
        match self.api.send_mail(college_id).await {
            Ok(()) => {
                self.state.set_mail_status(MAIL_SENT_MESSAGE);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(college_id, "mail trigger failed: {e}");
                self.state.set_mail_status(MAIL_FAILED_MESSAGE);
                Err(e)
            }
        }
    }
}
