use async_trait::async_trait;

use super::client::AttendanceApi;
use super::types::{MessageBody, RegistrationData, ScanResponse, SendMailBody, Student};
use crate::config::Configuration;
use crate::error::ApiError;

/// reqwest-backed attendance service client.
pub struct HttpAttendanceApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAttendanceApi {
    pub fn new(configuration: &Configuration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(configuration.request_timeout())
            .build()?;
        Ok(Self::with_client(client, configuration.base_url.clone()))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Maps a failed registration response to the message shown to the caller.
/// A 400 surfaces the body's `message` verbatim; a malformed 400 body falls
/// back to the generic failure text.
fn rejection_message(status: u16, body: &[u8]) -> String {
    if status == 400 {
        serde_json::from_slice::<MessageBody>(body)
            .map(|body| body.message)
            .unwrap_or_else(|_| "Registration Failed".to_string())
    } else {
        format!("Registration Failed with Error: {status}")
    }
}

#[async_trait]
impl AttendanceApi for HttpAttendanceApi {
    async fn check_in(&self, code: &str) -> Result<ScanResponse, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/scan/{code}")))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            // The server answers unknown codes with an error status and no
            // usable body; downstream renders that as "User Not Found".
            tracing::debug!(status = %response.status(), "check-in not accepted");
            Ok(ScanResponse::default())
        }
    }

    async fn fetch_roster(&self) -> Result<Vec<Student>, ApiError> {
        let response = self.client.get(self.url("/users")).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    async fn register(&self, data: &RegistrationData) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/register"))
            .json(data)
            .send()
            .await?;
        let status = response.status().as_u16();
        if response.status().is_success() {
            let body: MessageBody = response.json().await?;
            return Ok(body.message);
        }
        let body = response.bytes().await?;
        Err(ApiError::Rejected {
            status,
            message: rejection_message(status, &body),
        })
    }

    async fn update_user(&self, id: u64, user: &Student) -> Result<(), ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("/users/{id}")))
            .json(user)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn send_mail(&self, college_id: u64) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/mail"))
            .json(&SendMailBody { college_id })
            .send()
            .await?;
        // Mail success is exactly a 200, not any 2xx.
        if response.status().as_u16() == 200 {
            Ok(())
        } else {
            Err(ApiError::Status(response.status().as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_registration_surfaces_body_message_verbatim() {
        let body = br#"{"message":"User with this email already exists"}"#;
        assert_eq!(
            rejection_message(400, body),
            "User with this email already exists"
        );
    }

    #[test]
    fn malformed_rejection_body_falls_back_to_generic_message() {
        assert_eq!(rejection_message(400, b"<html>bad gateway</html>"), "Registration Failed");
        assert_eq!(rejection_message(400, b""), "Registration Failed");
    }

    #[test]
    fn non_400_failures_report_the_status_code() {
        assert_eq!(
            rejection_message(500, b"{}"),
            "Registration Failed with Error: 500"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = HttpAttendanceApi::with_client(reqwest::Client::new(), "http://host:3000/");
        assert_eq!(api.url("/users"), "http://host:3000/users");
    }
}
