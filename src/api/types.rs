use serde::{Deserialize, Serialize};

/// Fallback shown when the server response carries no user or message.
pub const USER_NOT_FOUND: &str = "User Not Found";

/// Exact rejection messages the server sends for duplicate registrations.
/// Matching is by string equality; this is the remote contract.
pub const DUPLICATE_ID_MESSAGE: &str = "User with this ID already exists";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "User with this email already exists";

/// Wire shape of `GET /scan/{code}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub user: Option<ScanUser>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanUser {
    #[serde(default)]
    pub name: Option<String>,
}

/// A check-in result with the wire-level absences already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInOutcome {
    pub subject_name: String,
    pub message: String,
}

impl From<ScanResponse> for CheckInOutcome {
    fn from(response: ScanResponse) -> Self {
        Self {
            subject_name: response
                .user
                .and_then(|user| user.name)
                .unwrap_or_else(|| USER_NOT_FOUND.to_string()),
            message: response
                .message
                .unwrap_or_else(|| USER_NOT_FOUND.to_string()),
        }
    }
}

/// A roster entry from `GET /users`; also the body of `PATCH /users/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    pub college_id: u64,
    pub college_email: String,
    #[serde(default)]
    pub is_present: bool,
}

/// Body of `POST /register`. Numeric fields go over the wire as numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationData {
    pub name: String,
    pub college_email: String,
    pub college_id: u64,
    pub year: String,
    pub department: String,
    pub contact_number: u64,
    pub whatsapp_number: u64,
}

/// Body of `POST /mail`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMailBody {
    pub college_id: u64,
}

/// The `{message}` envelope used by registration responses.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

pub fn is_duplicate_message(message: &str) -> bool {
    message == DUPLICATE_ID_MESSAGE || message == DUPLICATE_EMAIL_MESSAGE
}
