use std::sync::Arc;

use crate::api::client::AttendanceApi;
use crate::api::types::RegistrationData;
use crate::error::{ApiError, RegistrationError, ValidationError};
use crate::state::StateHandle;

/// Raw form input, exactly as typed. Validation turns it into the wire
/// payload or an explicit error; nothing is submitted until it passes.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub college_email: String,
    pub college_id: String,
    pub year: String,
    pub department: String,
    pub contact_number: String,
    pub whatsapp_number: String,
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

impl RegistrationForm {
    /// Checks run in the order the form prompts the user: required fields,
    /// then email domain, then ID and phone formats.
    pub fn validate(&self, college_domain: &str) -> Result<RegistrationData, ValidationError> {
        let all_filled = [
            &self.name,
            &self.college_id,
            &self.college_email,
            &self.department,
            &self.year,
            &self.contact_number,
            &self.whatsapp_number,
        ]
        .iter()
        .all(|field| !field.trim().is_empty());
        if !all_filled {
            return Err(ValidationError::MissingFields);
        }
        if !self.college_email.ends_with(college_domain) {
            return Err(ValidationError::InvalidEmail);
        }
        if !is_digits(&self.college_id, 11) {
            return Err(ValidationError::InvalidCollegeId);
        }
        if !is_digits(&self.contact_number, 10) {
            return Err(ValidationError::InvalidContactNumber);
        }
        if !is_digits(&self.whatsapp_number, 10) {
            return Err(ValidationError::InvalidWhatsappNumber);
        }
        Ok(RegistrationData {
            name: self.name.clone(),
            college_email: self.college_email.clone(),
            college_id: self.college_id.parse().map_err(|_| ValidationError::InvalidCollegeId)?,
            year: self.year.clone(),
            department: self.department.clone(),
            contact_number: self
                .contact_number
                .parse()
                .map_err(|_| ValidationError::InvalidContactNumber)?,
            whatsapp_number: self
                .whatsapp_number
                .parse()
                .map_err(|_| ValidationError::InvalidWhatsappNumber)?,
        })
    }
}

/// Validates and submits registrations, publishing the surfaced response
/// message into the shared state.
pub struct Registrar {
    api: Arc<dyn AttendanceApi>,
    state: StateHandle,
    college_domain: String,
}

impl Registrar {
    pub fn new(api: Arc<dyn AttendanceApi>, state: StateHandle, college_domain: impl Into<String>) -> Self {
        Self {
            api,
            state,
            college_domain: college_domain.into(),
        }
    }

    /// Submits a form. Invalid input never reaches the network; a valid form
    /// issues exactly one call. On success the returned string is the
    /// server's message; rejections carry the server's wording verbatim.
    pub async fn submit(&self, form: &RegistrationForm) -> Result<String, RegistrationError> {
        let data = form.validate(&self.college_domain)?;
        match self.api.register(&data).await {
            Ok(message) => {
                self.state.set_registration_response(message.clone());
                Ok(message)
            }
            Err(ApiError::Rejected { message, .. }) => {
                tracing::warn!(college_id = data.college_id, "registration rejected: {message}");
                self.state.set_registration_response(message.clone());
                Err(RegistrationError::Rejected(message))
            }
            Err(e) => {
                let error = RegistrationError::Transport(e.to_string());
                self.state.set_registration_response(error.to_string());
                Err(error)
            }
        }
    }
}
