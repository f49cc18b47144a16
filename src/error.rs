use thiserror::Error;

// Main application error type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Capture Error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Decode Error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Api Error: {0}")]
    Api(#[from] ApiError),
    #[error("Registration Error: {0}")]
    Registration(#[from] RegistrationError),
    #[error("Roster Error: {0}")]
    Roster(#[from] RosterError),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Coordinator Error: {0}")]
    Coordinator(String),
}

// Camera / frame source error type
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Camera disconnected: {0}")]
    Disconnected(String),
    #[error("Failed to produce frame: {0}")]
    Produce(String),
}

// Barcode recognition error type
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Recognition engine failure: {0}")]
    Engine(String),
}

// Remote attendance service error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server rejected the request; `message` is what the caller shows.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected status {0}")]
    Status(u16),
}

// Client-side registration validation errors. The display strings are the
// exact prompts shown to the user, so the variants format to them directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All Fields are Required")]
    MissingFields,
    #[error("Enter a Valid College Email")]
    InvalidEmail,
    #[error("College ID must be 11 Digits")]
    InvalidCollegeId,
    #[error("Contact Number must be 10 Digits")]
    InvalidContactNumber,
    #[error("WhatsApp Number must be 10 Digits")]
    InvalidWhatsappNumber,
}

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// Server-side rejection, surfaced verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("Registration Failed: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Roster fetch failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: ApiError,
    },
}
