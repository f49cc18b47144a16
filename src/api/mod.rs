pub mod client;
pub mod http;
pub mod mock;
pub mod types;

pub use client::AttendanceApi;
pub use http::HttpAttendanceApi;
pub use mock::RecordingApi;
pub use types::{CheckInOutcome, RegistrationData, ScanResponse, SendMailBody, Student};
