pub mod api;
pub mod capture;
pub mod classify;
pub mod config;
pub mod coordinator;
pub mod decode;
pub mod error;
pub mod mail;
pub mod registration;
pub mod roster;
pub mod state;

pub use api::{AttendanceApi, HttpAttendanceApi};
pub use config::Configuration;
pub use coordinator::{ScanCompleted, ScanCoordinator, ScanCoordinatorBuilder};
pub use error::AppError;
pub use state::{AttendanceSnapshot, StateHandle};
