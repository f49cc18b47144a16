use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

use super::client::AttendanceApi;
use super::types::{RegistrationData, ScanResponse, ScanUser, Student};
use crate::error::ApiError;

/// Scripted [`AttendanceApi`] double that records every call.
///
/// Scripted results are consumed in order; once a script runs dry the mock
/// answers with a neutral success so long-running pipelines keep moving.
#[derive(Default)]
pub struct RecordingApi {
    check_in_codes: Mutex<Vec<String>>,
    check_in_script: Mutex<VecDeque<Result<ScanResponse, ApiError>>>,
    roster_calls: Mutex<u32>,
    roster_script: Mutex<VecDeque<Result<Vec<Student>, ApiError>>>,
    registrations: Mutex<Vec<RegistrationData>>,
    register_script: Mutex<VecDeque<Result<String, ApiError>>>,
    updates: Mutex<Vec<(u64, Student)>>,
    mail_requests: Mutex<Vec<u64>>,
    mail_script: Mutex<VecDeque<Result<(), ApiError>>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A well-formed scan body, for scripting check-in responses.
    pub fn scan_body(name: &str, message: &str) -> ScanResponse {
        ScanResponse {
            user: Some(ScanUser {
                name: Some(name.to_string()),
            }),
            message: Some(message.to_string()),
        }
    }

    pub async fn push_check_in(&self, result: Result<ScanResponse, ApiError>) {
        self.check_in_script.lock().await.push_back(result);
    }

    pub async fn push_roster(&self, result: Result<Vec<Student>, ApiError>) {
        self.roster_script.lock().await.push_back(result);
    }

    pub async fn push_register(&self, result: Result<String, ApiError>) {
        self.register_script.lock().await.push_back(result);
    }

    pub async fn push_mail(&self, result: Result<(), ApiError>) {
        self.mail_script.lock().await.push_back(result);
    }

    pub async fn check_in_codes(&self) -> Vec<String> {
        self.check_in_codes.lock().await.clone()
    }

    pub async fn roster_calls(&self) -> u32 {
        *self.roster_calls.lock().await
    }

    pub async fn registrations(&self) -> Vec<RegistrationData> {
        self.registrations.lock().await.clone()
    }

    pub async fn updates(&self) -> Vec<(u64, Student)> {
        self.updates.lock().await.clone()
    }

    pub async fn mail_requests(&self) -> Vec<u64> {
        self.mail_requests.lock().await.clone()
    }
}

#[async_trait]
impl AttendanceApi for RecordingApi {
    async fn check_in(&self, code: &str) -> Result<ScanResponse, ApiError> {
        self.check_in_codes.lock().await.push(code.to_string());
        match self.check_in_script.lock().await.pop_front() {
            Some(result) => result,
            None => Ok(ScanResponse::default()),
        }
    }

    async fn fetch_roster(&self) -> Result<Vec<Student>, ApiError> {
        *self.roster_calls.lock().await += 1;
        match self.roster_script.lock().await.pop_front() {
            Some(result) => result,
            None => Ok(Vec::new()),
        }
    }

    async fn register(&self, data: &RegistrationData) -> Result<String, ApiError> {
        self.registrations.lock().await.push(data.clone());
        match self.register_script.lock().await.pop_front() {
            Some(result) => result,
            None => Ok("User registered successfully".to_string()),
        }
    }

    async fn update_user(&self, id: u64, user: &Student) -> Result<(), ApiError> {
        self.updates.lock().await.push((id, user.clone()));
        Ok(())
    }

    async fn send_mail(&self, college_id: u64) -> Result<(), ApiError> {
        self.mail_requests.lock().await.push(college_id);
        match self.mail_script.lock().await.pop_front() {
            Some(result) => result,
            None => Ok(()),
        }
    }
}
