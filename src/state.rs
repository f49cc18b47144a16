use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::api::types::{CheckInOutcome, Student};
use crate::classify::{classify, DisplayState};

/// Immutable view of everything a frontend renders. Consumers get whole
/// snapshots through the watch channel; nothing hands out shared mutable
/// cells.
#[derive(Debug, Clone, Default)]
pub struct AttendanceSnapshot {
    pub subject_name: String,
    /// Raw server message from the last resolved check-in.
    pub last_message: String,
    pub display: Option<DisplayState>,
    /// Roster keyed by college ID, in server order.
    pub roster: IndexMap<u64, Student>,
    pub registration_response: String,
    pub mail_status: String,
}

impl AttendanceSnapshot {
    pub fn present(&self) -> impl Iterator<Item = &Student> {
        self.roster.values().filter(|student| student.is_present)
    }
}

/// Shared handle to the state holder. Cloning is cheap; all clones publish
/// into the same channel.
#[derive(Clone)]
pub struct StateHandle {
    tx: Arc<watch::Sender<AttendanceSnapshot>>,
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AttendanceSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<AttendanceSnapshot> {
        self.tx.subscribe()
    }

    /// Subscription as a stream, for consumers that poll with `StreamExt`.
    pub fn stream(&self) -> WatchStream<AttendanceSnapshot> {
        WatchStream::new(self.subscribe())
    }

    pub fn snapshot(&self) -> AttendanceSnapshot {
        self.tx.borrow().clone()
    }

    /// Publishes a resolved check-in: subject, raw message and the
    /// classified display state change together.
    pub fn apply_check_in(&self, outcome: &CheckInOutcome) {
        let display = classify(outcome);
        self.tx.send_modify(|snapshot| {
            snapshot.subject_name = outcome.subject_name.clone();
            snapshot.last_message = outcome.message.clone();
            snapshot.display = Some(display);
        });
    }

    pub fn set_roster(&self, students: Vec<Student>) {
        let roster: IndexMap<u64, Student> = students
            .into_iter()
            .map(|student| (student.college_id, student))
            .collect();
        self.tx.send_modify(|snapshot| snapshot.roster = roster);
    }

    /// Replaces (or appends) one roster entry after a record edit.
    pub fn upsert_student(&self, student: Student) {
        self.tx
            .send_modify(|snapshot| {
                snapshot.roster.insert(student.college_id, student);
            });
    }

    pub fn set_registration_response(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx
            .send_modify(|snapshot| snapshot.registration_response = message);
    }

    pub fn set_mail_status(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx
            .send_modify(|snapshot| snapshot.mail_status = message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ColorTag, ScanVerdict};

    fn student(name: &str, id: u64, present: bool) -> Student {
        Student {
            name: name.to_string(),
            college_id: id,
            college_email: format!("{}@nshm.edu.in", name.to_lowercase()),
            is_present: present,
        }
    }

    #[tokio::test]
    async fn check_in_updates_subject_message_and_display_together() {
        let state = StateHandle::new();
        state.apply_check_in(&CheckInOutcome {
            subject_name: "Riya Sen".to_string(),
            message: "Duplicate entry".to_string(),
        });

        let snapshot = state.snapshot();
        assert_eq!(snapshot.subject_name, "Riya Sen");
        assert_eq!(snapshot.last_message, "Duplicate entry");
        let display = snapshot.display.expect("display set");
        assert_eq!(display.verdict, ScanVerdict::DuplicateScan);
        assert_eq!(display.color, ColorTag::Yellow);
    }

    #[tokio::test]
    async fn subscribers_observe_published_snapshots() {
        let state = StateHandle::new();
        let mut rx = state.subscribe();

        state.set_mail_status("Email Sent Successfully");
        rx.changed().await.expect("sender alive");
        assert_eq!(rx.borrow().mail_status, "Email Sent Successfully");
    }

    #[tokio::test]
    async fn roster_is_keyed_by_college_id_in_server_order() {
        let state = StateHandle::new();
        state.set_roster(vec![
            student("Riya", 10000000001, true),
            student("Arjun", 10000000002, false),
            student("Meera", 10000000003, true),
        ]);

        let snapshot = state.snapshot();
        let ids: Vec<u64> = snapshot.roster.keys().copied().collect();
        assert_eq!(ids, [10000000001, 10000000002, 10000000003]);
        let present: Vec<&str> = snapshot.present().map(|s| s.name.as_str()).collect();
        assert_eq!(present, ["Riya", "Meera"]);
    }
}
