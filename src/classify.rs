use crate::api::types::CheckInOutcome;

/// Exact server messages the classifier keys on. Brittle by nature, but this
/// wording is the remote contract; change it only with the server.
pub const CHECKED_IN_MESSAGE: &str = "User checked in successfully";
pub const DUPLICATE_ENTRY_MESSAGE: &str = "Duplicate entry";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanVerdict {
    Authorized,
    DuplicateScan,
    Unauthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTag {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    pub verdict: ScanVerdict,
    pub color: ColorTag,
}

/// Maps a check-in outcome to what the scan screen shows. Unrecognized
/// messages (including an empty one) read as an unauthorized scan.
pub fn classify(outcome: &CheckInOutcome) -> DisplayState {
    if outcome.message == CHECKED_IN_MESSAGE {
        DisplayState {
            verdict: ScanVerdict::Authorized,
            color: ColorTag::Green,
        }
    } else if outcome.message == DUPLICATE_ENTRY_MESSAGE {
        DisplayState {
            verdict: ScanVerdict::DuplicateScan,
            color: ColorTag::Yellow,
        }
    } else {
        DisplayState {
            verdict: ScanVerdict::Unauthorized,
            color: ColorTag::Red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(message: &str) -> CheckInOutcome {
        CheckInOutcome {
            subject_name: "Riya Sen".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn successful_check_in_is_authorized_green() {
        let state = classify(&outcome("User checked in successfully"));
        assert_eq!(state.verdict, ScanVerdict::Authorized);
        assert_eq!(state.color, ColorTag::Green);
    }

    #[test]
    fn duplicate_entry_is_duplicate_yellow() {
        let state = classify(&outcome("Duplicate entry"));
        assert_eq!(state.verdict, ScanVerdict::DuplicateScan);
        assert_eq!(state.color, ColorTag::Yellow);
    }

    #[test]
    fn anything_else_is_unauthorized_red() {
        for message in ["User Not Found", "", "user checked in successfully", "duplicate entry"] {
            let state = classify(&outcome(message));
            assert_eq!(state.verdict, ScanVerdict::Unauthorized, "message: {message:?}");
            assert_eq!(state.color, ColorTag::Red);
        }
    }
}
