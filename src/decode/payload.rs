use super::engine::RawBarcode;

/// Normalized text extracted from a payload; the trigger key for a check-in.
pub type ScanCode = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Text,
    Url,
    ContactInfo,
    Other,
}

/// One decoded code from a frame. A frame may yield zero, one or many of
/// these; the coordinator consumes only the first per trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub kind: PayloadKind,
    pub display_text: String,
}

impl DecodedPayload {
    /// The trimmed text used as the check-in trigger key. Empty codes never
    /// trigger.
    pub fn scan_code(&self) -> ScanCode {
        self.display_text.trim().to_string()
    }
}

impl From<RawBarcode> for DecodedPayload {
    fn from(raw: RawBarcode) -> Self {
        let display_text = match raw.kind {
            PayloadKind::Text => raw.value.unwrap_or_else(|| "No Text".to_string()),
            PayloadKind::Url => raw.value.unwrap_or_else(|| "No URL".to_string()),
            PayloadKind::ContactInfo => raw.value.unwrap_or_else(|| "No Contact Info".to_string()),
            // Types the engine recognizes but this pipeline does not.
            PayloadKind::Other => "Unknown Type".to_string(),
        };
        Self {
            kind: raw.kind,
            display_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_kind_maps_to_sentinel_text() {
        let payload = DecodedPayload::from(RawBarcode {
            kind: PayloadKind::Other,
            value: Some("ignored".to_string()),
        });
        assert_eq!(payload.display_text, "Unknown Type");
    }

    #[test]
    fn missing_values_fall_back_per_kind() {
        let cases = [
            (PayloadKind::Text, "No Text"),
            (PayloadKind::Url, "No URL"),
            (PayloadKind::ContactInfo, "No Contact Info"),
        ];
        for (kind, expected) in cases {
            let payload = DecodedPayload::from(RawBarcode { kind, value: None });
            assert_eq!(payload.display_text, expected);
        }
    }

    #[test]
    fn scan_code_is_trimmed() {
        let payload = DecodedPayload {
            kind: PayloadKind::Text,
            display_text: "  STU-123  ".to_string(),
        };
        assert_eq!(payload.scan_code(), "STU-123");
    }
}
