use serde::{Deserialize, Serialize};

pub const NO_QR_TEXT: &str = "No QR code detected";
pub const CAMERA_UNAVAILABLE: &str = "Cannot open camera";
pub const NO_FRAME: &str = "Failed to capture image";

/// The single line written back for a `READ_QR` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    QrResult { qr_text: String, mapped_label: i64 },
    Error { error: String },
}

impl Response {
    /// Result of a decode attempt; `None` reports the no-QR placeholder text.
    pub fn qr_result(text: Option<&str>, mapped_label: i64) -> Self {
        Response::QrResult {
            qr_text: text.unwrap_or(NO_QR_TEXT).to_string(),
            mapped_label,
        }
    }

    pub fn camera_unavailable() -> Self {
        Response::Error {
            error: CAMERA_UNAVAILABLE.to_string(),
        }
    }

    pub fn no_frame() -> Self {
        Response::Error {
            error: NO_FRAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form() {
        let json = serde_json::to_string(&Response::qr_result(Some("TN123"), 12)).unwrap();
        assert_eq!(json, r#"{"qr_text":"TN123","mapped_label":12}"#);
        let json = serde_json::to_string(&Response::qr_result(None, -2)).unwrap();
        assert_eq!(json, r#"{"qr_text":"No QR code detected","mapped_label":-2}"#);
        let json = serde_json::to_string(&Response::camera_unavailable()).unwrap();
        assert_eq!(json, r#"{"error":"Cannot open camera"}"#);
        let json = serde_json::to_string(&Response::no_frame()).unwrap();
        assert_eq!(json, r#"{"error":"Failed to capture image"}"#);
    }

    #[test]
    fn test_text_is_escaped() {
        let json = serde_json::to_string(&Response::qr_result(Some("a\"b\n"), -1)).unwrap();
        assert_eq!(json, r#"{"qr_text":"a\"b\n","mapped_label":-1}"#);
    }
}
