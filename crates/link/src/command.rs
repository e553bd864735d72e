use {serde::Deserialize, serde_json::Value};

pub const READ_QR: &str = "READ_QR";
pub const UPDATE_STATUS: &str = "update_status";

/// A request from the link peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Decode the current frame and report the mapped label.
    ReadQr,
    /// Set the status of a parcel. Never answered.
    UpdateStatus {
        tracking_number: String,
        status: String,
    },
    /// An `update_status` object missing a usable field.
    MalformedUpdate { reason: String },
    /// Anything else.
    Unrecognized,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "trackingNumber")]
    tracking_number: Option<Value>,
    status: Option<Value>,
}

fn required_text(value: Option<Value>, field: &str) -> Result<String, String> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Ok(text),
        Some(Value::String(_)) => Err(format!("{field} is empty")),
        Some(Value::Null) | None => Err(format!("{field} is missing")),
        Some(_) => Err(format!("{field} is not a string")),
    }
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        if line == READ_QR {
            return Command::ReadQr;
        }
        if !line.starts_with('{') {
            return Command::Unrecognized;
        }
        let Ok(envelope) = serde_json::from_str::<Envelope>(line) else {
            return Command::Unrecognized;
        };
        if envelope.kind.as_deref() != Some(UPDATE_STATUS) {
            return Command::Unrecognized;
        }
        let fields = required_text(envelope.tracking_number, "trackingNumber").and_then(
            |tracking_number| {
                required_text(envelope.status, "status").map(|status| (tracking_number, status))
            },
        );
        match fields {
            Ok((tracking_number, status)) => Command::UpdateStatus {
                tracking_number,
                status,
            },
            Err(reason) => Command::MalformedUpdate { reason },
        }
    }
}
