use std::ffi::CString;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::ErrorCode;

const RESERVED_FIELDS: &[&str] = &["ok", "code", "msg"];

/// JSON object handed across the C boundary as a NUL-terminated string.
pub struct Envelope {
    map: Map<String, Value>,
}

impl Envelope {
    fn status(ok: bool, code: ErrorCode, msg: String) -> Self {
        let mut map = Map::new();
        map.insert("ok".into(), Value::Bool(ok));
        map.insert("code".into(), json!(code.code()));
        map.insert("msg".into(), Value::String(msg));
        Self { map }
    }

    pub fn into_string(self) -> String {
        Value::Object(self.map).to_string()
    }

    /// serde_json escapes control characters, so the payload has no interior NUL.
    pub fn into_cstring(self) -> CString {
        CString::new(self.into_string()).unwrap_or_default()
    }
}

pub fn ok() -> Envelope {
    Envelope::status(true, ErrorCode::Ok, "OK".into())
}

pub fn err(msg_code: ErrorCode, msg: impl Into<String>) -> Envelope {
    Envelope::status(false, msg_code, msg.into())
}

/// Attach `key` to the envelope. Reserved status keys and values that fail
/// to serialize are skipped and reported through the `msg` field.
pub fn with_field<T>(mut envelope: Envelope, key: impl Into<String>, value: T) -> Envelope
where
    T: Serialize,
{
    let key = key.into();
    if RESERVED_FIELDS.contains(&key.as_str()) {
        return err(
            ErrorCode::Internal,
            format!("field '{key}' is reserved by the FFI envelope"),
        );
    }
    match serde_json::to_value(value) {
        Ok(value) => {
            envelope.map.insert(key, value);
            envelope
        }
        Err(e) => err(ErrorCode::Internal, format!("field '{key}': {e}")),
    }
}
