use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};

/// JSON key carrying the uploaded file name on every record.
pub const FILE_NAME_KEY: &str = "fileName";

/// One uploaded document, as received from the multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Error descriptor returned in place of a resume for a file that could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileError {
    pub file_name: String,
    pub error: String,
    /// Verbatim model output, kept whenever the failure happened after the model answered.
    #[serde(rename = "rawGeminiResponse", skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// Result for a single uploaded file. Serializes as a flat JSON object either way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedRecord {
    /// The model's JSON object, passed through as-is apart from `fileName`.
    Parsed(Map<String, Value>),
    Failed(FileError),
}

impl ParsedRecord {
    pub fn failed(file_name: &str, error: impl Into<String>) -> Self {
        ParsedRecord::Failed(FileError {
            file_name: file_name.to_string(),
            error: error.into(),
            raw_response: None,
        })
    }

    pub fn failed_with_raw(file_name: &str, error: impl Into<String>, raw: &str) -> Self {
        ParsedRecord::Failed(FileError {
            file_name: file_name.to_string(),
            error: error.into(),
            raw_response: Some(raw.to_string()),
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            ParsedRecord::Parsed(fields) => fields.get(FILE_NAME_KEY).and_then(Value::as_str),
            ParsedRecord::Failed(e) => Some(&e.file_name),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ParsedRecord::Parsed(_) => None,
            ParsedRecord::Failed(e) => Some(&e.error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ParsedRecord::Failed(_))
    }
}
