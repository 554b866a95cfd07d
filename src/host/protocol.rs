//! JSON message types exchanged with the editing client.
//!
//! Requests carry an `id` and get exactly one response; notifications have no
//! `id` and get none.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NavigatorError;
use crate::index::Location;

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl IncomingMessage {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
}

impl From<&NavigatorError> for ErrorObject {
    fn from(err: &NavigatorError) -> Self {
        let code = match err {
            NavigatorError::Json(_) => PARSE_ERROR,
            NavigatorError::UnknownMethod(_) => METHOD_NOT_FOUND,
            NavigatorError::Protocol(_) => INVALID_PARAMS,
            _ => INTERNAL_ERROR,
        };
        Self {
            code,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Result(Value),
    Error(ErrorObject),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub id: Value,
    #[serde(flatten)]
    pub payload: Payload,
}

impl OutgoingMessage {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            id,
            payload: Payload::Result(result),
        }
    }

    pub fn error(id: Value, error: ErrorObject) -> Self {
        Self {
            id,
            payload: Payload::Error(error),
        }
    }
}

/// `definition`, `references`, `hover` and `completion` params.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionParams {
    pub uri: String,
    pub line: u32,
    pub column: u32,
}

/// `documentOpened` and `documentChanged` params.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentTextParams {
    pub uri: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentUriParams {
    pub uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePosition {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRange {
    pub start: WirePosition,
    pub end: WirePosition,
}

/// A `Location` as sent to clients, with a `file://` uri.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireLocation {
    pub uri: String,
    pub path: String,
    pub range: WireRange,
}

impl From<&Location> for WireLocation {
    fn from(location: &Location) -> Self {
        Self {
            uri: file_uri(Path::new(&location.file_path)),
            path: location.file_path.clone(),
            range: WireRange {
                start: WirePosition {
                    line: location.start_line,
                    column: location.start_column,
                },
                end: WirePosition {
                    line: location.end_line,
                    column: location.end_column,
                },
            },
        }
    }
}

/// `file://` uri of an absolute path, or the path itself otherwise.
pub fn file_uri(path: &Path) -> String {
    url::Url::from_file_path(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| path.to_string_lossy().into_owned())
}
