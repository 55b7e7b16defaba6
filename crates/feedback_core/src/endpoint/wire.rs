//! Wire shapes for the feedback endpoint.

use crate::model::entry::{EntryId, EntrySummary, FeedbackEntry};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Request field carrying the anti-forgery token.
pub const FIELD_TOKEN: &str = "_token";
pub const FIELD_PAGE: &str = "page";
pub const FIELD_PER_PAGE: &str = "per_page";
pub const FIELD_ID: &str = "id";

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

pub const MSG_THANKS: &str = "Thank you for sending us your feedback";
pub const MSG_STORE_ERROR: &str = "Database error";
pub const MSG_UNAUTHORIZED: &str = "Unauthorized";
pub const MSG_INVALID_ID: &str = "Invalid ID";
pub const MSG_NOT_FOUND: &str = "Not found";
pub const MSG_UNKNOWN_OPERATION: &str = "Unknown operation";

/// Operations served by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Submit,
    List,
    Get,
}

impl Operation {
    /// Stable operation name used as the dispatch key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::List => "list",
            Self::Get => "get",
        }
    }

    /// Parses an operation name; unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "submit" => Some(Self::Submit),
            "list" => Some(Self::List),
            "get" => Some(Self::Get),
            _ => None,
        }
    }
}

/// One form-encoded request to the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRequest {
    pub operation: String,
    pub fields: BTreeMap<String, String>,
}

impl EndpointRequest {
    /// Creates an empty request for `operation`.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation: operation.as_str().to_string(),
            fields: BTreeMap::new(),
        }
    }

    /// Builds a request from raw key/value pairs, e.g. a decoded form body.
    ///
    /// Later duplicates of a key win.
    pub fn from_pairs<K, V>(
        operation: impl Into<String>,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            operation: operation.into(),
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Sets one field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns one field value.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Returns one field value, or the empty string when absent.
    pub fn field_or_empty(&self, name: &str) -> &str {
        self.field(name).unwrap_or("")
    }
}

/// `{success, data}` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub data: Value,
}

/// Status code plus envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointResponse {
    pub status: u16,
    pub body: Envelope,
}

impl EndpointResponse {
    /// Success envelope with status 200.
    pub fn success<T: Serialize>(payload: &T) -> Self {
        Self::build(STATUS_OK, true, payload)
    }

    /// Failure envelope with `status`.
    pub fn failure<T: Serialize>(status: u16, payload: &T) -> Self {
        Self::build(status, false, payload)
    }

    /// Failure envelope carrying one message.
    pub fn failure_message(status: u16, message: &str) -> Self {
        Self::failure(
            status,
            &MessagePayload {
                message: message.to_string(),
            },
        )
    }

    /// Returns whether the envelope reports success.
    pub fn is_success(&self) -> bool {
        self.body.success
    }

    /// Decodes `data` into a typed payload.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body.data)
    }

    /// Serializes the envelope body for transport.
    pub fn body_json(&self) -> String {
        serde_json::to_string(&self.body)
            .unwrap_or_else(|_| r#"{"success":false,"data":{}}"#.to_string())
    }

    fn build<T: Serialize>(status: u16, success: bool, payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(data) => Self {
                status,
                body: Envelope { success, data },
            },
            Err(_) => Self {
                status: STATUS_INTERNAL_ERROR,
                body: Envelope {
                    success: false,
                    data: json!({ "message": MSG_STORE_ERROR }),
                },
            },
        }
    }
}

/// `{message}` payload used by submit success and single-message failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub message: String,
}

/// `{errors}` payload used by submit failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorsPayload {
    pub errors: Vec<String>,
}

/// `list` success payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPayload {
    pub total: u64,
    pub page: u64,
    pub per_page: u32,
    pub rows: Vec<EntrySummary>,
}

/// `get` success payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailPayload {
    pub row: FeedbackEntry,
}

/// Parses a non-negative count field (`page`, `per_page`).
///
/// Missing, blank or non-numeric values yield `None`; negative values yield
/// `Some(0)` so normalization clamps them.
pub fn parse_count(value: Option<&str>) -> Option<u64> {
    let trimmed = value?.trim();
    if let Ok(parsed) = trimmed.parse::<u64>() {
        return Some(parsed);
    }
    match trimmed.parse::<i64>() {
        Ok(parsed) if parsed < 0 => Some(0),
        _ => None,
    }
}

/// Parses a positive entry id; anything else yields `None`.
pub fn parse_entry_id(value: Option<&str>) -> Option<EntryId> {
    value?
        .trim()
        .parse::<EntryId>()
        .ok()
        .filter(|id| *id > 0)
}
