//! The error type shared by every operation of this crate

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::form::Field;

pub type Result<T> = std::result::Result<T, Error>;

/// Per-field validation messages. An empty set means the form is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: ToString>(&mut self, field: Field, message: S) {
        self.errors.insert(field, message.to_string());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(|s| s.as_str())
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// Keep only the errors of `self` whose field still fails in `latest`, with the message of `latest`
    pub fn retain_still_failing(&mut self, latest: &FieldErrors) {
        let mut kept = BTreeMap::new();
        for field in self.errors.keys() {
            if let Some(msg) = latest.errors.get(field) {
                kept.insert(*field, msg.clone());
            }
        }
        self.errors = kept;
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, msg) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, msg)?;
            first = false;
        }
        Ok(())
    }
}


/// Which family an [`Error`] belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The form is invalid. Nothing was sent to the backend
    Validation,
    /// The backend answered 409: the time slot overlaps another reservation
    Conflict,
    /// Any other failure (non-2xx answer, network error, unreadable body...)
    Request,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum Error {
    #[error("invalid reservation: {0}")]
    Validation(FieldErrors),
    #[error("time-slot conflict: {message}")]
    Conflict { message: String },
    #[error("request failed: {message}")]
    Request { status: Option<u16>, message: String },
}

/// Some backends describe their errors in a JSON body
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

pub const CONFLICT_STATUS: u16 = 409;

impl Error {
    /// A failure that has nothing to do with an HTTP status
    pub fn request<S: ToString>(message: S) -> Self {
        Error::Request { status: None, message: message.to_string() }
    }

    /// Build the error matching a non-2xx answer.
    ///
    /// The message is the `detail` or `message` string of a JSON body when there is one, a generic text made of `status` and `reason` otherwise.
    pub fn from_response(status: u16, reason: Option<&str>, body: &str) -> Self {
        let server_message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|ErrorBody{ detail, message }| {
                let detail = detail.and_then(|v| v.as_str().map(String::from));
                detail.or_else(|| message.and_then(|v| v.as_str().map(String::from)))
            })
            .filter(|m| !m.trim().is_empty());

        let message = match server_message {
            Some(m) => m,
            None => format!("Error {}: {}", status, reason.unwrap_or("Unknown status")),
        };

        if status == CONFLICT_STATUS {
            Error::Conflict { message }
        } else {
            Error::Request { status: Some(status), message }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Conflict{..} => ErrorKind::Conflict,
            Error::Request{..} => ErrorKind::Request,
        }
    }

    /// The HTTP status code, when the error comes from an HTTP answer
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Validation(_) => None,
            Error::Conflict{..} => Some(CONFLICT_STATUS),
            Error::Request{status, ..} => *status,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Error::Validation(fields) => fields.to_string(),
            Error::Conflict{message} => message.clone(),
            Error::Request{message, ..} => message.clone(),
        }
    }

    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            Error::Validation(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// A short title for this error, as the reservation form displays it above [`Error::message`].
    ///
    /// Page-level errors carry their own title, see [`PageError`](crate::state::PageError)
    pub fn headline(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Validation => "Please fill in the required fields",
            ErrorKind::Conflict => "Time-slot conflict",
            ErrorKind::Request => "Could not save the reservation",
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::request(format!("Invalid JSON: {}", err))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::request(format!("Invalid URL: {}", err))
    }
}
