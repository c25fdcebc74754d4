//! # Backend Contract
//!
//! The screens reach the native backend through a single request/response
//! call: a command name plus a JSON argument bundle.
//!
//! ## Error Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Backend Error Flow                                   │
//! │                                                                         │
//! │  invoke('add_shop', { name })                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Err({ "kind": "already_exists", "message": "Shop name already ..." })  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  BackendError { kind: AlreadyExists, .. }                               │
//! │         │                                                               │
//! │         ▼  match on kind, never on message text                         │
//! │  i18n.t(kind.message_key()) → "既に存在します"                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// =============================================================================
// Backend Trait
// =============================================================================

/// The native command surface.
///
/// Implemented by the shell's IPC bridge; tests implement it with an
/// in-memory fake.
pub trait Backend {
    /// Runs `command` with `args` and returns its JSON result.
    fn invoke(&self, command: &str, args: Value) -> Result<Value, BackendError>;
}

/// Runs a command and decodes its result.
///
/// A result that does not match `T` becomes a `BackendErrorKind::Internal`
/// error.
pub fn invoke_typed<T, B>(backend: &B, command: &str, args: Value) -> Result<T, BackendError>
where
    T: DeserializeOwned,
    B: Backend + ?Sized,
{
    let value = backend.invoke(command, args)?;
    serde_json::from_value(value).map_err(|err| {
        BackendError::new(
            BackendErrorKind::Internal,
            format!("unexpected response from {command}: {err}"),
        )
    })
}

// =============================================================================
// Backend Error
// =============================================================================

/// What went wrong on the backend side, as a discriminant the UI can switch
/// on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendErrorKind {
    /// Duplicate code or name.
    AlreadyExists,
    /// The referenced row does not exist.
    NotFound,
    /// The backend rejected an input value.
    Validation,
    /// Session expired or the user lacks the role.
    Unauthorized,
    /// The row is referenced and cannot be deleted.
    InUse,
    /// Anything else.
    Internal,
}

impl BackendErrorKind {
    /// Translation key for the message shown to the user.
    pub const fn message_key(&self) -> &'static str {
        match self {
            BackendErrorKind::AlreadyExists => "error.already_exists",
            BackendErrorKind::NotFound => "error.not_found",
            BackendErrorKind::Validation => "error.validation",
            BackendErrorKind::Unauthorized => "error.unauthorized",
            BackendErrorKind::InUse => "error.in_use",
            BackendErrorKind::Internal => "error.internal",
        }
    }
}

/// Error returned by [`Backend::invoke`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind:?}: {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    #[serde(default)]
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        BackendError {
            kind,
            message: message.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory backend: canned responses per command, with a call log.
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        responses: HashMap<String, Result<Value, BackendError>>,
        pub(crate) calls: RefCell<Vec<(String, Value)>>,
    }

    impl FakeBackend {
        pub(crate) fn respond(mut self, command: &str, response: Result<Value, BackendError>) -> Self {
            self.responses.insert(command.to_string(), response);
            self
        }

        pub(crate) fn set_response(&mut self, command: &str, response: Result<Value, BackendError>) {
            self.responses.insert(command.to_string(), response);
        }

        pub(crate) fn calls_to(&self, command: &str) -> Vec<Value> {
            self.calls
                .borrow()
                .iter()
                .filter(|(name, _)| name == command)
                .map(|(_, args)| args.clone())
                .collect()
        }
    }

    impl Backend for FakeBackend {
        fn invoke(&self, command: &str, args: Value) -> Result<Value, BackendError> {
            self.calls.borrow_mut().push((command.to_string(), args));
            self.responses.get(command).cloned().unwrap_or_else(|| {
                Err(BackendError::new(
                    BackendErrorKind::NotFound,
                    format!("no such command: {command}"),
                ))
            })
        }
    }

    #[test]
    fn test_error_deserializes_from_tagged_json() {
        let err: BackendError = serde_json::from_value(json!({
            "kind": "already_exists",
            "message": "Shop name already exists"
        }))
        .unwrap();
        assert_eq!(err.kind, BackendErrorKind::AlreadyExists);
        assert_eq!(err.kind.message_key(), "error.already_exists");
    }

    #[test]
    fn test_error_message_is_optional() {
        let err: BackendError = serde_json::from_value(json!({ "kind": "in_use" })).unwrap();
        assert_eq!(err, BackendError::new(BackendErrorKind::InUse, ""));
    }

    #[test]
    fn test_invoke_typed_decodes_result() {
        let backend = FakeBackend::default().respond("get_count", Ok(json!(3)));
        let count: i64 = invoke_typed(&backend, "get_count", json!({})).unwrap();
        assert_eq!(count, 3);
        assert_eq!(backend.calls_to("get_count").len(), 1);
    }

    #[test]
    fn test_invoke_typed_wraps_decode_failure() {
        let backend = FakeBackend::default().respond("get_count", Ok(json!("three")));
        let err = invoke_typed::<i64, _>(&backend, "get_count", json!({})).unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::Internal);
        assert!(err.message.contains("get_count"));
    }

    #[test]
    fn test_invoke_typed_passes_backend_error_through() {
        let backend = FakeBackend::default();
        let err = invoke_typed::<i64, _>(&backend, "missing", json!({})).unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::NotFound);
    }
}
