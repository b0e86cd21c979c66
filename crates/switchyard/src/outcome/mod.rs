//! The uniform result value returned by handlers and client invocations.
//!
//! An [`Outcome`] carries either a success value or a failure value, never
//! both. Handlers report business-logic failures as data through
//! [`Outcome::err`]; protocol and lifecycle failures travel as `Err` values
//! instead and can be folded into an outcome with [`IntoOutcome`].
//!
//! On the wire an outcome is `{"ok":true,"value":..}` or
//! `{"ok":false,"error":..}`.

mod wire;


use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Success or failure result of a command.
///
/// # Example
///
/// ```
/// use switchyard::{Fault, Outcome};
///
/// let hello: Outcome<&str> = Outcome::ok("hello");
/// assert!(hello.is_ok());
/// assert_eq!(hello.value(), Some(&"hello"));
///
/// let failed: Outcome<&str> = Outcome::err(Fault::new("out of stock"));
/// assert!(!failed.is_ok());
/// assert_eq!(failed.error().map(Fault::message), Some("out of stock"));
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Outcome<T, E = Fault> {
    /// The command succeeded with a value.
    Success(T),
    /// The command failed with an error value.
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    /// Wraps a success value.
    pub const fn ok(value: T) -> Self {
        Self::Success(value)
    }

    /// Wraps a failure value.
    pub const fn err(error: E) -> Self {
        Self::Failure(error)
    }

    /// Wraps any error convertible into the failure type.
    ///
    /// This is the single-value form of [`IntoOutcome::into_outcome`].
    pub fn caught(error: impl Into<E>) -> Self {
        Self::Failure(error.into())
    }

    /// Returns `true` for a success.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for a failure.
    #[must_use]
    pub const fn is_err(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns the success value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Returns the failure value, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Maps the success value.
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Maps the failure value.
    pub fn map_err<F2, F>(self, f: F) -> Outcome<T, F2>
    where
        F: FnOnce(E) -> F2,
    {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Failure(f(error)),
        }
    }

    /// Converts into a standard [`Result`].
    ///
    /// # Errors
    ///
    /// Returns the failure value when the outcome is a failure.
    pub fn into_result(self) -> Result<T, E> {
        self.into()
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}

/// Folds an `Err` into a failed [`Outcome`].
///
/// Client invocations return `Result<Outcome<T>, InvokeError>`: business
/// failures arrive as data, rejections as `Err`. Callers that want a single
/// uniform value normalise with `into_outcome`.
///
/// # Example
///
/// ```
/// use switchyard::{Fault, IntoOutcome, Outcome};
///
/// let rejected: Result<Outcome<u32>, Fault> = Err(Fault::new("no handler"));
/// let outcome = rejected.into_outcome();
/// assert!(outcome.is_err());
/// ```
pub trait IntoOutcome<T, E> {
    /// Returns the contained outcome, or a failure built from the error.
    fn into_outcome(self) -> Outcome<T, E>;
}

impl<T, E, R> IntoOutcome<T, E> for Result<Outcome<T, E>, R>
where
    R: Into<E>,
{
    fn into_outcome(self) -> Outcome<T, E> {
        self.unwrap_or_else(Outcome::caught)
    }
}

/// Default failure payload carried by an [`Outcome`].
///
/// A fault is plain data so it can cross the channel; `code` classifies
/// faults produced by the protocol layer itself (`no-handler`, `rejected`,
/// `protocol`, `transport`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct Fault {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl Fault {
    /// Creates a fault with a message and no code.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Creates a fault with a message and a classification code.
    #[must_use]
    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns the classification code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
