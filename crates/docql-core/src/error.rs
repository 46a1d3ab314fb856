use crate::{config::ConfigError, db::query::QueryError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Anything a caller can get back from this crate.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

///
/// DriverError
///
/// Opaque failure reported by a database driver or cursor.
/// Carried unchanged as the source of the wrapping [`InternalError`].
///

pub type DriverError = Box<dyn std::error::Error + Send + Sync>;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    #[source]
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Wrap a failed query dispatch. The driver error is kept as the source.
    #[must_use]
    pub fn driver(err: DriverError) -> Self {
        Self {
            class: ErrorClass::Internal,
            origin: ErrorOrigin::Driver,
            message: err.to_string(),
            detail: Some(ErrorDetail::Driver(err)),
        }
    }

    /// Wrap a failed cursor read.
    #[must_use]
    pub fn cursor(err: DriverError) -> Self {
        Self {
            class: ErrorClass::Internal,
            origin: ErrorOrigin::Cursor,
            message: err.to_string(),
            detail: Some(ErrorDetail::Driver(err)),
        }
    }

    pub(crate) fn config_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Config, message)
    }

    pub(crate) fn query_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Query, message)
    }

    /// Borrow the driver error this failure was raised from, if any.
    #[must_use]
    pub fn driver_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match &self.detail {
            Some(ErrorDetail::Driver(err)) => Some(err.as_ref()),
            None => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Driver(DriverError),
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Internal,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Driver,
    Cursor,
    Config,
    Query,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Driver => "driver",
            Self::Cursor => "cursor",
            Self::Config => "config",
            Self::Query => "query",
        };
        write!(f, "{label}")
    }
}
