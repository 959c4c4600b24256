use std::fmt;

use thiserror::Error;

/// The public accessor operation a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Connect,
    Prepare,
    Execute,
    Query,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Connect => "connect",
            Operation::Prepare => "prepare",
            Operation::Execute => "execute",
            Operation::Query => "query",
        };
        f.write_str(name)
    }
}

/// The driver round trip that raised a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Opening the connection
    Connect,
    /// Compiling a statement
    Prepare,
    /// Running a statement (bound or direct)
    Execute,
    /// Reading rows from an executed statement
    Fetch,
    /// Reading the connection's last generated id
    LastInsertId,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Connect => "driver connect",
            Step::Prepare => "driver prepare",
            Step::Execute => "driver execute",
            Step::Fetch => "driver fetch",
            Step::LastInsertId => "driver last insert id",
        };
        f.write_str(name)
    }
}

/// A failure reported by a [`crate::driver::Driver`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step}: {message}")]
pub struct DriverError {
    pub step: Step,
    pub message: String,
}

impl DriverError {
    #[must_use]
    pub fn new(step: Step, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
        }
    }
}

#[cfg(feature = "sqlite")]
impl DriverError {
    #[must_use]
    pub fn sqlite(step: Step, err: &rusqlite::Error) -> Self {
        Self::new(step, err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl DriverError {
    #[must_use]
    pub fn postgres(step: Step, err: &postgres::Error) -> Self {
        // The db error carries the server message; the outer Display is only "db error".
        let message = match err.as_db_error() {
            Some(db) => format!("{}: {}", db.code().code(), db.message()),
            None => err.to_string(),
        };
        Self::new(step, message)
    }
}

#[derive(Debug, Error)]
pub enum AccessorError {
    #[error("{operation}: connection failed during {step}: {message}")]
    Connection {
        operation: Operation,
        step: Step,
        message: String,
    },

    #[error("{operation}: could not prepare statement: {message}")]
    Prepare { operation: Operation, message: String },

    #[error("{operation}: execution failed during {step}: {message}")]
    Execution {
        operation: Operation,
        step: Step,
        message: String,
    },

    #[error("{operation}: could not fetch rows: {message}")]
    Fetch { operation: Operation, message: String },

    #[error("execute: no statement prepared under the name {name:?}")]
    UnknownStatement { name: String },

    #[error("query: query was empty, please make sure you pass one")]
    EmptyQuery,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AccessorError {
    /// Wrap a driver failure, choosing the error kind from the step that raised it.
    #[must_use]
    pub fn from_driver(operation: Operation, err: DriverError) -> Self {
        let DriverError { step, message } = err;
        match step {
            Step::Connect => AccessorError::Connection {
                operation,
                step,
                message,
            },
            Step::Prepare => AccessorError::Prepare { operation, message },
            Step::Execute | Step::LastInsertId => AccessorError::Execution {
                operation,
                step,
                message,
            },
            Step::Fetch => AccessorError::Fetch { operation, message },
        }
    }

    /// The driver sub-step behind this error, if it came from the driver.
    #[must_use]
    pub fn step(&self) -> Option<Step> {
        match self {
            AccessorError::Connection { step, .. } | AccessorError::Execution { step, .. } => {
                Some(*step)
            }
            AccessorError::Prepare { .. } => Some(Step::Prepare),
            AccessorError::Fetch { .. } => Some(Step::Fetch),
            AccessorError::UnknownStatement { .. }
            | AccessorError::EmptyQuery
            | AccessorError::Config(_) => None,
        }
    }

    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        match self {
            AccessorError::Connection { operation, .. }
            | AccessorError::Prepare { operation, .. }
            | AccessorError::Execution { operation, .. }
            | AccessorError::Fetch { operation, .. } => Some(*operation),
            AccessorError::UnknownStatement { .. } => Some(Operation::Execute),
            AccessorError::EmptyQuery => Some(Operation::Query),
            AccessorError::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_steps_map_to_error_kinds() {
        let err = AccessorError::from_driver(
            Operation::Execute,
            DriverError::new(Step::LastInsertId, "no id"),
        );
        assert!(matches!(
            err,
            AccessorError::Execution {
                step: Step::LastInsertId,
                ..
            }
        ));
        assert_eq!(err.operation(), Some(Operation::Execute));

        let err = AccessorError::from_driver(Operation::Query, DriverError::new(Step::Fetch, "x"));
        assert!(matches!(err, AccessorError::Fetch { .. }));
        assert_eq!(err.step(), Some(Step::Fetch));

        let err = AccessorError::from_driver(
            Operation::Connect,
            DriverError::new(Step::Connect, "unknown database \"shop\""),
        );
        assert_eq!(err.step(), Some(Step::Connect));
        assert_eq!(
            err.to_string(),
            "connect: connection failed during driver connect: unknown database \"shop\""
        );
    }
}
