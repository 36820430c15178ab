// Copyright 2026 Sinkroute Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for event routing and operation translation.
//!
//! Routing failures fall into four groups, and callers are expected to
//! treat them differently:
//!
//! - [`RouterError::MissingKey`]: the event has no identity and cannot be
//!   processed. Fatal for that event only.
//! - [`RouterError::Classification`]: the value document could not be mapped
//!   to an [`OperationKind`]. Fatal for that event only.
//! - [`RouterError::Configuration`]: the handler was built without a
//!   translator for a kind it resolved. This is a setup defect and should
//!   stop the pipeline.
//! - [`RouterError::Operation`]: the translator rejected the payload. The
//!   translator's [`OperationError`] is carried unchanged as the source.
//!
//! Tombstones are not errors. They are reported as
//! [`RouteOutcome::Skip`](crate::handler::RouteOutcome::Skip).

use crate::metrics::ErrorCategory;
use crate::operation::OperationKind;
use std::fmt;
use thiserror::Error;

/// Why a value document could not be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationReason {
    /// The marker field is absent from the value document.
    MissingField {
        /// Name of the marker field that was looked up
        field: String,
    },

    /// The marker field is present but is not a string.
    NotAString {
        /// Name of the marker field
        field: String,
        /// BSON element type that was found instead
        found: String,
    },

    /// The marker names an operation this router does not handle.
    Unrecognized {
        /// The marker value as received
        value: String,
    },
}

impl fmt::Display for ClassificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "value document has no '{field}' field")
            }
            Self::NotAString { field, found } => {
                write!(f, "'{field}' must be a string, found {found}")
            }
            Self::Unrecognized { value } => {
                write!(f, "unsupported operation type '{value}'")
            }
        }
    }
}

/// Errors raised by an operation translator.
///
/// These describe malformed or inconsistent payload content. The router
/// never inspects them; it wraps them in [`RouterError::Operation`].
#[derive(Error, Debug)]
pub enum OperationError {
    /// A field the translator requires is absent.
    #[error("missing required field '{field}'")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// A field is present but has the wrong shape.
    #[error("field '{field}' is invalid: expected {expected}")]
    InvalidField {
        /// Name (or path) of the offending field
        field: String,
        /// Human-readable description of the expected shape
        expected: String,
    },

    /// An update description produced no `$set` or `$unset` clause.
    #[error("update description contains no changes")]
    EmptyUpdate,

    /// Any other translator-specific failure.
    #[error("operation failed: {message}")]
    Other {
        /// Human-readable error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl OperationError {
    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid field error.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            expected: expected.into(),
        }
    }

    /// Creates a generic error from any error type.
    #[must_use]
    pub fn other(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a generic error with a custom message.
    #[must_use]
    pub fn other_msg(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            source: None,
        }
    }
}

/// Errors returned by [`CdcHandler::handle`](crate::handler::CdcHandler::handle).
#[derive(Error, Debug)]
pub enum RouterError {
    /// The event carries no key document.
    #[error("key document must not be missing for CDC mode")]
    MissingKey,

    /// The value document could not be mapped to an operation kind.
    #[error("unable to classify change event: {reason}")]
    Classification {
        /// What was wrong with the value document
        reason: ClassificationReason,
    },

    /// No translator is registered for a resolved operation kind.
    #[error("no CDC operation registered for '{kind}'")]
    Configuration {
        /// The kind that had no translator
        kind: OperationKind,
    },

    /// The translator rejected the event.
    #[error("'{kind}' operation failed: {source}")]
    Operation {
        /// The kind whose translator failed
        kind: OperationKind,
        /// The translator's error, unchanged
        #[source]
        source: OperationError,
    },

    /// Raw key or value bytes could not be turned into documents.
    #[error("unable to convert record to sink document: {message}")]
    Conversion {
        /// Human-readable error message
        message: String,
    },
}

impl RouterError {
    /// Creates a classification error.
    #[must_use]
    pub const fn classification(reason: ClassificationReason) -> Self {
        Self::Classification { reason }
    }

    /// Creates a conversion error with a custom message.
    #[must_use]
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    /// Returns whether this error indicates a defect in the handler setup.
    ///
    /// A fatal error will recur for every event of the same kind, so the
    /// pipeline should stop instead of skipping the event.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns the metric label category for this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingKey => ErrorCategory::MissingKey,
            Self::Classification { .. } => ErrorCategory::Classification,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Operation { .. } => ErrorCategory::Operation,
            Self::Conversion { .. } => ErrorCategory::Conversion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configuration_errors_are_fatal() {
        assert!(RouterError::Configuration {
            kind: OperationKind::Update
        }
        .is_fatal());

        assert!(!RouterError::MissingKey.is_fatal());
        assert!(!RouterError::classification(ClassificationReason::Unrecognized {
            value: "drop".to_string()
        })
        .is_fatal());
        assert!(!RouterError::Operation {
            kind: OperationKind::Insert,
            source: OperationError::missing_field("fullDocument"),
        }
        .is_fatal());
    }

    #[test]
    fn test_error_messages() {
        let err = RouterError::classification(ClassificationReason::MissingField {
            field: "operationType".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "unable to classify change event: value document has no 'operationType' field"
        );

        let err = RouterError::Configuration {
            kind: OperationKind::Delete,
        };
        assert_eq!(err.to_string(), "no CDC operation registered for 'delete'");
    }

    #[test]
    fn test_operation_error_is_kept_as_source() {
        use std::error::Error as _;

        let err = RouterError::Operation {
            kind: OperationKind::Insert,
            source: OperationError::missing_field("fullDocument"),
        };

        let source = err.source().expect("operation errors carry a source");
        assert_eq!(source.to_string(), "missing required field 'fullDocument'");
    }

    #[test]
    fn test_categories() {
        assert_eq!(RouterError::MissingKey.category().as_str(), "missing_key_error");
        assert_eq!(
            RouterError::conversion("bad json").category().as_str(),
            "conversion_error"
        );
    }
}
