//! Validation error types, severity classes, and filtering.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Severity class of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// A data or directive problem that fails the check.
    Error,
    /// An advisory finding that never fails the check on its own.
    Warning,
}

/// Bitmask over [`Severity`] selecting which findings a check retains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityFilter(u8);

impl SeverityFilter {
    /// Retain ERROR-class findings only.
    pub const ERRORS: Self = Self(0b01);
    /// Retain WARNING-class findings only.
    pub const WARNINGS: Self = Self(0b10);
    /// Retain every finding.
    pub const ALL: Self = Self(0b11);

    /// Whether findings of the given severity pass this filter.
    pub fn contains(self, severity: Severity) -> bool {
        match severity {
            Severity::Error => self.0 & Self::ERRORS.0 != 0,
            Severity::Warning => self.0 & Self::WARNINGS.0 != 0,
        }
    }
}

impl std::ops::BitOr for SeverityFilter {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// What went wrong at a node.
///
/// Every cause except [`Cause::Deprecated`] is ERROR class.
/// [`Cause::Custom`] carries an error returned verbatim by a self-check or a
/// `call:` target.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    /// A `required` field is absent or still its type's default.
    #[error("value required")]
    ValueRequired,
    /// An `expect:` allow-list did not contain the rendered value.
    #[error("unexpected value")]
    ValueUnexpected,
    /// A `deprecated` field carries a non-default value.
    #[error("deprecated parameter")]
    Deprecated,
    /// A directive token had an empty or malformed payload.
    #[error("bad syntax")]
    BadSyntax,
    /// A `re:` pattern did not match the rendered value.
    #[error("no match")]
    NoMatch,
    /// A `call:` target exists but does not meet the method contract.
    #[error("wrong signature method")]
    WrongSignatureMethod,
    /// A `call:` target is not registered on the parent record.
    #[error("method not found")]
    MethodNotFound,
    /// A directive token matched no known rule keyword or prefix.
    #[error("unknown check")]
    UnknownCheck,
    /// Traversal re-entered a value already on the current ancestor chain.
    #[error("cyclic graph")]
    CyclicGraph,
    /// An error propagated verbatim from a self-check or `call:` target.
    #[error("{0}")]
    Custom(String),
}

impl Cause {
    fn severity(&self) -> Severity {
        match self {
            Cause::Deprecated => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A single classified validation finding.
///
/// Renders as `"<cause>: <field> <value>"` when an offending value is
/// attached, `"<cause>: <field>"` otherwise. Custom errors render their
/// message verbatim.
///
/// Severity is derived from the cause at construction: `deprecated` findings
/// are WARNING class; everything else, including the directive
/// misconfiguration causes, is ERROR class and cannot be reclassified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckError {
    cause: Cause,
    field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    severity: Severity,
}

impl CheckError {
    /// Create a finding for a field.
    pub fn new(cause: Cause, field: impl Into<String>) -> Self {
        let severity = cause.severity();
        Self {
            cause,
            field: field.into(),
            value: None,
            severity,
        }
    }

    /// Create an unclassified error that renders its message verbatim.
    ///
    /// This is the constructor for errors returned from [`Checkable::check`]
    /// and `call:` targets. It is ERROR class.
    ///
    /// [`Checkable::check`]: crate::Checkable::check
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(Cause::Custom(message.into()), String::new())
    }

    /// Attach the rendered offending value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The cause of this finding.
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// The name of the field the finding refers to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The rendered offending value, when one is attached.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The severity class of this finding.
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Cause::Custom(message) = &self.cause {
            return f.write_str(message);
        }
        match &self.value {
            Some(value) => write!(f, "{}: {} {}", self.cause, self.field, value),
            None => write!(f, "{}: {}", self.cause, self.field),
        }
    }
}

impl std::error::Error for CheckError {}

/// Keep only the findings whose severity passes the filter, preserving order.
pub fn filter_by_severity(errors: Vec<CheckError>, filter: SeverityFilter) -> Vec<CheckError> {
    errors
        .into_iter()
        .filter(|e| filter.contains(e.severity()))
        .collect()
}
