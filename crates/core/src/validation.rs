//! Per-field validation failures.
//!
//! [`ValidationError`] aggregates [`FieldError`]s under a single
//! `VALIDATION_ERROR` [`CoreError`]. It can be built directly, from raw
//! [`Violation`] records, or from the output of `validator`'s derive.

use serde::Serialize;

use crate::error::{CoreError, ErrorCode};

/// Separator used when a field fails more than one constraint.
pub const MESSAGE_SEPARATOR: &str = ", ";

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Name of the (first) constraint that failed, e.g. `"length"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
}

/// Raw constraint violations for one property, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Violation {
    pub property: String,
    pub value: Option<serde_json::Value>,
    /// `(constraint name, message)` pairs.
    pub constraints: Vec<(String, String)>,
}

/// A `VALIDATION_ERROR` carrying the list of failing fields.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", .inner.message)]
pub struct ValidationError {
    inner: CoreError,
    errors: Vec<FieldError>,
}

impl ValidationError {
    /// Build from field errors. The list is mirrored into the error context
    /// under `"errors"`.
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self::with_message(ErrorCode::ValidationError.default_message(), errors)
    }

    pub fn with_message(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        let inner = CoreError::with_message(ErrorCode::ValidationError, message).context_value(
            "errors",
            serde_json::to_value(&errors).unwrap_or(serde_json::Value::Null),
        );
        Self { inner, errors }
    }

    /// One failing field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError {
            field: field.into(),
            message: message.into(),
            value: None,
            constraint: None,
        }])
    }

    /// Collapse raw violations into one [`FieldError`] per property.
    ///
    /// All constraint messages of a property are joined with
    /// [`MESSAGE_SEPARATOR`]; the first constraint's name is kept as the
    /// representative `constraint`.
    pub fn from_violations(violations: &[Violation]) -> Self {
        let errors = violations
            .iter()
            .map(|v| FieldError {
                field: v.property.clone(),
                message: v
                    .constraints
                    .iter()
                    .map(|(_, message)| message.as_str())
                    .collect::<Vec<_>>()
                    .join(MESSAGE_SEPARATOR),
                value: v.value.clone(),
                constraint: v.constraints.first().map(|(name, _)| name.clone()),
            })
            .collect();
        Self::new(errors)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn core(&self) -> &CoreError {
        &self.inner
    }

    /// Flattened `"field: message"` lines, one per failing field.
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect()
    }

    pub fn into_core(self) -> CoreError {
        self.inner
    }
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        err.into_core()
    }
}

/// Convert `validator` derive output into raw violations.
///
/// Fields come out of `validator` as a hash map, so they are sorted by name
/// to keep responses stable. Nested struct and list errors are not used by
/// any DTO and are ignored.
pub fn violations_from(errors: &validator::ValidationErrors) -> Vec<Violation> {
    let mut violations: Vec<Violation> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let field = field.to_string();
            let value = errs.iter().find_map(|e| e.params.get("value").cloned());
            let constraints = errs
                .iter()
                .map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} failed the '{}' check", e.code));
                    (e.code.to_string(), message)
                })
                .collect();
            Violation {
                property: field,
                value,
                constraints,
            }
        })
        .collect();
    violations.sort_by(|a, b| a.property.cmp(&b.property));
    violations
}

impl From<&validator::ValidationErrors> for ValidationError {
    fn from(errors: &validator::ValidationErrors) -> Self {
        Self::from_violations(&violations_from(errors))
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::from(&errors)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
