//! Field-level validation collector for create requests.
//!
//! Create validation reports *all* missing or invalid required fields in one
//! response instead of failing on the first. Enum-valued fields are the
//! exception: they are parsed against their closed set up front and fail
//! immediately, independent of this collector.

use crate::error::CoreError;

/// Accumulates field errors for one create request.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `<field> is required` when `value` is `None`, passing the
    /// value through either way so callers can keep destructuring.
    pub fn require<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.errors.push(format!("{field} is required"));
        }
        value
    }

    /// Like [`require`](Self::require) but also rejects blank strings.
    pub fn require_text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(text) if !text.trim().is_empty() => Some(text),
            Some(_) => {
                self.errors.push(format!("{field} must not be blank"));
                None
            }
            None => {
                self.errors.push(format!("{field} is required"));
                None
            }
        }
    }

    /// Record an arbitrary field error.
    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Concatenate every collected error into a single validation failure,
    /// or `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_all_missing_fields() {
        let mut errors = FieldErrors::new();
        let _ = errors.require::<String>("name", None);
        let _ = errors.require("description", Some("d".to_string()));
        let _ = errors.require::<i64>("start_date", None);

        let err = errors.into_result().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("name is required"));
        assert!(msg.contains("start_date is required"));
        assert!(!msg.contains("description"));
    }

    #[test]
    fn blank_text_is_an_error() {
        let mut errors = FieldErrors::new();
        assert!(errors.require_text("name", Some("   ".into())).is_none());
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn empty_collector_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn passes_values_through() {
        let mut errors = FieldErrors::new();
        let value = errors.require("name", Some(42));
        assert_eq!(value, Some(42));
        assert!(errors.is_empty());
    }
}
