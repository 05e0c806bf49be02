//! Field-level request validation.

use std::collections::BTreeMap;

use lazy_regex::{Lazy, Regex, lazy_regex};
use serde::Serialize;
use thiserror::Error;

static EMAIL_REGEX: Lazy<Regex> =
    lazy_regex!(r"^[A-Za-z0-9]{1}[A-Za-z0-9._%+-]*@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$");

/// Field name to message. Only the first violation of each field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("validation failed for {} field(s)", .0.len())]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Implemented by request bodies checked before they reach a service.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

pub(crate) fn not_blank(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, format!("{field} must not be blank"));
        return false;
    }
    true
}

pub(crate) fn length_between(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    max: Option<usize>,
) {
    let len = value.chars().count();
    match max {
        Some(max) if len < min || len > max => {
            errors.add(field, format!("{field} must be between {min} and {max} characters"));
        }
        None if len < min => {
            errors.add(field, format!("{field} must be at least {min} characters"));
        }
        _ => {}
    }
}

pub(crate) fn email(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !EMAIL_REGEX.is_match(value) {
        errors.add(field, "must be a valid email address");
    }
}
