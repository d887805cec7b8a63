use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Field-keyed validation failures collected from a request body.
///
/// Serializes as a flat JSON object mapping the wire field name to its message,
/// e.g. `{"age": "Age must be at least 18"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("validation failed{}", describe(.fields))]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for `field`. The first message recorded for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    /// Converts the collected failures into `Ok(value)` when none were recorded.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

fn describe(fields: &BTreeMap<&'static str, String>) -> String {
    fields
        .iter()
        .enumerate()
        .map(|(index, (field, message))| {
            let separator = if index == 0 { ": " } else { ", " };
            format!("{separator}{field} ({message})")
        })
        .collect()
}

/// Returns the value when present and non-blank, recording `message` otherwise.
pub(crate) fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
    message: &'static str,
) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            errors.add(field, message);
            String::new()
        }
    }
}

/// Checks that `value` is present and within `min..=max`.
pub(crate) fn bounded_int(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<i32>,
    bounds: IntBounds,
) -> i32 {
    let Some(value) = value else {
        errors.add(field, bounds.missing);
        return 0;
    };
    if value < bounds.min {
        errors.add(field, bounds.below);
    } else if value > bounds.max {
        errors.add(field, bounds.above);
    }
    value
}

/// Inclusive integer range with the messages reported for each violation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IntBounds {
    pub min: i32,
    pub max: i32,
    pub missing: &'static str,
    pub below: &'static str,
    pub above: &'static str,
}
