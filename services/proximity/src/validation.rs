//! Submission payload validation.
//!
//! # Purpose
//! Converts the untyped JSON body of a submission into a typed [`Submission`].
//! Decoding happens in two stages: the HTTP layer accepts any JSON value, and
//! [`parse_submission`] checks fields one at a time so each failure maps to its
//! own [`ValidationError`] variant.
//!
//! # Key invariants
//! - Checks run in a fixed order: user id, country, proximities, labels, ranges.
//! - Nothing is written unless parsing succeeds.
//! - Labels are matched case-sensitively; unknown labels are ignored and a
//!   repeated known label is rejected.
use crate::model::{PROXIMITY_MAX, PROXIMITY_MIN, ProximityLabel, Submission};
use serde_json::Value;
use thiserror::Error;

/// Reasons a submission is rejected before reaching the store.
///
/// The `Display` text is the `detail` string returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("User ID missing")]
    MissingUserId,
    #[error("Country data missing")]
    MissingCountry,
    #[error("Proximities data missing")]
    MissingProximities,
    #[error("Invalid labels in proximities")]
    InvalidLabels,
    #[error("Duplicate labels in proximities")]
    DuplicateLabel(ProximityLabel),
    #[error("All proximity values must be between 1 and 10")]
    OutOfRange(ProximityLabel),
}

impl ValidationError {
    /// Stable machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingUserId => "user_id_missing",
            ValidationError::MissingCountry => "country_missing",
            ValidationError::MissingProximities => "proximities_missing",
            ValidationError::InvalidLabels => "invalid_labels",
            ValidationError::DuplicateLabel(_) => "duplicate_labels",
            ValidationError::OutOfRange(_) => "proximity_out_of_range",
        }
    }
}

/// Validate a decoded JSON body into a [`Submission`].
///
/// # Errors
/// - Returns the first [`ValidationError`] encountered, in check order.
pub fn parse_submission(payload: &Value) -> Result<Submission, ValidationError> {
    let user_id = non_empty_string(payload.get("user_id")).ok_or(ValidationError::MissingUserId)?;
    let country =
        non_empty_string(payload.get("country")).ok_or(ValidationError::MissingCountry)?;
    let proximities = payload
        .get("proximities")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or(ValidationError::MissingProximities)?;

    let [salary, people, work] = extract_labeled(proximities)?;

    Ok(Submission {
        user_id,
        country,
        salary: proximity_value(ProximityLabel::Salary, salary)?,
        people: proximity_value(ProximityLabel::People, people)?,
        work: proximity_value(ProximityLabel::Work, work)?,
    })
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// Returns the raw `proximity` values in Salary, People, Work order.
fn extract_labeled(items: &[Value]) -> Result<[&Value; 3], ValidationError> {
    let mut found: [Option<&Value>; 3] = [None; 3];
    for item in items {
        let Some(label) = item
            .get("label")
            .and_then(Value::as_str)
            .and_then(ProximityLabel::from_label)
        else {
            continue;
        };
        let slot = &mut found[label.index()];
        if slot.is_some() {
            return Err(ValidationError::DuplicateLabel(label));
        }
        *slot = Some(item.get("proximity").unwrap_or(&Value::Null));
    }

    match found {
        [Some(salary), Some(people), Some(work)] => Ok([salary, people, work]),
        _ => Err(ValidationError::InvalidLabels),
    }
}

fn proximity_value(label: ProximityLabel, value: &Value) -> Result<i32, ValidationError> {
    // Integral floats such as `5.0` are accepted; fractional values are not.
    let number = value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|v| v.fract() == 0.0 && v.is_finite())
            .map(|v| v as i64)
    });
    number
        .filter(|v| (i64::from(PROXIMITY_MIN)..=i64::from(PROXIMITY_MAX)).contains(v))
        .map(|v| v as i32)
        .ok_or(ValidationError::OutOfRange(label))
}
