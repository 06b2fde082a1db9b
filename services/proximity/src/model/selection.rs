//! Selection model definitions.
//!
//! # Purpose
//! Defines the stored rating record, the validated write payload, and the
//! outcome of an identity-keyed upsert.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lowest accepted proximity value.
pub const PROXIMITY_MIN: i32 = 1;
/// Highest accepted proximity value.
pub const PROXIMITY_MAX: i32 = 10;

/// The three rated metrics, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ProximityLabel {
    Salary,
    People,
    Work,
}

impl ProximityLabel {
    pub const ALL: [ProximityLabel; 3] = [
        ProximityLabel::Salary,
        ProximityLabel::People,
        ProximityLabel::Work,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ProximityLabel::Salary => "Salary",
            ProximityLabel::People => "People",
            ProximityLabel::Work => "Work",
        }
    }

    /// Case-sensitive match against the wire label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.as_str() == label)
    }

    pub(crate) const fn index(&self) -> usize {
        match self {
            ProximityLabel::Salary => 0,
            ProximityLabel::People => 1,
            ProximityLabel::Work => 2,
        }
    }
}

/// A stored rating set, one per `user_id`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: i64,
    pub user_id: String,
    pub country: String,
    pub salary: i32,
    pub people: i32,
    pub work: i32,
}

impl Selection {
    pub fn value(&self, label: ProximityLabel) -> i32 {
        match label {
            ProximityLabel::Salary => self.salary,
            ProximityLabel::People => self.people,
            ProximityLabel::Work => self.work,
        }
    }
}

/// A validated submission ready to be written.
///
/// Only produced by [`crate::validation::parse_submission`], so every value is
/// already inside `PROXIMITY_MIN..=PROXIMITY_MAX` and both strings are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub user_id: String,
    pub country: String,
    pub salary: i32,
    pub people: i32,
    pub work: i32,
}

impl Submission {
    /// Materialize the record this submission produces under surrogate key `id`.
    pub fn into_selection(self, id: i64) -> Selection {
        Selection {
            id,
            user_id: self.user_id,
            country: self.country,
            salary: self.salary,
            people: self.people,
            work: self.work,
        }
    }
}

/// Which branch of the upsert ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(Selection),
    Updated(Selection),
}

impl UpsertOutcome {
    pub fn selection(&self) -> &Selection {
        match self {
            UpsertOutcome::Created(selection) | UpsertOutcome::Updated(selection) => selection,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, UpsertOutcome::Created(_))
    }

    pub fn message(&self) -> &'static str {
        match self {
            UpsertOutcome::Created(_) => "Selection submitted successfully.",
            UpsertOutcome::Updated(_) => "Selection updated successfully.",
        }
    }
}
