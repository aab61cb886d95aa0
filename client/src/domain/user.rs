//! User draft and upsert outcome types.

use std::fmt;

use serde::Serialize;

use super::row::RowSnapshot;

/// Input fields for one upsert call.
///
/// The email is the natural key: the database matches an existing row by
/// email and is the sole authority on whether the call inserted or
/// updated. Drafts are transient and not retained after the call. No
/// client-side validation is applied beyond what the database enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    /// Server-assigned identifier, when the caller already holds one.
    /// Only the stored-routine protocol consumes it; absence signals an
    /// insert to the routine.
    pub id: Option<i32>,
    /// Display name to persist.
    pub name: String,
    /// Age to persist.
    pub age: i32,
    /// Natural key matching the logical user.
    pub email: String,
}

impl UserDraft {
    /// Construct a draft without an existing identifier.
    pub fn new(name: impl Into<String>, age: i32, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            age,
            email: email.into(),
        }
    }

    /// Attach a known server-assigned identifier to the draft.
    #[must_use]
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }
}

/// What the database reports it did with a draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    /// A new row was created.
    Inserted,
    /// An existing row matching the natural key was modified.
    Updated,
    /// The protocol cannot distinguish insert from update, or the routine
    /// reported an unrecognised tag.
    #[default]
    Unknown,
}

impl UpsertAction {
    /// Parse the action tag reported by the stored routine's `accion`
    /// column.
    ///
    /// Accepts the English spellings alongside the Spanish ones emitted by
    /// the original database routines; anything else maps to `Unknown`.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "inserted" | "insert" | "insertado" => Self::Inserted,
            "updated" | "update" | "actualizado" => Self::Updated,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for UpsertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Inserted => "inserted",
            Self::Updated => "updated",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Final state of the persisted row after a successful upsert.
///
/// Produced once per call and immutable afterwards. A call either yields a
/// complete outcome or fails; no partial-success state exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsertOutcome {
    /// Server-assigned identifier of the row the call converged on.
    pub final_id: i32,
    /// Action the database reported for this call.
    pub action: UpsertAction,
    /// All columns of the final row, in query order.
    pub row: RowSnapshot,
}
