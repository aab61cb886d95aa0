//! Port abstraction for upsert persistence adapters and their errors.
//!
//! The port describes how the domain expects to reach the database. It
//! exposes strongly typed errors so adapters map their failures into
//! predictable variants instead of returning `anyhow::Result`.

use thiserror::Error;

use super::{UpsertOutcome, UserDraft};

/// Errors surfaced by upsert persistence adapters.
///
/// Propagation policy: no local recovery. Every variant aborts the current
/// call and reaches the caller unchanged; the stored-routine adapter rolls
/// its transaction back before propagating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserUpsertError {
    /// Connection to the database could not be established.
    #[error("database connection failed: {message}")]
    Connection { message: String },
    /// A statement failed to execute or a row failed to decode.
    #[error("upsert query failed: {message}")]
    Query { message: String },
    /// Trigger protocol: the post-write read found no row for the email,
    /// meaning the trigger did not produce the expected state.
    #[error("record not found after upsert for {email}")]
    MissingRow { email: String },
    /// Stored-routine protocol: a result set was absent or empty.
    #[error("stored routine result malformed: {message}")]
    ProcedureResult { message: String },
}

impl UserUpsertError {
    /// Helper for connection establishment failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for statement execution and row decoding failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for the trigger protocol's missing post-write row.
    pub fn missing_row(email: impl Into<String>) -> Self {
        Self::MissingRow {
            email: email.into(),
        }
    }

    /// Helper for malformed stored-routine result sets.
    pub fn procedure_result(message: impl Into<String>) -> Self {
        Self::ProcedureResult {
            message: message.into(),
        }
    }
}

/// Insert-or-update a user record and return its final persisted state.
pub trait UserUpsert {
    /// Perform one synchronous, blocking upsert call.
    ///
    /// One connection is acquired for the duration of the call and released
    /// on every exit path. Concurrent callers upserting the same email are
    /// coordinated by the database, not by this client. No retries:
    /// failures surface immediately.
    fn upsert(&self, draft: &UserDraft) -> Result<UpsertOutcome, UserUpsertError>;
}
