//! Stored-routine-backed upsert adapter over raw PostgreSQL.
//!
//! The `users_upsert` routine returns its two result sets as refcursors:
//! the first holds one row of action detail (including the `accion`
//! column), the second holds one row with the final identifier. The
//! adapter fetches both inside a single transaction and commits only when
//! both are present and non-empty; every failure path rolls the
//! transaction back first, so no partial writes remain visible.

use postgres::{Client, NoTls, Row, Transaction};
use tracing::debug;

use crate::domain::ports::{UserUpsert, UserUpsertError};
use crate::domain::{SqlValue, UpsertAction, UpsertOutcome, UserDraft};

use super::row_decoding::decode_row;

const CALL_UPSERT: &str = "SELECT cur::text FROM users_upsert($1, $2, $3, $4) AS cur";
const ACTION_COLUMN: &str = "accion";
const ID_COLUMN: &str = "id";

const MISSING_ACTION_DETAIL: &str = "procedure returned no result set for action detail";
const MISSING_FINAL_IDENTIFIER: &str = "missing final-identifier result set";

/// Performs upserts through the explicit `users_upsert` routine.
///
/// Passing a draft with an identifier asks the routine to update that row;
/// a draft without one signals an insert (the routine still matches by
/// email first, keeping the call idempotent per email).
#[derive(Debug, Clone)]
pub struct ProcedureUpsertRepository {
    connection_string: String,
}

impl ProcedureUpsertRepository {
    /// Construct an adapter from a PostgreSQL connection string.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }
}

impl UserUpsert for ProcedureUpsertRepository {
    fn upsert(&self, draft: &UserDraft) -> Result<UpsertOutcome, UserUpsertError> {
        let mut client = Client::connect(self.connection_string.as_str(), NoTls)
            .map_err(|error| UserUpsertError::connection(error.to_string()))?;
        let mut transaction = client
            .transaction()
            .map_err(|error| UserUpsertError::query(error.to_string()))?;

        debug!(email = %draft.email, existing_id = ?draft.id, "invoking users_upsert routine");
        let cursor_rows = transaction
            .query(CALL_UPSERT, &[&draft.id, &draft.name, &draft.age, &draft.email])
            .map_err(|error| UserUpsertError::query(error.to_string()))?;
        let cursors = cursor_names(&cursor_rows)?;

        let Some(action_cursor) = cursors.first() else {
            return rollback_with(
                transaction,
                UserUpsertError::procedure_result(MISSING_ACTION_DETAIL),
            );
        };
        let action_rows = fetch_all(&mut transaction, action_cursor)?;
        let Some(action_row) = action_rows.first() else {
            return rollback_with(
                transaction,
                UserUpsertError::procedure_result(MISSING_ACTION_DETAIL),
            );
        };

        let Some(id_cursor) = cursors.get(1) else {
            return rollback_with(
                transaction,
                UserUpsertError::procedure_result(MISSING_FINAL_IDENTIFIER),
            );
        };
        let id_rows = fetch_all(&mut transaction, id_cursor)?;
        let Some(id_row) = id_rows.first() else {
            return rollback_with(
                transaction,
                UserUpsertError::procedure_result(MISSING_FINAL_IDENTIFIER),
            );
        };

        let final_id: i32 = id_row
            .try_get(0)
            .map_err(|error| UserUpsertError::query(format!("read final identifier: {error}")))?;
        let mut snapshot = decode_row(action_row)?;

        transaction
            .commit()
            .map_err(|error| UserUpsertError::query(error.to_string()))?;
        debug!(email = %draft.email, id = final_id, "routine upsert committed");

        snapshot.set(ID_COLUMN, SqlValue::Integer(i64::from(final_id)));
        let action = snapshot
            .get(ACTION_COLUMN)
            .and_then(SqlValue::as_text)
            .map_or(UpsertAction::Unknown, UpsertAction::parse);

        Ok(UpsertOutcome {
            final_id,
            action,
            row: snapshot,
        })
    }
}

fn cursor_names(rows: &[Row]) -> Result<Vec<String>, UserUpsertError> {
    rows.iter()
        .map(|row| {
            row.try_get::<_, String>(0)
                .map_err(|error| UserUpsertError::query(format!("read cursor name: {error}")))
        })
        .collect()
}

fn fetch_all(transaction: &mut Transaction<'_>, cursor: &str) -> Result<Vec<Row>, UserUpsertError> {
    let statement = format!("FETCH ALL FROM {}", quote_identifier(cursor));
    transaction
        .query(statement.as_str(), &[])
        .map_err(|error| UserUpsertError::query(format!("fetch from cursor {cursor}: {error}")))
}

/// Quote a cursor name for interpolation into a FETCH statement; cursor
/// names are server-assigned and cannot be bound as parameters.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn rollback_with(
    transaction: Transaction<'_>,
    error: UserUpsertError,
) -> Result<UpsertOutcome, UserUpsertError> {
    if let Err(rollback_error) = transaction.rollback() {
        debug!(error = %rollback_error, "rollback after malformed routine result failed");
    }
    Err(error)
}
