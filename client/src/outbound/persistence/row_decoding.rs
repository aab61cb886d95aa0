//! Decoding of dynamic `postgres` rows into domain snapshots.

use postgres::Row;
use postgres::types::Type;

use crate::domain::ports::UserUpsertError;
use crate::domain::{RowSnapshot, SqlValue};

/// Decode every column of `row` into an ordered snapshot.
///
/// Integer-family columns widen to `i64`; text-family columns become
/// strings; NULLs of either family map to [`SqlValue::Null`]. Any other
/// column type is a query error, since the upsert surface only deals in
/// integers and strings.
pub(crate) fn decode_row(row: &Row) -> Result<RowSnapshot, UserUpsertError> {
    let mut snapshot = RowSnapshot::new();
    for (index, column) in row.columns().iter().enumerate() {
        let ty = column.type_();
        let value = if is_text_family(ty) {
            row.try_get::<_, Option<String>>(index)
                .map_err(|error| decode_error(column.name(), &error))?
                .map_or(SqlValue::Null, SqlValue::Text)
        } else if is_integer_family(ty) {
            decode_integer(row, index, ty)
                .map_err(|error| decode_error(column.name(), &error))?
                .map_or(SqlValue::Null, SqlValue::Integer)
        } else {
            return Err(UserUpsertError::query(format!(
                "unsupported column type {ty} for column {}",
                column.name()
            )));
        };
        snapshot.set(column.name(), value);
    }
    Ok(snapshot)
}

fn is_text_family(ty: &Type) -> bool {
    *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR || *ty == Type::NAME
}

fn is_integer_family(ty: &Type) -> bool {
    *ty == Type::INT2 || *ty == Type::INT4 || *ty == Type::INT8
}

fn decode_integer(row: &Row, index: usize, ty: &Type) -> Result<Option<i64>, postgres::Error> {
    if *ty == Type::INT2 {
        Ok(row.try_get::<_, Option<i16>>(index)?.map(i64::from))
    } else if *ty == Type::INT4 {
        Ok(row.try_get::<_, Option<i32>>(index)?.map(i64::from))
    } else {
        row.try_get::<_, Option<i64>>(index)
    }
}

fn decode_error(column: &str, error: &postgres::Error) -> UserUpsertError {
    UserUpsertError::query(format!("decode column {column}: {error}"))
}
