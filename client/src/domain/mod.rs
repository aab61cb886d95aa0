//! Domain primitives for the upsert flow.
//!
//! Purpose: define the strongly typed input and output of a single upsert
//! call, independent of the adapter driving it. Keep types immutable after
//! construction and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - `UserDraft` — per-call input; the email is the natural key.
//! - `UpsertOutcome` — final persisted state reported by the database.
//! - `UpsertAction` — what the database says it did (insert, update, or
//!   indistinguishable).
//! - `RowSnapshot` / `SqlValue` — ordered dynamic column mapping for
//!   queries whose column sets vary.

pub mod ports;
pub mod row;
pub mod user;

pub use self::row::{RowSnapshot, SqlValue};
pub use self::user::{UpsertAction, UpsertOutcome, UserDraft};
