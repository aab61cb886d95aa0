//! PostgreSQL persistence adapters for the `UserUpsert` port.
//!
//! Two adapters cover the two server-side upsert mechanisms:
//!
//! - [`TriggerUpsertRepository`] issues a plain INSERT and lets a BEFORE
//!   INSERT trigger convert it into an update when the email exists.
//! - [`ProcedureUpsertRepository`] calls the `users_upsert` routine, which
//!   reports the action taken and the final identifier through two result
//!   sets, inside one explicitly committed or rolled-back transaction.
//!
//! Both are thin: they translate between `postgres` rows and domain types
//! and map driver failures into [`UserUpsertError`] variants. Each call
//! opens its own connection and releases it on every exit path.
//!
//! [`UserUpsertError`]: crate::domain::ports::UserUpsertError

mod procedure_upsert_repository;
mod row_decoding;
mod trigger_upsert_repository;

pub use procedure_upsert_repository::ProcedureUpsertRepository;
pub use trigger_upsert_repository::TriggerUpsertRepository;
