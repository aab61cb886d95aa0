//! Upsert client library modules.
//!
//! The crate drives server-side insert-or-update of user rows over
//! PostgreSQL: the domain layer defines the draft/outcome types and the
//! `UserUpsert` port, and the outbound layer provides one adapter per
//! server-side mechanism (table trigger or stored routine).

pub mod config;
pub mod domain;
pub mod outbound;
