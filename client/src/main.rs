//! Entry point: run one insert-style and one update-style upsert against
//! the same email and print each resulting row.

use std::ffi::OsString;
use std::io;

use clap::Parser;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use upsert_client::config::{DatabaseSettings, UpsertProtocol};
use upsert_client::domain::ports::UserUpsert;
use upsert_client::domain::{UpsertOutcome, UserDraft};
use upsert_client::outbound::persistence::{ProcedureUpsertRepository, TriggerUpsertRepository};

/// `upsert-client` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "upsert-client",
    about = "Upsert a user row twice by email and print the final state after each call",
    version
)]
struct CliArgs {
    /// Email used as the natural key for both calls.
    #[arg(long, value_name = "email", default_value = "carlos.perez@example.com.co")]
    email: String,
    /// Name for the initial insert-style call.
    #[arg(long, value_name = "name", default_value = "Carlos Pérez")]
    name: String,
    /// Age for the initial insert-style call.
    #[arg(long, value_name = "age", default_value_t = 28)]
    age: i32,
    /// Name for the follow-up update-style call.
    #[arg(long = "updated-name", value_name = "name", default_value = "Carlos A. Pérez")]
    updated_name: String,
    /// Age for the follow-up update-style call.
    #[arg(long = "updated-age", value_name = "age", default_value_t = 29)]
    updated_age: i32,
    /// Server-side upsert mechanism. Falls back to the configured protocol.
    #[arg(long, value_enum, value_name = "protocol")]
    protocol: Option<UpsertProtocol>,
    /// Database connection string. Falls back to the configured settings.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    // Settings come from the environment; CLI arguments stay with clap, so
    // OrthoConfig only sees the program name.
    let settings = DatabaseSettings::load_from_iter([OsString::from("upsert-client")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;

    let connection_string = args
        .database_url
        .clone()
        .unwrap_or_else(|| settings.connection_string());
    let protocol = args.protocol.unwrap_or_else(|| settings.protocol());

    let repository: Box<dyn UserUpsert> = match protocol {
        UpsertProtocol::Trigger => Box::new(TriggerUpsertRepository::new(&connection_string)),
        UpsertProtocol::Procedure => Box::new(ProcedureUpsertRepository::new(&connection_string)),
    };

    let first = repository
        .upsert(&UserDraft::new(args.name, args.age, args.email.clone()))
        .map_err(|error| io::Error::other(format!("initial upsert failed: {error}")))?;
    print_outcome(&first)?;

    // The routine takes the known identifier on the second call; the
    // trigger path keeps matching by email alone.
    let mut second_draft = UserDraft::new(args.updated_name, args.updated_age, args.email);
    if protocol == UpsertProtocol::Procedure {
        second_draft = second_draft.with_id(first.final_id);
    }
    let second = repository
        .upsert(&second_draft)
        .map_err(|error| io::Error::other(format!("follow-up upsert failed: {error}")))?;
    print_outcome(&second)?;

    Ok(())
}

fn print_outcome(outcome: &UpsertOutcome) -> io::Result<()> {
    let row = serde_json::to_string(&outcome.row).map_err(io::Error::other)?;
    println!(
        "action={} id={} row={row}",
        outcome.action, outcome.final_id
    );
    Ok(())
}
