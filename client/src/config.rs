//! Database client configuration loaded via OrthoConfig.
//!
//! Connection parameters are fixed per process: they come from the
//! environment (prefix `UPSERT_`), an optional configuration file, or the
//! defaults below, and are not part of the upsert call surface.

use std::fmt;

use clap::ValueEnum;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_DBNAME: &str = "usuarios";
const DEFAULT_USER: &str = "postgres";
const DEFAULT_SSLMODE: &str = "prefer";

/// Which server-side upsert mechanism the client drives.
///
/// The two mechanisms are alternate designs for the same feature; a
/// deployment picks exactly one and uses it consistently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UpsertProtocol {
    /// Plain INSERT with a server-side BEFORE INSERT trigger; the action
    /// taken is not observable.
    #[default]
    Trigger,
    /// Explicit `users_upsert` routine returning action detail and the
    /// final identifier.
    Procedure,
}

impl fmt::Display for UpsertProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Trigger => "trigger",
            Self::Procedure => "procedure",
        };
        f.write_str(label)
    }
}

/// Connection settings for the target PostgreSQL server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "UPSERT")]
pub struct DatabaseSettings {
    /// Full connection string; overrides the individual fields below.
    pub database_url: Option<String>,
    /// Server host name.
    pub host: Option<String>,
    /// Server port.
    pub port: Option<u16>,
    /// Database name.
    pub dbname: Option<String>,
    /// Login role.
    pub user: Option<String>,
    /// Login password.
    pub password: Option<String>,
    /// libpq `sslmode` value controlling transport security.
    pub sslmode: Option<String>,
    /// Server-side upsert mechanism to drive.
    pub protocol: Option<UpsertProtocol>,
}

impl DatabaseSettings {
    /// Return the configured host, falling back to the default.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the configured port, falling back to the default.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Return the configured database name, falling back to the default.
    #[must_use]
    pub fn dbname(&self) -> &str {
        self.dbname.as_deref().unwrap_or(DEFAULT_DBNAME)
    }

    /// Return the configured login role, falling back to the default.
    #[must_use]
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_USER)
    }

    /// Return the configured `sslmode`, falling back to the default.
    #[must_use]
    pub fn sslmode(&self) -> &str {
        self.sslmode.as_deref().unwrap_or(DEFAULT_SSLMODE)
    }

    /// Return the configured protocol, falling back to the trigger one.
    #[must_use]
    pub fn protocol(&self) -> UpsertProtocol {
        self.protocol.unwrap_or_default()
    }

    /// Render the libpq-style key/value connection string consumed by the
    /// `postgres` crate. A configured `database_url` wins over the
    /// individual fields.
    #[must_use]
    pub fn connection_string(&self) -> String {
        if let Some(url) = &self.database_url {
            return url.clone();
        }
        let mut parts = vec![
            format!("host={}", self.host()),
            format!("port={}", self.port()),
            format!("dbname={}", self.dbname()),
            format!("user={}", self.user()),
            format!("sslmode={}", self.sslmode()),
        ];
        if let Some(password) = &self.password {
            parts.push(format!("password={password}"));
        }
        parts.join(" ")
    }
}
