//! Connection parameter loading.
//!
//! Parameters come from two layers: an optional dotenv-style file and the
//! process environment. The file is parsed into plain values rather than
//! exported into the environment, and the process environment always wins
//! for a name both layers define.

use figment::Figment;
use figment::providers::Serialized;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Recognized variable names and the `ConnectionParams` field each one fills.
pub const VARIABLES: [(&str, &str); 6] = [
    ("DATABASE_URL", "database_url"),
    ("DB_USER", "user"),
    ("DB_PASSWORD", "password"),
    ("DB_HOST", "host"),
    ("DB_PORT", "port"),
    ("DB_NAME", "dbname"),
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid connection parameters: {0}")]
    Extract(#[from] Box<figment::Error>),
}

/// Where to look for the env file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EnvFile {
    /// `.env` in the current directory or the nearest parent that has one.
    #[default]
    Discover,
    Path(PathBuf),
    Disabled,
}

/// Parameters for a single connection attempt.
///
/// Every field is kept verbatim: an empty string stays `Some("")`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionParams {
    pub database_url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub dbname: Option<String>,
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct With<'a>(
            &'a Option<String>,
            fn(&Option<String>, &mut fmt::Formatter<'_>) -> fmt::Result,
        );
        impl fmt::Debug for With<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                (self.1)(self.0, f)
            }
        }

        f.debug_struct("ConnectionParams")
            .field(
                "database_url",
                &With(&self.database_url, crate::fmt::connection_url),
            )
            .field("user", &self.user)
            .field("password", &With(&self.password, crate::fmt::secret))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .finish()
    }
}

impl ConnectionParams {
    /// The connection string, if one was supplied and is non-empty.
    pub fn url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Layer env-file values under process environment values.
    ///
    /// Names outside [`VARIABLES`] are ignored in both layers.
    pub fn from_layers<F, E>(file_vars: F, process_vars: E) -> Result<Self, ConfigError>
    where
        F: IntoIterator<Item = (String, String)>,
        E: IntoIterator<Item = (String, String)>,
    {
        Figment::new()
            .merge(Serialized::defaults(recognized(file_vars)))
            .merge(Serialized::defaults(recognized(process_vars)))
            .extract()
            .map_err(|e| ConfigError::Extract(Box::new(e)))
    }
}

/// Load parameters from the env file and the current process environment.
pub fn load(env_file: &EnvFile) -> Result<ConnectionParams, ConfigError> {
    let file_vars = read_env_file(env_file);
    let process_vars = VARIABLES.iter().filter_map(|(name, _)| {
        std::env::var(name)
            .ok()
            .map(|value| ((*name).to_owned(), value))
    });
    ConnectionParams::from_layers(file_vars, process_vars)
}

/// Parse the env file into name/value pairs without touching the process
/// environment.
///
/// A missing or unreadable file yields no values. Malformed lines are skipped.
pub fn read_env_file(env_file: &EnvFile) -> Vec<(String, String)> {
    let iter = match env_file {
        EnvFile::Disabled => return Vec::new(),
        EnvFile::Discover => dotenvy::dotenv_iter(),
        EnvFile::Path(path) => dotenvy::from_path_iter(path),
    };

    let iter = match iter {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            match env_file {
                EnvFile::Path(path) => warn!(path = %path.display(), "env file not found"),
                _ => debug!("no .env file found"),
            }
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "failed to open env file");
            return Vec::new();
        }
    };

    let mut vars = Vec::new();
    for item in iter {
        match item {
            Ok(pair) => vars.push(pair),
            Err(e) => warn!(error = %e, "skipping malformed env file entry"),
        }
    }
    debug!(count = vars.len(), "env file parsed");
    vars
}

fn recognized<I>(vars: I) -> BTreeMap<&'static str, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| {
            VARIABLES
                .iter()
                .find(|(var, _)| *var == name)
                .map(|(_, field)| (*field, value))
        })
        .collect()
}
