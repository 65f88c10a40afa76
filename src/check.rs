//! One-shot connectivity check against a PostgreSQL server.

use crate::config::ConnectionParams;
use crate::utils::{fmt_duration, log_if_slow};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Asks the server for its current timestamp.
pub const DIAGNOSTIC_QUERY: &str = "SELECT NOW();";

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("{0}")]
    Options(#[source] sqlx::Error),
    #[error("invalid port number: {0:?}")]
    InvalidPort(String),
    #[error("{0}")]
    Connect(#[source] sqlx::Error),
    #[error("{0}")]
    Query(#[source] sqlx::Error),
    #[error("{source}")]
    Close {
        current_time: DateTime<Utc>,
        #[source]
        source: sqlx::Error,
    },
}

impl CheckError {
    /// Whether a session was established before the failure.
    pub fn reached_server(&self) -> bool {
        matches!(self, Self::Query(_) | Self::Close { .. })
    }
}

/// Build connect options from the parameters.
///
/// A non-empty connection URL is used on its own. Otherwise each discrete
/// field that is present overrides the client library default. An empty
/// port counts as absent, so the default port applies.
pub fn connect_options(params: &ConnectionParams) -> Result<PgConnectOptions, CheckError> {
    let options = match params.url() {
        Some(url) => PgConnectOptions::from_str(url).map_err(CheckError::Options)?,
        None => {
            let mut options = PgConnectOptions::new();
            if let Some(host) = &params.host {
                options = options.host(host);
            }
            if let Some(port) = params.port.as_ref().filter(|port| !port.is_empty()) {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| CheckError::InvalidPort(port.clone()))?;
                options = options.port(port);
            }
            if let Some(user) = &params.user {
                options = options.username(user);
            }
            if let Some(password) = &params.password {
                options = options.password(password);
            }
            if let Some(dbname) = &params.dbname {
                options = options.database(dbname);
            }
            options
        }
    };

    Ok(options
        .log_statements(tracing::log::LevelFilter::Debug)
        .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(1)))
}

/// Connect, fetch the server time, and close.
///
/// Exactly one attempt is made. Once a connection is open it is closed on
/// every path, including a failed query.
pub async fn run(params: &ConnectionParams) -> Result<DateTime<Utc>, CheckError> {
    let options = connect_options(params)?;
    debug!(
        via_url = params.url().is_some(),
        host = options.get_host(),
        port = options.get_port(),
        "connecting"
    );

    let start = Instant::now();
    let mut conn = PgConnection::connect_with(&options)
        .await
        .map_err(CheckError::Connect)?;
    log_if_slow(start, Duration::from_secs(2), "database connect");
    info!(duration = fmt_duration(start.elapsed()), "connection established");

    let queried = sqlx::query_scalar::<_, DateTime<Utc>>(DIAGNOSTIC_QUERY)
        .fetch_one(&mut conn)
        .await;
    let current_time = match queried {
        Ok(current_time) => current_time,
        Err(e) => {
            if let Err(close_err) = conn.close().await {
                warn!(error = %close_err, "failed to close connection after query error");
            }
            return Err(CheckError::Query(e));
        }
    };
    debug!(%current_time, "diagnostic query returned");

    conn.close()
        .await
        .map_err(|source| CheckError::Close {
            current_time,
            source,
        })?;
    info!(duration = fmt_duration(start.elapsed()), "connection closed");

    Ok(current_time)
}
