//! Console lines for a check outcome.

use crate::check::CheckError;
use chrono::{DateTime, Utc};
use std::fmt::Display;

pub const CONNECTED: &str = "Connection successful!";
pub const CURRENT_TIME_PREFIX: &str = "Current Time: ";
pub const CLOSED: &str = "Connection closed.";
pub const FAILURE_PREFIX: &str = "Failed to connect: ";

/// Format any failure with the fixed failure prefix.
pub fn failure_line(err: &dyn Display) -> String {
    format!("{FAILURE_PREFIX}{err}")
}

fn current_time_line(current_time: &DateTime<Utc>) -> String {
    format!("{CURRENT_TIME_PREFIX}{current_time}")
}

/// Render the lines to print, in the order the steps happened.
pub fn render(outcome: &Result<DateTime<Utc>, CheckError>) -> Vec<String> {
    match outcome {
        Ok(current_time) => vec![
            CONNECTED.to_owned(),
            current_time_line(current_time),
            CLOSED.to_owned(),
        ],
        Err(e) => {
            let mut lines = Vec::with_capacity(3);
            if e.reached_server() {
                lines.push(CONNECTED.to_owned());
            }
            if let CheckError::Close { current_time, .. } = e {
                lines.push(current_time_line(current_time));
            }
            lines.push(failure_line(e));
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap()
    }

    #[test]
    fn success_prints_three_lines() {
        let lines = render(&Ok(sample_time()));
        assert_eq!(
            lines,
            vec![
                "Connection successful!",
                "Current Time: 2026-10-17 09:30:00 UTC",
                "Connection closed.",
            ]
        );
    }

    #[test]
    fn connect_failure_prints_only_failure() {
        let err = CheckError::Connect(sqlx::Error::Protocol("connection refused".into()));
        let lines = render(&Err(err));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Failed to connect: "));
        assert!(lines[0].contains("connection refused"));
    }

    #[test]
    fn invalid_port_is_reported_as_failure() {
        let lines = render(&Err(CheckError::InvalidPort("abc".into())));
        assert_eq!(lines, vec![r#"Failed to connect: invalid port number: "abc""#]);
    }

    #[test]
    fn query_failure_follows_success_line() {
        let lines = render(&Err(CheckError::Query(sqlx::Error::RowNotFound)));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CONNECTED);
        assert!(lines[1].starts_with(FAILURE_PREFIX));
    }

    #[test]
    fn close_failure_keeps_fetched_time() {
        let lines = render(&Err(CheckError::Close {
            current_time: sample_time(),
            source: sqlx::Error::Protocol("broken pipe".into()),
        }));
        assert_eq!(lines[0], CONNECTED);
        assert_eq!(lines[1], "Current Time: 2026-10-17 09:30:00 UTC");
        assert!(lines[2].starts_with(FAILURE_PREFIX));
        assert!(lines[2].contains("broken pipe"));
    }

    #[test]
    fn failure_line_accepts_any_display() {
        assert_eq!(failure_line(&"no such file"), "Failed to connect: no such file");
    }
}
