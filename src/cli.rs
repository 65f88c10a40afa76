use crate::config::EnvFile;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Check that a PostgreSQL database is reachable with the configured credentials.
///
/// Connection parameters are read from DATABASE_URL, or from DB_USER,
/// DB_PASSWORD, DB_HOST, DB_PORT and DB_NAME. Values in a `.env` file are
/// used for any of these the environment does not set.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Read this env file instead of searching for `.env`
    #[arg(long, value_name = "PATH", conflicts_with = "no_env_file")]
    pub env_file: Option<PathBuf>,

    /// Do not read any env file
    #[arg(long)]
    pub no_env_file: bool,

    /// Log output format (logs are written to stderr)
    #[arg(long, value_enum, default_value_t = TracingFormat::Pretty)]
    pub tracing: TracingFormat,

    /// Log level for pgcheck itself; RUST_LOG overrides this
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable single-line output
    Pretty,
    /// One JSON object per event
    Json,
}

impl Args {
    pub fn env_file(&self) -> EnvFile {
        match (&self.env_file, self.no_env_file) {
            (_, true) => EnvFile::Disabled,
            (Some(path), false) => EnvFile::Path(path.clone()),
            (None, false) => EnvFile::Discover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_arguments_discovers_env_file() {
        let args = Args::try_parse_from(["pgcheck"]).unwrap();
        assert_eq!(args.env_file(), EnvFile::Discover);
        assert_eq!(args.tracing, TracingFormat::Pretty);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn explicit_env_file() {
        let args = Args::try_parse_from(["pgcheck", "--env-file", "ci.env"]).unwrap();
        assert_eq!(args.env_file(), EnvFile::Path(PathBuf::from("ci.env")));
    }

    #[test]
    fn env_file_flags_conflict() {
        let result = Args::try_parse_from(["pgcheck", "--env-file", "a.env", "--no-env-file"]);
        assert!(result.is_err());
    }

    #[test]
    fn json_tracing() {
        let args = Args::try_parse_from(["pgcheck", "--no-env-file", "--tracing", "json"]).unwrap();
        assert_eq!(args.tracing, TracingFormat::Json);
        assert_eq!(args.env_file(), EnvFile::Disabled);
    }
}
