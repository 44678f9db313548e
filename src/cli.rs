// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_DATABASE: &str = "data/corpus.db";

#[derive(Parser)]
#[command(name = "corpus-wrangler")]
#[command(about = "A supervised backend server for an online corpus editor")]
pub struct Cli {
    #[arg(long, help = "Enable debug logging")]
    pub debug: bool,

    #[arg(
        long,
        default_value_t = DEFAULT_PORT,
        help = "Port to run the server on",
        value_name = "PORT"
    )]
    pub port: u16,

    #[arg(
        help = "Path to the SQLite corpus database",
        default_value = DEFAULT_DATABASE,
        value_name = "DB"
    )]
    pub database: PathBuf,

    #[arg(long, help = "Enable OpenTelemetry logging export")]
    pub enable_otel_logs: bool,
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.is_dir() {
            return Err(format!(
                "Database path '{}' is a directory, not a file",
                self.database.display()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, DEFAULT_PORT};
    use clap::Parser;
    use std::fs::File;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["corpus-wrangler"]);
        assert!(!cli.debug);
        assert!(!cli.enable_otel_logs);
        assert_eq!(cli.port, DEFAULT_PORT);
        assert_eq!(cli.database, PathBuf::from("data/corpus.db"));
    }

    #[test]
    fn test_parse_flags_and_database() {
        let cli = Cli::parse_from([
            "corpus-wrangler",
            "--debug",
            "--enable-otel-logs",
            "--port",
            "9000",
            "corpus/tweets.db",
        ]);
        assert!(cli.debug);
        assert!(cli.enable_otel_logs);
        assert_eq!(cli.port, 9000);
        assert_eq!(cli.database, PathBuf::from("corpus/tweets.db"));
    }

    #[test]
    fn test_validate_success_for_missing_file() {
        let temp_dir = TempDir::new().expect("failed to create temporary directory");
        let cli = Cli {
            debug: false,
            port: DEFAULT_PORT,
            database: temp_dir.path().join("corpus.db"),
            enable_otel_logs: false,
        };
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_validate_success_for_existing_file() {
        let temp_dir = TempDir::new().expect("failed to create temporary directory");
        let database = temp_dir.path().join("corpus.db");
        File::create(&database).expect("failed to create temporary file");

        let cli = Cli {
            debug: false,
            port: DEFAULT_PORT,
            database,
            enable_otel_logs: false,
        };
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_validate_fails_for_directory_path() {
        let temp_dir = TempDir::new().expect("failed to create temporary directory");
        let cli = Cli {
            debug: false,
            port: DEFAULT_PORT,
            database: temp_dir.path().to_path_buf(),
            enable_otel_logs: false,
        };

        let result = cli.validate();
        assert!(result.is_err());

        let err = result.expect_err("validation should return an error");
        assert!(err.contains("is a directory"));
    }
}
