// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::Serialize;
use std::path::PathBuf;

use crate::cli::Cli;

/// The finalized server configuration, resolved exactly once at startup.
///
/// Warm restarts reuse this record as-is; nothing re-reads the command line
/// once the supervisor loop is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub port: u16,
    pub database: PathBuf,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            port: cli.port,
            database: cli.database.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::cli::Cli;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_from_cli_copies_resolved_values() {
        let cli = Cli::parse_from(["corpus-wrangler", "--port", "9999", "tweets.db"]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.port, 9999);
        assert_eq!(config.database, PathBuf::from("tweets.db"));
    }

    #[test]
    fn test_config_serializes_for_the_startup_dump() {
        let config = Config {
            port: 8081,
            database: PathBuf::from("data/corpus.db"),
        };
        let rendered = serde_json::to_string(&config).expect("config should serialize");
        assert!(rendered.contains("8081"));
        assert!(rendered.contains("corpus.db"));
    }
}
