// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ServerError;
use crate::lifecycle::RunOutcome;
use crate::service::ControlService;

/// Loads and runs the application on behalf of the supervisor.
///
/// `init` is the cold-start entry point: it captures what the application
/// needs from the configuration record and runs it to completion. A warm
/// restart goes through `refresh_self` (replace the loader's own internals)
/// followed by `reload_dependents` (rebuild and re-run the application from
/// the state captured at cold start). Configuration is never re-resolved on
/// a restart.
#[async_trait]
pub trait Loader {
    async fn init(&mut self, config: &Config) -> Result<RunOutcome, ServerError>;

    fn refresh_self(&mut self);

    async fn reload_dependents(&mut self) -> Result<RunOutcome, ServerError>;
}

/// Production loader: drives the control service, retaining the port and
/// database path across warm restarts.
#[derive(Debug, Default)]
pub struct ServiceLoader {
    retained: Option<RetainedConfig>,
    generation: u32,
}

#[derive(Debug, Clone)]
struct RetainedConfig {
    port: u16,
    database: PathBuf,
}

impl ServiceLoader {
    /// How many times this loader has been refreshed since cold start.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    async fn serve(retained: &RetainedConfig) -> Result<RunOutcome, ServerError> {
        let service = ControlService::bind(retained.port).await?;
        let addr = service.local_addr()?;
        info!(
            "Corpus server listening on {addr}, database at '{}'",
            retained.database.display()
        );
        service.run().await
    }
}

#[async_trait]
impl Loader for ServiceLoader {
    async fn init(&mut self, config: &Config) -> Result<RunOutcome, ServerError> {
        let retained = RetainedConfig {
            port: config.port,
            database: config.database.clone(),
        };
        self.retained = Some(retained.clone());
        Self::serve(&retained).await
    }

    fn refresh_self(&mut self) {
        // The retained configuration snapshot survives a refresh.
        self.generation += 1;
        debug!("Loader refreshed, generation {}", self.generation);
    }

    async fn reload_dependents(&mut self) -> Result<RunOutcome, ServerError> {
        let retained = self.retained.clone().ok_or(ServerError::NotLoaded)?;
        info!("Rebuilding the service from retained configuration");
        Self::serve(&retained).await
    }
}

#[cfg(test)]
mod tests {
    use super::{Loader, ServiceLoader};
    use crate::error::ServerError;

    #[tokio::test]
    async fn test_reload_before_cold_start_is_rejected() {
        let mut loader = ServiceLoader::default();
        let err = loader
            .reload_dependents()
            .await
            .expect_err("reload without init should fail");
        assert!(matches!(err, ServerError::NotLoaded));
    }

    #[test]
    fn test_refresh_self_advances_the_generation() {
        let mut loader = ServiceLoader::default();
        assert_eq!(loader.generation(), 0);
        loader.refresh_self();
        loader.refresh_self();
        assert_eq!(loader.generation(), 2);
    }
}
