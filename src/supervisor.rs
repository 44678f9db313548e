// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Process lifecycle supervision: keeps the application running until it
//! asks to stop, restarting it in place whenever it asks for that instead.

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::ServerError;
use crate::lifecycle::{ControlSignal, RunOutcome};
use crate::loader::Loader;
use crate::logging::LogFacility;

pub struct Supervisor<L, F> {
    loader: L,
    logging: F,
    quit: bool,
}

impl<L, F> Supervisor<L, F>
where
    L: Loader + Send,
    F: LogFacility + Send,
{
    pub fn new(loader: L, logging: F) -> Self {
        Self {
            loader,
            logging,
            quit: false,
        }
    }

    /// Drives the application to completion.
    ///
    /// Each iteration invokes the loader (`init` with the configuration
    /// record on the very first pass, `reload_dependents` on every pass
    /// reached via a restart) and interprets how the run ended:
    ///
    /// - a restart signal refreshes the loader and goes around again,
    ///   without limit: restarts are operator-triggered, not fault recovery;
    /// - a shutdown signal ends the loop cleanly;
    /// - a silent return ends the loop cleanly but is flagged as anomalous,
    ///   since a supervised application is expected to run until it raises
    ///   a signal;
    /// - anything else is fatal and propagates to the caller unchanged,
    ///   skipping the final logging teardown.
    ///
    /// On clean termination the logging facility is reset exactly once, so
    /// late diagnostics still have a working sink after teardown.
    pub async fn run(&mut self, config: &Config) -> Result<(), ServerError> {
        let mut cold_start = true;

        while !self.quit {
            let outcome = if cold_start {
                cold_start = false;
                self.loader.init(config).await
            } else {
                self.loader.reload_dependents().await
            };

            match outcome {
                Ok(RunOutcome::Signal(ControlSignal::Restart)) => {
                    info!("Restarting system");
                    // Refresh the loader itself first, so the next pass runs
                    // fresh loader internals, not just fresh dependents.
                    self.loader.refresh_self();
                }
                Ok(RunOutcome::Signal(ControlSignal::Shutdown)) => {
                    info!("Shutting down system");
                    self.quit = true;
                }
                Ok(RunOutcome::Silent) => {
                    // Leave the system down rather than retrying: a silent
                    // return may be a crash loop the service cannot report.
                    warn!("Unexpected shutdown: the service returned without raising a control signal");
                    self.quit = true;
                }
                Err(err) => {
                    error!("System error: {err}");
                    return Err(err);
                }
            }
        }

        self.logging.reset();
        Ok(())
    }

    pub fn is_shut_down(&self) -> bool {
        self.quit
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn log_facility(&self) -> &F {
        &self.logging
    }
}
