// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Fatal conditions: everything the supervisor does not recognize as a
/// control signal. These propagate out of the supervisor loop unchanged.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("warm restart requested before the service was cold-started")]
    NotLoaded,

    #[error("application failure: {0}")]
    App(String),
}
