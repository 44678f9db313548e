// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// A deliberate lifecycle request raised by the running service.
///
/// Control signals are not errors. They carry no payload beyond their tag
/// and are always handled by the supervisor itself, never propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Re-initialize the application without terminating the host process.
    Restart,
    /// Terminate the host process cleanly.
    Shutdown,
}

/// How a single supervised run of the service ended, on the success path.
///
/// A fatal error is the `Err` side of `Result<RunOutcome, ServerError>` and
/// never appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The service raised an explicit control signal.
    Signal(ControlSignal),
    /// The service's entry point returned without raising a signal.
    ///
    /// A supervised service is expected to run until it requests a
    /// transition, so the supervisor treats this as anomalous.
    Silent,
}
