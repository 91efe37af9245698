//! The error taxonomy (spec §7) and the non-fatal reporting channel.
//!
//! Grounded on `splashsurf_lib`'s `ReconstructionError`: a `thiserror`
//! enum with one variant per failure kind, `#[non_exhaustive]` so adding a
//! kind later is not a breaking change for downstream matches.

use thiserror::Error;

/// Fatal and non-fatal failure kinds a simulation step can encounter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SphError {
    /// The smoothing-length Newton iteration did not converge within its
    /// iteration budget. Non-fatal: the driver keeps the last estimate and
    /// reports it through [`SphLog::report`].
    #[error("smoothing-length solve did not converge: {detail}")]
    ConvergenceFailure { detail: String },

    /// A neighbor search hit its bounded collector's capacity before
    /// exhausting the true neighbor set. Non-fatal.
    #[error("neighbor search for particle {particle_id} truncated at capacity {capacity}")]
    NeighborTruncation { particle_id: u64, capacity: usize },

    /// A real particle left the domain through a non-periodic,
    /// non-open boundary, or a mirror ghost's source escaped its own
    /// wall. Fatal: the configuration or the timestep is unsafe.
    #[error("particle {particle_id} violated boundary on axis {axis}")]
    BoundaryViolation { particle_id: u64, axis: usize },

    /// A density, pressure, energy or smoothing length went non-finite or
    /// negative. Fatal.
    #[error("numeric instability in particle {particle_id}: {detail}")]
    NumericInstability { particle_id: u64, detail: String },

    /// A parameter bundle failed cross-field validation at `build()`.
    /// Can only be observed before a simulation ever starts running.
    #[error("invalid configuration: {detail}")]
    ConfigurationError { detail: String },

    /// The Barnes-Hut tree arena exceeded its preallocated capacity.
    /// Non-fatal: the driver grows the arena and retries the build.
    #[error("tree arena overflow: needed at least {needed} nodes, had {capacity}")]
    TreeOverflow { needed: usize, capacity: usize },
}

impl SphError {
    /// Whether this error must abort the simulation (`true`) or can be
    /// absorbed after being reported through [`SphLog`] (`false`).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SphError::BoundaryViolation { .. } | SphError::NumericInstability { .. }
        )
    }
}

/// A non-fatal condition the driver wants surfaced to the host application
/// without aborting the step.
#[derive(Debug)]
pub struct NonFatalReport {
    pub step: u64,
    pub time: f64,
    pub error: SphError,
}

/// The error-reporting channel a host application implements to receive
/// non-fatal conditions. The default implementation simply logs through
/// the `log` facade, matching the rest of the crate's ambient logging.
pub trait SphLog {
    fn report(&mut self, report: NonFatalReport);
}

/// A [`SphLog`] that forwards every report to `log::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSphLog;

impl SphLog for LoggingSphLog {
    fn report(&mut self, report: NonFatalReport) {
        log::warn!(
            "step {} (t={:.6}): {}",
            report.step,
            report.time,
            report.error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_violation_is_fatal() {
        let err = SphError::BoundaryViolation {
            particle_id: 1,
            axis: 0,
        };
        assert!(err.is_fatal());
    }

    #[test]
    fn convergence_failure_is_not_fatal() {
        let err = SphError::ConvergenceFailure {
            detail: "test".to_string(),
        };
        assert!(!err.is_fatal());
    }
}
