// Error taxonomies for the sampling engine (agent) and the check plugin.

use thiserror::Error;

/// Failure of a single measurement. The collector isolates these per
/// measurement; only an all-sources failure escalates to [`CollectError`].
#[derive(Debug, Error)]
pub enum SampleError {
    /// Counters did not advance (or the window collapsed to zero), so there
    /// is nothing to divide by. Distinct from a NaN/Inf sneaking downstream.
    #[error("counters did not advance over the sampling window ({what})")]
    InsufficientDelta { what: &'static str },

    /// The OS reader or external command behind a counter source failed.
    /// `origin` names the reader, not a chained error (thiserror reserves
    /// the name `source` for that).
    #[error("{origin} unavailable: {reason}")]
    SourceUnavailable { origin: &'static str, reason: String },

    /// A numeric field in a counter row did not parse. Reported per row; the
    /// remaining rows of the same dump stay valid.
    #[error("malformed counter row from {origin}: {row:?}")]
    MalformedCounterRow { origin: &'static str, row: String },

    /// A row key was present in only one of the two snapshots. Such rows are
    /// dropped from the rate result; this value is what gets logged.
    #[error("counter row {key:?} present on only one side of the sampling window")]
    RowSetMismatch { key: String },
}

/// All five measurements of a collection cycle failed. A partially failed
/// cycle still yields a snapshot; this is only for the all-or-nothing case.
#[derive(Debug, Error)]
#[error("all measurements failed: {summary}")]
pub struct CollectError {
    pub summary: String,
}

impl CollectError {
    pub fn new(errors: &[SampleError]) -> Self {
        let summary = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self { summary }
    }
}

/// Check-plugin failures. Every variant maps to an UNKNOWN verdict with the
/// error's one-line message as the diagnostic.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A required flag was missing or out of range; raised before any
    /// network call is made.
    #[error("{0}")]
    InvalidArguments(String),

    /// The request to the agent exceeded the configured timeout.
    #[error("request to agent timed out")]
    Timeout,

    /// Connection failure, unexpected status, or an unparseable body.
    #[error("transport error: {0}")]
    Transport(String),

    /// The agent answered with its `{error}` shape (non-200).
    #[error("agent reported: {0}")]
    Agent(String),

    #[error("could not find peer with index {0}")]
    PeerNotFound(u8),

    #[error("could not find device {0}")]
    InterfaceNotFound(String),

    /// A peer row carries an internal address whose final octet is not a
    /// base-10 number in 0-255. Data-source drift, reported rather than
    /// skipped.
    #[error("peer address {addr:?} has a non-numeric or out-of-range final octet")]
    MalformedPeerAddress { addr: String },

    /// Two peers share the same final octet; peer addressing is ambiguous.
    #[error("peers {first:?} and {second:?} share final octet {key}")]
    DuplicatePeerKey {
        first: String,
        second: String,
        key: u8,
    },
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn sample_errors_name_the_failing_reader() {
        let err = SampleError::SourceUnavailable {
            origin: "/proc/stat",
            reason: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "/proc/stat unavailable: permission denied");
        assert!(err.source().is_none());

        let err = SampleError::MalformedCounterRow {
            origin: "wg dump",
            row: "not\ta\tpeer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed counter row from wg dump: \"not\\ta\\tpeer\""
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn collect_error_joins_every_failure() {
        let err = CollectError::new(&[
            SampleError::InsufficientDelta { what: "cpu ticks" },
            SampleError::SourceUnavailable {
                origin: "wg dump",
                reason: "timed out after 5s".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "all measurements failed: counters did not advance over the sampling window (cpu ticks); wg dump unavailable: timed out after 5s"
        );
    }
}
