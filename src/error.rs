//! Invocation-level errors.
//!
//! The engine core is total: a malformed lead or an empty roster becomes a
//! per-item failure inside the batch result, never an error. The only
//! errors surfaced here are caller-fixable ones raised before any work
//! starts, such as an unrecognized strategy name on the wire.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeadrouteError {
    /// The caller asked for a strategy this engine doesn't implement.
    #[error("unknown assignment strategy '{name}', expected one of: round_robin, workload, territory")]
    InvalidStrategy { name: String },
}
