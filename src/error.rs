//! Fatal run errors.
//!
//! Everything here aborts a run before any value can move: either the
//! destination cannot be determined with confidence, or a lookup that must
//! succeed did not. Per-token failures are never errors -- they are captured
//! as that token's [`crate::store::TransferResult`] and the loop continues.

use thiserror::Error;

use crate::store::NetworkId;

#[derive(Debug, Error)]
pub enum SweepError {
    /// No client is registered for the requested network.
    #[error("no client configured for network `{0}`")]
    UnsupportedNetwork(NetworkId),

    /// The destination is not name-shaped and fails address validation.
    #[error("destination `{0}` is not a valid address")]
    InvalidAddress(String),

    /// The destination name could not be resolved on the run's primary
    /// network. An unresolved destination never falls back to a default
    /// address, so the whole run aborts.
    #[error("could not resolve `{name}` on network `{network}`: {reason}")]
    UnresolvedName {
        name: String,
        network: NetworkId,
        reason: String,
    },
}
