//! Batch transfer of selected ERC-20 balances to a single destination.
//!
//! The crate is the orchestration engine only: it takes an already-discovered
//! token selection, resolves the destination (raw address or name) once per
//! run, dry-runs every transfer before broadcasting it, paces consecutive
//! submissions, and records a per-token outcome so one bad token never blocks
//! the rest of the batch. Balance discovery, wallet sessions, and signing
//! live outside, behind the provider and the caller.

pub mod bindings;
pub mod calls;
pub mod chain;
pub mod config;
pub mod error;
pub mod limiter;
pub mod resolve;
pub mod store;
pub mod sweep;

pub use calls::TransferCall;
pub use chain::{ChainClient, ClientError, ClientRegistry, RpcClient};
pub use config::{Config, ConfigError, NetworkConfig};
pub use error::SweepError;
pub use limiter::RateLimiter;
pub use resolve::{appears_valid, namehash, EnsService, NameService, ResolvedDestination};
pub use store::{
    CheckedRecord, NetworkId, SelectionStore, SkipReason, Token, TokenStatus, TransferOutcome,
    TransferResult,
};
pub use sweep::{CancelHandle, IdleReason, SweepRun, Sweeper};
