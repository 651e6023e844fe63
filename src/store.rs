//! Selection state: the discovered tokens, which of them the user checked,
//! and the per-token transfer progress written back as a run advances.
//!
//! The store is owned by the caller and handed to the orchestrator per run;
//! the orchestrator reads a snapshot of the checked set and writes statuses
//! back through [`SelectionStore::mark`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use alloy::primitives::{Address, TxHash, U256};

/// Identifier for a configured network, e.g. `eth` or `bsc`.
///
/// Networks are registered at runtime (from configuration), not enumerated
/// in code; adding one is a registration, not a new match arm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId(String);

impl NetworkId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A discovered token balance. Immutable once inserted; identity is the
/// `(network, contract)` pair -- the same contract address on two networks
/// is a distinct entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub network: NetworkId,
    pub contract: Address,
    pub ticker: String,
    /// Balance in base units. The sweep always drains the full balance.
    pub raw_balance: U256,
    pub decimals: u8,
}

/// Transfer progress for one token. Transitions are forward-only:
/// `NotStarted -> Simulated -> Submitted`, or `Failed` from any state
/// before `Submitted`. A broadcast transaction is irrevocable, so nothing
/// moves out of `Submitted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    NotStarted,
    Simulated,
    Submitted(TxHash),
    Failed(String),
}

impl TokenStatus {
    fn accepts(&self, next: &TokenStatus) -> bool {
        matches!(
            (self, next),
            (TokenStatus::NotStarted, TokenStatus::Simulated)
                | (TokenStatus::NotStarted, TokenStatus::Failed(_))
                | (TokenStatus::Simulated, TokenStatus::Submitted(_))
                | (TokenStatus::Simulated, TokenStatus::Failed(_))
        )
    }
}

/// The user's selection flag plus transfer progress for one token, keyed by
/// contract address in the store.
#[derive(Debug, Clone)]
pub struct CheckedRecord {
    pub network: NetworkId,
    pub is_checked: bool,
    pub status: TokenStatus,
}

/// Why a token was skipped without any client call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No client registered for the token's network.
    UnsupportedNetwork,
    /// Destination came from a name, and the token's network has no name
    /// service to vouch for it.
    UnsupportedResolution,
    /// The run was cancelled before this token was reached.
    Cancelled,
}

/// Result of processing one token within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferResult {
    Success(TxHash),
    SimulationFailed(String),
    SubmissionFailed(String),
    Skipped(SkipReason),
}

impl TransferResult {
    /// Status to persist for this result. Skips leave the record untouched:
    /// the token was never attempted.
    pub fn to_status(&self) -> Option<TokenStatus> {
        match self {
            TransferResult::Success(hash) => Some(TokenStatus::Submitted(*hash)),
            TransferResult::SimulationFailed(reason)
            | TransferResult::SubmissionFailed(reason) => {
                Some(TokenStatus::Failed(reason.clone()))
            }
            TransferResult::Skipped(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransferResult::Success(_))
    }
}

/// One token's outcome; a run's aggregate result is the ordered list of
/// these, one per checked de-duplicated token at run start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub token: Token,
    pub result: TransferResult,
}

/// Candidate tokens plus checked/status records.
///
/// Tokens keep insertion order; that order is the processing order of a run.
/// Records are keyed by contract address, carrying the network they were
/// discovered on.
#[derive(Debug, Default)]
pub struct SelectionStore {
    tokens: Vec<Token>,
    records: HashMap<Address, CheckedRecord>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a discovered token. The record starts unchecked and `NotStarted`.
    pub fn insert(&mut self, token: Token) {
        self.records
            .entry(token.contract)
            .or_insert_with(|| CheckedRecord {
                network: token.network.clone(),
                is_checked: false,
                status: TokenStatus::NotStarted,
            });
        self.tokens.push(token);
    }

    /// Toggle the user's selection flag. Unknown addresses are ignored.
    pub fn set_checked(&mut self, contract: Address, checked: bool) {
        if let Some(record) = self.records.get_mut(&contract) {
            record.is_checked = checked;
        }
    }

    pub fn checked_count(&self) -> usize {
        self.records.values().filter(|r| r.is_checked).count()
    }

    /// Snapshot of the checked tokens in selection order, de-duplicated by
    /// `(network, contract)`. A run iterates this snapshot, so toggles made
    /// after the run starts do not affect it.
    pub fn checked_tokens(&self) -> Vec<Token> {
        let mut seen = HashSet::new();
        self.tokens
            .iter()
            .filter(|token| {
                self.records
                    .get(&token.contract)
                    .is_some_and(|r| r.is_checked && r.network == token.network)
            })
            .filter(|token| seen.insert((token.network.clone(), token.contract)))
            .cloned()
            .collect()
    }

    /// Advance a record's status. Backward or skipping transitions are
    /// rejected; returns whether the write took effect.
    pub fn mark(&mut self, contract: &Address, status: TokenStatus) -> bool {
        match self.records.get_mut(contract) {
            Some(record) if record.status.accepts(&status) => {
                record.status = status;
                true
            }
            _ => false,
        }
    }

    pub fn status(&self, contract: &Address) -> Option<&TokenStatus> {
        self.records.get(contract).map(|r| &r.status)
    }

    /// Drop everything. Called when the wallet disconnects or the account's
    /// network changes; discovery starts over afterwards.
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.records.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
