//! Transfer call construction and the two-phase attempt.

use alloy::primitives::{Address, U256};
use tracing::debug;

use crate::chain::ChainClient;
use crate::store::{Token, TransferResult};

/// Parameters of one ERC-20 `transfer(destination, amount)` call. The same
/// value is used for the dry-run and the real submission, so a successful
/// simulation vouches for exactly what gets broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCall {
    /// The token contract being called.
    pub token: Address,
    /// The sending account.
    pub from: Address,
    /// The resolved destination.
    pub to: Address,
    /// Amount in base units.
    pub amount: U256,
}

impl TransferCall {
    /// Build the call for a token, draining its full discovered balance.
    /// The batch intentionally takes no per-token amount input.
    pub fn for_token(token: &Token, from: Address, to: Address) -> Self {
        Self {
            token: token.contract,
            from,
            to,
            amount: token.raw_balance,
        }
    }
}

/// Run the strictly-ordered simulate-then-submit sequence for one call.
///
/// A call that fails simulation is never submitted; that dry-run is the only
/// cheap way to catch an on-chain revert (paused token, blacklist, missing
/// allowance) before fees are paid. `on_simulated` fires between the two
/// phases so the caller can persist the intermediate status.
pub async fn attempt(
    client: &dyn ChainClient,
    call: &TransferCall,
    on_simulated: impl FnOnce(),
) -> TransferResult {
    if let Err(err) = client.simulate(call).await {
        debug!(token = %call.token, %err, "simulation rejected call");
        return TransferResult::SimulationFailed(err.to_string());
    }
    on_simulated();

    match client.submit(call).await {
        Ok(hash) => TransferResult::Success(hash),
        Err(err) => TransferResult::SubmissionFailed(err.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
