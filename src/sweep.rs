//! The sweep orchestrator.
//!
//! One run: validate preconditions, resolve the destination once, walk the
//! checked tokens in selection order, simulate-then-submit each against its
//! network's client with a rate-limit pause in between, and collect one
//! outcome per token. A single token's failure never stops the batch; only
//! an unresolvable destination aborts it, and that happens before any
//! network call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::Address;
use tracing::{info, warn};

use crate::calls::{attempt, TransferCall};
use crate::chain::ClientRegistry;
use crate::error::SweepError;
use crate::limiter::RateLimiter;
use crate::resolve::{self, ResolvedDestination};
use crate::store::{
    SelectionStore, SkipReason, Token, TokenStatus, TransferOutcome, TransferResult,
};

/// Shared cancellation flag. Cancelling takes effect between tokens: the
/// token in flight finishes and keeps its result, unreached tokens are
/// skipped. A broadcast transaction cannot be recalled.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a run never left idle. Not an error; there was simply nothing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleReason {
    /// No connected signing account.
    NoSigner,
    /// No checked token in the selection.
    NothingChecked,
}

/// Result of one run.
#[derive(Debug)]
pub enum SweepRun {
    NotStarted(IdleReason),
    /// One outcome per checked de-duplicated token, in processing order.
    Completed(Vec<TransferOutcome>),
}

/// Drives batches of transfers. Holds only the registered clients and the
/// pacing policy; selection state is passed in per run by the caller.
pub struct Sweeper {
    registry: ClientRegistry,
    limiter: RateLimiter,
}

impl Sweeper {
    pub fn new(registry: ClientRegistry, limiter: RateLimiter) -> Self {
        Self { registry, limiter }
    }

    /// Run one batch against the checked tokens in `store`, sending every
    /// selected balance to `destination`.
    ///
    /// The destination is resolved exactly once, against the primary network
    /// (the network of the first checked token); a failure there aborts the
    /// run before any simulate or submit happens. Per-token failures are
    /// recorded in the returned outcomes and in the store's records.
    pub async fn run(
        &self,
        store: &mut SelectionStore,
        destination: &str,
        account: Option<Address>,
        cancel: &CancelHandle,
    ) -> Result<SweepRun, SweepError> {
        let Some(from) = account else {
            info!("no signer connected, nothing to do");
            return Ok(SweepRun::NotStarted(IdleReason::NoSigner));
        };

        let batch = store.checked_tokens();
        if batch.is_empty() {
            info!("no tokens checked, nothing to do");
            return Ok(SweepRun::NotStarted(IdleReason::NothingChecked));
        }

        let primary = batch[0].network.clone();
        info!(%destination, network = %primary, tokens = batch.len(), "resolving destination");
        let dest = resolve::resolve(&self.registry, destination, &primary).await?;
        info!(address = %dest.address, from_name = dest.source_was_name, "destination fixed");

        let mut outcomes = Vec::with_capacity(batch.len());
        for (i, token) in batch.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(token = %token.ticker, "run cancelled, skipping remainder");
                outcomes.push(TransferOutcome {
                    token: token.clone(),
                    result: TransferResult::Skipped(SkipReason::Cancelled),
                });
                continue;
            }

            if i > 0 {
                self.limiter.wait().await;
            }

            outcomes.push(self.process(store, token, &dest, from).await);
        }

        let sent = outcomes.iter().filter(|o| o.result.is_success()).count();
        info!(total = outcomes.len(), sent, "batch complete");
        Ok(SweepRun::Completed(outcomes))
    }

    async fn process(
        &self,
        store: &mut SelectionStore,
        token: &Token,
        dest: &ResolvedDestination,
        from: Address,
    ) -> TransferOutcome {
        let result = self.attempt_one(store, token, dest, from).await;

        if let Some(status) = result.to_status() {
            store.mark(&token.contract, status);
        }

        match &result {
            TransferResult::Success(hash) => {
                info!(token = %token.ticker, network = %token.network, %hash, "transfer submitted");
            }
            TransferResult::SimulationFailed(reason) => {
                warn!(token = %token.ticker, network = %token.network, %reason, "simulation failed");
            }
            TransferResult::SubmissionFailed(reason) => {
                warn!(token = %token.ticker, network = %token.network, %reason, "submission failed");
            }
            TransferResult::Skipped(reason) => {
                info!(token = %token.ticker, network = %token.network, ?reason, "skipped");
            }
        }

        TransferOutcome {
            token: token.clone(),
            result,
        }
    }

    async fn attempt_one(
        &self,
        store: &mut SelectionStore,
        token: &Token,
        dest: &ResolvedDestination,
        from: Address,
    ) -> TransferResult {
        // A name-derived address is only trustworthy on networks that carry
        // the name service; anywhere else the token is skipped, never sent.
        if dest.source_was_name && !self.registry.supports_names(&token.network) {
            return TransferResult::Skipped(SkipReason::UnsupportedResolution);
        }

        let client = match self.registry.client(&token.network) {
            Ok(client) => Arc::clone(client),
            Err(_) => return TransferResult::Skipped(SkipReason::UnsupportedNetwork),
        };

        let call = TransferCall::for_token(token, from, dest.address);
        attempt(client.as_ref(), &call, || {
            store.mark(&token.contract, TokenStatus::Simulated);
        })
        .await
    }
}
