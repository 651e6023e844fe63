//! Per-network execution clients.
//!
//! A [`ChainClient`] exposes the two capabilities a sweep needs: a dry-run
//! `simulate` that spends nothing, and a `submit` that signs-and-broadcasts
//! through the provider's wallet and returns the transaction hash without
//! waiting for confirmation. [`ClientRegistry`] maps network identifiers to
//! clients; acquisition is pure lookup, no retry.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use alloy::{
    network::Ethereum,
    primitives::TxHash,
    providers::Provider,
    transports::Transport,
};
use async_trait::async_trait;
use thiserror::Error;

use crate::bindings::IERC20;
use crate::calls::TransferCall;
use crate::error::SweepError;
use crate::resolve::NameService;
use crate::store::NetworkId;

/// A failed client call, with the underlying reason flattened to text for
/// per-token outcome reporting.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The dry-run reverted or the client rejected the call.
    #[error("call reverted: {0}")]
    Reverted(String),

    /// Broadcast, signer, or transport failure.
    #[error("rpc error: {0}")]
    Rpc(String),
}

/// Execution capability for one network.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Dry-run the transfer against current chain state. No state change,
    /// no fees. An error here means the real call would revert.
    async fn simulate(&self, call: &TransferCall) -> Result<(), ClientError>;

    /// Sign and broadcast the transfer, returning the transaction hash as
    /// soon as the node accepts it. Confirmation is not awaited.
    async fn submit(&self, call: &TransferCall) -> Result<TxHash, ClientError>;
}

/// [`ChainClient`] backed by an alloy provider whose wallet filler holds the
/// sending account's signer.
pub struct RpcClient<P, T> {
    provider: P,
    _phantom: PhantomData<T>,
}

impl<P, T> RpcClient<P, T>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<P, T> ChainClient for RpcClient<P, T>
where
    P: Provider<T, Ethereum> + 'static,
    T: Transport + Clone,
{
    async fn simulate(&self, call: &TransferCall) -> Result<(), ClientError> {
        let token = IERC20::new(call.token, &self.provider);
        let ok = token
            .transfer(call.to, call.amount)
            .from(call.from)
            .call()
            .await
            .map_err(|e| ClientError::Reverted(e.to_string()))?
            ._0;

        // Some ERC-20s signal failure by returning false instead of
        // reverting; treat that the same as a revert.
        if ok {
            Ok(())
        } else {
            Err(ClientError::Reverted("transfer returned false".into()))
        }
    }

    async fn submit(&self, call: &TransferCall) -> Result<TxHash, ClientError> {
        let token = IERC20::new(call.token, &self.provider);
        let pending = token
            .transfer(call.to, call.amount)
            .from(call.from)
            .send()
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?;

        Ok(*pending.tx_hash())
    }
}

/// Registered execution clients and optional name services, one per network.
#[derive(Default)]
pub struct ClientRegistry {
    clients: HashMap<NetworkId, Arc<dyn ChainClient>>,
    name_services: HashMap<NetworkId, Arc<dyn NameService>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, network: NetworkId, client: Arc<dyn ChainClient>) -> &mut Self {
        self.clients.insert(network, client);
        self
    }

    pub fn register_name_service(
        &mut self,
        network: NetworkId,
        service: Arc<dyn NameService>,
    ) -> &mut Self {
        self.name_services.insert(network, service);
        self
    }

    pub fn client(&self, network: &NetworkId) -> Result<&Arc<dyn ChainClient>, SweepError> {
        self.clients
            .get(network)
            .ok_or_else(|| SweepError::UnsupportedNetwork(network.clone()))
    }

    pub fn name_service(&self, network: &NetworkId) -> Option<&Arc<dyn NameService>> {
        self.name_services.get(network)
    }

    /// Whether a name resolved elsewhere can be trusted for this network.
    pub fn supports_names(&self, network: &NetworkId) -> bool {
        self.name_services.contains_key(network)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
