//! Destination resolution.
//!
//! A raw destination string is either name-shaped (contains a `.`) and goes
//! through the network's name service, or it must parse as a well-formed
//! `0x`-prefixed address. Resolution happens once per run, is never cached
//! across runs, and never falls back to a default address.

use std::marker::PhantomData;

use alloy::{
    network::Ethereum,
    primitives::{keccak256, Address, B256},
    providers::Provider,
    transports::Transport,
};
use async_trait::async_trait;
use tracing::debug;

use crate::bindings::{EnsRegistry, EnsResolver};
use crate::chain::{ClientError, ClientRegistry};
use crate::error::SweepError;
use crate::store::NetworkId;

/// A destination fixed for the duration of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDestination {
    pub address: Address,
    /// Whether the address came out of a name lookup. When true, tokens on
    /// networks without a name service must be skipped rather than sent to
    /// an address that network cannot vouch for.
    pub source_was_name: bool,
}

/// Name-to-address lookup capability, available only on networks that
/// support it.
#[async_trait]
pub trait NameService: Send + Sync {
    /// Resolve a (lowercased, trimmed) name. `Ok(None)` means the name has
    /// no address record.
    async fn resolve(&self, name: &str) -> Result<Option<Address>, ClientError>;
}

/// A destination containing a `.` is treated as a name.
pub fn is_name_shaped(raw: &str) -> bool {
    raw.contains('.')
}

/// Cheap front-end gate: name-shaped, or parseable as an address. A passing
/// input can still fail resolution at run time.
pub fn appears_valid(raw: &str) -> bool {
    let trimmed = raw.trim();
    is_name_shaped(trimmed) || parse_address(trimmed).is_ok()
}

fn parse_address(raw: &str) -> Result<Address, SweepError> {
    if !raw.starts_with("0x") {
        return Err(SweepError::InvalidAddress(raw.to_owned()));
    }
    raw.parse::<Address>()
        .map_err(|_| SweepError::InvalidAddress(raw.to_owned()))
}

/// Resolve the raw destination against the given network.
///
/// Called once per run with the run's primary network; any failure here is
/// fatal for the run, because submitting with an unconfident destination is
/// never acceptable.
pub async fn resolve(
    registry: &ClientRegistry,
    raw: &str,
    network: &NetworkId,
) -> Result<ResolvedDestination, SweepError> {
    let trimmed = raw.trim();
    if !is_name_shaped(trimmed) {
        return Ok(ResolvedDestination {
            address: parse_address(trimmed)?,
            source_was_name: false,
        });
    }

    let name = trimmed.to_ascii_lowercase();
    let service =
        registry
            .name_service(network)
            .ok_or_else(|| SweepError::UnresolvedName {
                name: name.clone(),
                network: network.clone(),
                reason: "name resolution not supported on this network".into(),
            })?;

    match service.resolve(&name).await {
        Ok(Some(address)) => {
            debug!(%name, %address, "name resolved");
            Ok(ResolvedDestination {
                address,
                source_was_name: true,
            })
        }
        Ok(None) => Err(SweepError::UnresolvedName {
            name,
            network: network.clone(),
            reason: "no address record".into(),
        }),
        Err(err) => Err(SweepError::UnresolvedName {
            name,
            network: network.clone(),
            reason: err.to_string(),
        }),
    }
}

/// ENS namehash: fold keccak over the labels, rightmost first.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(buf);
    }
    node
}

/// [`NameService`] backed by the on-chain ENS registry: look up the name's
/// resolver, then ask the resolver for the address record.
pub struct EnsService<P, T> {
    provider: P,
    registry: Address,
    _phantom: PhantomData<T>,
}

impl<P, T> EnsService<P, T>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    pub fn new(provider: P, registry: Address) -> Self {
        Self {
            provider,
            registry,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<P, T> NameService for EnsService<P, T>
where
    P: Provider<T, Ethereum> + 'static,
    T: Transport + Clone,
{
    async fn resolve(&self, name: &str) -> Result<Option<Address>, ClientError> {
        let node = namehash(name);

        let registry = EnsRegistry::new(self.registry, &self.provider);
        let resolver = registry
            .resolver(node)
            .call()
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?
            ._0;
        if resolver == Address::ZERO {
            return Ok(None);
        }

        let record = EnsResolver::new(resolver, &self.provider)
            .addr(node)
            .call()
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?
            ._0;
        if record == Address::ZERO {
            Ok(None)
        } else {
            Ok(Some(record))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
