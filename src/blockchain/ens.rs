// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ENS reverse resolution (address → primary name).
//!
//! A reverse record is only trusted when the name it returns resolves
//! forward to the same address.

use std::str::FromStr;

use alloy::{
    primitives::{keccak256, Address, B256},
    sol,
};

use super::client::{EthClient, EthClientError, HttpProvider};
use crate::wallet::{NameResolver, WalletError};

// Define the ENS interfaces using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface IEnsRegistry {
        function resolver(bytes32 node) external view returns (address);
    }

    #[sol(rpc)]
    interface IEnsResolver {
        function name(bytes32 node) external view returns (string);
        function addr(bytes32 node) external view returns (address);
    }
}

/// EIP-137 namehash.
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

/// `<lowercase hex without 0x>.addr.reverse`
pub fn reverse_name(address: Address) -> String {
    format!("{}.addr.reverse", alloy::hex::encode(address))
}

/// ENS resolver against the registry of the client's network.
pub struct EnsResolver {
    registry: IEnsRegistry::IEnsRegistryInstance<HttpProvider>,
    provider: HttpProvider,
}

impl EnsResolver {
    pub fn new(client: &EthClient) -> Result<Self, EthClientError> {
        let network = client.network();
        let registry_address = network
            .ens_registry
            .ok_or(EthClientError::NoEnsRegistry(network.name))?;
        let registry_address = Address::from_str(registry_address)
            .map_err(|e| EthClientError::InvalidAddress(e.to_string()))?;

        let provider = client.provider().clone();
        Ok(Self {
            registry: IEnsRegistry::new(registry_address, provider.clone()),
            provider,
        })
    }

    async fn resolver_for(&self, node: B256) -> Result<Option<Address>, EthClientError> {
        let resolver: Address = self
            .registry
            .resolver(node)
            .call()
            .await
            .map_err(|e| EthClientError::ContractError(e.to_string()))?;
        Ok((resolver != Address::ZERO).then_some(resolver))
    }

    /// Primary name of `address`, verified by a forward lookup.
    pub async fn lookup_address(&self, address: Address) -> Result<Option<String>, EthClientError> {
        let reverse_node = namehash(&reverse_name(address));
        let Some(reverse_resolver) = self.resolver_for(reverse_node).await? else {
            return Ok(None);
        };

        let name: String = IEnsResolver::new(reverse_resolver, self.provider.clone())
            .name(reverse_node)
            .call()
            .await
            .map_err(|e| EthClientError::ContractError(e.to_string()))?;
        if name.is_empty() {
            return Ok(None);
        }

        let node = namehash(&name.to_lowercase());
        let Some(forward_resolver) = self.resolver_for(node).await? else {
            return Ok(None);
        };
        let resolved: Address = IEnsResolver::new(forward_resolver, self.provider.clone())
            .addr(node)
            .call()
            .await
            .map_err(|e| EthClientError::ContractError(e.to_string()))?;

        if resolved == address {
            Ok(Some(name))
        } else {
            tracing::debug!(%address, name = %name, "ENS reverse record failed forward check");
            Ok(None)
        }
    }
}

impl NameResolver for EnsResolver {
    async fn resolve_name(&self, address: Address) -> Result<Option<String>, WalletError> {
        Ok(self.lookup_address(address).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{NetworkConfig, ETH_MAINNET};
    use alloy::primitives::b256;

    #[test]
    fn namehash_matches_eip137_vectors() {
        assert_eq!(namehash(""), B256::ZERO);
        assert_eq!(
            namehash("eth"),
            b256!("93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae")
        );
        assert_eq!(
            namehash("foo.eth"),
            b256!("de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f")
        );
    }

    #[test]
    fn reverse_name_is_lowercase_hex() {
        let address: Address = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01".parse().unwrap();
        assert_eq!(
            reverse_name(address),
            "abcdef0123456789abcdef0123456789abcdef01.addr.reverse"
        );
    }

    #[test]
    fn network_without_registry_is_rejected() {
        let network = NetworkConfig {
            name: "Registry-less",
            ens_registry: None,
        };
        let client = EthClient::new(network, "http://127.0.0.1:8545").unwrap();
        assert!(matches!(
            EnsResolver::new(&client),
            Err(EthClientError::NoEnsRegistry("Registry-less"))
        ));

        let mainnet = EthClient::new(ETH_MAINNET, "http://127.0.0.1:8545").unwrap();
        assert!(EnsResolver::new(&mainnet).is_ok());
    }
}
