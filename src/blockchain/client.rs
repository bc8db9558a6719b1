// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only JSON-RPC client for an EVM chain.

use alloy::{network::Ethereum, providers::RootProvider};

use super::types::NetworkConfig;

/// Plain HTTP provider: no fillers, reads only.
pub type HttpProvider = RootProvider<Ethereum>;

/// Read-only chain client.
#[derive(Clone)]
pub struct EthClient {
    network: NetworkConfig,
    provider: HttpProvider,
}

impl EthClient {
    /// Create a client for `network` reached through `rpc_url`.
    pub fn new(network: NetworkConfig, rpc_url: &str) -> Result<Self, EthClientError> {
        let provider = connect_http(rpc_url)?;
        Ok(Self { network, provider })
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn provider(&self) -> &HttpProvider {
        &self.provider
    }
}

/// Build an HTTP provider for `rpc_url`.
pub fn connect_http(rpc_url: &str) -> Result<HttpProvider, EthClientError> {
    let url: url::Url = rpc_url
        .parse()
        .map_err(|e: url::ParseError| EthClientError::InvalidRpcUrl(e.to_string()))?;
    Ok(RootProvider::new_http(url))
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum EthClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Network {0} has no ENS registry")]
    NoEnsRegistry(&'static str),
}
