// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

/// EVM network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// ENS registry contract, if the network has one
    pub ens_registry: Option<&'static str>,
}

/// Ethereum mainnet configuration.
///
/// The ENS registry address is the same on mainnet and the public testnets.
pub const ETH_MAINNET: NetworkConfig = NetworkConfig {
    name: "Ethereum Mainnet",
    ens_registry: Some("0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e"),
};
