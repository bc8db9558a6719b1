// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet session errors.

use crate::blockchain::EthClientError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// Failure reported by the wallet provider. The message is shown to the
    /// user verbatim (e.g. "User rejected the request.").
    #[error("{0}")]
    Provider(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Session storage error: {0}")]
    Store(String),

    #[error("Name resolution failed: {0}")]
    NameResolution(String),
}

impl From<EthClientError> for WalletError {
    fn from(e: EthClientError) -> Self {
        WalletError::NameResolution(e.to_string())
    }
}

impl From<std::io::Error> for WalletError {
    fn from(e: std::io::Error) -> Self {
        WalletError::Store(e.to_string())
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(e: serde_json::Error) -> Self {
        WalletError::Store(e.to_string())
    }
}
