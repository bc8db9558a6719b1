// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::future::Future;

use alloy::primitives::Address;

use super::WalletError;

/// Looks up a human-readable display name for an account.
pub trait NameResolver: Send + Sync {
    /// `Ok(None)` when the address has no (verified) name.
    fn resolve_name(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<Option<String>, WalletError>> + Send;
}

/// Resolver that never finds a name. For sessions without a chain endpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNameResolver;

impl NameResolver for NoNameResolver {
    async fn resolve_name(&self, _address: Address) -> Result<Option<String>, WalletError> {
        Ok(None)
    }
}
