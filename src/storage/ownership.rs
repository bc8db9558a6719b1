// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Creator checks for topic mutations.
//!
//! Identity is the address the caller *claims* in the request body. Nothing
//! here proves control of that address (no signature is checked); the check
//! only prevents a well-behaved client from editing someone else's topic.

use crate::models::Topic;

/// Trait for resources that record the address that created them.
pub trait OwnedResource {
    /// The stored creator address, as written at creation time.
    fn creator_address(&self) -> &str;
}

impl OwnedResource for Topic {
    fn creator_address(&self) -> &str {
        &self.creator_address
    }
}

/// Trait for enforcing creator-only access.
pub trait OwnershipEnforcer {
    /// Whether `claimed` names the creator, ignoring letter case.
    fn is_created_by(&self, claimed: &str) -> bool;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn is_created_by(&self, claimed: &str) -> bool {
        addresses_match(self.creator_address(), claimed)
    }
}

/// Case-insensitive address equality.
///
/// Both sides are lowercased in full (not just ASCII) so the comparison
/// agrees with how clients normalise arbitrary strings.
pub fn addresses_match(stored: &str, claimed: &str) -> bool {
    stored.to_lowercase() == claimed.to_lowercase()
}
