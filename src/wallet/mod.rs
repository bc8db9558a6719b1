// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet session management.
//!
//! This module provides:
//! - [`WalletSession`]: connect, disconnect, and restore a wallet connection
//! - [`WalletProvider`]: the wallet capabilities a session needs
//! - [`NameResolver`]: best-effort display names for addresses
//! - [`SessionStore`]: durable storage for the last connected address

pub mod error;
pub mod provider;
pub mod resolver;
pub mod session;
pub mod store;

pub use error::WalletError;
pub use provider::{AccountPoller, RpcWalletProvider, WalletProvider};
pub use resolver::{NameResolver, NoNameResolver};
pub use session::{SessionSnapshot, WalletSession};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, PERSISTED_ADDRESS_KEY};
