// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Session
//!
//! Connection state for one wallet: the connected address, a connected
//! flag, the last user-facing error, and a display name resolved for the
//! address.
//!
//! ## State Machine
//!
//! ```text
//! Disconnected --connect()--> Connecting --accounts--> Connected(a)
//! Connected(a) --disconnect() / empty accounts--> Disconnected
//! Connected(a) --accounts changed to [b, ..]--> Connected(b)
//! ```
//!
//! `error` is orthogonal to the state: set on failure paths and cleared when
//! a connect attempt starts.
//!
//! ## Superseded Actions
//!
//! Actions may interleave (a start-up reconnect racing a user connect, a
//! disconnect while a connect awaits approval). Every state change advances
//! an epoch; async work captures the epoch when it starts and commits only if
//! it is still current. A disconnect therefore cannot be undone by a connect
//! that was already in flight, and a display name never lands on an address
//! it was not resolved for.

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::Address;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{NameResolver, SessionStore, WalletError, WalletProvider, PERSISTED_ADDRESS_KEY};

/// Shown when connect() is called without a wallet provider.
pub const PROVIDER_NOT_FOUND: &str = "No Ethereum provider found. Please install MetaMask.";

/// Shown when the wallet authorizes zero accounts.
pub const NO_ADDRESSES: &str = "No addresses available";

/// Used when a provider failure carries no message.
pub const CONNECT_FAILED: &str = "Failed to connect wallet";

/// Read-only view of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub address: Option<Address>,
    pub is_connected: bool,
    pub error: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    address: Option<Address>,
    is_connected: bool,
    error: Option<String>,
    display_name: Option<String>,
    epoch: u64,
}

impl SessionState {
    fn clear_connection(&mut self) {
        self.address = None;
        self.is_connected = false;
        self.display_name = None;
    }

    fn adopt(&mut self, address: Address) {
        if self.address != Some(address) {
            self.display_name = None;
        }
        self.address = Some(address);
        self.is_connected = true;
    }
}

/// Wallet session manager.
///
/// Provider detection happens once, at construction: `provider` is `None`
/// when no wallet was found, and stays that way for the session's lifetime.
pub struct WalletSession<P, R, S> {
    provider: Option<P>,
    resolver: R,
    store: S,
    state: Mutex<SessionState>,
}

impl<P, R, S> WalletSession<P, R, S>
where
    P: WalletProvider,
    R: NameResolver,
    S: SessionStore,
{
    pub fn new(provider: Option<P>, resolver: R, store: S) -> Self {
        Self {
            provider,
            resolver,
            store,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Build a session and restore a persisted connection when a provider
    /// is present.
    pub async fn initialize(provider: Option<P>, resolver: R, store: S) -> Self {
        let session = Self::new(provider, resolver, store);
        if session.is_provider_available() {
            session.auto_reconnect().await;
        }
        session
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_provider_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            address: state.address,
            is_connected: state.is_connected,
            error: state.error.clone(),
            display_name: state.display_name.clone(),
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.lock().address
    }

    pub fn is_connected(&self) -> bool {
        self.lock().is_connected
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn display_name(&self) -> Option<String> {
        self.lock().display_name.clone()
    }

    /// Ask the wallet for accounts and connect the first one.
    ///
    /// Never fails: problems are reported through [`Self::error`].
    pub async fn connect(&self) {
        let Some(provider) = self.provider.as_ref() else {
            self.lock().error = Some(PROVIDER_NOT_FOUND.to_string());
            return;
        };

        let epoch = {
            let mut state = self.lock();
            state.error = None;
            state.epoch += 1;
            state.epoch
        };

        let accounts = provider.request_accounts().await;

        let address = {
            let mut state = self.lock();
            if state.epoch != epoch {
                debug!("Discarding superseded connect result");
                return;
            }
            match accounts {
                Ok(accounts) => match accounts.first().copied() {
                    Some(address) => {
                        state.adopt(address);
                        self.persist_address(address);
                        address
                    }
                    // An existing connection is left in place
                    None => {
                        state.error = Some(NO_ADDRESSES.to_string());
                        return;
                    }
                },
                Err(e) => {
                    let message = e.to_string();
                    warn!(error = %message, "Wallet connect failed");
                    state.error = Some(if message.is_empty() {
                        CONNECT_FAILED.to_string()
                    } else {
                        message
                    });
                    state.clear_connection();
                    return;
                }
            }
        };

        info!(%address, "Wallet connected");
        self.refresh_display_name(epoch, address).await;
    }

    /// Forget the connection locally. The provider is not notified.
    pub fn disconnect(&self) {
        let mut state = self.lock();
        state.epoch += 1;
        state.clear_connection();
        state.error = None;
        self.forget_persisted_address();
    }

    /// Restore a connection persisted by an earlier run without prompting.
    ///
    /// Failures are not surfaced: the stale entry is dropped and the session
    /// stays disconnected.
    pub async fn auto_reconnect(&self) {
        let Some(provider) = self.provider.as_ref() else {
            return;
        };

        let persisted = match self.store.get(PERSISTED_ADDRESS_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Could not read persisted wallet address; dropping it");
                let _state = self.lock();
                self.forget_persisted_address();
                return;
            }
        };

        // A user action started after this point supersedes the reconnect.
        let epoch = self.lock().epoch;

        let outcome = match Address::from_str(&persisted) {
            Ok(stored) => provider
                .authorized_accounts()
                .await
                .map(|accounts| (stored, accounts.first().copied())),
            Err(e) => Err(WalletError::InvalidAddress(e.to_string())),
        };

        match outcome {
            Ok((stored, Some(address))) => {
                {
                    let mut state = self.lock();
                    if state.epoch != epoch {
                        return;
                    }
                    state.adopt(address);
                    if address != stored {
                        self.persist_address(address);
                    }
                }
                info!(%address, "Wallet reconnected");
                self.refresh_display_name(epoch, address).await;
            }
            Ok((_, None)) => {
                debug!("Persisted wallet is no longer authorized");
                self.forget_if_current(epoch);
            }
            Err(e) => {
                debug!(error = %e, "Wallet reconnect failed");
                self.forget_if_current(epoch);
            }
        }
    }

    /// React to the provider reporting a new authorized-account set.
    pub async fn handle_accounts_changed(&self, accounts: &[Address]) {
        let Some(&primary) = accounts.first() else {
            info!("Wallet reported no accounts; disconnecting");
            self.disconnect();
            return;
        };

        let epoch = {
            let mut state = self.lock();
            if !state.is_connected || state.address == Some(primary) {
                return;
            }
            state.epoch += 1;
            state.adopt(primary);
            self.persist_address(primary);
            state.epoch
        };

        info!(address = %primary, "Wallet account switched");
        self.refresh_display_name(epoch, primary).await;
    }

    /// Apply account-change notifications until `shutdown` fires.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(session.clone().run_account_listener(shutdown.clone()));
    /// ```
    pub async fn run_account_listener(self: Arc<Self>, shutdown: CancellationToken) {
        let Some(provider) = self.provider.as_ref() else {
            return;
        };
        let mut changes = provider.subscribe_account_changes();

        loop {
            tokio::select! {
                change = changes.recv() => match change {
                    Ok(accounts) => self.handle_accounts_changed(&accounts).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Missed wallet account notifications");
                    }
                    Err(RecvError::Closed) => return,
                },
                _ = shutdown.cancelled() => return,
            }
        }
    }

    /// Best-effort name lookup. Failures leave the name empty.
    async fn refresh_display_name(&self, epoch: u64, address: Address) {
        let name = match self.resolver.resolve_name(address).await {
            Ok(name) => name,
            Err(e) => {
                debug!(error = %e, %address, "Display name lookup failed");
                None
            }
        };

        let mut state = self.lock();
        if state.epoch == epoch && state.address == Some(address) {
            state.display_name = name;
        }
    }

    // Store writes happen with the state lock held, so they are ordered with
    // the epoch checks and a superseded action cannot write after disconnect.
    fn persist_address(&self, address: Address) {
        if let Err(e) = self.store.set(PERSISTED_ADDRESS_KEY, &address.to_string()) {
            warn!(error = %e, "Could not persist wallet address");
        }
    }

    fn forget_persisted_address(&self) {
        if let Err(e) = self.store.remove(PERSISTED_ADDRESS_KEY) {
            warn!(error = %e, "Could not remove persisted wallet address");
        }
    }

    fn forget_if_current(&self, epoch: u64) {
        let state = self.lock();
        if state.epoch == epoch {
            self.forget_persisted_address();
        }
    }
}
