// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Provider
//!
//! The session talks to a wallet through [`WalletProvider`], the three
//! EIP-1193 capabilities it needs: request accounts (may prompt), read
//! authorized accounts (never prompts), and observe account changes.
//!
//! [`RpcWalletProvider`] reaches a wallet that exposes its EIP-1193 interface
//! as JSON-RPC over HTTP (desktop wallets commonly serve one on localhost).
//! HTTP has no push channel, so `accountsChanged` is synthesised by
//! [`AccountPoller`], which polls `eth_accounts` and broadcasts every change.

use std::future::Future;
use std::time::Duration;

use alloy::{primitives::Address, providers::Provider, transports::TransportError};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::WalletError;
use crate::blockchain::{connect_http, HttpProvider};

/// Default interval between `eth_accounts` polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Buffered account-change notifications per subscriber.
const ACCOUNT_CHANGE_CAPACITY: usize = 16;

/// Wallet capabilities used by the session manager.
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet to authorize accounts (`eth_requestAccounts`). May wait
    /// for the user to approve.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send;

    /// Accounts already authorized for this client (`eth_accounts`).
    fn authorized_accounts(
        &self,
    ) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send;

    /// Stream of authorized-account sets, one item per change.
    fn subscribe_account_changes(&self) -> broadcast::Receiver<Vec<Address>>;
}

/// Wallet reached over JSON-RPC HTTP.
pub struct RpcWalletProvider {
    provider: HttpProvider,
    changes: broadcast::Sender<Vec<Address>>,
}

impl RpcWalletProvider {
    pub fn new(rpc_url: &str) -> Result<Self, WalletError> {
        let provider = connect_http(rpc_url).map_err(|e| WalletError::Provider(e.to_string()))?;
        let (changes, _) = broadcast::channel(ACCOUNT_CHANGE_CAPACITY);
        Ok(Self { provider, changes })
    }

    /// Poller feeding this provider's account-change stream.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(provider.account_poller().run(shutdown.clone()));
    /// ```
    pub fn account_poller(&self) -> AccountPoller {
        AccountPoller {
            provider: self.provider.clone(),
            changes: self.changes.clone(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WalletProvider for RpcWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        fetch_accounts(&self.provider, "eth_requestAccounts").await
    }

    async fn authorized_accounts(&self) -> Result<Vec<Address>, WalletError> {
        fetch_accounts(&self.provider, "eth_accounts").await
    }

    fn subscribe_account_changes(&self) -> broadcast::Receiver<Vec<Address>> {
        self.changes.subscribe()
    }
}

async fn fetch_accounts(
    provider: &HttpProvider,
    method: &'static str,
) -> Result<Vec<Address>, WalletError> {
    provider
        .raw_request::<_, Vec<Address>>(method.into(), ())
        .await
        .map_err(provider_error)
}

/// Prefer the wallet's own message ("User rejected the request.") over the
/// transport's wrapping of it.
fn provider_error(e: TransportError) -> WalletError {
    let message = e
        .as_error_resp()
        .map(|payload| payload.message.to_string())
        .unwrap_or_else(|| e.to_string());
    WalletError::Provider(message)
}

/// Background task that turns `eth_accounts` polling into change events.
pub struct AccountPoller {
    provider: HttpProvider,
    changes: broadcast::Sender<Vec<Address>>,
    poll_interval: Duration,
}

impl AccountPoller {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run the poller loop until the cancellation token is triggered.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_ms = self.poll_interval.as_millis() as u64,
            "Wallet account poller starting"
        );

        let mut last_seen = None;
        loop {
            if shutdown.is_cancelled() {
                info!("Wallet account poller shutting down");
                return;
            }

            self.poll_step(&mut last_seen).await;

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Wallet account poller shutting down");
                    return;
                }
            }
        }
    }

    /// Poll once and broadcast if the account set differs from `last_seen`.
    ///
    /// The first successful poll only records a baseline.
    async fn poll_step(&self, last_seen: &mut Option<Vec<Address>>) {
        let accounts = match fetch_accounts(&self.provider, "eth_accounts").await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!(error = %e, "Wallet account poll failed");
                return;
            }
        };

        let changed = matches!(last_seen.as_ref(), Some(previous) if *previous != accounts);
        if changed {
            debug!(count = accounts.len(), "Wallet accounts changed");
            // No subscribers is fine: nobody is listening yet.
            let _ = self.changes.send(accounts.clone());
        }
        *last_seen = Some(accounts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Minimal EIP-1193-over-HTTP wallet.
    #[derive(Default)]
    struct MockWallet {
        accounts: Vec<String>,
        reject_requests: bool,
    }

    async fn rpc(
        State(wallet): State<Arc<Mutex<MockWallet>>>,
        Json(req): Json<Value>,
    ) -> Json<Value> {
        let wallet = wallet.lock().unwrap();
        let id = req["id"].clone();
        let method = req["method"].as_str().unwrap_or_default();

        let response = match method {
            "eth_requestAccounts" if wallet.reject_requests => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": 4001, "message": "User rejected the request."}
            }),
            "eth_requestAccounts" | "eth_accounts" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": wallet.accounts
            }),
            _ => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": -32601, "message": "Method not found"}
            }),
        };
        Json(response)
    }

    async fn spawn_mock_wallet(wallet: Arc<Mutex<MockWallet>>) -> String {
        let app = Router::new().route("/", post(rpc)).with_state(wallet);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";

    fn mock(accounts: &[&str]) -> Arc<Mutex<MockWallet>> {
        Arc::new(Mutex::new(MockWallet {
            accounts: accounts.iter().map(|a| a.to_string()).collect(),
            reject_requests: false,
        }))
    }

    #[tokio::test]
    async fn request_and_authorized_accounts_are_parsed() {
        let url = spawn_mock_wallet(mock(&[ALICE, BOB])).await;
        let provider = RpcWalletProvider::new(&url).unwrap();

        let requested = provider.request_accounts().await.unwrap();
        assert_eq!(requested, vec![ALICE.parse::<Address>().unwrap(), BOB.parse().unwrap()]);

        let authorized = provider.authorized_accounts().await.unwrap();
        assert_eq!(authorized, requested);
    }

    #[tokio::test]
    async fn rejection_surfaces_wallet_message() {
        let wallet = mock(&[ALICE]);
        wallet.lock().unwrap().reject_requests = true;
        let url = spawn_mock_wallet(wallet).await;
        let provider = RpcWalletProvider::new(&url).unwrap();

        let err = provider.request_accounts().await.unwrap_err();
        assert_eq!(
            err,
            WalletError::Provider("User rejected the request.".to_string())
        );
    }

    #[tokio::test]
    async fn poller_broadcasts_only_changes() {
        let wallet = mock(&[ALICE]);
        let url = spawn_mock_wallet(wallet.clone()).await;
        let provider = RpcWalletProvider::new(&url).unwrap();
        let poller = provider.account_poller();
        let mut rx = provider.subscribe_account_changes();

        let mut last_seen = None;
        poller.poll_step(&mut last_seen).await;
        poller.poll_step(&mut last_seen).await;
        assert!(rx.try_recv().is_err(), "baseline and unchanged polls are silent");

        wallet.lock().unwrap().accounts = vec![BOB.to_string()];
        poller.poll_step(&mut last_seen).await;
        assert_eq!(rx.try_recv().unwrap(), vec![BOB.parse::<Address>().unwrap()]);

        wallet.lock().unwrap().accounts.clear();
        poller.poll_step(&mut last_seen).await;
        assert_eq!(rx.try_recv().unwrap(), Vec::<Address>::new());
    }

    #[tokio::test]
    async fn poller_stops_on_cancel() {
        let url = spawn_mock_wallet(mock(&[ALICE])).await;
        let provider = RpcWalletProvider::new(&url).unwrap();
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(
            provider
                .account_poller()
                .with_poll_interval(Duration::from_millis(10))
                .run(shutdown.clone()),
        );
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("poller exits after cancel")
            .unwrap();
    }
}
