// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the topic database | `./data` |
//! | `TLS_CERT_PATH` | PEM certificate chain (HTTPS when set with key) | unset |
//! | `TLS_KEY_PATH` | PEM private key | unset |
//! | `WALLET_RPC_URL` | Wallet provider JSON-RPC endpoint | unset (no provider) |
//! | `ETH_RPC_URL` | Public mainnet endpoint used for ENS lookups | `https://eth.merkle.io` |
//! | `SESSION_DIR` | Directory of the persisted wallet session | `./.topicboard` |
//! | `TOPICS_API_URL` | Base URL of the topic API (CLI) | `http://127.0.0.1:8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory path.
///
/// The topic database file (`topics.redb`) lives directly under it.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

/// Wallet provider endpoint. Provider detection is the presence of this
/// variable, evaluated once when the session is built.
pub const WALLET_RPC_URL_ENV: &str = "WALLET_RPC_URL";

pub const ETH_RPC_URL_ENV: &str = "ETH_RPC_URL";
pub const SESSION_DIR_ENV: &str = "SESSION_DIR";
pub const TOPICS_API_URL_ENV: &str = "TOPICS_API_URL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_ETH_RPC_URL: &str = "https://eth.merkle.io";
pub const DEFAULT_SESSION_DIR: &str = "./.topicboard";
pub const DEFAULT_TOPICS_API_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// File name of the topic database inside `DATA_DIR`.
pub const TOPIC_DB_FILE: &str = "topics.redb";

/// Paths to PEM-encoded TLS material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// HTTPS is used only when both certificate and key paths are set.
    pub tls: Option<TlsPaths>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup(PORT_ENV)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            _ => None,
        };

        Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: lookup(DATA_DIR_ENV)
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
                .into(),
            tls,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(TOPIC_DB_FILE)
    }
}

/// Client-side configuration for the wallet session and topic API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub wallet_rpc_url: Option<String>,
    pub eth_rpc_url: String,
    pub session_dir: PathBuf,
    pub topics_api_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            wallet_rpc_url: lookup(WALLET_RPC_URL_ENV).filter(|url| !url.trim().is_empty()),
            eth_rpc_url: lookup(ETH_RPC_URL_ENV).unwrap_or_else(|| DEFAULT_ETH_RPC_URL.to_string()),
            session_dir: lookup(SESSION_DIR_ENV)
                .unwrap_or_else(|| DEFAULT_SESSION_DIR.to_string())
                .into(),
            topics_api_url: lookup(TOPICS_API_URL_ENV)
                .unwrap_or_else(|| DEFAULT_TOPICS_API_URL.to_string()),
        }
    }
}

/// Install the global tracing subscriber.
///
/// `LOG_FORMAT=json` selects JSON lines; anything else is human-readable.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = env::var(LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.with_target(false).compact().init();
    }
}
