// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Topic Board - wallet-authenticated discussion topics
//!
//! This crate provides the topic API server and the client-side pieces that
//! talk to it on behalf of a connected wallet.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - Ethereum JSON-RPC access and ENS name resolution
//! - `client` - Typed HTTP client for the topic API
//! - `storage` - Topic database (redb)
//! - `wallet` - Wallet session manager

pub mod api;
pub mod blockchain;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod wallet;
