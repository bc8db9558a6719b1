// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for Ethereum.
//!
//! This module provides functionality for:
//! - Read-only JSON-RPC access to a public endpoint
//! - ENS reverse resolution for wallet display names

pub mod client;
pub mod ens;
pub mod types;

pub use client::{connect_http, EthClient, EthClientError, HttpProvider};
pub use ens::EnsResolver;
pub use types::*;
