// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Terminal front end: drives a wallet session and the topic API client.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use topicboard::{
    blockchain::{EnsResolver, EthClient, ETH_MAINNET},
    client::{ClientError, TopicClient},
    config::{init_tracing, ClientConfig},
    models::Topic,
    wallet::{
        FileSessionStore, NameResolver, NoNameResolver, RpcWalletProvider, SessionSnapshot,
        WalletError, WalletSession,
    },
};

#[derive(Parser)]
#[command(name = "topicboard-cli", version, about = "Wallet-authenticated topic board")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the wallet session, restoring a previous connection if possible
    Status,
    /// Ask the wallet for an account and connect it
    Connect,
    /// Forget the wallet connection
    Disconnect,
    /// Follow wallet account changes until interrupted
    Watch,
    /// List topics, newest first
    List,
    /// Show one topic
    Show { id: u64 },
    /// Create a topic as the connected account
    Create { title: String, description: String },
    /// Edit a topic created by the connected account
    Update {
        id: u64,
        title: String,
        description: String,
    },
    /// Delete a topic created by the connected account
    Delete { id: u64 },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    Session(String),

    #[error("No wallet connected. Run `topicboard-cli connect` first.")]
    NotConnected,
}

/// ENS when a chain endpoint is usable, otherwise no display names.
enum DisplayNames {
    Ens(EnsResolver),
    Disabled(NoNameResolver),
}

impl NameResolver for DisplayNames {
    async fn resolve_name(&self, address: Address) -> Result<Option<String>, WalletError> {
        match self {
            Self::Ens(ens) => ens.resolve_name(address).await,
            Self::Disabled(none) => none.resolve_name(address).await,
        }
    }
}

type Session = WalletSession<RpcWalletProvider, DisplayNames, FileSessionStore>;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let config = ClientConfig::from_env();

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &ClientConfig) -> Result<(), CliError> {
    match command {
        Command::List => {
            for topic in topic_client(config)?.list_topics().await? {
                print_topic(&topic);
            }
        }
        Command::Show { id } => {
            print_topic(&topic_client(config)?.get_topic(id).await?);
        }
        Command::Status => {
            let (session, _) = open_session(config).await?;
            print_session(&session.snapshot());
        }
        Command::Connect => {
            let (session, _) = open_session(config).await?;
            session.connect().await;
            let snapshot = session.snapshot();
            print_session(&snapshot);
            if let Some(error) = snapshot.error {
                return Err(CliError::Session(error));
            }
        }
        Command::Disconnect => {
            let (session, _) = open_session(config).await?;
            session.disconnect();
            print_session(&session.snapshot());
        }
        Command::Watch => watch(config).await?,
        Command::Create { title, description } => {
            let creator = connected_address(config).await?;
            let topic = topic_client(config)?
                .create_topic(&title, &description, &creator)
                .await?;
            print_topic(&topic);
        }
        Command::Update {
            id,
            title,
            description,
        } => {
            let creator = connected_address(config).await?;
            let topic = topic_client(config)?
                .update_topic(id, &title, &description, &creator)
                .await?;
            print_topic(&topic);
        }
        Command::Delete { id } => {
            let creator = connected_address(config).await?;
            topic_client(config)?.delete_topic(id, &creator).await?;
            println!("Deleted topic {id}");
        }
    }
    Ok(())
}

fn topic_client(config: &ClientConfig) -> Result<TopicClient, CliError> {
    Ok(TopicClient::new(&config.topics_api_url)?)
}

/// Build the session and restore any persisted connection. Also returns the
/// provider's account poller when a wallet is configured.
async fn open_session(
    config: &ClientConfig,
) -> Result<(Session, Option<topicboard::wallet::AccountPoller>), CliError> {
    let provider = config
        .wallet_rpc_url
        .as_deref()
        .map(RpcWalletProvider::new)
        .transpose()?;
    let poller = provider.as_ref().map(RpcWalletProvider::account_poller);

    let ens = EthClient::new(ETH_MAINNET, &config.eth_rpc_url).and_then(|c| EnsResolver::new(&c));
    let names = match ens {
        Ok(ens) => DisplayNames::Ens(ens),
        Err(e) => {
            warn!(error = %e, "ENS lookups disabled");
            DisplayNames::Disabled(NoNameResolver)
        }
    };

    let store = FileSessionStore::new(&config.session_dir);
    let session = WalletSession::initialize(provider, names, store).await;
    Ok((session, poller))
}

/// Checksummed address of the restored session, used as the claimed creator.
async fn connected_address(config: &ClientConfig) -> Result<String, CliError> {
    let (session, _) = open_session(config).await?;
    match session.snapshot() {
        SessionSnapshot {
            is_connected: true,
            address: Some(address),
            ..
        } => Ok(address.to_string()),
        _ => Err(CliError::NotConnected),
    }
}

async fn watch(config: &ClientConfig) -> Result<(), CliError> {
    let (session, poller) = open_session(config).await?;
    let Some(poller) = poller else {
        return Err(CliError::Session(
            topicboard::wallet::session::PROVIDER_NOT_FOUND.to_string(),
        ));
    };

    let session = Arc::new(session);
    let shutdown = CancellationToken::new();
    let poller_task = tokio::spawn(poller.run(shutdown.clone()));
    let listener_task = tokio::spawn(session.clone().run_account_listener(shutdown.clone()));

    let mut last = session.snapshot();
    print_session(&last);

    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let current = session.snapshot();
                if current != last {
                    print_session(&current);
                    last = current;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    shutdown.cancel();
    let _ = tokio::join!(poller_task, listener_task);
    Ok(())
}

fn print_session(snapshot: &SessionSnapshot) {
    match (snapshot.is_connected, snapshot.address) {
        (true, Some(address)) => match &snapshot.display_name {
            Some(name) => println!("Connected: {name} ({address})"),
            None => println!("Connected: {address}"),
        },
        _ => println!("Not connected"),
    }
    if let Some(error) = &snapshot.error {
        println!("Error: {error}");
    }
}

fn print_topic(topic: &Topic) {
    println!(
        "#{} {}  [{} | {}]\n    {}",
        topic.id,
        topic.title,
        topic.creator_address,
        topic.created_at.format("%Y-%m-%d %H:%M"),
        topic.description
    );
}
