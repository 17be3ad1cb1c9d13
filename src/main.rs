//! Command line front end for bulk YouTube Music playlist maintenance.

use anyhow::Context;
use bridge_desktop::{ReqwestHttpClient, TerminalPrompter};
use clap::{CommandFactory, Parser, Subcommand};
use core_bulk::{BulkOperations, ConsoleProgressFactory};
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_runtime::EngineConfig;
use provider_ytmusic::{BrowserAuth, YtMusicConnector};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Bulk playlist maintenance for YouTube Music.
#[derive(Parser)]
#[command(name = "playlist-manager", version)]
struct Cli {
    /// JSON file of request headers copied from a signed-in browser session.
    #[arg(long, env = "YTM_AUTH_FILE", default_value = "browser.json", global = true)]
    auth_file: PathBuf,

    /// Minimum level of diagnostic output on stderr.
    #[arg(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Diagnostic output format: compact, pretty or json.
    #[arg(long, default_value = "compact", global = true)]
    log_format: LogFormat,

    /// Parallel workers for fetches and removals.
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List playlists, optionally narrowed by a fuzzy search term.
    ListPlaylists { search: Option<String> },
    /// Offer every empty playlist you own for deletion.
    DeleteEmptyPlaylists,
    /// Keep one playlist per duplicated title and offer the rest for deletion.
    DeleteDuplicatePlaylists,
    /// Like every song in a selected playlist.
    LikeAllSongsInPlaylist { search: Option<String> },
    /// Delete every playlist you own.
    DeleteAllPlaylists,
    /// Delete a selected playlist.
    DeletePlaylist { search: Option<String> },
    /// Remove every song from a selected playlist.
    RemoveAllSongsFromPlaylist { search: Option<String> },
}

fn build_operations(auth_file: &Path, concurrency: Option<usize>) -> anyhow::Result<BulkOperations> {
    let auth = BrowserAuth::from_file(auth_file)
        .with_context(|| format!("loading browser headers from {}", auth_file.display()))?;
    let http_client = Arc::new(ReqwestHttpClient::new()?);
    let provider = Arc::new(YtMusicConnector::new(http_client, auth));

    let mut config = EngineConfig::builder();
    if let Some(workers) = concurrency {
        config = config.concurrency(workers);
    }
    let config = config.build()?;
    info!(?config, "Engine configured");

    let operations = BulkOperations::new(provider, Arc::new(TerminalPrompter::new()), config)?
        .with_progress(Arc::new(ConsoleProgressFactory));
    Ok(operations)
}

fn print_report<T: Display>(report: Option<T>) {
    match report {
        Some(report) => println!("{}", report),
        None => println!("No changes made."),
    }
}

async fn run(operations: &BulkOperations, command: Command) -> anyhow::Result<()> {
    match command {
        Command::ListPlaylists { search } => {
            println!("{}", operations.list_playlists(search.as_deref()).await?)
        }
        Command::DeleteEmptyPlaylists => {
            println!("{}", operations.delete_empty_playlists().await?)
        }
        Command::DeleteDuplicatePlaylists => {
            println!("{}", operations.delete_duplicate_playlists().await?)
        }
        Command::LikeAllSongsInPlaylist { search } => {
            print_report(operations.like_all_songs(search.as_deref()).await?)
        }
        Command::DeleteAllPlaylists => print_report(operations.delete_all_playlists().await?),
        Command::DeletePlaylist { search } => {
            print_report(operations.delete_playlist(search.as_deref()).await?)
        }
        Command::RemoveAllSongsFromPlaylist { search } => {
            print_report(operations.remove_all_songs(search.as_deref()).await?)
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(
        LoggingConfig::default()
            .with_level(cli.log_level)
            .with_format(cli.log_format)
            .with_target(false),
    )?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let operations = build_operations(&cli.auth_file, cli.concurrency)?;
    run(&operations, command).await
}
