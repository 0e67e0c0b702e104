//! Sync command: emits the layout-set envelope.
//!
//! Without `--send` the envelope is printed to stdout; with it the message is
//! framed and written to the tiler's socket.

use crate::cli::common::{CliError, CliResult, StoreArgs};
use crate::models::LayoutSet;
use crate::sync::SettingsSyncChannel;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Propagate the layouts file to the running tiler
#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    /// Layouts file options
    #[command(flatten)]
    pub store: StoreArgs,

    /// Send over the socket instead of printing
    #[arg(long)]
    pub send: bool,

    /// Socket path (defaults to the configured one)
    #[arg(long, value_name = "PATH", requires = "send")]
    pub socket: Option<PathBuf>,
}

impl SyncArgs {
    /// Execute the sync command
    pub fn execute(&self) -> CliResult<()> {
        let (config, _, session) = self.store.open()?;
        let snapshot = session.snapshot();

        if !self.send {
            let mut channel = SettingsSyncChannel::new(snapshot, |message: &str| -> anyhow::Result<()> {
                println!("{message}");
                Ok(())
            });
            channel.propagate()?;
            return Ok(());
        }

        let socket = match &self.socket {
            Some(path) => path.clone(),
            None => config
                .paths
                .ipc_socket()
                .map_err(|e| CliError::io(format!("Failed to resolve socket path: {e:#}")))?,
        };
        send_over_socket(snapshot, &socket)
    }
}

#[cfg(unix)]
fn send_over_socket(snapshot: LayoutSet, socket: &std::path::Path) -> CliResult<()> {
    use crate::sync::UnixSocketTransport;

    let transport = UnixSocketTransport::connect(socket)
        .map_err(|e| CliError::io(format!("{e:#}")))?;
    let layouts = snapshot.layouts.len();
    let mut channel = SettingsSyncChannel::new(snapshot, transport);
    if !channel.propagate()? {
        return Err(CliError::io(format!(
            "Failed to send layouts to {}",
            socket.display()
        )));
    }

    info!(socket = %socket.display(), layouts, "Layouts sent");
    println!("Sent {layouts} layouts to {}.", socket.display());
    Ok(())
}

#[cfg(not(unix))]
fn send_over_socket(_snapshot: LayoutSet, socket: &std::path::Path) -> CliResult<()> {
    Err(CliError::validation(format!(
        "Socket transport is not supported on this platform: {}",
        socket.display()
    )))
}
