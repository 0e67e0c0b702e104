//! Quick-key commands.

use crate::cli::common::{resolve_layout, save_session, CliError, CliResult, StoreArgs};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Manage quick keys
#[derive(Debug, Clone, Args)]
pub struct KeysArgs {
    /// Keys subcommand
    #[command(subcommand)]
    pub command: KeysCommand,
}

/// Quick-key subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum KeysCommand {
    /// Show every key and the layout bound to it
    List(ListKeysArgs),
    /// Show the keys a layout may pick
    Available(AvailableKeysArgs),
    /// Assign a key to a layout, or "None" to clear it
    Set(SetKeyArgs),
}

/// Show every key and its binding
#[derive(Debug, Clone, Args)]
pub struct ListKeysArgs {
    /// Layouts file options
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show the keys a layout may pick
#[derive(Debug, Clone, Args)]
pub struct AvailableKeysArgs {
    /// Layouts file options
    #[command(flatten)]
    pub store: StoreArgs,

    /// Layout identity or name
    #[arg(value_name = "LAYOUT")]
    pub layout: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Assign a quick key
#[derive(Debug, Clone, Args)]
pub struct SetKeyArgs {
    /// Layouts file options
    #[command(flatten)]
    pub store: StoreArgs,

    /// Layout identity or name
    #[arg(value_name = "LAYOUT")]
    pub layout: String,

    /// Key number, or "None"
    #[arg(value_name = "KEY")]
    pub key: String,
}

// JSON response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyItem {
    key: String,
    layout_id: Option<String>,
    layout_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListKeysResponse {
    keys: Vec<KeyItem>,
    bound: usize,
}

#[derive(Debug, Serialize)]
struct AvailableKeysResponse {
    layout: String,
    available: Vec<String>,
}

impl KeysArgs {
    /// Execute the keys command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            KeysCommand::List(args) => args.execute(),
            KeysCommand::Available(args) => args.execute(),
            KeysCommand::Set(args) => args.execute(),
        }
    }
}

impl ListKeysArgs {
    /// Execute the list command
    pub fn execute(&self) -> CliResult<()> {
        let (_, _, session) = self.store.open()?;

        let keys: Vec<KeyItem> = session
            .keys()
            .iter()
            .map(|(symbol, bound)| KeyItem {
                key: symbol.to_string(),
                layout_id: bound.map(str::to_string),
                layout_name: bound
                    .and_then(|id| session.layouts().find_by_uuid(id))
                    .map(|entry| entry.name().to_string()),
            })
            .collect();
        let response = ListKeysResponse {
            bound: keys.iter().filter(|k| k.layout_id.is_some()).count(),
            keys,
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            println!("Quick keys ({} bound):", response.bound);
            println!();
            for item in response.keys {
                match (item.layout_name, item.layout_id) {
                    (Some(name), Some(id)) => println!("  {:<4} {name} {id}", item.key),
                    (None, Some(id)) => println!("  {:<4} (unknown layout) {id}", item.key),
                    _ => println!("  {:<4} -", item.key),
                }
            }
        }

        Ok(())
    }
}

impl AvailableKeysArgs {
    /// Execute the available command
    pub fn execute(&self) -> CliResult<()> {
        let (_, _, session) = self.store.open()?;
        let id = resolve_layout(&session, &self.layout)?;
        let response = AvailableKeysResponse {
            layout: id.canonical(),
            available: session.available_keys_for(&id),
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else if response.available.is_empty() {
            println!("No quick keys available.");
        } else {
            println!("{}", response.available.join(" "));
        }

        Ok(())
    }
}

impl SetKeyArgs {
    /// Execute the set command
    pub fn execute(&self) -> CliResult<()> {
        let (_, store, mut session) = self.store.open()?;
        let id = resolve_layout(&session, &self.layout)?;
        if session.set_quick_key(&id, &self.key)? {
            save_session(&store, &session)?;
        }

        let entry = session
            .layouts()
            .get(&id)
            .ok_or_else(|| CliError::not_found(format!("Layout {id} not found")))?;
        println!("Layout '{}' quick key: {}", entry.name(), entry.quick_key_label());
        Ok(())
    }
}
