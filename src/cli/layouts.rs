//! Layout management commands.
//!
//! Provides commands to list, create, rename, resize, clone, and delete
//! layouts in the layouts file.

use crate::cli::common::{resolve_layout, save_session, CliError, CliResult, StoreArgs};
use crate::constants::layout::DEFAULT_ZONE_COUNT;
use crate::models::LayoutKind;
use clap::{Args, Subcommand};
use serde::Serialize;

/// Manage layouts
#[derive(Debug, Clone, Args)]
pub struct LayoutsArgs {
    /// Layouts subcommand
    #[command(subcommand)]
    pub command: LayoutsCommand,
}

/// Layout management subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum LayoutsCommand {
    /// List all layouts
    List(ListLayoutsArgs),
    /// Create a new layout
    Create(CreateLayoutArgs),
    /// Rename a layout
    Rename(RenameLayoutArgs),
    /// Change a layout's template zone count
    Zones(ZonesArgs),
    /// Copy a layout under a new identity
    Clone(CloneLayoutArgs),
    /// Delete a layout and free its quick key
    Delete(DeleteLayoutArgs),
}

/// List all layouts
#[derive(Debug, Clone, Args)]
pub struct ListLayoutsArgs {
    /// Layouts file options
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Create a new layout
#[derive(Debug, Clone, Args)]
pub struct CreateLayoutArgs {
    /// Layouts file options
    #[command(flatten)]
    pub store: StoreArgs,

    /// Layout name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Layout type (blank, focus, columns, rows, grid, priority-grid, custom)
    #[arg(long = "type", value_name = "TYPE", default_value = "custom")]
    pub kind: String,

    /// Template zone count
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_ZONE_COUNT)]
    pub zones: u32,

    /// Quick key to assign
    #[arg(long, value_name = "KEY")]
    pub quick_key: Option<String>,
}

/// Rename a layout
#[derive(Debug, Clone, Args)]
pub struct RenameLayoutArgs {
    /// Layouts file options
    #[command(flatten)]
    pub store: StoreArgs,

    /// Layout identity or name
    #[arg(value_name = "LAYOUT")]
    pub layout: String,

    /// New name
    #[arg(long, value_name = "NAME")]
    pub name: String,
}

/// Change a layout's template zone count
#[derive(Debug, Clone, Args)]
pub struct ZonesArgs {
    /// Layouts file options
    #[command(flatten)]
    pub store: StoreArgs,

    /// Layout identity or name
    #[arg(value_name = "LAYOUT")]
    pub layout: String,

    /// New zone count
    #[arg(long, value_name = "COUNT")]
    pub count: u32,
}

/// Copy a layout
#[derive(Debug, Clone, Args)]
pub struct CloneLayoutArgs {
    /// Layouts file options
    #[command(flatten)]
    pub store: StoreArgs,

    /// Layout identity or name
    #[arg(value_name = "LAYOUT")]
    pub layout: String,

    /// Name of the copy (defaults to the source name)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

/// Delete a layout
#[derive(Debug, Clone, Args)]
pub struct DeleteLayoutArgs {
    /// Layouts file options
    #[command(flatten)]
    pub store: StoreArgs,

    /// Layout identity or name
    #[arg(value_name = "LAYOUT")]
    pub layout: String,
}

// JSON response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutItem {
    uuid: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    zone_count: u32,
    sensitivity_radius: u32,
    quick_key: Option<u8>,
}

#[derive(Debug, Serialize)]
struct ListLayoutsResponse {
    layouts: Vec<LayoutItem>,
    count: usize,
}

impl LayoutsArgs {
    /// Execute the layouts command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            LayoutsCommand::List(args) => args.execute(),
            LayoutsCommand::Create(args) => args.execute(),
            LayoutsCommand::Rename(args) => args.execute(),
            LayoutsCommand::Zones(args) => args.execute(),
            LayoutsCommand::Clone(args) => args.execute(),
            LayoutsCommand::Delete(args) => args.execute(),
        }
    }
}

impl ListLayoutsArgs {
    /// Execute the list command
    pub fn execute(&self) -> CliResult<()> {
        let (_, _, session) = self.store.open()?;

        let layouts: Vec<LayoutItem> = session
            .layouts()
            .iter()
            .map(|entry| LayoutItem {
                uuid: entry.uuid(),
                name: entry.name().to_string(),
                kind: entry.kind().to_string(),
                zone_count: entry.template_zone_count(),
                sensitivity_radius: entry.sensitivity_radius(),
                quick_key: entry.quick_key(),
            })
            .collect();
        let response = ListLayoutsResponse {
            count: layouts.len(),
            layouts,
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else if response.count == 0 {
            println!("No layouts defined.");
        } else {
            println!("Layouts ({}):", response.count);
            println!();
            for item in response.layouts {
                let key = item
                    .quick_key
                    .map_or_else(|| "-".to_string(), |k| k.to_string());
                println!(
                    "  {}  {:<24} {:<14} zones={:<3} key={}",
                    item.uuid, item.name, item.kind, item.zone_count, key
                );
            }
        }

        Ok(())
    }
}

impl CreateLayoutArgs {
    /// Execute the create command
    pub fn execute(&self) -> CliResult<()> {
        let kind: LayoutKind = self.kind.parse()?;
        if self.name.trim().is_empty() {
            return Err(CliError::validation("Layout name must not be empty"));
        }

        let (_, store, mut session) = self.store.open()?;
        let id = session.create_layout(self.name.clone(), kind)?;

        // Nothing is saved if a follow-up change is rejected
        session.set_template_zone_count(&id, self.zones)?;
        if let Some(symbol) = &self.quick_key {
            session.set_quick_key(&id, symbol)?;
        }

        save_session(&store, &session)?;
        println!("Layout '{}' created: {}", self.name, id);
        Ok(())
    }
}

impl RenameLayoutArgs {
    /// Execute the rename command
    pub fn execute(&self) -> CliResult<()> {
        if self.name.trim().is_empty() {
            return Err(CliError::validation("Layout name must not be empty"));
        }

        let (_, store, mut session) = self.store.open()?;
        let id = resolve_layout(&session, &self.layout)?;
        if session.rename(&id, self.name.clone())? {
            save_session(&store, &session)?;
        }
        println!("Layout {} renamed to '{}'.", id, self.name);
        Ok(())
    }
}

impl ZonesArgs {
    /// Execute the zones command
    pub fn execute(&self) -> CliResult<()> {
        let (_, store, mut session) = self.store.open()?;
        let id = resolve_layout(&session, &self.layout)?;
        if session.set_template_zone_count(&id, self.count)? {
            save_session(&store, &session)?;
        }
        println!("Layout {} now has {} zones.", id, self.count);
        Ok(())
    }
}

impl CloneLayoutArgs {
    /// Execute the clone command
    pub fn execute(&self) -> CliResult<()> {
        let (_, store, mut session) = self.store.open()?;
        let id = resolve_layout(&session, &self.layout)?;
        let copy = session.duplicate(&id, self.name.as_deref())?;
        save_session(&store, &session)?;
        println!("Layout {id} cloned: {copy}");
        Ok(())
    }
}

impl DeleteLayoutArgs {
    /// Execute the delete command
    pub fn execute(&self) -> CliResult<()> {
        let (_, store, mut session) = self.store.open()?;
        let id = resolve_layout(&session, &self.layout)?;
        session.delete(&id)?;
        save_session(&store, &session)?;
        println!("Layout {id} deleted.");
        Ok(())
    }
}
