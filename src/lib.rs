//! ZoneKeys Library
//!
//! Core of a zone-based window tiler's settings surface: the layout registry,
//! quick-key allocation, and propagation of settings to the running tiler over
//! a JSON envelope channel.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod notify;
pub mod services;
pub mod settings;
pub mod sync;
