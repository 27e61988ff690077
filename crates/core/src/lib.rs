#![warn(clippy::all, missing_docs)]

//! Core logic for the GameVault inventory client.
//!
//! This crate hosts the backend models, the HTTP client, authentication,
//! the cached inventory store, report aggregation and configuration
//! used by the terminal UI.

pub mod api;
pub mod auth;
pub mod config;
pub mod connectivity;
pub mod inventory;
pub mod models;
pub mod reports;
pub mod validation;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthService, AuthState, SessionStore};
pub use config::AppConfig;
pub use connectivity::{ConnectionStatus, ConnectivityEvent, ConnectivityMonitor};
pub use inventory::{InventorySnapshot, InventoryStore, MovementForm, MovementKind};
pub use models::{Deposit, Game, GameDraft, InventoryItem, Platform, User};
pub use validation::FormError;
