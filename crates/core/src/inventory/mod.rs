//! Cached backend collections and the mutations that keep them current.

pub mod movement;
mod store;

pub use movement::{
    MovementForm, MovementKind, MovementRequest, StockMovementRequest, StockTransferRequest,
};
pub use store::{InventorySnapshot, InventoryStore, StoreError};
