//! HTTP access to the inventory backend.

/// Request helpers bound to the configured origin.
pub mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;

/// Backend routes used by the client.
pub mod routes {
    /// Game catalog collection.
    pub const GAMES: &str = "/jogos";
    /// Platform collection.
    pub const PLATFORMS: &str = "/plataformas";
    /// Deposit collection.
    pub const DEPOSITS: &str = "/depositos";
    /// Current stock levels.
    pub const INVENTORY: &str = "/estoque/consultar";
    /// Inbound, outbound and adjustment movements.
    pub const MOVEMENTS: &str = "/estoque/movimentar";
    /// Transfers between deposits.
    pub const TRANSFERS: &str = "/estoque/transferir";
    /// Credential login.
    pub const LOGIN: &str = "/auth/login";
    /// Account registration.
    pub const REGISTER: &str = "/auth/registrar";

    /// Path of a single game.
    pub fn game(id: i64) -> String {
        format!("{GAMES}/{id}")
    }
}
