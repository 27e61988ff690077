//! Authentication state, persisted sessions and the login/register flows.

/// Login, registration and logout against the backend.
pub mod service;
/// Session file persistence.
pub mod session;
mod state;

pub use service::{AuthService, LoginForm, RegisterForm, RegisterRole};
pub use session::{SessionStore, StoredSession};
pub use state::{reduce, AuthAction, AuthState, DEFAULT_AUTH_ERROR};
