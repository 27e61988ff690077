use serde::{Deserialize, Serialize};

use crate::models::{User, ROLE_ADMIN, ROLE_USER};

/// Message used when a failure carries no text of its own.
pub const DEFAULT_AUTH_ERROR: &str = "Authentication failed";

/// Authentication status exposed to the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Logged-in user, if any.
    pub user: Option<User>,
    /// A login or registration request is in flight.
    pub is_loading: bool,
    /// A session is active.
    pub is_authenticated: bool,
    /// Last authentication error.
    pub error: Option<String>,
}

impl AuthState {
    /// Whether the current user holds the admin role.
    ///
    /// This only gates what the UI offers; the backend enforces access.
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// Whether the current user holds the regular user role.
    pub fn is_user(&self) -> bool {
        self.has_role(ROLE_USER)
    }

    fn has_role(&self, role: &str) -> bool {
        self.user
            .as_ref()
            .map(|user| user.has_role(role))
            .unwrap_or(false)
    }
}

/// Transitions applied to [`AuthState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// A login or registration request started.
    LoginStart,
    /// Login succeeded.
    LoginSuccess(User),
    /// Registration succeeded and logged the user in.
    RegisterSuccess(User),
    /// Login or registration failed.
    LoginFailure(Option<String>),
    /// Session ended.
    Logout,
    /// Dismiss the current error.
    ClearError,
}

/// Apply `action` to `state`, returning the next state.
pub fn reduce(state: AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::LoginStart => AuthState {
            is_loading: true,
            error: None,
            ..state
        },
        AuthAction::LoginSuccess(user) | AuthAction::RegisterSuccess(user) => AuthState {
            user: Some(user),
            is_loading: false,
            is_authenticated: true,
            error: None,
        },
        AuthAction::LoginFailure(message) => AuthState {
            user: None,
            is_loading: false,
            is_authenticated: false,
            error: Some(
                message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_AUTH_ERROR.to_string()),
            ),
        },
        AuthAction::Logout => AuthState::default(),
        AuthAction::ClearError => AuthState {
            error: None,
            ..state
        },
    }
}
