use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::{reduce, AuthAction, AuthState, SessionStore, StoredSession};
use crate::{
    api::{routes, ApiClient, ApiError},
    models::User,
    validation::{self, FormError},
};

const INCOMPLETE_LOGIN: &str = "Incomplete API response";
const INCOMPLETE_REGISTER: &str = "Incomplete registration API response";

/// Role requested when registering an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegisterRole {
    /// Regular user.
    #[default]
    User,
    /// Administrator.
    Admin,
}

impl RegisterRole {
    /// Value sent as `roleName`.
    pub fn role_name(self) -> &'static str {
        match self {
            RegisterRole::User => "USUARIO",
            RegisterRole::Admin => "ADMIN",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            RegisterRole::User => "User",
            RegisterRole::Admin => "Administrator",
        }
    }

    /// The other role.
    pub fn toggled(self) -> Self {
        match self {
            RegisterRole::User => RegisterRole::Admin,
            RegisterRole::Admin => RegisterRole::User,
        }
    }
}

/// Credentials as typed into the login form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    #[allow(missing_docs)]
    pub email: String,
    #[allow(missing_docs)]
    pub password: String,
}

impl LoginForm {
    /// Check that both fields are filled in.
    pub fn validate(&self) -> Result<(String, String), FormError> {
        let email = validation::email("E-mail", &self.email)?;
        validation::required("Password", &self.password)?;
        Ok((email, self.password.clone()))
    }
}

/// Registration form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub email: String,
    #[allow(missing_docs)]
    pub password: String,
    #[allow(missing_docs)]
    pub role: RegisterRole,
}

impl RegisterForm {
    /// Check that every field is filled in.
    pub fn validate(&self) -> Result<(), FormError> {
        validation::required("Name", &self.name)?;
        validation::email("E-mail", &self.email)?;
        validation::required("Password", &self.password)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    access_token: Option<String>,
    id: Option<i64>,
    username: Option<String>,
    nome_completo: Option<String>,
    roles: Option<Value>,
}

impl AuthResponse {
    fn into_session(self) -> Option<StoredSession> {
        let access_token = self.access_token.filter(|token| !token.is_empty())?;
        let id = self.id?;
        let email = self.username.filter(|value| !value.is_empty())?;
        let name = self.nome_completo.filter(|value| !value.is_empty())?;
        let roles = match self.roles? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => return None,
        };
        Some(StoredSession {
            access_token,
            user: User {
                id,
                email,
                name,
                roles,
            },
        })
    }
}

/// Login, registration and session lifecycle.
///
/// Clones share the same state, session file and HTTP client.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    store: SessionStore,
    state: Arc<RwLock<AuthState>>,
}

impl AuthService {
    /// Create a logged-out service.
    pub fn new(client: ApiClient, store: SessionStore) -> Self {
        Self {
            client,
            store,
            state: Arc::new(RwLock::new(AuthState::default())),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.state.read().clone()
    }

    /// Whether the current user holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.state.read().is_admin()
    }

    /// Whether the current user holds the regular user role.
    pub fn is_user(&self) -> bool {
        self.state.read().is_user()
    }

    /// Dismiss the current error.
    pub fn clear_error(&self) {
        self.dispatch(AuthAction::ClearError);
    }

    /// Resume the session stored on disk, if any.
    ///
    /// An unreadable session file is removed. Returns whether a session was restored.
    pub fn restore(&self) -> bool {
        match self.store.load() {
            Ok(Some(session)) => {
                info!(user = %session.user.email, "restored stored session");
                self.client.set_token(session.access_token);
                self.dispatch(AuthAction::LoginSuccess(session.user));
                true
            }
            Ok(None) => false,
            Err(err) => {
                warn!(?err, "discarding unreadable session");
                if let Err(err) = self.store.clear() {
                    error!(?err, "failed to remove unreadable session");
                }
                self.client.clear_token();
                self.dispatch(AuthAction::Logout);
                false
            }
        }
    }

    /// Log in with e-mail and password. Returns whether it succeeded.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.dispatch(AuthAction::LoginStart);
        let body = json!({ "username": email, "password": password });
        let result = self.client.post(routes::LOGIN, &body).await;
        self.finish(result, AuthAction::LoginSuccess, INCOMPLETE_LOGIN)
    }

    /// Create an account and log into it. Returns whether it succeeded.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: RegisterRole,
    ) -> bool {
        self.dispatch(AuthAction::LoginStart);
        let body = json!({
            "email": email,
            "password": password,
            "username": name,
            "roleName": role.role_name(),
        });
        let result = self.client.post(routes::REGISTER, &body).await;
        self.finish(result, AuthAction::RegisterSuccess, INCOMPLETE_REGISTER)
    }

    /// End the session and forget the stored token.
    pub fn logout(&self) {
        if let Err(err) = self.store.clear() {
            error!(?err, "failed to remove stored session");
        }
        self.client.clear_token();
        self.dispatch(AuthAction::Logout);
        info!("logged out");
    }

    fn finish(
        &self,
        result: Result<AuthResponse, ApiError>,
        success: fn(User) -> AuthAction,
        incomplete: &str,
    ) -> bool {
        let response = match result {
            Ok(response) => response,
            Err(ApiError::Decode(err)) => {
                warn!(%err, "authentication response is not the expected JSON");
                self.dispatch(AuthAction::LoginFailure(Some(incomplete.to_string())));
                return false;
            }
            Err(err) => {
                warn!(%err, "authentication request failed");
                let message = err
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string());
                self.dispatch(AuthAction::LoginFailure(Some(message)));
                return false;
            }
        };

        let Some(session) = response.into_session() else {
            warn!("authentication response is missing user data");
            self.dispatch(AuthAction::LoginFailure(Some(incomplete.to_string())));
            return false;
        };

        if let Err(err) = self.store.persist(&session) {
            error!(?err, "failed to persist session");
        }
        self.client.set_token(session.access_token.clone());
        info!(user = %session.user.email, roles = ?session.user.roles, "authenticated");
        self.dispatch(success(session.user));
        true
    }

    fn dispatch(&self, action: AuthAction) {
        let mut state = self.state.write();
        *state = reduce(std::mem::take(&mut *state), action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn service(backend: &FakeBackend, dir: &std::path::Path) -> AuthService {
        AuthService::new(backend.client(), SessionStore::new(dir.join("session.json")))
    }

    #[tokio::test]
    async fn login_persists_session_and_token() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let dir = tempdir()?;
        let auth = service(&backend, dir.path());

        assert!(auth.login("ana@example.com", "secret").await);
        let state = auth.state();
        assert!(state.is_authenticated);
        assert!(auth.is_admin());
        assert_eq!(state.user.as_ref().map(|u| u.name.as_str()), Some("Ana Souza"));

        let login = backend.requests_to("/auth/login");
        assert_eq!(login[0].body["username"], "ana@example.com");

        let stored = SessionStore::new(dir.path().join("session.json")).load()?;
        assert_eq!(stored.map(|s| s.access_token), Some("token-login".to_string()));

        let _: Vec<crate::models::Game> = auth.client.get("/jogos").await?;
        assert_eq!(backend.last_authorization().as_deref(), Some("Bearer token-login"));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_credentials_keep_backend_message() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let dir = tempdir()?;
        let auth = service(&backend, dir.path());

        assert!(!auth.login("ana@example.com", "wrong").await);
        let state = auth.state();
        assert!(!state.is_authenticated);
        assert_eq!(state.error.as_deref(), Some("Credenciais inválidas"));

        auth.clear_error();
        assert_eq!(auth.state().error, None);
        Ok(())
    }

    #[tokio::test]
    async fn incomplete_response_is_a_failure() -> Result<()> {
        let backend = FakeBackend::start().await?;
        backend.set_login_response(json!({
            "accessToken": "t",
            "id": 1,
            "username": "ana@example.com",
            "nomeCompleto": "Ana",
            "roles": "ROLE_ADMIN"
        }));
        let dir = tempdir()?;
        let auth = service(&backend, dir.path());

        assert!(!auth.login("ana@example.com", "secret").await);
        assert_eq!(auth.state().error.as_deref(), Some(INCOMPLETE_LOGIN));
        assert!(!dir.path().join("session.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn register_sends_role_name_and_logs_in() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let dir = tempdir()?;
        let auth = service(&backend, dir.path());

        assert!(
            auth.register("bia@example.com", "secret", "Bia Lima", RegisterRole::User)
                .await
        );
        let request = &backend.requests_to("/auth/registrar")[0];
        assert_eq!(request.body["roleName"], "USUARIO");
        assert_eq!(request.body["username"], "Bia Lima");

        assert!(auth.is_user());
        assert!(!auth.is_admin());
        Ok(())
    }

    #[tokio::test]
    async fn failure_without_message_uses_error_text() -> Result<()> {
        let backend = FakeBackend::start().await?;
        backend.fail_next("/auth/login", 500, json!({"error": "boom"}));
        let dir = tempdir()?;
        let auth = service(&backend, dir.path());

        assert!(!auth.login("ana@example.com", "secret").await);
        let error = auth.state().error.unwrap_or_default();
        assert!(error.contains("500"), "unexpected error: {error}");
        assert!(!auth.state().is_loading);
        Ok(())
    }

    #[tokio::test]
    async fn non_json_login_reply_is_incomplete() -> Result<()> {
        let backend = FakeBackend::start().await?;
        backend.reply_text_next("/auth/login", "OK");
        let dir = tempdir()?;
        let auth = service(&backend, dir.path());

        assert!(!auth.login("ana@example.com", "secret").await);
        assert_eq!(auth.state().error.as_deref(), Some(INCOMPLETE_LOGIN));
        Ok(())
    }

    #[tokio::test]
    async fn register_failures_report_their_cause() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let dir = tempdir()?;
        let auth = service(&backend, dir.path());

        backend.fail_next("/auth/registrar", 409, json!({"message": "E-mail já cadastrado"}));
        assert!(
            !auth
                .register("bia@example.com", "secret", "Bia Lima", RegisterRole::Admin)
                .await
        );
        assert_eq!(auth.state().error.as_deref(), Some("E-mail já cadastrado"));
        assert_eq!(backend.requests_to("/auth/registrar")[0].body["roleName"], "ADMIN");

        backend.set_register_response(json!({"accessToken": "t", "id": 8}));
        assert!(
            !auth
                .register("bia@example.com", "secret", "Bia Lima", RegisterRole::User)
                .await
        );
        assert_eq!(auth.state().error.as_deref(), Some(INCOMPLETE_REGISTER));
        assert!(!auth.state().is_authenticated);
        assert!(!dir.path().join("session.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn restore_and_logout() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let dir = tempdir()?;
        let auth = service(&backend, dir.path());
        assert!(auth.login("ana@example.com", "secret").await);

        let resumed = service(&backend, dir.path());
        assert!(resumed.restore());
        assert!(resumed.state().is_authenticated);
        assert!(resumed.client.has_token());

        resumed.logout();
        assert!(!resumed.state().is_authenticated);
        assert!(!resumed.client.has_token());
        assert!(!dir.path().join("session.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_session_is_discarded() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let dir = tempdir()?;
        fs::write(dir.path().join("session.json"), "not json")?;
        let auth = service(&backend, dir.path());

        assert!(!auth.restore());
        assert!(!auth.state().is_authenticated);
        assert!(!dir.path().join("session.json").exists());
        Ok(())
    }

    #[test]
    fn forms_require_fields() {
        let login = LoginForm {
            email: "ana@example.com".to_string(),
            password: String::new(),
        };
        assert_eq!(login.validate(), Err(FormError::Missing("Password")));

        let register = RegisterForm {
            email: "ana@example.com".to_string(),
            password: "x".to_string(),
            ..RegisterForm::default()
        };
        assert_eq!(register.validate(), Err(FormError::Missing("Name")));
        assert_eq!(RegisterRole::Admin.role_name(), "ADMIN");
    }
}
