//! Session and identity service.
//!
//! Two states, [`SessionState::Unauthenticated`] and
//! [`SessionState::Authenticated`]. The authenticated state always carries
//! both a user and a token, and storage mirrors it under the `user` and
//! `token` keys. Operations may overlap across suspension points; whichever
//! settles last decides the state.

use crate::auth_client::{AuthClient, AuthGrant, RegisterRequest};
use crate::error::AuthError;
use crate::routes::Route;
use crate::storage::KeyValueStore;
use crate::user::{ProfileUpdate, User, UserRole};
use std::cell::{Cell, RefCell};
use std::str::FromStr;
use tracing::{info, warn};

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated { user: User, token: String },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user),
            SessionState::Unauthenticated => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { token, .. } => Some(token),
            SessionState::Unauthenticated => None,
        }
    }
}

pub struct SessionService<C, S> {
    client: C,
    storage: S,
    state: RefCell<SessionState>,
    error: RefCell<Option<String>>,
    pending: Cell<usize>,
}

impl<C: AuthClient, S: KeyValueStore> SessionService<C, S> {
    /// Builds the service and restores any persisted session synchronously.
    ///
    /// A `user`/`token` pair is only accepted when both keys are present and
    /// the user parses; anything else clears both keys.
    pub fn restore(client: C, storage: S) -> Self {
        let state = load_persisted(&storage);
        Self {
            client,
            storage,
            state: RefCell::new(state),
            error: RefCell::new(None),
            pending: Cell::new(0),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_owned)
    }

    /// Message of the last failed operation, if it has not been cleared.
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn clear_error(&self) {
        self.error.replace(None);
    }

    /// True while any operation is waiting on the client.
    pub fn is_loading(&self) -> bool {
        self.pending.get() > 0
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the route to navigate to on success. Surrounding whitespace
    /// in the email is ignored.
    pub async fn login(&self, email: &str, password: &str) -> Result<Route, AuthError> {
        let grant = self.run(self.client.login(email.trim(), password)).await?;
        self.establish(grant)?;
        Ok(Route::Dashboard)
    }

    pub fn logout(&self) -> Route {
        let previous = self.state.replace(SessionState::Unauthenticated);
        if let Some(user) = previous.user() {
            info!(user_id = %user.id, "session closed");
        }
        clear_persisted(&self.storage);
        self.clear_error();
        Route::Login
    }

    /// A registration whose session cannot be stored is handed back to the
    /// client.
    pub async fn register(&self, request: RegisterRequest) -> Result<Route, AuthError> {
        let grant = self.run(self.client.register(request)).await?;
        if let Err(err) = self.establish(grant.clone()) {
            warn!(user_id = %grant.user.id, "registration rolled back");
            self.client.discard_registration(&grant);
            return Err(err);
        }
        Ok(Route::Dashboard)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        self.run(self.client.forgot_password(email)).await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Route, AuthError> {
        self.run(self.client.reset_password(token, new_password)).await?;
        Ok(Route::Login)
    }

    /// The in-memory user only changes once the merged record is stored.
    pub fn update_user_profile(&self, update: ProfileUpdate) -> Result<User, AuthError> {
        let Some(mut updated) = self.current_user() else {
            return Err(self.fail(AuthError::NotAuthenticated));
        };
        updated.merge(update);
        if let Err(err) = self.storage.set_json(USER_KEY, &updated) {
            return Err(self.fail(err.into()));
        }
        if let SessionState::Authenticated { user, .. } = &mut *self.state.borrow_mut() {
            *user = updated.clone();
        }
        Ok(updated)
    }

    /// Unknown permission names are never granted.
    pub fn has_permission(&self, name: &str) -> bool {
        let Ok(permission) = name.parse() else {
            return false;
        };
        self.state
            .borrow()
            .user()
            .is_some_and(|u| u.has_permission(permission))
    }

    pub fn has_role(&self, roles: impl RoleSet) -> bool {
        self.state
            .borrow()
            .user()
            .is_some_and(|u| roles.contains(u.role))
    }

    async fn run<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, AuthError>>,
    ) -> Result<T, AuthError> {
        self.clear_error();
        self.pending.set(self.pending.get() + 1);
        let result = call.await;
        self.pending.set(self.pending.get().saturating_sub(1));
        result.map_err(|err| self.fail(err))
    }

    fn establish(&self, grant: AuthGrant) -> Result<(), AuthError> {
        let AuthGrant { user, token } = grant;
        let persisted = self
            .storage
            .set_json(USER_KEY, &user)
            .and_then(|()| self.storage.set(TOKEN_KEY, &token));
        if let Err(err) = persisted {
            clear_persisted(&self.storage);
            return Err(self.fail(err.into()));
        }
        info!(user_id = %user.id, role = %user.role, "session established");
        self.state
            .replace(SessionState::Authenticated { user, token });
        Ok(())
    }

    fn fail(&self, err: AuthError) -> AuthError {
        self.error.replace(Some(err.to_string()));
        err
    }
}

/// Anything `has_role` accepts: one role, a slice of roles, or role names.
pub trait RoleSet {
    fn contains(&self, role: UserRole) -> bool;
}

impl RoleSet for UserRole {
    fn contains(&self, role: UserRole) -> bool {
        *self == role
    }
}

impl RoleSet for &[UserRole] {
    fn contains(&self, role: UserRole) -> bool {
        self.iter().any(|r| *r == role)
    }
}

impl<const N: usize> RoleSet for [UserRole; N] {
    fn contains(&self, role: UserRole) -> bool {
        self.iter().any(|r| *r == role)
    }
}

impl RoleSet for &str {
    fn contains(&self, role: UserRole) -> bool {
        UserRole::from_str(self).is_ok_and(|r| r == role)
    }
}

impl RoleSet for &[&str] {
    fn contains(&self, role: UserRole) -> bool {
        self.iter().any(|name| RoleSet::contains(name, role))
    }
}

fn load_persisted(storage: &impl KeyValueStore) -> SessionState {
    let token = match storage.get(TOKEN_KEY) {
        Ok(token) => token,
        Err(err) => {
            warn!(error = %err, "session token unreadable");
            None
        }
    };
    let user = match storage.get_json::<User>(USER_KEY) {
        Ok(user) => user,
        Err(err) => {
            warn!(error = %err, "stored user discarded");
            None
        }
    };

    match (user, token) {
        (Some(user), Some(token)) if !token.is_empty() => {
            info!(user_id = %user.id, "session restored");
            SessionState::Authenticated { user, token }
        }
        _ => {
            clear_persisted(storage);
            SessionState::Unauthenticated
        }
    }
}

fn clear_persisted(storage: &impl KeyValueStore) {
    for key in [USER_KEY, TOKEN_KEY] {
        if let Err(err) = storage.remove(key) {
            warn!(key, error = %err, "failed to clear session key");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth_client::FixtureAuthClient;
    use crate::config::AppConfig;
    use crate::delay::NoDelay;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;
    use futures::executor::block_on;
    use std::rc::Rc;

    type Service = SessionService<FixtureAuthClient<NoDelay>, MemoryStore>;
    type FlakyService = SessionService<FixtureAuthClient<NoDelay>, FailingWrites>;

    fn service(storage: &MemoryStore) -> Service {
        SessionService::restore(
            FixtureAuthClient::new(AppConfig::instant(), NoDelay),
            storage.clone(),
        )
    }

    /// Shares a `MemoryStore` but refuses writes while `failing` is set.
    #[derive(Clone, Default)]
    struct FailingWrites {
        inner: MemoryStore,
        failing: Rc<Cell<bool>>,
    }

    impl KeyValueStore for FailingWrites {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.failing.get() {
                return Err(StorageError::Write {
                    key: key.to_owned(),
                    reason: "quota exceeded".into(),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn failing_service(storage: &FailingWrites) -> FlakyService {
        SessionService::restore(
            FixtureAuthClient::new(AppConfig::instant(), NoDelay),
            storage.clone(),
        )
    }

    fn nurse_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: "correct horse".into(),
            first_name: "Nia".into(),
            last_name: "Ward".into(),
            role: UserRole::Nurse,
            hospital: None,
            department: Some("ICU".into()),
        }
    }

    #[test]
    fn login_persists_user_and_token() {
        let storage = MemoryStore::new();
        let session = service(&storage);

        let route = block_on(session.login("doctor@medisync.com", "password")).expect("login");
        assert_eq!(route, Route::Dashboard);
        assert!(session.is_authenticated());
        assert_eq!(
            session.current_user().map(|u| u.role),
            Some(UserRole::Doctor)
        );
        assert!(storage.contains(USER_KEY));
        assert_eq!(
            storage.get(TOKEN_KEY).expect("get").as_deref(),
            session.token().as_deref()
        );
        assert!(!session.is_loading());
    }

    #[test]
    fn login_ignores_padding_around_email() {
        let storage = MemoryStore::new();
        let session = service(&storage);

        block_on(session.login("  nurse@medisync.com \t", "password")).expect("login");
        assert_eq!(
            session.current_user().map(|u| u.email),
            Some("nurse@medisync.com".to_owned())
        );
    }

    #[test]
    fn failed_login_sets_error_and_keeps_state() {
        let storage = MemoryStore::new();
        let session = service(&storage);

        let err = block_on(session.login("admin@medisync.com", "nope")).unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(session.error().as_deref(), Some("Invalid email or password"));
        assert!(!session.is_authenticated());
        assert!(storage.is_empty());

        block_on(session.login("admin@medisync.com", "password")).expect("login");
        assert_eq!(session.error(), None);
    }

    #[test]
    fn failed_login_does_not_end_existing_session() {
        let storage = MemoryStore::new();
        let session = service(&storage);
        block_on(session.login("admin@medisync.com", "password")).expect("login");
        let before = session.state();

        assert!(block_on(session.login("doctor@medisync.com", "wrong")).is_err());
        assert_eq!(session.state(), before);
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let storage = MemoryStore::new();
        let session = service(&storage);
        block_on(session.login("paramedic@medisync.com", "password")).expect("login");

        assert_eq!(session.logout(), Route::Login);
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert!(!storage.contains(USER_KEY));
        assert!(!storage.contains(TOKEN_KEY));
    }

    #[test]
    fn register_assigns_role_permissions_and_authenticates() {
        let storage = MemoryStore::new();
        let session = service(&storage);

        let route =
            block_on(session.register(nurse_request("nia@medisync.com"))).expect("register");
        assert_eq!(route, Route::Dashboard);
        let user = session.current_user().expect("user");
        assert_eq!(user.permissions, UserRole::Nurse.permissions());
        assert!(session.has_permission("view_patients"));
        assert!(session.has_permission("edit_patients_partial"));
        assert!(!session.has_permission("edit_patients"));
    }

    #[test]
    fn duplicate_register_changes_nothing() {
        let storage = MemoryStore::new();
        let session = service(&storage);
        let accounts = session.client().account_count();

        let err = block_on(session.register(nurse_request("DOCTOR@medisync.com"))).unwrap_err();
        assert_eq!(err, AuthError::EmailTaken);
        assert_eq!(session.client().account_count(), accounts);
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(storage.is_empty());
    }

    #[test]
    fn checks_are_false_without_session() {
        let session = service(&MemoryStore::new());
        for role in UserRole::ALL {
            assert!(!session.has_role(role));
            for p in role.permissions() {
                assert!(!session.has_permission(p.as_str()));
            }
        }
        assert!(!session.has_role(UserRole::ALL));
        assert!(!session.has_role("admin"));
    }

    #[test]
    fn has_role_accepts_sets() {
        let session = service(&MemoryStore::new());
        block_on(session.login("dispatcher@medisync.com", "password")).expect("login");

        assert!(session.has_role(UserRole::Dispatcher));
        assert!(session.has_role([UserRole::Admin, UserRole::Dispatcher]));
        assert!(!session.has_role([UserRole::Admin, UserRole::Doctor]));
        assert!(session.has_role("Dispatcher"));
        let names: &[&str] = &["nurse", "dispatcher"];
        assert!(session.has_role(names));
        assert!(!session.has_permission("not_a_permission"));
    }

    #[test]
    fn restore_round_trips_user_and_token() {
        let storage = MemoryStore::new();
        let first = service(&storage);
        block_on(first.login("nurse@medisync.com", "password")).expect("login");
        let user = first.current_user();
        let token = first.token();

        let reloaded = service(&storage);
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.current_user(), user);
        assert_eq!(reloaded.token(), token);
    }

    #[test]
    fn malformed_user_json_is_cleared() {
        let storage = MemoryStore::new();
        storage.set(USER_KEY, "{\"id\": 3").expect("set");
        storage.set(TOKEN_KEY, "medisync.3.abc").expect("set");

        let session = service(&storage);
        assert!(!session.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn token_without_user_is_cleared() {
        let storage = MemoryStore::new();
        storage.set(TOKEN_KEY, "medisync.1.abc").expect("set");

        let session = service(&storage);
        assert!(!session.is_authenticated());
        assert!(!storage.contains(TOKEN_KEY));
    }

    #[test]
    fn profile_update_requires_session_and_persists() {
        let storage = MemoryStore::new();
        let session = service(&storage);
        let update = ProfileUpdate {
            last_name: Some("Okafor".into()),
            ..ProfileUpdate::default()
        };

        assert_eq!(
            session.update_user_profile(update.clone()),
            Err(AuthError::NotAuthenticated)
        );
        assert!(session.error().is_some());

        block_on(session.login("doctor@medisync.com", "password")).expect("login");
        let user = session.update_user_profile(update).expect("update");
        assert_eq!(user.last_name, "Okafor");
        let stored: User = storage.get_json(USER_KEY).expect("read").expect("present");
        assert_eq!(stored, user);
    }

    #[test]
    fn profile_update_is_kept_only_when_stored() {
        let storage = FailingWrites::default();
        let session = failing_service(&storage);
        block_on(session.login("doctor@medisync.com", "password")).expect("login");
        let before = session.current_user().expect("user");

        storage.failing.set(true);
        let update = ProfileUpdate {
            last_name: Some("Changed".into()),
            ..ProfileUpdate::default()
        };
        let err = session.update_user_profile(update).unwrap_err();
        assert!(matches!(err, AuthError::Storage(StorageError::Write { .. })));
        assert!(session.error().is_some());

        assert_eq!(session.current_user(), Some(before.clone()));
        let stored: User = storage.get_json(USER_KEY).expect("read").expect("present");
        assert_eq!(stored, before);
    }

    #[test]
    fn register_without_storage_leaves_no_account() {
        let storage = FailingWrites::default();
        let session = failing_service(&storage);
        let accounts = session.client().account_count();

        storage.failing.set(true);
        let err = block_on(session.register(nurse_request("nia@medisync.com"))).unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));
        assert_eq!(session.client().account_count(), accounts);
        assert!(!session.is_authenticated());
        assert!(storage.inner.is_empty());

        storage.failing.set(false);
        let route = block_on(session.register(nurse_request("nia@medisync.com"))).expect("retry");
        assert_eq!(route, Route::Dashboard);
        assert_eq!(session.client().account_count(), accounts + 1);
    }

    #[test]
    fn recovery_routes() {
        let session = service(&MemoryStore::new());
        assert!(block_on(session.forgot_password("admin@medisync.com")).is_ok());
        assert_eq!(
            block_on(session.forgot_password("nobody@medisync.com")),
            Err(AuthError::UnknownEmail)
        );
        assert_eq!(
            session.error().as_deref(),
            Some("No account found with that email address")
        );
        assert_eq!(
            block_on(session.reset_password("t0k3n", "brand-new-pass")),
            Ok(Route::Login)
        );
        assert_eq!(session.error(), None);
    }
}
