//! The seam between the session service and whatever answers auth calls.
//!
//! [`FixtureAuthClient`] answers from a small in-memory account directory
//! after an artificial delay. A client talking to a real backend implements
//! the same trait and the session service does not change.

use crate::config::AppConfig;
use crate::delay::Delay;
use crate::error::AuthError;
use crate::user::{User, UserRole};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use tracing::debug;

/// Result of a successful login or registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthGrant {
    pub user: User,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub hospital: Option<String>,
    pub department: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait AuthClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, AuthError>;
    async fn register(&self, request: RegisterRequest) -> Result<AuthGrant, AuthError>;
    async fn forgot_password(&self, email: &str) -> Result<(), AuthError>;
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError>;

    /// Undoes a `register` whose session could not be stored locally.
    fn discard_registration(&self, _grant: &AuthGrant) {}
}

#[derive(Clone, Debug)]
struct Account {
    user: User,
    password: String,
}

pub struct FixtureAuthClient<D> {
    accounts: RefCell<Vec<Account>>,
    config: AppConfig,
    delay: D,
}

impl<D: Delay> FixtureAuthClient<D> {
    /// Client seeded with one account per role.
    pub fn new(config: AppConfig, delay: D) -> Self {
        let accounts = seed_users()
            .into_iter()
            .map(|user| Account {
                user,
                password: config.fixture_password.clone(),
            })
            .collect();
        Self {
            accounts: RefCell::new(accounts),
            config,
            delay,
        }
    }

    pub fn account_count(&self) -> usize {
        self.accounts.borrow().len()
    }

    pub fn emails(&self) -> Vec<String> {
        self.accounts
            .borrow()
            .iter()
            .map(|a| a.user.email.clone())
            .collect()
    }

    fn email_known(&self, email: &str) -> bool {
        let needle = email.trim();
        self.accounts
            .borrow()
            .iter()
            .any(|a| a.user.email.eq_ignore_ascii_case(needle))
    }
}

impl<D: Delay> AuthClient for FixtureAuthClient<D> {
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, AuthError> {
        self.delay.sleep(self.config.login_delay).await;

        let mut accounts = self.accounts.borrow_mut();
        let account = accounts
            .iter_mut()
            .find(|a| a.user.email == email && a.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        account.user.last_login = Some(chrono::Utc::now().to_rfc3339());
        debug!(user_id = %account.user.id, "fixture login accepted");
        Ok(AuthGrant {
            token: issue_token(&account.user),
            user: account.user.clone(),
        })
    }

    async fn register(&self, request: RegisterRequest) -> Result<AuthGrant, AuthError> {
        self.delay
            .sleep(self.config.jittered(self.config.register_delay))
            .await;

        if self.email_known(&request.email) {
            return Err(AuthError::EmailTaken);
        }

        let RegisterRequest {
            email,
            password,
            first_name,
            last_name,
            role,
            hospital,
            department,
        } = request;
        let email = email.trim().to_owned();
        let username = email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email,
            first_name,
            last_name,
            role,
            avatar: None,
            permissions: role.permissions().to_vec(),
            hospital: hospital.filter(|h| !h.trim().is_empty()),
            department: department.filter(|d| !d.trim().is_empty()),
            last_login: Some(chrono::Utc::now().to_rfc3339()),
        };

        self.accounts.borrow_mut().push(Account {
            user: user.clone(),
            password,
        });
        debug!(user_id = %user.id, role = %role, "fixture account registered");
        Ok(AuthGrant {
            token: issue_token(&user),
            user,
        })
    }

    async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        self.delay.sleep(self.config.recovery_delay).await;
        if self.email_known(email) {
            Ok(())
        } else {
            Err(AuthError::UnknownEmail)
        }
    }

    fn discard_registration(&self, grant: &AuthGrant) {
        self.accounts
            .borrow_mut()
            .retain(|a| a.user.id != grant.user.id);
        debug!(user_id = %grant.user.id, "fixture account discarded");
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        self.delay.sleep(self.config.recovery_delay).await;
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }
        if new_password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        Ok(())
    }
}

/// Opaque bearer-looking token. Nothing ever parses it.
fn issue_token(user: &User) -> String {
    format!("medisync.{}.{}", user.id, uuid::Uuid::new_v4().simple())
}

fn seed_users() -> Vec<User> {
    let seed = |id: &str,
                role: UserRole,
                first: &str,
                last: &str,
                hospital: Option<&str>,
                department: &str| User {
        id: id.to_owned(),
        username: role.as_str().to_owned(),
        email: format!("{}@medisync.com", role.as_str()),
        first_name: first.to_owned(),
        last_name: last.to_owned(),
        role,
        avatar: None,
        permissions: role.permissions().to_vec(),
        hospital: hospital.map(str::to_owned),
        department: Some(department.to_owned()),
        last_login: None,
    };

    vec![
        seed("1", UserRole::Admin, "Admin", "User", None, "Administration"),
        seed(
            "2",
            UserRole::Doctor,
            "Sarah",
            "Johnson",
            Some("Central Hospital"),
            "Emergency",
        ),
        seed(
            "3",
            UserRole::Nurse,
            "Emma",
            "Thompson",
            Some("Central Hospital"),
            "ICU",
        ),
        seed(
            "4",
            UserRole::Paramedic,
            "James",
            "Wilson",
            Some("Metropolitan General"),
            "Ambulance",
        ),
        seed(
            "5",
            UserRole::Dispatcher,
            "Maria",
            "Garcia",
            None,
            "Dispatch Center",
        ),
    ]
}
