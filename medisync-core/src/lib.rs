//! Framework-free core of the MediSync dashboard.
//!
//! Everything the browser shell needs that is not markup lives here: the
//! session service and its auth client seam, durable key-value storage,
//! the toast queue, theme and settings preferences, the route guard, the
//! per-page fixture stores, and form validation.

pub mod auth_client;
pub mod config;
pub mod delay;
pub mod error;
pub mod notifications;
pub mod offline;
pub mod records;
pub mod routes;
pub mod session;
pub mod settings;
pub mod storage;
pub mod theme;
pub mod user;
pub mod validation;

pub use auth_client::{AuthClient, AuthGrant, FixtureAuthClient, RegisterRequest};
pub use config::AppConfig;
pub use error::{AuthError, RecordError, StorageError};
pub use routes::Route;
pub use session::{SessionService, SessionState};
pub use storage::{KeyValueStore, MemoryStore};
pub use user::{Permission, User, UserRole};
