//! Hospital registry HTTP API for MediSync.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod store;

pub use config::ApiConfig;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
pub use store::HospitalStore;
