//! Session lifecycle for the hospital management dashboard
//!
//! The dashboard's patient, doctor and admin views all gate on a single
//! current session. This crate owns that session: it restores it from a
//! key-value store on startup, creates it on login, persists it, and clears
//! it on logout.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use common::MemoryStore;
//! use hms_auth::models::Role;
//! use hms_auth::notify::TracingNotifier;
//! use hms_auth::session::SessionManager;
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = SessionManager::new(Arc::new(MemoryStore::new()), Arc::new(TracingNotifier));
//!     manager.initialize().await;
//!     if manager.login("jane.smith@hospital.com", "password", Role::Patient).await {
//!         println!("{:?}", manager.current_session());
//!     }
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod session;
pub mod transition;

pub use config::{AuthConfig, SessionTimings, StoreBackend};
pub use session::{AuthPhase, SessionManager, SessionState};
