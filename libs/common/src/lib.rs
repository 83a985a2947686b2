//! Common library for the hospital dashboard
//!
//! This crate provides the key-value persistence shared by the dashboard
//! services: the [`store::KeyValueStore`] abstraction together with an
//! in-memory, a JSON file and a Redis back end.
//!
//! ```rust,no_run
//! use common::{FileStore, KeyValueStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::new("hms-storage.json");
//!     store.set("hms_invoices", "[]").await?;
//!     println!("Invoices: {:?}", store.get("hms_invoices").await?);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod file;
pub mod store;

pub use cache::{RedisConfig, RedisPool};
pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use store::{KeyValueStore, MemoryStore};
