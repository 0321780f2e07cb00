//! External system integrations for Sitepack.
//!
//! - [`storage`] - Storage capability traits and the store factory
//! - [`filesystem`] - Local directory implementations of those traits
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate I/O from the export
//! engine and enable testing with in-memory implementations. The engine only
//! sees `Arc<dyn Trait + Send + Sync>` handles.
//!
//! ```rust,no_run
//! use sitepack::adapters::storage::create_source_stores;
//! use sitepack::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("sitepack.toml")?;
//! let stores = create_source_stores(&config);
//!
//! for name in stores.config.list_all().await? {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod filesystem;
pub mod storage;
