//! Local filesystem implementations of the storage traits

pub mod config_store;
pub mod file_repository;
pub mod state_store;

pub use config_store::FileStorage;
pub use file_repository::DirectoryFileRepository;
pub use state_store::JsonStateStorage;
