//! Storage abstraction layer
//!
//! Trait-based capabilities the export engine consumes, plus the factory
//! that wires them to concrete stores.

pub mod factory;
pub mod packages;
pub mod traits;

pub use factory::{create_source_stores, create_state_storage, SourceStores};
pub use packages::SourcePackageRepository;
pub use traits::{ConfigSource, ConfigTarget, FileRepository, PackageRepository, StateStorage};
