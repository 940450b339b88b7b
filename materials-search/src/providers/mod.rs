//! Provider implementations.
//!
//! Each module provides a struct implementing
//! [`crate::provider::MaterialsProvider`] over one data source.

pub mod local;
pub mod remote;

pub use local::LocalProvider;
pub use remote::RemoteProvider;
