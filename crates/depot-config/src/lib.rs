//! Layered configuration loading for the depot resolver and its CLI
//! (spec §10.3): a `ConfigSource` chain of defaults, file layers,
//! environment variables, and CLI overrides, producing a
//! [`ResolverConfig`] matching spec.md §6's Config contract.

pub mod env;
pub mod loader;
pub mod types;
pub mod validate;

pub use env::{DepotEnvVar, EnvConfig};
pub use loader::{CliOverrides, ConfigLoader, ConfigSource};
pub use types::{AutoRemovalConfig, ResolverConfig};
pub use validate::{validate, Severity, ValidationIssue};
