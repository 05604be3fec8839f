//! Version checks, bump policy and the project's version managers.

pub mod bump;
pub mod module;

pub use bump::{BumpPolicy, BumpResolver, ensure_versions_match, is_breaking, strip_v, versions_match};
pub use module::{CargoModule, CustomModule, NpmModule, VersionModule, bump_version, setup_module};
