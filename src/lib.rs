//! Client library for the Cluster Director control plane.
//!
//! The control-plane API is partitioned by region and has no cross-region
//! listing endpoint, so the interesting part of this crate is the
//! [`director::inventory::Inventory`]: it discovers the supported regions
//! once, fans out per-region cluster queries, and caches the results so that
//! name/zone lookups work without a shared session.

pub mod config;
pub mod director;
pub mod error;
pub mod gcp;
pub mod ssh;

/// Version injected at compile time via CDCTL_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("CDCTL_VERSION") {
    Some(v) => v,
    None => "dev",
};
