//! Content-based hashing for run IDs.

use cf_sim::CavityConfig;
use sha2::{Digest, Sha256};

/// Run id derived from the configuration and solver version. Identical
/// inputs give identical ids since the solver is deterministic.
pub fn compute_run_id(config: &CavityConfig, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());
    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    // Short prefix is plenty for a local run directory
    format!("{:x}", result)[..16].to_string()
}
