//! Run configuration.

use crate::error::{SimError, SimResult};
use crate::sim::SimOptions;
use cf_core::{Grid, Real, ensure_positive};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to set up one cavity run.
///
/// Loadable from YAML; missing keys fall back to the defaults.
///
/// ```yaml
/// nx: 64
/// ny: 64
/// reynolds: 400.0
/// steps: 2000
/// dt: 0.001
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CavityConfig {
    /// Cells along x
    pub nx: usize,
    /// Cells along y
    pub ny: usize,
    /// Domain width
    pub lx: Real,
    /// Domain height
    pub ly: Real,
    pub reynolds: Real,
    pub steps: usize,
    pub dt: Real,
    pub lid_velocity: Real,
    /// Approximate number of snapshots kept in the history
    pub snapshot_target: usize,
}

impl Default for CavityConfig {
    fn default() -> Self {
        Self {
            nx: 50,
            ny: 50,
            lx: 1.0,
            ly: 1.0,
            reynolds: 100.0,
            steps: 500,
            dt: 0.01,
            lid_velocity: 1.0,
            snapshot_target: 50,
        }
    }
}

impl CavityConfig {
    pub fn from_yaml_str(text: &str) -> SimResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> SimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(SimError::InvalidArg {
                what: format!("grid must have at least one cell, got {}x{}", self.nx, self.ny),
            });
        }
        ensure_positive(self.lx, "lx")?;
        ensure_positive(self.ly, "ly")?;
        self.sim_options().validate()
    }

    pub fn build_grid(&self) -> SimResult<Grid> {
        Ok(Grid::new(self.nx, self.ny, self.lx, self.ly)?)
    }

    pub fn sim_options(&self) -> SimOptions {
        SimOptions {
            steps: self.steps,
            dt: self.dt,
            reynolds: self.reynolds,
            lid_velocity: self.lid_velocity,
            snapshot_target: self.snapshot_target,
        }
    }
}
