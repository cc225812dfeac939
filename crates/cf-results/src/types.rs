//! Stored run data types.

use crate::{ResultsError, ResultsResult};
use cf_core::Real;
use cf_sim::{CavityConfig, History, Snapshot};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub timestamp: String,
    pub solver_version: String,
    pub config: CavityConfig,
    pub status: RunStatus,
    pub snapshot_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability_warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_max_divergence: Option<Real>,
}

impl RunManifest {
    /// Manifest for a finished run, stamped with the current UTC time.
    pub fn completed(
        run_id: RunId,
        solver_version: &str,
        config: &CavityConfig,
        history: &History,
    ) -> Self {
        Self {
            run_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            solver_version: solver_version.to_string(),
            config: config.clone(),
            status: RunStatus::Completed,
            snapshot_count: history.len(),
            stability_warning: history.stability_warning().map(|w| w.to_string()),
            final_max_divergence: history.last().map(|s| s.max_divergence),
        }
    }

    /// Manifest for a run that aborted with `message`.
    pub fn failed(
        run_id: RunId,
        solver_version: &str,
        config: &CavityConfig,
        message: String,
    ) -> Self {
        Self {
            run_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            solver_version: solver_version.to_string(),
            config: config.clone(),
            status: RunStatus::Failed { message },
            snapshot_count: 0,
            stability_warning: None,
            final_max_divergence: None,
        }
    }
}

/// One history snapshot in storage form. Fields are stored as `field[i][j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub step: usize,
    pub time_s: Real,
    pub max_divergence: Real,
    pub kinetic_energy: Real,
    pub u: Vec<Vec<Real>>,
    pub v: Vec<Vec<Real>>,
    pub p: Vec<Vec<Real>>,
}

impl SnapshotRecord {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            step: snapshot.step,
            time_s: snapshot.time,
            max_divergence: snapshot.max_divergence,
            kinetic_energy: snapshot.kinetic_energy,
            u: matrix_rows(&snapshot.u),
            v: matrix_rows(&snapshot.v),
            p: matrix_rows(&snapshot.p),
        }
    }

    pub fn u_matrix(&self) -> ResultsResult<DMatrix<Real>> {
        rows_matrix("u", &self.u)
    }

    pub fn v_matrix(&self) -> ResultsResult<DMatrix<Real>> {
        rows_matrix("v", &self.v)
    }

    pub fn p_matrix(&self) -> ResultsResult<DMatrix<Real>> {
        rows_matrix("p", &self.p)
    }

    /// Face velocities averaged onto cell centers as `x,y,u,v,p,speed` CSV,
    /// one row per cell, for a `lx x ly` domain.
    pub fn cell_centered_csv(&self, lx: Real, ly: Real) -> ResultsResult<String> {
        let u = self.u_matrix()?;
        let v = self.v_matrix()?;
        let p = self.p_matrix()?;
        let (nx, ny) = p.shape();
        check_shape("u", &u, (nx + 1, ny))?;
        check_shape("v", &v, (nx, ny + 1))?;

        let dx = lx / nx as Real;
        let dy = ly / ny as Real;
        let mut csv = String::from("x,y,u,v,p,speed\n");
        for j in 0..ny {
            for i in 0..nx {
                let uc = 0.5 * (u[(i, j)] + u[(i + 1, j)]);
                let vc = 0.5 * (v[(i, j)] + v[(i, j + 1)]);
                csv.push_str(&format!(
                    "{},{},{},{},{},{}\n",
                    (i as Real + 0.5) * dx,
                    (j as Real + 0.5) * dy,
                    uc,
                    vc,
                    p[(i, j)],
                    uc.hypot(vc)
                ));
            }
        }
        Ok(csv)
    }
}

pub fn records_from_history(history: &History) -> Vec<SnapshotRecord> {
    history.iter().map(SnapshotRecord::from_snapshot).collect()
}

fn matrix_rows(m: &DMatrix<Real>) -> Vec<Vec<Real>> {
    m.row_iter().map(|row| row.iter().copied().collect()).collect()
}

fn rows_matrix(what: &'static str, rows: &[Vec<Real>]) -> ResultsResult<DMatrix<Real>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|r| r.len() != ncols) {
        return Err(ResultsError::MalformedField {
            what,
            message: format!("row {bad} has {} entries, expected {ncols}", rows[bad].len()),
        });
    }
    Ok(DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j]))
}

fn check_shape(
    what: &'static str,
    m: &DMatrix<Real>,
    expected: (usize, usize),
) -> ResultsResult<()> {
    if m.shape() != expected {
        return Err(ResultsError::MalformedField {
            what,
            message: format!("shape {:?} does not match p, expected {:?}", m.shape(), expected),
        });
    }
    Ok(())
}
