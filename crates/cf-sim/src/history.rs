//! Snapshot history of a run.

use crate::stability::StabilityWarning;
use cf_core::{Grid, Real};
use nalgebra::DMatrix;

/// Deep copy of the fields after one step.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// 0-based index of the step that produced this state
    pub step: usize,
    /// Simulated time at the end of that step
    pub time: Real,
    pub u: DMatrix<Real>,
    pub v: DMatrix<Real>,
    pub p: DMatrix<Real>,
    /// Max |div| of `(u, v)`
    pub max_divergence: Real,
    pub kinetic_energy: Real,
}

impl Snapshot {
    pub(crate) fn capture(step: usize, time: Real, grid: &Grid, max_divergence: Real) -> Self {
        Self {
            step,
            time,
            u: grid.u.clone(),
            v: grid.v.clone(),
            p: grid.p.clone(),
            max_divergence,
            kinetic_energy: crate::diagnostics::kinetic_energy(&grid.u, &grid.v),
        }
    }
}

/// Append-only sequence of snapshots plus the run's stability advisory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct History {
    snapshots: Vec<Snapshot>,
    stability_warning: Option<StabilityWarning>,
}

impl History {
    pub(crate) fn new(stability_warning: Option<StabilityWarning>) -> Self {
        Self {
            snapshots: Vec::new(),
            stability_warning,
        }
    }

    pub(crate) fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    pub fn stability_warning(&self) -> Option<&StabilityWarning> {
        self.stability_warning.as_ref()
    }
}
