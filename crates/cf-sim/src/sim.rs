//! Simulation driver: per-step projection pipeline and run loop.

use crate::advection::advect_diffuse;
use crate::boundary::apply_boundary_conditions;
use crate::divergence::{divergence, max_abs_divergence};
use crate::error::{SimError, SimResult};
use crate::history::{History, Snapshot};
use crate::stability::check_diffusion_stability;
use cf_core::{Grid, Real, ensure_finite, ensure_positive, max_abs};
use cf_solver::PressureSolver;

/// Options for a cavity run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Number of time steps
    pub steps: usize,
    /// Fixed time step
    pub dt: Real,
    /// Reynolds number; viscosity is `1 / reynolds`
    pub reynolds: Real,
    /// Tangential velocity of the top wall
    pub lid_velocity: Real,
    /// Approximate number of snapshots to keep
    pub snapshot_target: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            steps: 500,
            dt: 0.01,
            reynolds: 100.0,
            lid_velocity: 1.0,
            snapshot_target: 50,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.dt, "dt")?;
        ensure_positive(self.reynolds, "reynolds")?;
        ensure_finite(self.lid_velocity, "lid_velocity")?;
        if self.snapshot_target == 0 {
            return Err(SimError::InvalidArg {
                what: "snapshot_target must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn viscosity(&self) -> Real {
        1.0 / self.reynolds
    }

    /// Steps between snapshots: `max(1, steps / snapshot_target)`.
    pub fn snapshot_every(&self) -> usize {
        (self.steps / self.snapshot_target.max(1)).max(1)
    }
}

/// Per-step diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Max |div| of the provisional field fed to the pressure solve
    pub provisional_divergence: Real,
}

/// One projection step, owning the pressure solver and its factorization.
pub struct CavityStepper {
    pressure: PressureSolver,
    dt: Real,
    nu: Real,
    lid_velocity: Real,
}

impl CavityStepper {
    pub fn new(options: &SimOptions) -> SimResult<Self> {
        options.validate()?;
        Ok(Self {
            pressure: PressureSolver::new(),
            dt: options.dt,
            nu: options.viscosity(),
            lid_velocity: options.lid_velocity,
        })
    }

    pub fn factorization_count(&self) -> usize {
        self.pressure.factorization_count()
    }

    /// Advance `grid` by one step.
    ///
    /// advect-diffuse -> walls -> divergence -> pressure -> project -> walls.
    /// On error the grid keeps the previous step's fields.
    pub fn step(&mut self, grid: &mut Grid) -> SimResult<StepReport> {
        let (dx, dy) = (grid.dx(), grid.dy());

        let (mut u_star, mut v_star) = advect_diffuse(&grid.u, &grid.v, dx, dy, self.dt, self.nu);
        apply_boundary_conditions(&mut u_star, &mut v_star, self.lid_velocity);

        let div = divergence(&u_star, &v_star, dx, dy);
        let p = self.pressure.solve(&div, dx, dy, self.dt)?;

        let (mut u, mut v) = crate::projection::project(&u_star, &v_star, &p, dx, dy, self.dt);
        apply_boundary_conditions(&mut u, &mut v, self.lid_velocity);

        grid.u = u;
        grid.v = v;
        grid.p = p;

        Ok(StepReport {
            provisional_divergence: max_abs(&div),
        })
    }
}

/// Driver lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Initializing,
    Stepping { step: usize },
    Done,
}

/// Progress event emitted after every step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimProgress {
    pub step: usize,
    pub steps: usize,
    pub sim_time: Real,
    /// Present on snapshot steps
    pub max_divergence: Option<Real>,
}

impl SimProgress {
    pub fn fraction_complete(&self) -> f64 {
        if self.steps == 0 {
            1.0
        } else {
            (self.step + 1) as f64 / self.steps as f64
        }
    }
}

/// Marches a grid through `steps` projection steps and records history.
pub struct SimulationDriver {
    options: SimOptions,
    stepper: CavityStepper,
    state: DriverState,
}

impl SimulationDriver {
    pub fn new(options: SimOptions) -> SimResult<Self> {
        let stepper = CavityStepper::new(&options)?;
        Ok(Self {
            options,
            stepper,
            state: DriverState::Initializing,
        })
    }

    /// `Done` after a completed run; `Stepping` names the failed step if a
    /// run aborted.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Run to completion. A driver runs once.
    pub fn run(
        &mut self,
        grid: &mut Grid,
        mut progress: Option<&mut dyn FnMut(SimProgress)>,
    ) -> SimResult<History> {
        if self.state != DriverState::Initializing {
            return Err(SimError::InvalidArg {
                what: format!("driver already ran (state {:?})", self.state),
            });
        }
        grid.check_shapes()?;

        let opts = self.options.clone();
        let (dx, dy) = (grid.dx(), grid.dy());
        let nu = opts.viscosity();

        tracing::info!(
            nx = grid.nx(),
            ny = grid.ny(),
            nu,
            dx,
            dy,
            steps = opts.steps,
            "starting cavity run"
        );

        let warning = check_diffusion_stability(opts.dt, dx, dy, nu);
        if let Some(w) = &warning {
            tracing::warn!(dt = w.dt, limit = w.limit, "{w}");
        }

        let mut history = History::new(warning);
        let every = opts.snapshot_every();

        for step in 0..opts.steps {
            self.transition(DriverState::Stepping { step });
            self.stepper.step(grid)?;

            let sim_time = (step + 1) as Real * opts.dt;
            let mut max_divergence = None;
            if step % every == 0 {
                let div = max_abs_divergence(&grid.u, &grid.v, dx, dy);
                tracing::debug!(step, steps = opts.steps, max_divergence = div, "snapshot");
                history.push(Snapshot::capture(step, sim_time, grid, div));
                max_divergence = Some(div);
            }

            if let Some(cb) = progress.as_deref_mut() {
                cb(SimProgress {
                    step,
                    steps: opts.steps,
                    sim_time,
                    max_divergence,
                });
            }
        }

        self.transition(DriverState::Done);
        tracing::info!(
            snapshots = history.len(),
            factorizations = self.stepper.factorization_count(),
            "cavity run complete"
        );
        Ok(history)
    }

    fn transition(&mut self, next: DriverState) {
        tracing::trace!(from = ?self.state, to = ?next, "driver state");
        self.state = next;
    }
}

/// Run a cavity simulation on `grid`.
pub fn run(grid: &mut Grid, options: &SimOptions) -> SimResult<History> {
    run_with_progress(grid, options, None)
}

/// Run a cavity simulation, reporting every step to `progress`.
pub fn run_with_progress(
    grid: &mut Grid,
    options: &SimOptions,
    progress: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<History> {
    SimulationDriver::new(options.clone())?.run(grid, progress)
}
