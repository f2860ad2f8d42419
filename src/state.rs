use nalgebra::{DVector, Point2, Vector2};

// A shed point vortex. Strength is fixed once shed; position is convected.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct WakeVortex {
    pub position: Point2<f64>,
    pub strength: f64,
}

// Trial geometry of the newly shed wake panel.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct WakePanelGuess {
    pub length: f64,
    pub angle: f64,
}

#[derive(Clone)]
pub struct SimState {
    pub wake: Vec<WakeVortex>,
    // Bound circulation at the end of the previous step.
    pub gamma_old: f64,
    // Converged wake-panel geometry of the previous step, used as the next
    // Newton-Raphson starting point.
    pub wake_panel_guess: WakePanelGuess,
    // Control-point potentials of the previous step; None before the first.
    pub phi_old: Option<DVector<f64>>,
    pub t: f64,
    pub step: usize,
}

impl SimState {
    pub fn new(initial_guess: WakePanelGuess) -> SimState {
        SimState {
            wake: Vec::new(),
            gamma_old: 0.0,
            wake_panel_guess: initial_guess,
            phi_old: None,
            t: 0.0,
            step: 0,
        }
    }

    pub fn shed_circulation(&self) -> f64 {
        self.wake.iter().map(|w| w.strength).sum()
    }
}

// A step summary is a summary of what happened or was computed during a single step.

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct SurfaceSummary {
    pub control_points: Vec<Point2<f64>>,
    pub cp: Vec<f64>,
    pub phi: Vec<f64>,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct StepSummary {
    pub step: usize,
    pub t: f64,
    pub alpha: f64,
    pub nodes: Vec<Point2<f64>>,
    pub gamma: Vec<f64>,
    pub gamma_wake_panel: f64,
    pub wake_panel_length: f64,
    pub wake_panel_angle: f64,
    pub wake_panel_velocity: Vector2<f64>,
    pub newton_iterations: usize,
    pub n_wake: usize,
    pub surface: SurfaceSummary,
    pub cn: f64,
    pub ca: f64,
    // Bound plus shed circulation; zero up to round-off.
    pub total_circulation: f64,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct SteadySolution {
    pub alpha: f64,
    pub nodes: Vec<Point2<f64>>,
    pub gamma: Vec<f64>,
    pub circulation: f64,
    pub surface: SurfaceSummary,
    pub cn: f64,
    pub ca: f64,
    pub cl_kutta_joukowski: f64,
}
