use nalgebra::{Point2, Vector2};

use crate::dynamics::kinematics::Kinematics;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeModel {
    // Wake vortices convect with the local flow.
    Free,
    // Wake vortices convect with the freestream only.
    Prescribed,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JacobianScheme {
    Forward,
    Central,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct SimulationParams {
    #[serde(default = "default_wake")]
    pub wake: WakeModel,
    // Newton-Raphson.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_jacobian")]
    pub jacobian: JacobianScheme,
    // Time stepping.
    #[serde(default = "default_ncycles")]
    pub ncycles: usize,
    #[serde(default = "default_nsteps")]
    pub nsteps: usize,
    // Leading-edge potential.
    #[serde(default = "default_streamline_panels")]
    pub streamline_panels: usize,
    // In chords.
    #[serde(default = "default_streamline_length")]
    pub streamline_length: f64,
    #[serde(default = "default_surface_offset")]
    pub surface_offset: f64,
}

fn default_wake() -> WakeModel {
    WakeModel::Free
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_epsilon() -> f64 {
    1e-8
}

fn default_max_iterations() -> usize {
    50
}

fn default_jacobian() -> JacobianScheme {
    JacobianScheme::Forward
}

fn default_ncycles() -> usize {
    3
}

fn default_nsteps() -> usize {
    80
}

fn default_streamline_panels() -> usize {
    200
}

fn default_streamline_length() -> f64 {
    10.0
}

fn default_surface_offset() -> f64 {
    1e-4
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy)]
pub struct NewtonParams {
    pub tolerance: f64,
    // Finite-difference increment.
    pub epsilon: f64,
    pub max_iterations: usize,
    pub jacobian: JacobianScheme,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy)]
pub struct StreamlineParams {
    pub panels: usize,
    // Absolute upstream length.
    pub length: f64,
}

// Everything a run needs, resolved from the setup file.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct SimParams {
    pub chord: f64,
    pub q_inf: f64,
    pub freestream: Vector2<f64>,
    // Time step.
    pub dt: f64,
    // Steps from t = 0 through t_max inclusive.
    pub n_steps: usize,
    pub wake: WakeModel,
    pub newton: NewtonParams,
    pub streamline: StreamlineParams,
    pub surface_offset: f64,
    pub kinematics: Kinematics,
    // Airfoil nodes in the body-fixed frame.
    pub body_nodes: Vec<Point2<f64>>,
}

impl SimParams {
    pub fn t_max(&self) -> f64 {
        (self.n_steps - 1) as f64 * self.dt
    }

    // Time in units of the reference time.
    pub fn nondimensional_time(&self, t: f64) -> f64 {
        t / self.kinematics.reference_time
    }
}
