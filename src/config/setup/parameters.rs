use crate::error::Error;

use self::{
    flow::FlowParams,
    geometry::GeometryParams,
    motion::MotionParams,
    simulation::{NewtonParams, SimParams, SimulationParams, StreamlineParams},
};

pub mod flow;
pub mod geometry;
pub mod motion;
pub mod simulation;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct Parameters {
    pub geometry: GeometryParams,
    pub flow: FlowParams,
    pub motion: MotionParams,
    pub simulation: SimulationParams,
}

impl Parameters {
    pub fn validate(&self) -> Result<(), Error> {
        let s = &self.simulation;
        if s.nsteps == 0 || s.ncycles == 0 {
            return Err(Error::InvalidConfig(
                "ncycles and nsteps must be at least 1".to_string(),
            ));
        }
        if !(s.tolerance > 0.0) || !(s.epsilon > 0.0) || s.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "Newton-Raphson tolerance, epsilon and max_iterations must be positive".to_string(),
            ));
        }
        if s.streamline_panels == 0 || !(s.streamline_length > 0.0) {
            return Err(Error::InvalidConfig(
                "leading-edge streamline needs a positive length and panel count".to_string(),
            ));
        }
        if !(s.surface_offset > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "surface offset must be positive, got {}",
                s.surface_offset
            )));
        }
        self.geometry.airfoil().validate()
    }

    pub fn as_params(&self) -> Result<SimParams, Error> {
        self.validate()?;
        let chord = self.geometry.chord;
        let freestream = self.flow.freestream(chord)?;
        let kinematics = self.motion.kinematics(chord, freestream);
        let body_nodes = self.geometry.airfoil().nodes(self.geometry.n)?;
        let s = &self.simulation;
        Ok(SimParams {
            chord,
            q_inf: freestream.x,
            freestream,
            dt: kinematics.reference_time / s.nsteps as f64,
            n_steps: s.ncycles * s.nsteps + 1,
            wake: s.wake,
            newton: NewtonParams {
                tolerance: s.tolerance,
                epsilon: s.epsilon,
                max_iterations: s.max_iterations,
                jacobian: s.jacobian,
            },
            streamline: StreamlineParams {
                panels: s.streamline_panels,
                length: s.streamline_length * chord,
            },
            surface_offset: s.surface_offset,
            kinematics,
            body_nodes,
        })
    }
}
