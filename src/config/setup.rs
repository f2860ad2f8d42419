pub mod parameters;

use std::{fs::File, io::Read, path::Path};

use crate::error::Error;

use self::parameters::{simulation::SimParams, Parameters};

pub struct SetupConfig {
    pub parameters: Parameters,
    pub sim_params: SimParams,
}

impl SetupConfig {
    // YAML, or JSON for a `.json` extension.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let parameters: Parameters = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&contents)?,
            _ => serde_yaml::from_str(&contents)?,
        };
        Self::from_parameters(parameters)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, Error> {
        Self::from_parameters(serde_yaml::from_str(contents)?)
    }

    pub fn from_parameters(parameters: Parameters) -> Result<Self, Error> {
        let sim_params = parameters.as_params()?;
        Ok(SetupConfig {
            parameters,
            sim_params,
        })
    }

    pub fn print(&self) {
        let geometry = &self.parameters.geometry;
        let sim_params = &self.sim_params;
        let k = &sim_params.kinematics;
        println!(
            "\
Geometry:
  Section: {designation} ({trailing_edge:?} trailing edge)
  Chord: {chord} m
  Nodes: {n}

Flow:
  Freestream: ({u_inf}, {v_inf}) m/s

Motion: {motion}
  Mean angle of attack: {alpha0:.2} deg
  Pitch amplitude: {alpha1:.2} deg
  Plunge amplitude: {h1} m
  Angular frequency: {omega:.3} rad/s
  Pitch axis: ({x_pitch}, {y_pitch})

Simulation:
  Wake: {wake:?}
  Timestep: {dt:.4e} s
  Steps: {n_steps}
  Newton-Raphson: tolerance {tol:e}, epsilon {eps:e}, at most {max_it} iterations ({jac:?})

Derived parameters (for info only):
  Reference time: {t_ref:.4} s
  Simulated time: {t_max:.4} s",
            designation = geometry.designation(),
            trailing_edge = geometry.trailing_edge,
            chord = sim_params.chord,
            n = sim_params.body_nodes.len(),
            u_inf = sim_params.freestream.x,
            v_inf = sim_params.freestream.y,
            motion = self.parameters.motion.name(),
            alpha0 = k.alpha0.to_degrees(),
            alpha1 = k.alpha1.to_degrees(),
            h1 = k.h1,
            omega = k.omega,
            x_pitch = k.pitch_axis.x,
            y_pitch = k.pitch_axis.y,
            wake = sim_params.wake,
            dt = sim_params.dt,
            n_steps = sim_params.n_steps,
            tol = sim_params.newton.tolerance,
            eps = sim_params.newton.epsilon,
            max_it = sim_params.newton.max_iterations,
            jac = sim_params.newton.jacobian,
            t_ref = k.reference_time,
            t_max = sim_params.t_max(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::setup::parameters::simulation::{JacobianScheme, WakeModel};
    use approx::assert_relative_eq;

    const PITCH_PLUNGE: &str = "
geometry:
  n: 101
  chord: 0.1
  max_camber: 0
  camber_position: 0
  thickness: 12
  trailing_edge: Closed
flow:
  q_inf: 0.4
  v_inf: 0.0
motion:
  type: PitchPlunge
  reduced_frequency: 1.2
  h0: 0.0
  phi_h: 0.0
  alpha0: 0.0
simulation:
  wake: Free
  tolerance: 1.0e-6
  epsilon: 1.0e-8
  max_iterations: 50
  jacobian: Forward
  ncycles: 3
  nsteps: 80
";

    #[test]
    fn test_happy() {
        let config = SetupConfig::from_yaml_str(PITCH_PLUNGE).unwrap();
        let sim_params = &config.sim_params;
        assert_eq!(sim_params.body_nodes.len(), 101);
        assert_eq!(sim_params.n_steps, 241);
        assert_eq!(sim_params.wake, WakeModel::Free);
        assert_eq!(sim_params.newton.jacobian, JacobianScheme::Forward);
        assert_eq!(sim_params.streamline.panels, 200);
        assert_relative_eq!(sim_params.streamline.length, 1.0, epsilon = 1e-12);
        assert_relative_eq!(sim_params.kinematics.omega, 9.6, epsilon = 1e-12);
        assert_relative_eq!(
            sim_params.dt * 80.0,
            sim_params.kinematics.reference_time,
            epsilon = 1e-12
        );
        assert_relative_eq!(sim_params.t_max(), 3.0 * sim_params.kinematics.reference_time, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_zero_thickness() {
        let contents = PITCH_PLUNGE.replace("thickness: 12", "thickness: 0");
        assert!(matches!(
            SetupConfig::from_yaml_str(&contents),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let contents = PITCH_PLUNGE.replace("type: PitchPlunge", "type: Flapping");
        assert!(matches!(SetupConfig::from_yaml_str(&contents), Err(Error::Yaml(_))));
    }
}
