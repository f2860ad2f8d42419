use std::f64::consts::PI;

use nalgebra::{point, DVector, Point2, Vector2};

use crate::{
    config::setup::parameters::simulation::StreamlineParams,
    error::Error,
    geometry::panel::PanelChain,
    state::SurfaceSummary,
};

use super::{bound::bound_u, common::InducedFlow};

#[derive(Clone, Debug)]
pub struct Loads {
    pub control_points: Vec<Point2<f64>>,
    pub cp: DVector<f64>,
    // Control-point potentials.
    pub phi: DVector<f64>,
    pub cn: f64,
    pub ca: f64,
}

impl Loads {
    pub fn surface_summary(&self) -> SurfaceSummary {
        SurfaceSummary {
            control_points: self.control_points.clone(),
            cp: self.cp.iter().copied().collect(),
            phi: self.phi.iter().copied().collect(),
        }
    }
}

// Stations along the stagnation streamline, clustered towards the leading
// edge, from x_le - length to x_le.
pub fn streamline_stations(x_le: f64, params: &StreamlineParams) -> Vec<f64> {
    let z = params.panels as f64;
    (0..=params.panels)
        .map(|i| x_le - (1.0 - (i as f64 * PI / (2.0 * z)).sin()) * params.length)
        .collect()
}

// Potential at the leading edge, integrating the induced x-velocity along
// the upstream stagnation streamline from a point where it is negligible.
pub fn leading_edge_potential(
    leading_edge: Point2<f64>,
    params: &StreamlineParams,
    flow: &InducedFlow,
) -> Result<f64, Error> {
    let xs = streamline_stations(leading_edge.x, params);
    let midpoints: Vec<Point2<f64>> = xs
        .windows(2)
        .map(|w| point![0.5 * (w[0] + w[1]), leading_edge.y])
        .collect();
    let u = flow.evaluate_free(&midpoints)?;
    Ok(xs
        .windows(2)
        .zip(u.iter())
        .map(|(w, v)| v.x * (w[1] - w[0]).abs())
        .sum())
}

// Nodal potentials by integrating the tangential induced velocity away from
// the leading edge along each surface.
pub fn node_potentials(chain: &PanelChain, phi_le: f64, induced: &[Vector2<f64>]) -> DVector<f64> {
    let n = chain.n_nodes();
    let m = chain.leading_edge_index();
    let increments: Vec<f64> = chain
        .panels
        .iter()
        .zip(induced.iter())
        .map(|(p, v)| p.tangent().dot(v) * p.length())
        .collect();
    let mut phi = DVector::zeros(n);
    phi[m] = phi_le;
    for j in (0..m).rev() {
        phi[j] = phi[j + 1] - increments[j];
    }
    for j in (m + 1)..n {
        phi[j] = phi[j - 1] + increments[j - 1];
    }
    phi
}

pub fn control_point_potentials(node_phi: &DVector<f64>) -> DVector<f64> {
    DVector::from_fn(node_phi.len() - 1, |i, _| 0.5 * (node_phi[i] + node_phi[i + 1]))
}

// Backward difference; zero when there is no previous potential.
pub fn dphi_dt(phi: &DVector<f64>, phi_old: Option<&DVector<f64>>, dt: f64) -> DVector<f64> {
    match phi_old {
        Some(phi_old) => (phi - phi_old) / dt,
        None => DVector::zeros(phi.len()),
    }
}

// Unsteady Bernoulli.
pub fn pressure_coefficients(
    velocity: &[Vector2<f64>],
    dphi_dt: &DVector<f64>,
    q_inf: f64,
) -> DVector<f64> {
    let q2 = q_inf * q_inf;
    DVector::from_fn(velocity.len(), |i, _| {
        1.0 - velocity[i].norm_squared() / q2 - 2.0 * dphi_dt[i] / q2
    })
}

// Normal and axial force coefficients in inertial axes.
pub fn force_coefficients(chain: &PanelChain, cp: &DVector<f64>, chord: f64) -> (f64, f64) {
    let (mut cn, mut ca) = (0.0, 0.0);
    for (p, cp) in chain.panels.iter().zip(cp.iter()) {
        let normal = p.normal();
        cn -= cp * p.length() * normal.y;
        ca -= cp * p.length() * normal.x;
    }
    (cn / chord, ca / chord)
}

pub struct LoadInputs<'a> {
    pub streamline: &'a StreamlineParams,
    pub surface_offset: f64,
    pub q_inf: f64,
    pub chord: f64,
    pub dt: f64,
}

// Loads on the body from the flow at one instant; `relative` gives the
// kinematic relative flow velocity at a point.
pub fn unsteady_loads<F>(
    inputs: &LoadInputs,
    flow: &InducedFlow,
    phi_old: Option<&DVector<f64>>,
    relative: F,
) -> Result<Loads, Error>
where
    F: Fn(&Point2<f64>) -> Vector2<f64>,
{
    let chain = flow.chain;
    let points = chain.offset_control_points(inputs.surface_offset);
    let induced = flow.evaluate_free(&points)?;

    let phi_le = leading_edge_potential(chain.leading_edge(), inputs.streamline, flow)?;
    let phi = control_point_potentials(&node_potentials(chain, phi_le, &induced));
    let dphi = dphi_dt(&phi, phi_old, inputs.dt);

    let velocity: Vec<Vector2<f64>> = points
        .iter()
        .zip(induced.iter())
        .map(|(x, v)| v + relative(x))
        .collect();
    let cp = pressure_coefficients(&velocity, &dphi, inputs.q_inf);
    let (cn, ca) = force_coefficients(chain, &cp, inputs.chord);
    Ok(Loads {
        control_points: points,
        cp,
        phi,
        cn,
        ca,
    })
}

#[derive(Clone, Debug)]
pub struct SteadyLoads {
    pub control_points: Vec<Point2<f64>>,
    pub cp: DVector<f64>,
    pub cn: f64,
    pub ca: f64,
    pub cl_kutta_joukowski: f64,
}

pub fn steady_loads(
    chain: &PanelChain,
    gamma: &DVector<f64>,
    freestream: Vector2<f64>,
    chord: f64,
    surface_offset: f64,
) -> Result<SteadyLoads, Error> {
    let q_inf = freestream.x;
    let points = chain.offset_control_points(surface_offset);
    let velocity = points
        .iter()
        .map(|x| bound_u(chain, gamma, *x).map(|v| v + freestream))
        .collect::<Result<Vec<_>, Error>>()?;
    let cp = pressure_coefficients(&velocity, &DVector::zeros(points.len()), q_inf);
    let (cn, ca) = force_coefficients(chain, &cp, chord);
    let cl_kutta_joukowski = 2.0 * chain.circulation(gamma) / (chord * q_inf);
    Ok(SteadyLoads {
        control_points: points,
        cp,
        cn,
        ca,
        cl_kutta_joukowski,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dynamics::bound::solve_steady,
        geometry::airfoil::{Naca4, TrailingEdge},
        numerics::interface::{VortexContext, VortexContextTrait},
    };
    use approx::assert_relative_eq;
    use nalgebra::{vector, Rotation2};

    fn chain(n: usize, thickness: f64, alpha: f64) -> PanelChain {
        let naca = Naca4 {
            chord: 1.0,
            max_camber: 0.0,
            camber_position: 0.0,
            thickness,
            trailing_edge: TrailingEdge::Closed,
        };
        let rot = Rotation2::new(-alpha);
        PanelChain::from_nodes(naca.nodes(n).unwrap().iter().map(|p| rot * p).collect()).unwrap()
    }

    #[test]
    fn test_streamline_stations_cluster_at_leading_edge() {
        let params = StreamlineParams {
            panels: 200,
            length: 10.0,
        };
        let xs = streamline_stations(0.0, &params);
        assert_eq!(xs.len(), 201);
        assert_relative_eq!(xs[0], -10.0);
        assert_relative_eq!(xs[200], 0.0, epsilon = 1e-12);
        assert!(xs[200] - xs[199] < xs[1] - xs[0]);
    }

    #[test]
    fn test_node_potentials_integrate_from_leading_edge() {
        // Unit tangential velocity on a square chain.
        let chain = PanelChain::from_nodes(vec![
            point![1.0, 0.0],
            point![1.0, -1.0],
            point![0.0, -1.0],
            point![0.0, 0.0],
            point![1.0, 0.0],
        ])
        .unwrap();
        let induced: Vec<Vector2<f64>> = chain.panels.iter().map(|p| p.tangent()).collect();
        let phi = node_potentials(&chain, 2.0, &induced);
        assert_eq!(chain.leading_edge_index(), 2);
        assert_relative_eq!(phi, DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0]));
        assert_relative_eq!(
            control_point_potentials(&phi),
            DVector::from_vec(vec![0.5, 1.5, 2.5, 3.5])
        );
    }

    #[test]
    fn test_first_step_has_no_time_derivative() {
        let phi = DVector::from_vec(vec![1.0, 2.0]);
        assert_eq!(dphi_dt(&phi, None, 0.1), DVector::zeros(2));
        let old = DVector::from_vec(vec![0.5, 2.5]);
        assert_relative_eq!(dphi_dt(&phi, Some(&old), 0.5), DVector::from_vec(vec![1.0, -1.0]));
    }

    #[test]
    fn test_pressure_at_stagnation_and_freestream() {
        let cp = pressure_coefficients(
            &[vector![0.0, 0.0], vector![2.0, 0.0], vector![2.0, 0.0]],
            &DVector::from_vec(vec![0.0, 0.0, 1.0]),
            2.0,
        );
        assert_relative_eq!(cp, DVector::from_vec(vec![1.0, 0.0, -0.5]));
    }

    #[test]
    fn test_steady_lift_by_pressure_matches_kutta_joukowski() {
        let alpha = 5f64.to_radians();
        let chain = chain(101, 0.12, alpha);
        let freestream = vector![1.0, 0.0];
        let gamma = solve_steady(&chain, freestream, 0.0).unwrap();
        let loads = steady_loads(&chain, &gamma, freestream, 1.0, 1e-4).unwrap();
        assert!(loads.cl_kutta_joukowski > 0.5);
        let relative = (loads.cn - loads.cl_kutta_joukowski).abs() / loads.cl_kutta_joukowski;
        assert!(relative < 0.1, "cn = {}, cl_kj = {}", loads.cn, loads.cl_kutta_joukowski);
        // No drag in steady potential flow.
        assert!(loads.ca.abs() < 0.05, "ca = {}", loads.ca);
    }

    #[test]
    fn test_unsteady_loads_reduce_to_steady_without_wake() {
        // With no wake and no time derivative, the unsteady integrator sees
        // the same flow as the steady one.
        let alpha = 3f64.to_radians();
        let chain = chain(61, 0.12, alpha);
        let freestream = vector![1.0, 0.0];
        let gamma = solve_steady(&chain, freestream, 0.0).unwrap();
        let context = VortexContext::new();
        let flow = InducedFlow {
            chain: &chain,
            gamma: &gamma,
            wake_panel: None,
            wake: &[],
            context: &context,
        };
        let streamline = StreamlineParams {
            panels: 200,
            length: 10.0,
        };
        let inputs = LoadInputs {
            streamline: &streamline,
            surface_offset: 1e-4,
            q_inf: 1.0,
            chord: 1.0,
            dt: 0.01,
        };
        let loads = unsteady_loads(&inputs, &flow, None, |_| freestream).unwrap();
        let steady = steady_loads(&chain, &gamma, freestream, 1.0, 1e-4).unwrap();
        assert_relative_eq!(loads.cn, steady.cn, epsilon = 1e-10);
        assert_relative_eq!(loads.ca, steady.ca, epsilon = 1e-10);
        assert_eq!(loads.phi.len(), 60);
    }
}
