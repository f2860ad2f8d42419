pub mod bound;
pub mod common;
pub mod kinematics;
pub mod loads;
pub mod rollup;
pub mod vortex_solutions;
pub mod wake_panel;

use log::{debug, info};
use nalgebra::Vector2;

use crate::config::run::{RunContext, RunParams};
use crate::config::setup::parameters::simulation::SimParams;
use crate::error::Error;
use crate::geometry::panel::PanelChain;
use crate::geometry::point::free_points;
use crate::numerics::interface::{VortexContext, VortexContextTrait};
use crate::output::Output;
use crate::state::*;

use self::bound::{solve_steady, UnsteadySystem};
use self::common::InducedFlow;
use self::loads::{steady_loads, unsteady_loads, LoadInputs};
use self::wake_panel::WakePanelProblem;

pub fn initial_state(sim_params: &SimParams) -> SimState {
    SimState::new(WakePanelGuess {
        length: sim_params.q_inf * sim_params.dt,
        angle: 0.0,
    })
}

pub fn instantaneous_chain(sim_params: &SimParams, t: f64) -> Result<PanelChain, Error> {
    PanelChain::from_nodes(
        sim_params
            .kinematics
            .nodes_to_inertial(t, &sim_params.body_nodes),
    )
}

// The body at its initial attitude, at rest in the freestream.
pub fn steady_state(sim_params: &SimParams) -> Result<SteadySolution, Error> {
    let chain = instantaneous_chain(sim_params, 0.0)?;
    let gamma = solve_steady(&chain, sim_params.freestream, 0.0)?;
    let loads = steady_loads(
        &chain,
        &gamma,
        sim_params.freestream,
        sim_params.chord,
        sim_params.surface_offset,
    )?;
    info!(
        "Steady solution: circulation={:.6}, cn={:.6}, ca={:.6}, cl_kj={:.6}",
        chain.circulation(&gamma),
        loads.cn,
        loads.ca,
        loads.cl_kutta_joukowski
    );
    Ok(SteadySolution {
        alpha: sim_params.kinematics.alpha(0.0),
        nodes: chain.nodes.clone(),
        gamma: gamma.iter().copied().collect(),
        circulation: chain.circulation(&gamma),
        surface: SurfaceSummary {
            control_points: loads.control_points,
            cp: loads.cp.iter().copied().collect(),
            phi: Vec::new(),
        },
        cn: loads.cn,
        ca: loads.ca,
        cl_kutta_joukowski: loads.cl_kutta_joukowski,
    })
}

pub fn update(
    sim_params: &SimParams,
    sim_state: &mut SimState,
    context: &VortexContext,
) -> Result<StepSummary, Error> {
    let t = sim_state.t;
    let kinematics = &sim_params.kinematics;
    let chain = instantaneous_chain(sim_params, t)?;

    // Wake history and body motion seen by the control points.
    let control_points = chain.control_points();
    let v_wake = context.evaluate(&free_points(&control_points), &sim_state.wake);
    let background: Vec<Vector2<f64>> = control_points
        .iter()
        .zip(v_wake.iter())
        .map(|(x, v)| v + kinematics.relative_velocity(t, x))
        .collect();
    let system = UnsteadySystem::assemble(&chain, &background, sim_state.gamma_old)?;

    let problem = WakePanelProblem {
        chain: &chain,
        system: &system,
        wake: &sim_state.wake,
        context,
        freestream: sim_params.freestream,
        dt: sim_params.dt,
    };
    let wake_panel = problem.solve(sim_state.wake_panel_guess, &sim_params.newton, sim_state.step)?;
    let solution = &wake_panel.state.solution;
    let n = chain.n_nodes();
    debug!(
        "step={}: kutta residual={:e}",
        sim_state.step,
        solution.gamma[0] + solution.gamma[n - 1] + solution.gamma_wake_panel
    );

    // Loads see the wake before it is convected.
    let loads = {
        let flow = InducedFlow {
            chain: &chain,
            gamma: &solution.gamma,
            wake_panel: Some((wake_panel.state.panel, solution.gamma_wake_panel)),
            wake: &sim_state.wake,
            context,
        };
        let inputs = LoadInputs {
            streamline: &sim_params.streamline,
            surface_offset: sim_params.surface_offset,
            q_inf: sim_params.q_inf,
            chord: sim_params.chord,
            dt: sim_params.dt,
        };
        unsteady_loads(&inputs, &flow, sim_state.phi_old.as_ref(), |x| {
            kinematics.relative_velocity(t, x)
        })?
    };

    sim_state.gamma_old = rollup::rollup(
        sim_params.wake,
        &chain,
        &wake_panel,
        &mut sim_state.wake,
        context,
        sim_params.freestream,
        sim_params.dt,
    )?;
    sim_state.wake_panel_guess = wake_panel.guess;
    sim_state.phi_old = Some(loads.phi.clone());

    let summary = StepSummary {
        step: sim_state.step,
        t,
        alpha: kinematics.alpha(t),
        nodes: chain.nodes.clone(),
        gamma: solution.gamma.iter().copied().collect(),
        gamma_wake_panel: solution.gamma_wake_panel,
        wake_panel_length: wake_panel.guess.length,
        wake_panel_angle: wake_panel.guess.angle,
        wake_panel_velocity: wake_panel.state.velocity,
        newton_iterations: wake_panel.iterations,
        n_wake: sim_state.wake.len(),
        surface: loads.surface_summary(),
        cn: loads.cn,
        ca: loads.ca,
        total_circulation: sim_state.gamma_old + sim_state.shed_circulation(),
    };

    // Upate time and step.
    sim_state.t += sim_params.dt;
    sim_state.step += 1;
    Ok(summary)
}

// Advances `n` steps, or to the end of the run if that comes first.
pub fn run_steps(
    sim_params: &SimParams,
    sim_state: &mut SimState,
    context: &VortexContext,
    n: usize,
) -> Result<Vec<StepSummary>, Error> {
    let mut summaries = Vec::with_capacity(n);
    while summaries.len() < n && sim_state.step < sim_params.n_steps {
        summaries.push(update(sim_params, sim_state, context)?);
    }
    Ok(summaries)
}

pub fn run(
    sim_params: &SimParams,
    mut sim_state: SimState,
    run_params: &RunParams,
    run_context: &RunContext,
    output: &mut Output,
) -> Result<Option<StepSummary>, Error> {
    let mut last = None;
    while sim_state.step < sim_params.n_steps {
        let summary = update(sim_params, &mut sim_state, &run_context.vortex_context)?;
        output.write_loads(sim_params, &summary)?;
        info!(
            "step={}/{}, t/T={:.4}, cn={:.5}, ca={:.5}, iterations={}",
            summary.step,
            sim_params.n_steps - 1,
            sim_params.nondimensional_time(summary.t),
            summary.cn,
            summary.ca,
            summary.newton_iterations
        );
        if summary.step % run_params.dstep_view == 0 || sim_state.step == sim_params.n_steps {
            info!("CHECKPOINT: step={}, t = {}", summary.step, summary.t);
            output.write_snapshot(&summary, &sim_state.wake)?;
        }
        last = Some(summary);
    }
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::setup::SetupConfig;
    use approx::assert_relative_eq;

    fn impulsive_start(n: usize, thickness: u32, alpha: f64, nsteps: usize, ncycles: usize, wake: &str) -> SimParams {
        let contents = format!(
            "
geometry:
  n: {n}
  chord: 1.0
  max_camber: 0
  camber_position: 0
  thickness: {thickness}
flow:
  q_inf: 1.0
motion:
  type: ImpulsiveStart
  alpha: {alpha}
  pitch_axis: [0.25, 0.0]
simulation:
  wake: {wake}
  ncycles: {ncycles}
  nsteps: {nsteps}
"
        );
        SetupConfig::from_yaml_str(&contents).unwrap().sim_params
    }

    #[test]
    fn test_steady_thin_section_lift() {
        let sim_params = impulsive_start(101, 2, 5.0, 10, 1, "Free");
        let steady = steady_state(&sim_params).unwrap();
        let thin_airfoil = 2.0 * std::f64::consts::PI * 5f64.to_radians().sin();
        let error = (steady.cl_kutta_joukowski - thin_airfoil).abs() / thin_airfoil;
        assert!(error < 0.05, "cl_kj = {}, expected {}", steady.cl_kutta_joukowski, thin_airfoil);
        let error = (steady.cn - steady.cl_kutta_joukowski).abs() / steady.cl_kutta_joukowski;
        assert!(error < 0.1, "cn = {}, cl_kj = {}", steady.cn, steady.cl_kutta_joukowski);
    }

    #[test]
    fn test_impulsive_start() {
        let sim_params = impulsive_start(41, 12, 5.0, 10, 3, "Free");
        let steady = steady_state(&sim_params).unwrap();
        let mut sim_state = initial_state(&sim_params);
        let context = VortexContext::new();
        let summaries =
            run_steps(&sim_params, &mut sim_state, &context, sim_params.n_steps).unwrap();
        assert_eq!(summaries.len(), 31);

        let circulations: Vec<f64> = summaries
            .iter()
            .map(|s| {
                let gamma = nalgebra::DVector::from_vec(s.gamma.clone());
                PanelChain::from_nodes(s.nodes.clone()).unwrap().circulation(&gamma)
            })
            .collect();
        // Wagner-like growth towards the steady circulation.
        assert!(circulations[0] > 0.0);
        for w in circulations.windows(2) {
            assert!(w[1] >= w[0] - 1e-3 * steady.circulation, "{:?}", circulations);
        }
        let last = circulations[circulations.len() - 1];
        assert!(last > circulations[0]);
        assert!(last < 1.05 * steady.circulation, "{} vs {}", last, steady.circulation);

        // Lift follows the same rise from near zero.
        let cn: Vec<f64> = summaries.iter().map(|s| s.cn).collect();
        assert!(steady.cn > 0.0);
        assert!(cn[0] < 0.5 * steady.cn, "{} vs {}", cn[0], steady.cn);
        for w in cn.windows(2) {
            assert!(w[1] >= w[0] - 1e-3 * steady.cn, "{:?}", cn);
        }
        let cn_last = cn[cn.len() - 1];
        assert!(cn_last > cn[0]);
        assert!(cn_last < 1.05 * steady.cn, "{} vs {}", cn_last, steady.cn);

        for (i, s) in summaries.iter().enumerate() {
            // One vortex shed per completed step.
            assert_eq!(s.n_wake, i + 1);
            // Kelvin.
            assert!(
                s.total_circulation.abs() < 1e-8 * steady.circulation.abs(),
                "step {}: total circulation {}",
                i,
                s.total_circulation
            );
            // Kutta.
            let n = s.gamma.len();
            assert_relative_eq!(s.gamma[0] + s.gamma[n - 1] + s.gamma_wake_panel, 0.0, epsilon = 1e-8);
            assert!(s.newton_iterations < 50);
            assert!(s.cn.is_finite() && s.ca.is_finite());
        }
        assert_eq!(sim_state.wake.len(), sim_params.n_steps);
    }

    #[test]
    fn test_first_step_converges_and_sheds() {
        let sim_params = impulsive_start(41, 12, 5.0, 10, 1, "Prescribed");
        let mut sim_state = initial_state(&sim_params);
        let context = VortexContext::new();
        let summary = update(&sim_params, &mut sim_state, &context).unwrap();
        assert!(summary.newton_iterations < 50);
        assert_eq!(sim_state.wake.len(), 1);
        assert_eq!(sim_state.step, 1);
        assert_relative_eq!(sim_state.t, sim_params.dt);
        // Starting vortex is anticlockwise.
        assert!(sim_state.wake[0].strength < 0.0);
        assert!(sim_state.phi_old.is_some());
    }

    #[test]
    fn test_prescribed_wake_moves_with_freestream() {
        let sim_params = impulsive_start(41, 12, 5.0, 10, 1, "Prescribed");
        let mut sim_state = initial_state(&sim_params);
        let context = VortexContext::new();
        run_steps(&sim_params, &mut sim_state, &context, 2).unwrap();
        let first = sim_state.wake[0].position;
        run_steps(&sim_params, &mut sim_state, &context, 1).unwrap();
        assert_relative_eq!(
            sim_state.wake[0].position,
            first + sim_params.freestream * sim_params.dt,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_pitch_plunge_steps() {
        let contents = "
geometry:
  n: 41
  chord: 0.1
  max_camber: 2
  camber_position: 4
  thickness: 12
flow:
  q_inf: 0.4
motion:
  type: PitchPlunge
  reduced_frequency: 1.2
simulation:
  ncycles: 1
  nsteps: 40
";
        let sim_params = SetupConfig::from_yaml_str(contents).unwrap().sim_params;
        let mut sim_state = initial_state(&sim_params);
        let context = VortexContext::new();
        let summaries = run_steps(&sim_params, &mut sim_state, &context, 8).unwrap();
        assert_eq!(summaries.len(), 8);
        for s in summaries.iter() {
            assert!(s.total_circulation.abs() < 1e-8);
            assert!(s.cn.is_finite() && s.ca.is_finite());
            assert!(s.newton_iterations < 50);
        }
        // The body moves between steps.
        assert!((summaries[0].nodes[0] - summaries[7].nodes[0]).norm() > 1e-4);
    }
}
