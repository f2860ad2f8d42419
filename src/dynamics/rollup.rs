use log::debug;
use nalgebra::{Point2, Vector2};

use crate::{
    config::setup::parameters::simulation::WakeModel,
    error::Error,
    geometry::{
        panel::PanelChain,
        point::{is_finite_point, is_finite_vector, EvalPoint},
    },
    numerics::interface::VortexContext,
    state::WakeVortex,
};

use super::{common::InducedFlow, wake_panel::WakePanelSolution};

// Velocity of each existing wake vortex, all from the same pre-update
// positions.
pub fn wake_velocities(
    model: WakeModel,
    chain: &PanelChain,
    wake_panel: &WakePanelSolution,
    wake: &[WakeVortex],
    context: &VortexContext,
    freestream: Vector2<f64>,
) -> Result<Vec<Vector2<f64>>, Error> {
    match model {
        WakeModel::Prescribed => Ok(vec![freestream; wake.len()]),
        WakeModel::Free => {
            let flow = InducedFlow {
                chain,
                gamma: &wake_panel.state.solution.gamma,
                wake_panel: Some((
                    wake_panel.state.panel,
                    wake_panel.state.solution.gamma_wake_panel,
                )),
                wake,
                context,
            };
            let eval_points: Vec<EvalPoint> = wake
                .iter()
                .enumerate()
                .map(|(i, w)| EvalPoint::wake_vortex(i, w.position))
                .collect();
            Ok(flow
                .evaluate(&eval_points)?
                .into_iter()
                .map(|v| v + freestream)
                .collect())
        }
    }
}

// Convects the wake history by one forward-Euler step and appends the vortex
// shed from the converged wake panel. Returns the bound circulation, which
// becomes the next step's Kelvin constraint.
pub fn rollup(
    model: WakeModel,
    chain: &PanelChain,
    wake_panel: &WakePanelSolution,
    wake: &mut Vec<WakeVortex>,
    context: &VortexContext,
    freestream: Vector2<f64>,
    dt: f64,
) -> Result<f64, Error> {
    let gamma_old = wake_panel.state.solution.circulation(chain);

    let velocities = wake_velocities(model, chain, wake_panel, wake, context, freestream)?;
    let mut positions: Vec<Point2<f64>> = Vec::with_capacity(wake.len() + 1);
    for (i, (w, v)) in wake.iter().zip(velocities.iter()).enumerate() {
        if !is_finite_vector(v) {
            return Err(Error::non_finite(format!("velocity of wake vortex {}", i)));
        }
        let x = w.position + v * dt;
        if !is_finite_point(&x) {
            return Err(Error::non_finite(format!("position of wake vortex {}", i)));
        }
        positions.push(x);
    }

    let shed = WakeVortex {
        position: wake_panel.shed_position(dt),
        strength: wake_panel.shed_strength(),
    };
    if !is_finite_point(&shed.position) || !shed.strength.is_finite() {
        return Err(Error::non_finite("newly shed wake vortex"));
    }

    for (w, x) in wake.iter_mut().zip(positions) {
        w.position = x;
    }
    wake.push(shed);
    debug!(
        "Rolled up wake: n_wake={}, shed strength={:e}, gamma_old={:e}",
        wake.len(),
        shed.strength,
        gamma_old
    );
    Ok(gamma_old)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dynamics::bound::BoundSolution,
        dynamics::wake_panel::WakePanelState,
        geometry::panel::Panel,
        numerics::interface::VortexContextTrait,
        state::WakePanelGuess,
    };
    use approx::assert_relative_eq;
    use nalgebra::{point, vector, DVector};

    fn fixture() -> (PanelChain, WakePanelSolution) {
        let chain = PanelChain::from_nodes(vec![
            point![1.0, 0.0],
            point![0.0, -0.05],
            point![0.0, 0.05],
            point![1.0, 0.0],
        ])
        .unwrap();
        let te = chain.trailing_edge();
        let solution = WakePanelSolution {
            guess: WakePanelGuess {
                length: 0.1,
                angle: 0.0,
            },
            state: WakePanelState {
                panel: Panel::new(te, te + vector![0.1, 0.0]),
                solution: BoundSolution {
                    gamma: DVector::from_vec(vec![0.2, 0.4, 0.4, 0.2]),
                    gamma_wake_panel: -1.5,
                },
                velocity: vector![1.0, 0.1],
            },
            iterations: 3,
        };
        (chain, solution)
    }

    #[test]
    fn test_prescribed_wake_moves_with_freestream() {
        let (chain, solution) = fixture();
        let mut wake = vec![
            WakeVortex {
                position: point![2.0, 0.0],
                strength: 0.1,
            },
            WakeVortex {
                position: point![2.05, 0.01],
                strength: -0.1,
            },
        ];
        let context = VortexContext::new();
        let gamma_old = rollup(
            WakeModel::Prescribed,
            &chain,
            &solution,
            &mut wake,
            &context,
            vector![1.0, 0.0],
            0.1,
        )
        .unwrap();
        assert_relative_eq!(gamma_old, solution.state.solution.circulation(&chain));
        assert_eq!(wake.len(), 3);
        assert_relative_eq!(wake[0].position, point![2.1, 0.0], epsilon = 1e-12);
        assert_relative_eq!(wake[1].position, point![2.15, 0.01], epsilon = 1e-12);
        // Shed from the wake panel control point with the local velocity.
        assert_relative_eq!(wake[2].position, point![1.15, 0.01], epsilon = 1e-12);
        assert_relative_eq!(wake[2].strength, -0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_free_wake_uses_old_positions() {
        let (chain, solution) = fixture();
        let wake = vec![
            WakeVortex {
                position: point![3.0, 0.0],
                strength: 0.5,
            },
            WakeVortex {
                position: point![3.0, 0.2],
                strength: 0.5,
            },
        ];
        let context = VortexContext::new();
        let freestream = vector![1.0, 0.0];
        let velocities =
            wake_velocities(WakeModel::Free, &chain, &solution, &wake, &context, freestream)
                .unwrap();
        let mut rolled = wake.clone();
        rollup(
            WakeModel::Free,
            &chain,
            &solution,
            &mut rolled,
            &context,
            freestream,
            0.01,
        )
        .unwrap();
        for i in 0..2 {
            assert_relative_eq!(
                rolled[i].position,
                wake[i].position + velocities[i] * 0.01,
                epsilon = 1e-14
            );
        }
        // Mutual induction of the pair.
        let mean = (velocities[0] + velocities[1]) * 0.5;
        assert!((velocities[0] - mean).x.abs() > 1e-3);
    }

    #[test]
    fn test_non_finite_wake_rejected() {
        let (chain, solution) = fixture();
        let mut wake = vec![WakeVortex {
            position: point![f64::NAN, 0.0],
            strength: 0.1,
        }];
        let context = VortexContext::new();
        let r = rollup(
            WakeModel::Prescribed,
            &chain,
            &solution,
            &mut wake,
            &context,
            vector![1.0, 0.0],
            0.1,
        );
        assert!(matches!(r, Err(Error::NonFinite { .. })));
        // Nothing written.
        assert_eq!(wake.len(), 1);
    }
}
