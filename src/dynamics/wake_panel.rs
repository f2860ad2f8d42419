use log::{debug, warn};
use nalgebra::{Matrix2, Point2, Vector2};

use crate::{
    config::setup::parameters::simulation::{JacobianScheme, NewtonParams},
    error::Error,
    geometry::{
        panel::{Panel, PanelChain},
        point::{is_finite_vector, EvalPoint},
    },
    numerics::interface::{VortexContext, VortexContextTrait},
    state::{WakePanelGuess, WakeVortex},
};

use super::bound::{bound_u, BoundSolution, UnsteadySystem};

// The flow for one trial wake panel.
#[derive(Clone, Debug)]
pub struct WakePanelState {
    pub panel: Panel,
    pub solution: BoundSolution,
    // Bound chain, wake history and freestream at the panel's control point.
    pub velocity: Vector2<f64>,
}

#[derive(Clone, Debug)]
pub struct WakePanelSolution {
    pub guess: WakePanelGuess,
    pub state: WakePanelState,
    pub iterations: usize,
}

impl WakePanelSolution {
    pub fn shed_strength(&self) -> f64 {
        self.state.solution.gamma_wake_panel * self.guess.length
    }

    // Where the new wake vortex is released.
    pub fn shed_position(&self, dt: f64) -> Point2<f64> {
        self.state.panel.control_point() + self.state.velocity * dt
    }
}

// Finds the wake panel whose length and angle agree with the velocity at its
// own control point.
pub struct WakePanelProblem<'a> {
    pub chain: &'a PanelChain,
    pub system: &'a UnsteadySystem,
    pub wake: &'a [WakeVortex],
    pub context: &'a VortexContext,
    pub freestream: Vector2<f64>,
    pub dt: f64,
}

impl<'a> WakePanelProblem<'a> {
    pub fn evaluate(&self, guess: WakePanelGuess) -> Result<WakePanelState, Error> {
        let panel = Panel::from_polar(self.chain.trailing_edge(), guess.length, guess.angle);
        let solution = self.system.with_wake_panel(&panel)?.solve()?;
        let cp = panel.control_point();
        let v_history = self
            .context
            .evaluate(&[EvalPoint::free(cp)], self.wake)
            .pop()
            .unwrap_or_else(Vector2::zeros);
        let velocity = bound_u(self.chain, &solution.gamma, cp)? + v_history + self.freestream;
        if !is_finite_vector(&velocity) {
            return Err(Error::non_finite("wake panel control point velocity"));
        }
        Ok(WakePanelState {
            panel,
            solution,
            velocity,
        })
    }

    pub fn residual(&self, guess: WakePanelGuess, state: &WakePanelState) -> Vector2<f64> {
        let v = state.velocity;
        Vector2::new(
            guess.length - v.norm() * self.dt,
            guess.angle - v.y.atan2(v.x),
        )
    }

    fn residual_at(&self, x: Vector2<f64>) -> Result<Vector2<f64>, Error> {
        let guess = as_guess(x);
        let state = self.evaluate(guess)?;
        Ok(self.residual(guess, &state))
    }

    pub fn jacobian(
        &self,
        x: Vector2<f64>,
        r: Vector2<f64>,
        params: &NewtonParams,
    ) -> Result<Matrix2<f64>, Error> {
        let eps = params.epsilon;
        let mut jacobian = Matrix2::zeros();
        for k in 0..2 {
            let mut dx = Vector2::zeros();
            dx[k] = eps;
            let column = match params.jacobian {
                JacobianScheme::Forward => (self.residual_at(x + dx)? - r) / eps,
                JacobianScheme::Central => {
                    (self.residual_at(x + dx)? - self.residual_at(x - dx)?) / (2.0 * eps)
                }
            };
            jacobian.set_column(k, &column);
        }
        Ok(jacobian)
    }

    pub fn solve(
        &self,
        initial: WakePanelGuess,
        params: &NewtonParams,
        step: usize,
    ) -> Result<WakePanelSolution, Error> {
        let mut x = Vector2::new(initial.length, initial.angle);
        let mut last_delta = f64::INFINITY;
        let mut iterations = 0;
        while iterations < params.max_iterations {
            let r = self.residual_at(x)?;
            let jacobian = self.jacobian(x, r, params)?;
            let delta = jacobian
                .lu()
                .solve(&(-r))
                .filter(is_finite_vector)
                .ok_or(Error::NonConvergence {
                    step,
                    iterations,
                    last_delta,
                })?;
            x += delta;
            iterations += 1;
            last_delta = delta.norm();
            debug!(
                "step={}, iteration={}, l_wp={:e}, theta_wp={:.6}, |delta|={:e}",
                step, iterations, x[0], x[1], last_delta
            );
            if last_delta < params.tolerance {
                if iterations > params.max_iterations / 2 {
                    warn!(
                        "Slow wake-panel convergence at step {}: {} iterations",
                        step, iterations
                    );
                }
                let guess = as_guess(x);
                // Fix the flow at the converged geometry.
                let state = self.evaluate(guess)?;
                return Ok(WakePanelSolution {
                    guess,
                    state,
                    iterations,
                });
            }
        }
        Err(Error::NonConvergence {
            step,
            iterations,
            last_delta,
        })
    }
}

fn as_guess(x: Vector2<f64>) -> WakePanelGuess {
    WakePanelGuess {
        length: x[0],
        angle: x[1],
    }
}
