use nalgebra::{DVector, Point2, Vector2};

use crate::{
    error::Error,
    geometry::{
        panel::{Panel, PanelChain},
        point::{free_points, EvalPoint},
    },
    numerics::interface::{VortexContext, VortexContextTrait},
    state::WakeVortex,
};

use super::{bound::bound_u, vortex_solutions::uniform_panel_u};

// Velocity induced by all the vorticity in the flow at one instant: the bound
// chain, the newly shed wake panel (if any), and the wake history.
pub struct InducedFlow<'a> {
    pub chain: &'a PanelChain,
    pub gamma: &'a DVector<f64>,
    pub wake_panel: Option<(Panel, f64)>,
    pub wake: &'a [WakeVortex],
    pub context: &'a VortexContext,
}

impl<'a> InducedFlow<'a> {
    pub fn evaluate(&self, eval_points: &[EvalPoint]) -> Result<Vec<Vector2<f64>>, Error> {
        let v_wake = self.context.evaluate(eval_points, self.wake);
        eval_points
            .iter()
            .zip(v_wake)
            .map(|(p, v)| self.body_u(p.position).map(|u| u + v))
            .collect()
    }

    pub fn evaluate_free(&self, positions: &[Point2<f64>]) -> Result<Vec<Vector2<f64>>, Error> {
        self.evaluate(&free_points(positions))
    }

    // Bound chain plus wake panel.
    fn body_u(&self, x: Point2<f64>) -> Result<Vector2<f64>, Error> {
        let mut v = bound_u(self.chain, self.gamma, x)?;
        if let Some((panel, gamma_wp)) = &self.wake_panel {
            v += uniform_panel_u(panel.start, panel.end, *gamma_wp, x)?;
        }
        Ok(v)
    }
}
