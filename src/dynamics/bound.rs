use log::debug;
use nalgebra::{DMatrix, DVector, Point2, Vector2};
use num_traits::Zero;

use crate::{
    error::Error,
    geometry::panel::{Panel, PanelChain},
};

use super::vortex_solutions::{panel_influence, panel_u};

// Dense solve with full pivoting, which copes with the Kutta and Kelvin rows
// breaking diagonal dominance.
pub fn solve_dense(a: DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>, Error> {
    let size = b.len();
    let x = a
        .full_piv_lu()
        .solve(b)
        .ok_or(Error::SingularSystem { size })?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(Error::SingularSystem { size });
    }
    Ok(x)
}

// Normal-velocity influence of every bound panel on every control point,
// with the Kutta condition in the trailing-edge row.
pub fn steady_matrix(chain: &PanelChain) -> Result<DMatrix<f64>, Error> {
    let n = chain.n_nodes();
    let mut a = DMatrix::zeros(n, n);
    for (j, (cp, panel_j)) in chain
        .control_points()
        .iter()
        .zip(chain.panels.iter())
        .enumerate()
    {
        let normal = panel_j.normal();
        for (i, panel_i) in chain.panels.iter().enumerate() {
            let p = panel_influence(panel_i.start, panel_i.end, *cp)?;
            a[(j, i)] += normal.dot(&p.column(0));
            a[(j, i + 1)] += normal.dot(&p.column(1));
        }
    }
    a[(n - 1, 0)] = 1.0;
    a[(n - 1, n - 1)] = 1.0;
    Ok(a)
}

// Bound strengths for a body at rest in a uniform stream.
pub fn solve_steady(
    chain: &PanelChain,
    freestream: Vector2<f64>,
    kutta: f64,
) -> Result<DVector<f64>, Error> {
    let n = chain.n_nodes();
    let a = steady_matrix(chain)?;
    let mut b = DVector::zeros(n);
    for (j, panel) in chain.panels.iter().enumerate() {
        b[j] = -freestream.dot(&panel.normal());
    }
    b[n - 1] = kutta;
    solve_dense(a, &b)
}

// Velocity of the bound vortex chain at x.
pub fn bound_u(chain: &PanelChain, gamma: &DVector<f64>, x: Point2<f64>) -> Result<Vector2<f64>, Error> {
    let mut v = Vector2::zero();
    for (i, panel) in chain.panels.iter().enumerate() {
        v += panel_u(panel.start, panel.end, gamma[i], gamma[i + 1], x)?;
    }
    Ok(v)
}

#[derive(Clone, Debug)]
pub struct BoundSolution {
    // Nodal bound strengths.
    pub gamma: DVector<f64>,
    // Uniform strength of the shed wake panel.
    pub gamma_wake_panel: f64,
}

impl BoundSolution {
    pub fn circulation(&self, chain: &PanelChain) -> f64 {
        chain.circulation(&self.gamma)
    }
}

// The (n+1) x (n+1) system for bound strengths plus the wake-panel strength.
// Everything except the wake-panel column is fixed for a step; the column and
// the Kelvin entry are filled per trial wake panel.
#[derive(Clone, Debug)]
pub struct UnsteadySystem {
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
    pub normals: Vec<Vector2<f64>>,
    pub control_points: Vec<Point2<f64>>,
}

impl UnsteadySystem {
    // `background` is the velocity at each control point that does not come
    // from the bound chain or the wake panel: the wake history plus the
    // relative flow from the body's motion.
    pub fn assemble(
        chain: &PanelChain,
        background: &[Vector2<f64>],
        gamma_old: f64,
    ) -> Result<Self, Error> {
        let n = chain.n_nodes();
        let steady = steady_matrix(chain)?;
        let mut a = DMatrix::zeros(n + 1, n + 1);
        a.view_mut((0, 0), (n, n)).copy_from(&steady);
        // The wake-panel strength enters the trailing-edge condition.
        a[(n - 1, n)] = 1.0;
        let weights = chain.kelvin_weights();
        for i in 0..n {
            a[(n, i)] = weights[i];
        }

        let normals: Vec<Vector2<f64>> = chain.panels.iter().map(|p| p.normal()).collect();
        let mut b = DVector::zeros(n + 1);
        for (j, (v, normal)) in background.iter().zip(normals.iter()).enumerate() {
            b[j] = -v.dot(normal);
        }
        b[n - 1] = 0.0;
        b[n] = gamma_old;
        debug!("Assembled unsteady system: n={}, gamma_old={}", n, gamma_old);

        Ok(UnsteadySystem {
            a,
            b,
            normals,
            control_points: chain.control_points(),
        })
    }

    pub fn size(&self) -> usize {
        self.b.len()
    }

    // Copy of the system with a trial wake panel's column filled in.
    pub fn with_wake_panel(&self, wake_panel: &Panel) -> Result<Self, Error> {
        let n = self.size() - 1;
        let mut system = self.clone();
        for (j, (cp, normal)) in self
            .control_points
            .iter()
            .zip(self.normals.iter())
            .enumerate()
        {
            let p = panel_influence(wake_panel.start, wake_panel.end, *cp)?;
            system.a[(j, n)] = normal.dot(&(p * Vector2::new(1.0, 1.0)));
        }
        system.a[(n, n)] = wake_panel.length();
        Ok(system)
    }

    pub fn solve(&self) -> Result<BoundSolution, Error> {
        let n = self.size() - 1;
        let x = solve_dense(self.a.clone(), &self.b)?;
        Ok(BoundSolution {
            gamma: x.rows(0, n).into_owned(),
            gamma_wake_panel: x[n],
        })
    }

    // A x - b for a solution of this system.
    pub fn residual(&self, solution: &BoundSolution) -> DVector<f64> {
        let n = self.size() - 1;
        let mut x = DVector::zeros(n + 1);
        x.rows_mut(0, n).copy_from(&solution.gamma);
        x[n] = solution.gamma_wake_panel;
        &self.a * x - &self.b
    }
}
