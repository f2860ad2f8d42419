use std::f64::consts::PI;

use nalgebra::{Matrix2, Point2, Vector2};

use crate::{error::Error, geometry::point::perp};

// r is the vector pointing from the singularity to the point of interest.
// Positive circulation is clockwise.

pub fn point_vortex_u(gamma: f64, r: Vector2<f64>) -> Vector2<f64> {
    perp(r) * (gamma / (2.0 * PI * r.magnitude_squared()))
}

// Linear-strength vortex panel from p1 to p2. The returned matrix maps the
// endpoint sheet strengths [gamma_1, gamma_2] to the velocity induced at x.
pub fn panel_influence(
    p1: Point2<f64>,
    p2: Point2<f64>,
    x: Point2<f64>,
) -> Result<Matrix2<f64>, Error> {
    let d = p2 - p1;
    let l = d.norm();
    if !(l > 0.0) || !l.is_finite() {
        return Err(Error::DegeneratePanel { start: p1, end: p2 });
    }
    let r = x - p1;
    // Panel-aligned coordinates of x.
    let xi = d.dot(&r) / l;
    let eta = d.perp(&r) / l;

    let phi = (eta * l).atan2(eta * eta + xi * xi - xi * l);
    let psi = 0.5 * ((xi * xi + eta * eta) / ((xi - l).powi(2) + eta * eta)).ln();

    let p2_local = Matrix2::new(
        (l - xi) * phi + eta * psi,
        xi * phi - eta * psi,
        eta * phi - (l - xi) * psi - l,
        -eta * phi - xi * psi + l,
    );
    let rotation = Matrix2::new(d.x, -d.y, d.y, d.x);
    Ok(rotation * p2_local / (2.0 * PI * l * l))
}

pub fn panel_u(
    p1: Point2<f64>,
    p2: Point2<f64>,
    gamma_1: f64,
    gamma_2: f64,
    x: Point2<f64>,
) -> Result<Vector2<f64>, Error> {
    Ok(panel_influence(p1, p2, x)? * Vector2::new(gamma_1, gamma_2))
}

// Uniform-strength panel: both endpoint strengths equal.
pub fn uniform_panel_u(
    p1: Point2<f64>,
    p2: Point2<f64>,
    gamma: f64,
    x: Point2<f64>,
) -> Result<Vector2<f64>, Error> {
    panel_u(p1, p2, gamma, gamma, x)
}
