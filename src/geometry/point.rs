use nalgebra::{Point2, Vector2};

// A point at which induced velocities are evaluated. When the point is the
// position of a wake vortex, `vortex_id` is its index in the wake history so
// that the vortex does not act on itself.
#[derive(Clone, Copy, Debug)]
pub struct EvalPoint {
    pub vortex_id: Option<usize>,
    pub position: Point2<f64>,
}

impl EvalPoint {
    pub fn free(position: Point2<f64>) -> Self {
        Self {
            vortex_id: None,
            position,
        }
    }

    pub fn wake_vortex(vortex_id: usize, position: Point2<f64>) -> Self {
        Self {
            vortex_id: Some(vortex_id),
            position,
        }
    }
}

pub fn free_points(positions: &[Point2<f64>]) -> Vec<EvalPoint> {
    positions.iter().map(|p| EvalPoint::free(*p)).collect()
}

// Clockwise rotation by 90 degrees.
pub fn perp(x: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(x.y, -x.x)
}

pub fn is_finite_vector(v: &Vector2<f64>) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

pub fn is_finite_point(p: &Point2<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
