pub mod contexts {
    use nalgebra::Vector2;

    use crate::{geometry::point::EvalPoint, state::WakeVortex};

    // Velocity induced by the wake history at a set of points.
    pub trait VortexContextTrait {
        fn new() -> Self;

        fn evaluate(&self, eval_points: &[EvalPoint], vortices: &[WakeVortex]) -> Vec<Vector2<f64>>;
    }
}

use log::warn;
use nalgebra::Vector2;
use num_traits::Zero;

use crate::{dynamics::vortex_solutions::point_vortex_u, geometry::point::EvalPoint, state::WakeVortex};

fn is_singular_separation(r_length: f64) -> bool {
    !r_length.is_finite() || r_length < 1e-9
}

// Velocity of every vortex at one point, skipping the vortex sitting at it.
fn vortices_u(p: &EvalPoint, vortices: &[WakeVortex]) -> Vector2<f64> {
    let mut v = Vector2::zero();
    for (i, w) in vortices.iter().enumerate() {
        if p.vortex_id == Some(i) {
            continue;
        }
        // Vector from vortex to eval point.
        let r = p.position - w.position;
        let r_length = r.magnitude();
        if is_singular_separation(r_length) {
            warn!(
                "NaN, infinite or tiny r_length at eval point {} (vortex_id={:?}) from vortex {} at {}: r_length={:e}",
                p.position, p.vortex_id, i, w.position, r_length
            );
        }
        v += point_vortex_u(w.strength, r);
    }
    v
}

#[cfg(feature = "parallel")]
mod numerics_context {
    use nalgebra::Vector2;
    use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

    use crate::{geometry::point::EvalPoint, state::WakeVortex};

    use super::contexts::VortexContextTrait;

    pub struct VortexContext;

    impl VortexContextTrait for VortexContext {
        fn new() -> Self {
            VortexContext
        }

        fn evaluate(&self, eval_points: &[EvalPoint], vortices: &[WakeVortex]) -> Vec<Vector2<f64>> {
            eval_points
                .par_iter()
                .map(|p| super::vortices_u(p, vortices))
                .collect()
        }
    }
}

#[cfg(not(feature = "parallel"))]
mod numerics_context {
    use nalgebra::Vector2;

    use crate::{geometry::point::EvalPoint, state::WakeVortex};

    use super::contexts::VortexContextTrait;

    pub struct VortexContext;

    impl VortexContextTrait for VortexContext {
        fn new() -> Self {
            VortexContext
        }

        // Naive direct sum over all point-vortex pairs.
        fn evaluate(&self, eval_points: &[EvalPoint], vortices: &[WakeVortex]) -> Vec<Vector2<f64>> {
            eval_points
                .iter()
                .map(|p| super::vortices_u(p, vortices))
                .collect()
        }
    }
}

pub use contexts::*;
pub use numerics_context::*;

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;
    use nalgebra::{point, vector};

    use super::{is_singular_separation, VortexContext, VortexContextTrait};
    use crate::{geometry::point::EvalPoint, state::WakeVortex};

    #[test]
    fn test_happy() {
        let vortices = vec![
            WakeVortex {
                position: point![0.0, 0.0],
                strength: 2.0 * PI,
            },
            WakeVortex {
                position: point![2.0, 0.0],
                strength: -2.0 * PI,
            },
        ];
        let eval_points = vec![
            EvalPoint::free(point![1.0, 0.0]),
            EvalPoint::wake_vortex(0, vortices[0].position),
        ];

        let vs = VortexContext::new().evaluate(&eval_points, &vortices);

        assert_eq!(vs.len(), 2);
        // Counter-rotating pair: both push the midpoint down.
        assert_relative_eq!(vs[0], vector![0.0, -2.0], epsilon = 1e-12);
        // The vortex at the origin feels only its partner.
        assert_relative_eq!(vs[1], vector![0.0, -0.5], epsilon = 1e-12);
    }

    #[test]
    fn test_coincident_free_point_is_flagged() {
        let vortices = vec![WakeVortex {
            position: point![1.0, 1.0],
            strength: 1.0,
        }];
        assert!(is_singular_separation(0.0));
        assert!(is_singular_separation(f64::NAN));
        assert!(!is_singular_separation(1e-3));

        // Unowned point on top of a vortex: left non-finite for the callers' guards.
        let vs = VortexContext::new().evaluate(&[EvalPoint::free(vortices[0].position)], &vortices);
        assert!(!(vs[0].x.is_finite() && vs[0].y.is_finite()));
        // The owning vortex skips itself.
        let vs = VortexContext::new().evaluate(&[EvalPoint::wake_vortex(0, vortices[0].position)], &vortices);
        assert_eq!(vs[0], vector![0.0, 0.0]);
    }
}
