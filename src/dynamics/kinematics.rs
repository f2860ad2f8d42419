use std::f64::consts::PI;

use nalgebra::{Point2, Rotation2, Vector2};

// Prescribed rigid-body motion of the airfoil: harmonic pitch about
// `pitch_axis` (body frame) and harmonic plunge, with the body moved down by h.
// An impulsive start is the degenerate case with no oscillation.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct Kinematics {
    pub omega: f64,
    pub h0: f64,
    pub h1: f64,
    pub phi_h: f64,
    pub alpha0: f64,
    pub alpha1: f64,
    pub phi_alpha: f64,
    pub pitch_axis: Point2<f64>,
    pub freestream: Vector2<f64>,
    // Oscillation period, or chord transit time for an impulsive start.
    pub reference_time: f64,
}

impl Kinematics {
    pub fn pitch_plunge(
        chord: f64,
        freestream: Vector2<f64>,
        reduced_frequency: f64,
        h0: f64,
        h1: f64,
        phi_h: f64,
        alpha0: f64,
        alpha1: f64,
        phi_alpha: f64,
        pitch_axis: Point2<f64>,
    ) -> Self {
        let omega = 2.0 * reduced_frequency * freestream.x / chord;
        Kinematics {
            omega,
            h0,
            h1,
            phi_h,
            alpha0,
            alpha1,
            phi_alpha,
            pitch_axis,
            freestream,
            reference_time: 2.0 * PI / omega,
        }
    }

    pub fn impulsive_start(
        chord: f64,
        freestream: Vector2<f64>,
        alpha: f64,
        pitch_axis: Point2<f64>,
    ) -> Self {
        Kinematics {
            omega: 0.0,
            h0: 0.0,
            h1: 0.0,
            phi_h: 0.0,
            alpha0: alpha,
            alpha1: 0.0,
            phi_alpha: 0.0,
            pitch_axis,
            freestream,
            reference_time: chord / freestream.x,
        }
    }

    pub fn alpha(&self, t: f64) -> f64 {
        self.alpha0 + self.alpha1 * (self.omega * t + self.phi_alpha).sin()
    }

    pub fn alpha_dot(&self, t: f64) -> f64 {
        self.alpha1 * self.omega * (self.omega * t + self.phi_alpha).cos()
    }

    pub fn h(&self, t: f64) -> f64 {
        self.h0 + self.h1 * (self.omega * t + self.phi_h).sin()
    }

    pub fn h_dot(&self, t: f64) -> f64 {
        self.h1 * self.omega * (self.omega * t + self.phi_h).cos()
    }

    // Inertial position of the pitch axis.
    pub fn pivot(&self, t: f64) -> Point2<f64> {
        self.pitch_axis + Vector2::new(0.0, -self.h(t))
    }

    // Positive alpha pitches the nose up, a clockwise rotation.
    pub fn to_inertial(&self, t: f64, p: &Point2<f64>) -> Point2<f64> {
        let rot = Rotation2::new(-self.alpha(t));
        self.pivot(t) + rot * (p - self.pitch_axis)
    }

    pub fn nodes_to_inertial(&self, t: f64, nodes: &[Point2<f64>]) -> Vec<Point2<f64>> {
        nodes.iter().map(|p| self.to_inertial(t, p)).collect()
    }

    // Velocity of the fluid relative to the body surface at inertial point x.
    pub fn relative_velocity(&self, t: f64, x: &Point2<f64>) -> Vector2<f64> {
        let r = x - self.pivot(t);
        let alpha_dot = self.alpha_dot(t);
        self.freestream + Vector2::new(0.0, self.h_dot(t)) + Vector2::new(-alpha_dot * r.y, alpha_dot * r.x)
    }
}
