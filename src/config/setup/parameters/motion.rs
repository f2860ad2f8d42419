use nalgebra::{Point2, Vector2};

use crate::dynamics::kinematics::Kinematics;

// Angles are in degrees; lengths are in the units of the chord.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum MotionParams {
    PitchPlunge(PitchPlungeParams),
    ImpulsiveStart(ImpulsiveStartParams),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct PitchPlungeParams {
    pub reduced_frequency: f64,
    #[serde(default)]
    pub h0: f64,
    // Plunge amplitude; a quarter chord if unset.
    pub h1: Option<f64>,
    #[serde(default)]
    pub phi_h: f64,
    #[serde(default)]
    pub alpha0: f64,
    // Pitch amplitude; 15 degrees less the plunge-induced angle if unset.
    pub alpha1: Option<f64>,
    // Pitch phase; leads the plunge by 90 degrees if unset.
    pub phi_alpha: Option<f64>,
    // Body-frame pitch axis; a third of the chord if unset.
    pub pitch_axis: Option<Point2<f64>>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct ImpulsiveStartParams {
    pub alpha: f64,
    pub pitch_axis: Option<Point2<f64>>,
}

fn default_pitch_axis(chord: f64) -> Point2<f64> {
    Point2::new(chord / 3.0, 0.0)
}

impl PitchPlungeParams {
    pub fn h1(&self, chord: f64) -> f64 {
        self.h1.unwrap_or(0.25 * chord)
    }

    // Radians.
    pub fn alpha1(&self, chord: f64) -> f64 {
        match self.alpha1 {
            Some(a) => a.to_radians(),
            None => {
                15f64.to_radians() - (2.0 * self.reduced_frequency * self.h1(chord)).atan2(chord)
            }
        }
    }

    // Radians.
    pub fn phi_alpha(&self) -> f64 {
        self.phi_alpha.unwrap_or(90.0 + self.phi_h).to_radians()
    }
}

impl MotionParams {
    pub fn kinematics(&self, chord: f64, freestream: Vector2<f64>) -> Kinematics {
        match self {
            MotionParams::PitchPlunge(p) => Kinematics::pitch_plunge(
                chord,
                freestream,
                p.reduced_frequency,
                p.h0,
                p.h1(chord),
                p.phi_h.to_radians(),
                p.alpha0.to_radians(),
                p.alpha1(chord),
                p.phi_alpha(),
                p.pitch_axis.unwrap_or_else(|| default_pitch_axis(chord)),
            ),
            MotionParams::ImpulsiveStart(p) => Kinematics::impulsive_start(
                chord,
                freestream,
                p.alpha.to_radians(),
                p.pitch_axis.unwrap_or_else(|| default_pitch_axis(chord)),
            ),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MotionParams::PitchPlunge(_) => "pitch/plunge",
            MotionParams::ImpulsiveStart(_) => "impulsive start",
        }
    }
}
