use std::f64::consts::PI;

use nalgebra::{point, Point2};

use crate::error::Error;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingEdge {
    Open,
    Closed,
}

// NACA 4-digit section, in fractions of the chord.
#[derive(Debug, Clone, Copy)]
pub struct Naca4 {
    pub chord: f64,
    // Maximum camber, p.
    pub max_camber: f64,
    // Chordwise position of maximum camber, q.
    pub camber_position: f64,
    // Maximum thickness.
    pub thickness: f64,
    pub trailing_edge: TrailingEdge,
}

// Upper, lower and camber-line points at one chordwise station.
#[derive(Debug, Clone, Copy)]
pub struct SectionPoints {
    pub upper: Point2<f64>,
    pub lower: Point2<f64>,
    pub camber: Point2<f64>,
}

impl Naca4 {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.chord > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "chord must be positive, got {}",
                self.chord
            )));
        }
        if !(self.thickness > 0.0) {
            return Err(Error::InvalidConfig(
                "a zero-thickness section folds the panel chain onto itself; use a small positive thickness"
                    .to_string(),
            ));
        }
        if self.is_cambered() && !(self.camber_position > 0.0 && self.camber_position < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "camber position must lie strictly inside the chord, got {}",
                self.camber_position
            )));
        }
        Ok(())
    }

    fn is_cambered(&self) -> bool {
        self.max_camber != 0.0
    }

    // Full thickness at x/c.
    pub fn thickness_at(&self, x_c: f64) -> f64 {
        let poly = match self.trailing_edge {
            TrailingEdge::Open => {
                2.969 * x_c.sqrt() - 1.260 * x_c - 3.516 * x_c.powi(2) + 2.843 * x_c.powi(3)
                    - 1.015 * x_c.powi(4)
            }
            TrailingEdge::Closed => {
                2.980 * x_c.sqrt() - 1.320 * x_c - 3.286 * x_c.powi(2) + 2.441 * x_c.powi(3)
                    - 0.815 * x_c.powi(4)
            }
        };
        self.chord * self.thickness * poly
    }

    // Camber-line height and slope at x/c.
    pub fn camber_at(&self, x_c: f64) -> (f64, f64) {
        let (c, p, q) = (self.chord, self.max_camber, self.camber_position);
        if !self.is_cambered() {
            (0.0, 0.0)
        } else if x_c <= q {
            let s = x_c / q;
            (c * p * (2.0 * s - s * s), c * (2.0 * p / q) * (1.0 - s))
        } else {
            let s = (1.0 - x_c) / (1.0 - q);
            (
                c * p * (2.0 * s - s * s),
                c * (2.0 * p / (1.0 - q)) * (s - 1.0),
            )
        }
    }

    pub fn section(&self, x_c: f64) -> SectionPoints {
        let x = x_c * self.chord;
        let t = self.thickness_at(x_c);
        if !self.is_cambered() {
            SectionPoints {
                upper: point![x, 0.5 * t],
                lower: point![x, -0.5 * t],
                camber: point![x, 0.0],
            }
        } else {
            let (yc, dyc) = self.camber_at(x_c);
            let k = 2.0 * (1.0 + dyc * dyc).sqrt();
            SectionPoints {
                upper: point![x - t * dyc / k, yc + t / k],
                lower: point![x + t * dyc / k, yc - t / k],
                camber: point![x, yc],
            }
        }
    }

    // Cosine-clustered surface nodes in the body-fixed frame, ordered from
    // the lower trailing edge round the leading edge to the upper trailing
    // edge.
    pub fn nodes(&self, n: usize) -> Result<Vec<Point2<f64>>, Error> {
        if n < 3 {
            return Err(Error::InvalidConfig(format!(
                "need at least 3 airfoil nodes, got {}",
                n
            )));
        }
        let station = |theta: f64| 0.5 * (1.0 - theta.cos());
        let mut nodes = Vec::with_capacity(n);
        if n % 2 == 1 {
            let half = n / 2;
            let d_theta = PI / half as f64;
            for i in (0..half).rev() {
                nodes.push(self.section(station((i + 1) as f64 * d_theta)).lower);
            }
            nodes.push(self.section(0.0).upper);
            for i in 0..half {
                nodes.push(self.section(station((i + 1) as f64 * d_theta)).upper);
            }
        } else {
            let half = n / 2;
            let d_theta = 2.0 * PI / (n - 1) as f64;
            for i in (1..=half).rev() {
                nodes.push(self.section(station((i as f64 - 0.5) * d_theta)).lower);
            }
            for i in 1..=half {
                nodes.push(self.section(station((i as f64 - 0.5) * d_theta)).upper);
            }
        }
        Ok(nodes)
    }
}
