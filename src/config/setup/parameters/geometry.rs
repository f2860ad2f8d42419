use crate::geometry::airfoil::{Naca4, TrailingEdge};

// NACA 4-digit designation, digit by digit.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct GeometryParams {
    // Number of surface nodes.
    pub n: usize,
    pub chord: f64,
    // First digit: maximum camber, % chord.
    pub max_camber: f64,
    // Second digit: position of maximum camber, tenths of chord.
    pub camber_position: f64,
    // Last two digits: maximum thickness, % chord.
    pub thickness: f64,
    #[serde(default = "default_trailing_edge")]
    pub trailing_edge: TrailingEdge,
}

fn default_trailing_edge() -> TrailingEdge {
    TrailingEdge::Closed
}

impl GeometryParams {
    pub fn airfoil(&self) -> Naca4 {
        Naca4 {
            chord: self.chord,
            max_camber: self.max_camber / 100.0,
            camber_position: self.camber_position / 10.0,
            thickness: self.thickness / 100.0,
            trailing_edge: self.trailing_edge,
        }
    }

    pub fn designation(&self) -> String {
        format!(
            "NACA {}{}{:02}",
            self.max_camber.round() as i64,
            self.camber_position.round() as i64,
            self.thickness.round() as i64
        )
    }
}
