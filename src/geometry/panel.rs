use nalgebra::{DVector, Point2, Vector2};

use crate::error::Error;

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Panel {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Panel {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Panel { start, end }
    }

    // Panel leaving `start` with length `length` at angle `angle` to the x axis.
    pub fn from_polar(start: Point2<f64>, length: f64, angle: f64) -> Self {
        Panel {
            start,
            end: start + Vector2::new(angle.cos(), angle.sin()).scale(length),
        }
    }

    pub fn start_end(&self) -> Vector2<f64> {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.start_end().norm()
    }

    pub fn control_point(&self) -> Point2<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    pub fn tangent(&self) -> Vector2<f64> {
        self.start_end().unscale(self.length())
    }

    // Left-hand normal of the start-to-end direction. For a chain ordered
    // from the lower trailing edge round the nose to the upper trailing edge
    // this points out of the body.
    pub fn normal(&self) -> Vector2<f64> {
        let t = self.tangent();
        Vector2::new(-t.y, t.x)
    }

    // Control point pushed `offset` along the normal, off the singular line.
    pub fn offset_control_point(&self, offset: f64) -> Point2<f64> {
        self.control_point() + self.normal().scale(offset)
    }
}

// The airfoil surface at one instant: an ordered chain of nodes from the
// lower-surface trailing edge, round the leading edge, to the upper-surface
// trailing edge.
#[derive(Clone, Debug)]
pub struct PanelChain {
    pub nodes: Vec<Point2<f64>>,
    pub panels: Vec<Panel>,
}

impl PanelChain {
    pub fn from_nodes(nodes: Vec<Point2<f64>>) -> Result<Self, Error> {
        if nodes.len() < 3 {
            return Err(Error::InvalidConfig(format!(
                "a panel chain needs at least 3 nodes, got {}",
                nodes.len()
            )));
        }
        let panels: Vec<Panel> = nodes.windows(2).map(|w| Panel::new(w[0], w[1])).collect();
        if let Some(p) = panels.iter().find(|p| !(p.length() > 0.0)) {
            return Err(Error::DegeneratePanel {
                start: p.start,
                end: p.end,
            });
        }
        Ok(PanelChain { nodes, panels })
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_panels(&self) -> usize {
        self.panels.len()
    }

    pub fn trailing_edge(&self) -> Point2<f64> {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn leading_edge_index(&self) -> usize {
        (self.n_nodes() + 1) / 2 - 1
    }

    pub fn leading_edge(&self) -> Point2<f64> {
        self.nodes[self.leading_edge_index()]
    }

    pub fn control_points(&self) -> Vec<Point2<f64>> {
        self.panels.iter().map(|p| p.control_point()).collect()
    }

    pub fn offset_control_points(&self, offset: f64) -> Vec<Point2<f64>> {
        self.panels
            .iter()
            .map(|p| p.offset_control_point(offset))
            .collect()
    }

    pub fn lengths(&self) -> Vec<f64> {
        self.panels.iter().map(|p| p.length()).collect()
    }

    // Trapezoidal weights: half the length of each panel adjacent to a node.
    pub fn kelvin_weights(&self) -> DVector<f64> {
        let l = self.lengths();
        let n = self.n_nodes();
        DVector::from_fn(n, |i, _| {
            let before = if i > 0 { l[i - 1] } else { 0.0 };
            let after = if i < n - 1 { l[i] } else { 0.0 };
            0.5 * (before + after)
        })
    }

    // Total circulation of a piecewise-linear nodal strength distribution.
    pub fn circulation(&self, gamma: &DVector<f64>) -> f64 {
        self.panels
            .iter()
            .enumerate()
            .map(|(i, p)| 0.5 * (gamma[i] + gamma[i + 1]) * p.length())
            .sum()
    }
}
