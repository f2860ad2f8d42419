use nalgebra::Vector2;

use crate::error::Error;

// Horizontal freestream speed, given directly or through a Reynolds number.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum FreestreamSpeed {
    Direct {
        q_inf: f64,
    },
    Reynolds {
        reynolds: f64,
        // Dynamic viscosity.
        viscosity: f64,
        density: f64,
    },
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct FlowParams {
    #[serde(flatten)]
    pub speed: FreestreamSpeed,
    #[serde(default)]
    pub v_inf: f64,
}

impl FlowParams {
    pub fn q_inf(&self, chord: f64) -> f64 {
        match self.speed {
            FreestreamSpeed::Direct { q_inf } => q_inf,
            FreestreamSpeed::Reynolds {
                reynolds,
                viscosity,
                density,
            } => reynolds * viscosity / (density * chord),
        }
    }

    pub fn freestream(&self, chord: f64) -> Result<Vector2<f64>, Error> {
        let q_inf = self.q_inf(chord);
        if !(q_inf > 0.0) || !q_inf.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "freestream speed must be positive and finite, got {}",
                q_inf
            )));
        }
        Ok(Vector2::new(q_inf, self.v_inf))
    }
}
