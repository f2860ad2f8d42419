use derive_more::Display;
use nalgebra::Point2;

#[derive(Debug, Display, derive_more::Error)]
pub enum Error {
    #[display("degenerate panel: start {start} and end {end} coincide")]
    DegeneratePanel {
        start: Point2<f64>,
        end: Point2<f64>,
    },
    #[display(
        "wake panel did not converge at step {step} after {iterations} iterations (last |delta| = {last_delta:e})"
    )]
    NonConvergence {
        step: usize,
        iterations: usize,
        last_delta: f64,
    },
    #[display("linear system of size {size} is singular or has a non-finite solution")]
    SingularSystem { size: usize },
    #[display("non-finite value in {what}")]
    NonFinite {
        #[error(not(source))]
        what: String,
    },
    #[display("invalid configuration: {_0}")]
    InvalidConfig(#[error(not(source))] String),
    #[display("i/o error: {_0}")]
    Io(#[error(source)] std::io::Error),
    #[display("yaml error: {_0}")]
    Yaml(#[error(source)] serde_yaml::Error),
    #[display("json error: {_0}")]
    Json(#[error(source)] serde_json::Error),
    #[display("csv error: {_0}")]
    Csv(#[error(source)] csv::Error),
}

impl Error {
    pub fn non_finite(what: impl Into<String>) -> Self {
        Error::NonFinite { what: what.into() }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Yaml(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e)
    }
}
