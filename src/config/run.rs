use std::path::PathBuf;

use crate::numerics::interface::{VortexContext, VortexContextTrait};

pub struct RunParams {
    pub output_dir: PathBuf,
    pub dstep_view: usize,
}

pub struct RunContext {
    pub vortex_context: VortexContext,
}

impl RunContext {
    pub fn new() -> Self {
        RunContext {
            vortex_context: VortexContext::new(),
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
