use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    config::setup::parameters::simulation::SimParams,
    error::Error,
    state::{StepSummary, SteadySolution, SurfaceSummary, WakeVortex},
};

// Writes the load history as the run progresses, plus periodic snapshots of
// the wake and surface.
pub struct Output {
    folder: PathBuf,
    loads_writer: csv::Writer<File>,
}

impl Output {
    pub fn create<P: AsRef<Path>>(folder: P) -> Result<Self, Error> {
        let folder = folder.as_ref().to_path_buf();
        if !folder.exists() {
            fs::create_dir_all(&folder)?;
        }
        let mut loads_writer = csv::Writer::from_path(folder.join("loads.csv"))?;
        loads_writer.write_record([
            "step",
            "t",
            "t_ref",
            "alpha",
            "cn",
            "ca",
            "gamma_wp",
            "l_wp",
            "theta_wp",
            "iterations",
            "total_circulation",
        ])?;
        info!("Writing output to {}", folder.display());
        Ok(Output {
            folder,
            loads_writer,
        })
    }

    pub fn write_loads(&mut self, sim_params: &SimParams, summary: &StepSummary) -> Result<(), Error> {
        self.loads_writer.write_record(&[
            summary.step.to_string(),
            summary.t.to_string(),
            sim_params.nondimensional_time(summary.t).to_string(),
            summary.alpha.to_degrees().to_string(),
            summary.cn.to_string(),
            summary.ca.to_string(),
            summary.gamma_wake_panel.to_string(),
            summary.wake_panel_length.to_string(),
            summary.wake_panel_angle.to_string(),
            summary.newton_iterations.to_string(),
            summary.total_circulation.to_string(),
        ])?;
        Ok(())
    }

    pub fn write_snapshot(&mut self, summary: &StepSummary, wake: &[WakeVortex]) -> Result<(), Error> {
        let step = summary.step;
        write_wake(&self.folder.join(format!("wake_{}.csv", step)), wake)?;
        write_surface(
            &self.folder.join(format!("surface_{}.csv", step)),
            &summary.surface,
        )?;
        let file = File::create(self.folder.join(format!("summary_{}.json", step)))?;
        serde_json::to_writer_pretty(file, summary)?;
        // Keep the load history on disk up to the snapshot.
        self.loads_writer.flush()?;
        Ok(())
    }

    pub fn write_steady(&self, steady: &SteadySolution) -> Result<(), Error> {
        let file = File::create(self.folder.join("steady.json"))?;
        serde_json::to_writer_pretty(file, steady)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(), Error> {
        self.loads_writer.flush()?;
        Ok(())
    }
}

fn write_wake(path: &Path, wake: &[WakeVortex]) -> Result<(), Error> {
    let mut wake_writer = csv::Writer::from_path(path)?;
    wake_writer.write_record(["x", "y", "strength"])?;
    for w in wake.iter() {
        wake_writer.write_record(&[
            w.position.x.to_string(),
            w.position.y.to_string(),
            w.strength.to_string(),
        ])?;
    }
    wake_writer.flush()?;
    Ok(())
}

fn write_surface(path: &Path, surface: &SurfaceSummary) -> Result<(), Error> {
    let mut surface_writer = csv::Writer::from_path(path)?;
    surface_writer.write_record(["x_cp", "y_cp", "cp", "phi"])?;
    for ((x, cp), phi) in surface
        .control_points
        .iter()
        .zip(surface.cp.iter())
        .zip(surface.phi.iter())
    {
        surface_writer.write_record(&[
            x.x.to_string(),
            x.y.to_string(),
            cp.to_string(),
            phi.to_string(),
        ])?;
    }
    surface_writer.flush()?;
    Ok(())
}
