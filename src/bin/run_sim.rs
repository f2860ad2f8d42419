use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};
use pankh::{
    config::{
        run::{RunContext, RunParams},
        setup::SetupConfig,
    },
    dynamics::{initial_state, run, steady_state},
    output::Output,
};

#[derive(Debug, clap::Parser)]
#[command(
    name = "pankh_run",
    about = "Run an unsteady panel-method simulation of a pitching and plunging airfoil"
)]
pub struct RunCli {
    // Setup file, YAML or JSON.
    pub config: PathBuf,

    #[arg(short = 'o', long = "output", default_value = "output")]
    pub output_dir: PathBuf,

    // Steps between wake and surface snapshots.
    #[arg(short = 'd', long = "dstep-view", default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub dstep_view: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = RunCli::parse();

    let setup_config = SetupConfig::parse(&args.config)?;
    setup_config.print();
    let sim_params = setup_config.sim_params;

    let run_params = RunParams {
        output_dir: args.output_dir,
        dstep_view: args.dstep_view as usize,
    };
    let mut output = Output::create(&run_params.output_dir)?;

    match steady_state(&sim_params) {
        Ok(steady) => output.write_steady(&steady)?,
        Err(e) => warn!("Could not compute the steady solution: {}", e),
    }

    info!("Initializing new run: {} steps", sim_params.n_steps);
    let sim_state = initial_state(&sim_params);
    let run_context = RunContext::new();
    let last = run(
        &sim_params,
        sim_state,
        &run_params,
        &run_context,
        &mut output,
    )?;
    output.finish()?;

    if let Some(summary) = last {
        info!(
            "Final step {}: t={:.4} s, cn={:.5}, ca={:.5}, wake vortices={}",
            summary.step, summary.t, summary.cn, summary.ca, summary.n_wake
        );
    }
    info!("Done!");
    Ok(())
}
