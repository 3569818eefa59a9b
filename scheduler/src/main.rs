mod config;
mod display;
mod runner;
mod tracer;

use config::{AppConfig, OutputMode};
use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use process_timeline::SchedulerEngine;
use runner::TimelineRunner;
use std::{error::Error, io};
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    tracer::init_tracing();

    let config = AppConfig::from_env()?;
    info!(
        policy = %config.request.policy,
        quantum = ?config.request.quantum,
        processes = config.request.processes.len(),
        "scenario loaded"
    );

    match config.output {
        OutputMode::Json => {
            let result = SchedulerEngine::new().run(&config.request)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputMode::Tui => {
            execute!(io::stdout(), Clear(ClearType::All))?;

            let mut runner = TimelineRunner::new(config.request, config.view)?;
            while runner.run()? {}
            drop(runner);

            execute!(io::stdout(), Clear(ClearType::All))?;
        }
    }
    Ok(())
}
