use std::path::PathBuf;
use std::process::ExitCode;

use km_planner::config::RunConfig;
use km_planner::planner::CancelFlag;
use km_planner::run::{RunError, RunSummary, run};
use km_planner::store::OutputLayout;
use km_planner::telemetry;

/// Config file used when no path is given.
const DEFAULT_CONFIG: &str = "config.json";

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);

    match start(config_path).await {
        Ok(summary) => {
            println!(
                "Counted {:.1} km over {} legs, ending at {} at {}",
                summary.counted_km, summary.legs, summary.end_station, summary.end_time
            );
            println!("Route written to {}", summary.route_path.display());
            if summary.interrupted {
                println!("Search was interrupted; this is the best route found so far.");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn start(config_path: PathBuf) -> Result<RunSummary, RunError> {
    let config = RunConfig::load(&config_path)?;
    let layout = OutputLayout::now(&config.output_dir);
    telemetry::init(&layout.log())?;

    let cancel = CancelFlag::new();
    let search_cancel = cancel.clone();
    let mut search =
        tokio::task::spawn_blocking(move || run(&config, &layout, &search_cancel));

    tokio::select! {
        result = &mut search => return result?,
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => {
                println!("Stopping search, saving best route so far...");
                cancel.cancel();
            }
            Err(e) => eprintln!("Failed to listen for Ctrl-C: {e}"),
        }
    }

    search.await?
}
