//! One complete run: prepare the data, search, save the result.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::{ConfigError, RunConfig};
use crate::domain::{DomainError, Minute, Station};
use crate::network::{DistanceFormat, DistanceGraph, Network, NetworkError};
use crate::planner::{CancelFlag, Planner, SearchError, SearchOutcome, check_route};
use crate::store::{OutputLayout, StoreError, read_json, write_json, write_route};
use crate::telemetry::TelemetryError;
use crate::timetable::{TimetableError, TimetableIndex, annotate, read_rides, station_pairs};

/// Anything that can stop a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Timetable(#[from] TimetableError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The search thread panicked or was aborted
    #[error("search task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub counted_km: f64,
    pub legs: usize,
    pub iterations: u64,
    pub interrupted: bool,
    /// Whether the final route passed the rule checks.
    pub compliant: bool,
    pub end_station: Station,
    pub end_time: Minute,
    pub route_path: PathBuf,
    pub parameters_path: PathBuf,
}

/// Raw distance input an enhanced network was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct NetworkSource {
    distances_path: PathBuf,
    distances_format: DistanceFormat,
}

impl NetworkSource {
    fn of(config: &RunConfig) -> Self {
        Self {
            distances_path: config.distances_path.clone(),
            distances_format: config.distances_format,
        }
    }
}

/// Load the enhanced network left by an earlier run from the same raw
/// distances, or start from the raw neighbour distances.
fn load_network(config: &RunConfig, layout: &OutputLayout) -> Result<Network, NetworkError> {
    let distances = layout.enhanced_distances();
    let paths = layout.intermediate_paths();
    let source = NetworkSource::of(config);

    if distances.exists() && paths.exists() {
        match read_json::<NetworkSource>(&layout.network_source()) {
            Ok(recorded) if recorded == source => {
                info!(path = %distances.display(), "Reusing enhanced network");
                return Network::load(&distances, &paths);
            }
            Ok(recorded) => info!(
                previous = %recorded.distances_path.display(),
                current = %source.distances_path.display(),
                "Raw distances changed, rebuilding network"
            ),
            Err(e) => warn!(error = %e, "Enhanced network has no source record, rebuilding"),
        }
    }

    let graph = DistanceGraph::read(&config.distances_path, config.distances_format)?;
    info!(
        path = %config.distances_path.display(),
        stations = graph.station_count(),
        edges = graph.edge_count(),
        "Loaded neighbour distances"
    );
    Ok(Network::new(graph))
}

/// Summary of a run stopped before the search began: the empty route is
/// saved like any other result.
fn stopped_early(
    config: &RunConfig,
    layout: &OutputLayout,
    start: Minute,
    parameters_path: PathBuf,
) -> Result<RunSummary, RunError> {
    info!("Interrupted before search");
    let route_path = layout.route(0.0);
    write_route(&route_path, &[])?;
    Ok(RunSummary {
        counted_km: 0.0,
        legs: 0,
        iterations: 0,
        interrupted: true,
        compliant: true,
        end_station: config.start_station.clone(),
        end_time: start,
        route_path,
        parameters_path,
    })
}

/// Run a search as described by `config`, writing outputs under `layout`.
///
/// A cancelled run is not an error: the best route found so far is saved
/// like any other. Cancellation is also checked between preparation steps.
pub fn run(
    config: &RunConfig,
    layout: &OutputLayout,
    cancel: &CancelFlag,
) -> Result<RunSummary, RunError> {
    config.validate()?;
    let start = config.start()?;
    let search_config = config.search_config()?;

    let parameters_path = layout.parameters();
    write_json(&parameters_path, config)?;

    let rides = read_rides(&config.timetable_path)?;
    if cancel.is_cancelled() {
        return stopped_early(config, layout, start, parameters_path);
    }

    let mut network = load_network(config, layout)?;
    network.enhance(station_pairs(&rides));
    network.save(&layout.enhanced_distances(), &layout.intermediate_paths())?;
    write_json(&layout.network_source(), &NetworkSource::of(config))?;
    if cancel.is_cancelled() {
        return stopped_early(config, layout, start, parameters_path);
    }

    let legs = annotate(rides, network.graph())?;
    let index = TimetableIndex::prefiltered(legs, start, search_config.end_time);
    info!(
        legs = index.leg_count(),
        stations = index.station_count(),
        "Timetable indexed"
    );

    let planner = Planner::new(&index, &network, &search_config);
    let seed = planner.seed(config.start_station.clone(), start)?;
    let mut frontier = config.strategy.frontier();
    info!(strategy = %config.strategy, "Running search");

    let SearchOutcome {
        best,
        iterations,
        interrupted,
        ..
    } = planner.run(seed, &mut *frontier, cancel)?;

    let compliant = match check_route(best.route(), &search_config, &config.start_station, start)
    {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Route breaks the rules");
            false
        }
    };

    for (i, entry) in best.route().iter().enumerate() {
        let leg = &entry.leg;
        info!(
            leg = i,
            from = %leg.origin(),
            to = %leg.destination(),
            departure = %leg.departure(),
            arrival = %leg.arrival(),
            class = %leg.class(),
            service = %leg.service(),
            waiting = entry.waiting_mins,
            km = entry.counted_km,
            "Transfer"
        );
    }

    let route_path = layout.route(best.counted_km());
    write_route(&route_path, best.route())?;

    let summary = RunSummary {
        counted_km: best.counted_km(),
        legs: best.route().len(),
        iterations,
        interrupted,
        compliant,
        end_station: best.station().clone(),
        end_time: best.clock(),
        route_path,
        parameters_path,
    };

    info!(
        km = summary.counted_km,
        legs = summary.legs,
        iterations,
        end_station = %summary.end_station,
        end_time = %summary.end_time,
        route = %summary.route_path.display(),
        "Run finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn panicked_search_task_is_an_error() {
        let task = tokio::task::spawn_blocking(|| -> Result<RunSummary, RunError> {
            panic!("search thread died")
        });

        let err = RunError::from(task.await.unwrap_err());

        assert!(matches!(err, RunError::Task(_)));
        assert!(err.to_string().starts_with("search task failed"));
    }
}
