use std::path::Path;

use chrono::NaiveDate;
use km_planner::config::RunConfig;
use km_planner::domain::Station;
use km_planner::network::{DistanceFormat, Network};
use km_planner::planner::{CancelFlag, SearchError, Strategy};
use km_planner::run::{RunError, run};
use km_planner::store::OutputLayout;
use tempfile::{TempDir, tempdir};

const TIMETABLE: &str = "\
Station;To;Departure;Arrival;Type;ID
Ht;Vg;2025-08-02 12:05;2025-08-02 12:10;Spr;1
Vg;Rs;2025-08-02 12:10;2025-08-02 12:15;Spr;1
Ht;Rs;2025-08-02 12:05;2025-08-02 12:15;Int;3
Rs;Vg;2025-08-02 12:20;2025-08-02 12:25;Spr;2
Vg;Ht;2025-08-02 12:30;2025-08-02 12:36;Spr;2
Vg;Ht;2025-08-02 13:30;2025-08-02 13:36;Spr;4
";

const DISTANCES: &str = r#"{"Ht": {"Vg": 6.0}, "Vg": {"Rs": 4.0}}"#;

fn fixture() -> (TempDir, RunConfig) {
    let dir = tempdir().unwrap();
    let timetable_path = dir.path().join("timetable.csv");
    let distances_path = dir.path().join("station_distances.json");
    std::fs::write(&timetable_path, TIMETABLE).unwrap();
    std::fs::write(&distances_path, DISTANCES).unwrap();

    let config = RunConfig {
        day: NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
        start_station: Station::parse("Ht").unwrap(),
        start_time: "12:00".into(),
        end_time: "13:00".into(),
        min_transfer_mins: 3,
        max_transfer_mins: 15,
        branching_factor: 2,
        strategy: Strategy::BestFirst,
        timetable_path,
        distances_path,
        distances_format: DistanceFormat::Adjacency,
        output_dir: dir.path().join("runs"),
        progress_interval: 0,
    };
    (dir, config)
}

fn route_rows(path: &Path) -> Vec<csv::StringRecord> {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .unwrap()
        .records()
        .map(Result::unwrap)
        .collect()
}

#[test]
fn run_writes_route_parameters_and_network() {
    let (_dir, config) = fixture();
    let layout = OutputLayout::with_stamp(&config.output_dir, "e2e");

    let summary = run(&config, &layout, &CancelFlag::new()).unwrap();

    assert_eq!(summary.counted_km, 20.0);
    assert!(summary.compliant);
    assert!(!summary.interrupted);
    assert_eq!(summary.end_station.as_str(), "Ht");
    assert_eq!(summary.end_time.to_string(), "2025-08-02 12:36");

    assert_eq!(summary.route_path, layout.route(20.0));
    assert!(summary.route_path.ends_with("routes/e2e_200.csv"));
    let rows = route_rows(&summary.route_path);
    assert_eq!(rows.len(), summary.legs);
    assert_eq!(&rows[0][0], "Ht");
    assert_eq!(&rows[rows.len() - 1][1], "Ht");

    let saved: RunConfig =
        serde_json::from_str(&std::fs::read_to_string(&summary.parameters_path).unwrap()).unwrap();
    assert_eq!(saved, config);

    let network = Network::load(&layout.enhanced_distances(), &layout.intermediate_paths()).unwrap();
    let ht = Station::parse("Ht").unwrap();
    let rs = Station::parse("Rs").unwrap();
    assert_eq!(network.distance(&ht, &rs), Some(10.0));
    let path: Vec<&str> = network
        .path(&ht, &rs)
        .unwrap()
        .iter()
        .map(Station::as_str)
        .collect();
    assert_eq!(path, vec!["Ht", "Vg", "Rs"]);
}

#[test]
fn second_run_reuses_enhanced_network() {
    let (_dir, config) = fixture();
    let first = OutputLayout::with_stamp(&config.output_dir, "first");
    run(&config, &first, &CancelFlag::new()).unwrap();

    // Same raw source: the enhanced files are used without reading it again.
    std::fs::remove_file(&config.distances_path).unwrap();
    let second = OutputLayout::with_stamp(&config.output_dir, "second");
    let summary = run(&config, &second, &CancelFlag::new()).unwrap();

    assert_eq!(summary.counted_km, 20.0);
}

#[test]
fn changed_distances_rebuild_network() {
    let (dir, config) = fixture();
    let first = OutputLayout::with_stamp(&config.output_dir, "first");
    run(&config, &first, &CancelFlag::new()).unwrap();

    let longer = dir.path().join("longer_distances.json");
    std::fs::write(&longer, r#"{"Ht": {"Vg": 7.0}, "Vg": {"Rs": 4.0}}"#).unwrap();
    let config = RunConfig {
        distances_path: longer,
        ..config
    };
    let second = OutputLayout::with_stamp(&config.output_dir, "second");
    let summary = run(&config, &second, &CancelFlag::new()).unwrap();

    assert_eq!(summary.counted_km, 22.0);
    let network =
        Network::load(&second.enhanced_distances(), &second.intermediate_paths()).unwrap();
    let ht = Station::parse("Ht").unwrap();
    let rs = Station::parse("Rs").unwrap();
    assert_eq!(network.distance(&ht, &rs), Some(11.0));
}

#[test]
fn depth_first_finds_same_distance() {
    let (_dir, config) = fixture();
    let config = RunConfig {
        strategy: Strategy::DepthFirst,
        ..config
    };
    let layout = OutputLayout::with_stamp(&config.output_dir, "dfs");

    let summary = run(&config, &layout, &CancelFlag::new()).unwrap();

    assert_eq!(summary.counted_km, 20.0);
    assert!(summary.compliant);
}

#[test]
fn cancelled_run_saves_empty_route() {
    let (_dir, config) = fixture();
    let layout = OutputLayout::with_stamp(&config.output_dir, "stop");
    let cancel = CancelFlag::new();
    cancel.cancel();

    let summary = run(&config, &layout, &cancel).unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.counted_km, 0.0);
    assert_eq!(summary.legs, 0);
    assert!(summary.route_path.ends_with("routes/stop_0.csv"));
    assert!(route_rows(&summary.route_path).is_empty());
    assert_eq!(summary.end_station.as_str(), "Ht");
    // Stopped after reading the timetable, before building the network.
    assert!(!layout.enhanced_distances().exists());
}

#[test]
fn unknown_start_station_is_reported() {
    let (_dir, config) = fixture();
    let config = RunConfig {
        start_station: Station::parse("Asd").unwrap(),
        ..config
    };
    let layout = OutputLayout::with_stamp(&config.output_dir, "bad");

    let err = run(&config, &layout, &CancelFlag::new()).unwrap_err();

    assert!(matches!(
        err,
        RunError::Search(SearchError::UnknownStartStation(_))
    ));
}
