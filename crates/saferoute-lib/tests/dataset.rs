mod common;

use std::fs;

use saferoute_lib::{
    load_graph, parse_graph, resolve_dataset, DatasetPaths, Error, TimeSlot, TravelMode,
};
use tempfile::tempdir;

use common::fixtures_dir;

#[test]
fn fixture_dataset_loads() {
    let paths = resolve_dataset(Some(&fixtures_dir())).expect("fixture present");
    let graph = load_graph(&paths).expect("fixture loads");

    assert_eq!(graph.node_count(), 10);
    assert_eq!(graph.edge_count(), 13);
    assert_eq!(graph.node("station").map(|n| n.name.as_str()), Some("Central Station"));
    assert_eq!(graph.neighbours("lighthouse").count(), 0);
}

#[test]
fn fixture_reading_aliases_are_understood() {
    let graph = load_graph(&DatasetPaths::for_dir(&fixtures_dir())).expect("fixture loads");

    let park = graph.edge("station-park").expect("edge present");
    let night = park.features.readings(TravelMode::Walking, TimeSlot::Night);
    assert_eq!(night.crowd_density, Some(1.0));
    assert_eq!(night.stray_animals, Some(6.0));

    let harbor = graph.edge("station-harbor").expect("edge present");
    assert_eq!(harbor.distance_m, 1200.0);
}

#[test]
fn dataset_round_trips_through_the_filesystem() {
    let dir = tempdir().expect("create temp dir");
    fs::write(dir.path().join("nodes.json"), r#"[{"id": "x"}, {"id": "y"}]"#).expect("write nodes");
    fs::write(
        dir.path().join("edges.json"),
        r#"[{"u": "x", "v": "y", "distance_m": 42}]"#,
    )
    .expect("write edges");

    let graph = load_graph(&resolve_dataset(Some(dir.path())).expect("resolves")).expect("loads");
    assert_eq!(graph.edge("x-y-1").map(|edge| edge.distance_m), Some(42.0));
}

#[test]
fn missing_edges_file_is_reported() {
    let dir = tempdir().expect("create temp dir");
    fs::write(dir.path().join("nodes.json"), "[]").expect("write nodes");

    let error = resolve_dataset(Some(dir.path())).expect_err("edges.json missing");
    match error {
        Error::DatasetNotFound { path } => assert!(path.ends_with("edges.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_edge_ids_are_rejected() {
    let result = parse_graph(
        r#"[{"id": "a"}, {"id": "b"}]"#,
        r#"[{"id": "e", "u": "a", "v": "b", "distance_m": 1},
            {"id": "e", "u": "b", "v": "a", "distance_m": 2}]"#,
    );
    assert!(matches!(result, Err(Error::DuplicateEdgeId { ref id }) if id == "e"));
}

#[test]
fn negative_distances_are_rejected() {
    let result = parse_graph(
        r#"[{"id": "a"}, {"id": "b"}]"#,
        r#"[{"id": "e", "u": "a", "v": "b", "distance_m": -3}]"#,
    );
    assert!(matches!(result, Err(Error::InvalidDistance { .. })));
}

#[test]
fn dangling_edges_and_self_loops_are_skipped() {
    let graph = parse_graph(
        r#"[{"id": "a"}, {"id": "b"}]"#,
        r#"[{"id": "ok", "u": "a", "v": "b", "distance_m": 1},
            {"id": "dangling", "u": "a", "v": "ghost", "distance_m": 1},
            {"id": "loop", "u": "a", "v": "a", "distance_m": 1}]"#,
    )
    .expect("dataset parses");
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.contains_edge("ok"));
}
