use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use saferoute_lib::{
    build_graph, find_route, k_shortest_paths, load_graph, shortest_path, CostCriterion, CostMap,
    DatasetPaths, Edge, Exclusions, Graph, Node, RouteRequest, SafetyScorer, ScoringProfile,
    TimeSlot, TravelMode,
};
use std::hint::black_box;
use std::path::PathBuf;

const GRID_SIDE: usize = 40;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

fn cell(row: usize, col: usize) -> String {
    format!("r{row}c{col}")
}

/// Square street grid with varying block lengths.
fn grid_graph(side: usize) -> Graph {
    let mut nodes = Vec::with_capacity(side * side);
    let mut edges = Vec::with_capacity(2 * side * side);
    for row in 0..side {
        for col in 0..side {
            nodes.push(Node::new(cell(row, col), cell(row, col)));
            let length = 80.0 + ((row * 7 + col * 13) % 11) as f64 * 15.0;
            if col + 1 < side {
                edges.push(Edge::new(
                    format!("h{row}-{col}"),
                    cell(row, col),
                    cell(row, col + 1),
                    length,
                ));
            }
            if row + 1 < side {
                edges.push(Edge::new(
                    format!("v{row}-{col}"),
                    cell(row, col),
                    cell(row + 1, col),
                    length + 20.0,
                ));
            }
        }
    }
    build_graph(nodes, edges).expect("grid builds")
}

static FIXTURE: Lazy<Graph> = Lazy::new(|| {
    load_graph(&DatasetPaths::for_dir(&fixture_dir())).expect("fixture loads")
});
static GRID: Lazy<Graph> = Lazy::new(|| grid_graph(GRID_SIDE));
static GRID_COSTS: Lazy<CostMap> = Lazy::new(|| {
    CostMap::try_from_iter(
        GRID.edges()
            .iter()
            .map(|edge| (edge.id.clone(), edge.distance_m)),
    )
    .expect("grid costs are valid")
});
static BLENDED_REQUEST: Lazy<RouteRequest> = Lazy::new(|| {
    RouteRequest::new("station", "library")
        .with_criterion(CostCriterion::blended())
        .with_profile(ScoringProfile::new(TravelMode::Walking, TimeSlot::Night))
});

fn benchmark_pathfinding(c: &mut Criterion) {
    let grid = &*GRID;
    let costs = &*GRID_COSTS;
    let goal = cell(GRID_SIDE - 1, GRID_SIDE - 1);

    c.bench_function("dijkstra_grid_corner_to_corner", |b| {
        b.iter(|| {
            let result = shortest_path(grid, "r0c0", &goal, costs, &Exclusions::new())
                .expect("valid query");
            black_box(result.cost())
        });
    });

    c.bench_function("yen_grid_k5", |b| {
        b.iter(|| {
            let paths = k_shortest_paths(grid, "r0c0", &goal, costs, &Exclusions::new(), 5)
                .expect("valid query");
            black_box(paths.len())
        });
    });

    c.bench_function("find_route_fixture_blended", |b| {
        let graph = &*FIXTURE;
        let request = &*BLENDED_REQUEST;
        b.iter(|| {
            let outcome = find_route(graph, request, &SafetyScorer).expect("valid query");
            black_box(outcome.is_found())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
