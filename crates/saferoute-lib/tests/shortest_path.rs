mod common;

use saferoute_lib::{shortest_path, CostMap, Error, Exclusions, SearchResult};

use common::{all_simple_path_costs, distance_costs, graph_from, random_graph, triangle, Lcg};

#[test]
fn prefers_two_cheap_hops_over_one_expensive_edge() {
    let graph = triangle();
    let result = shortest_path(&graph, "A", "C", &distance_costs(&graph), &Exclusions::new())
        .expect("valid query");

    assert_eq!(result.nodes(), ["A", "B", "C"]);
    assert_eq!(result.edges(), ["ab", "bc"]);
    assert_eq!(result.cost(), 2.0);
}

#[test]
fn start_equal_to_goal_is_a_trivial_path() {
    let graph = triangle();
    let result = shortest_path(&graph, "B", "B", &distance_costs(&graph), &Exclusions::new())
        .expect("valid query");

    assert_eq!(result.nodes(), ["B"]);
    assert!(result.edges().is_empty());
    assert_eq!(result.cost(), 0.0);
}

#[test]
fn isolated_goal_is_unreachable() {
    let graph = graph_from(&[("ab", "A", "B", 1.0)], &["Z"]);
    let result = shortest_path(&graph, "A", "Z", &distance_costs(&graph), &Exclusions::new())
        .expect("valid query");

    assert_eq!(result, SearchResult::Unreachable);
    assert!(result.nodes().is_empty());
    assert!(result.edges().is_empty());
    assert_eq!(result.cost(), f64::INFINITY);
}

#[test]
fn unknown_endpoint_is_an_error() {
    let graph = triangle();
    let error = shortest_path(&graph, "A", "Q", &CostMap::new(), &Exclusions::new())
        .expect_err("Q is not in the graph");
    assert!(matches!(error, Error::UnknownNode { ref id, .. } if id == "Q"));
}

#[test]
fn missing_cost_entries_count_as_one() {
    let graph = triangle();
    let mut costs = CostMap::new();
    costs.insert("ac", 1.5).expect("valid cost");

    let result = shortest_path(&graph, "A", "C", &costs, &Exclusions::new()).expect("valid query");
    assert_eq!(result.nodes(), ["A", "C"]);
    assert_eq!(result.cost(), 1.5);

    let mut costs = CostMap::new();
    costs.insert("ac", 2.5).expect("valid cost");
    let result = shortest_path(&graph, "A", "C", &costs, &Exclusions::new()).expect("valid query");
    assert_eq!(result.nodes(), ["A", "B", "C"]);
    assert_eq!(result.cost(), 2.0);
}

#[test]
fn blocked_cost_entries_are_impassable() {
    let graph = triangle();
    let mut costs = distance_costs(&graph);
    costs.block("ab");

    let result = shortest_path(&graph, "A", "C", &costs, &Exclusions::new()).expect("valid query");
    assert_eq!(result.nodes(), ["A", "C"]);

    costs.block("ac");
    let result = shortest_path(&graph, "A", "C", &costs, &Exclusions::new()).expect("valid query");
    assert!(!result.is_found());
}

#[test]
fn exclusions_block_nodes_and_edges() {
    let graph = triangle();
    let costs = distance_costs(&graph);

    let mut exclusions = Exclusions::new();
    exclusions.block_node("B");
    let result = shortest_path(&graph, "A", "C", &costs, &exclusions).expect("valid query");
    assert_eq!(result.nodes(), ["A", "C"]);

    let mut exclusions = Exclusions::new();
    exclusions.block_edge("ac");
    exclusions.block_edge("bc");
    let result = shortest_path(&graph, "A", "C", &costs, &exclusions).expect("valid query");
    assert!(!result.is_found());
}

#[test]
fn parallel_edges_record_the_cheaper_edge() {
    let graph = graph_from(&[("slow", "A", "B", 9.0), ("fast", "A", "B", 2.0)], &[]);
    let result = shortest_path(&graph, "B", "A", &distance_costs(&graph), &Exclusions::new())
        .expect("valid query");
    assert_eq!(result.edges(), ["fast"]);
    assert_eq!(result.nodes(), ["B", "A"]);
}

#[test]
fn repeated_queries_are_identical() {
    let graph = graph_from(
        &[
            ("ab", "A", "B", 1.0),
            ("bd", "B", "D", 1.0),
            ("ac", "A", "C", 1.0),
            ("cd", "C", "D", 1.0),
        ],
        &[],
    );
    let costs = distance_costs(&graph);
    let first = shortest_path(&graph, "A", "D", &costs, &Exclusions::new()).expect("valid query");
    for _ in 0..5 {
        let again = shortest_path(&graph, "A", "D", &costs, &Exclusions::new()).expect("valid query");
        assert_eq!(again, first);
    }
}

#[test]
fn matches_brute_force_minimum_on_random_graphs() {
    let mut rng = Lcg::new(0x5eed);
    for round in 0..40 {
        let graph = random_graph(&mut rng, 6);
        let costs = distance_costs(&graph);
        let goal = format!("n{}", 1 + round % 5);

        let result = shortest_path(&graph, "n0", &goal, &costs, &Exclusions::new())
            .expect("valid query");
        let brute = all_simple_path_costs(&graph, &costs, "n0", &goal);

        match brute.first() {
            Some(&best) => {
                let path = result.path().expect("reachable goal is found");
                assert_eq!(path.cost, best, "round {round}");
                assert!(path.is_simple());
                assert_eq!(path.edges.len(), path.nodes.len() - 1);
                assert_eq!(costs.total(&path.edges), path.cost);
            }
            None => assert!(!result.is_found(), "round {round}"),
        }
    }
}
