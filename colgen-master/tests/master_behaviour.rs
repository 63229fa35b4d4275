//! Behavioural tests for `MasterProblem` and the diving rounder using rstest-bdd.

use std::cell::RefCell;
use std::collections::BTreeSet;

use colgen_core::test_support::{pool, route, unit_graph};
use colgen_core::{Graph, MasterConfig, RoutePool, Solution, SolveStatus};
use colgen_master::{DiveOutcome, DiveStop, MasterError, MasterProblem};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug, Default)]
struct MasterWorld {
    graph: RefCell<Graph>,
    routes: RefCell<RoutePool>,
    config: RefCell<MasterConfig>,
    route_values: RefCell<Vec<(String, f64)>>,
    vehicle_slack: RefCell<Option<f64>>,
    integer: RefCell<Option<Result<Solution, MasterError>>>,
    dives: RefCell<Vec<DiveOutcome>>,
    tabu: RefCell<BTreeSet<String>>,
}

impl MasterWorld {
    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_integer(&self) -> Result<Solution, MasterError> {
        self.integer
            .borrow()
            .as_ref()
            .cloned()
            .expect("integer solve should run before assertions")
    }

    fn scenario_routes(&self, r3_cost: f64) {
        self.routes.replace(pool(&[
            ("r1", &[1, 2], 10.0),
            ("r2", &[3, 4], 12.0),
            ("r3", &[1, 2, 3, 4], r3_cost),
        ]));
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn dive_repeatedly(&self, times: usize) {
        let graph = self.graph.borrow();
        let mut master =
            MasterProblem::new(&graph, self.config.borrow().clone()).expect("valid configuration");
        let routes = self.routes.borrow();
        let relaxation = master.solve_relaxed(&routes).expect("feasible relaxation");
        let outcomes: Vec<DiveOutcome> = (0..times).map(|_| master.dive(&relaxation)).collect();
        self.dives.borrow_mut().extend(outcomes);
        self.tabu.replace(master.tabu_list().clone());
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn route_value(&self, name: &str) -> f64 {
        self.route_values
            .borrow()
            .iter()
            .find(|(route, _)| route == name)
            .map(|(_, value)| *value)
            .expect("route was part of the relaxation")
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "integrality gap is a float difference"
)]
fn distance_to_integral(value: f64) -> f64 {
    (value - value.round()).abs()
}

#[fixture]
fn world() -> MasterWorld {
    MasterWorld::default()
}

#[given("four unit-demand customers")]
fn given_four_customers(world: &MasterWorld) {
    world.graph.replace(unit_graph([1, 2, 3, 4]));
}

#[given("routes r1 over 1 and 2 costing 10, r2 over 3 and 4 costing 12 and r3 over all costing 25")]
fn given_expensive_cover(world: &MasterWorld) {
    world.scenario_routes(25.0);
}

#[given("routes r1 over 1 and 2 costing 10, r2 over 3 and 4 costing 12 and r3 over all costing 15")]
fn given_cheap_cover(world: &MasterWorld) {
    world.scenario_routes(15.0);
}

#[given("two customers served by separate routes of vehicle type 0")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn given_separate_routes(world: &MasterWorld) {
    world.graph.replace(unit_graph([1, 2]));
    let routes = RoutePool::from_routes([route("a", &[1], 3.0, 0), route("b", &[2], 4.0, 0)])
        .expect("route names are unique");
    world.routes.replace(routes);
}

#[given("a fleet of one vehicle of type 0")]
fn given_single_vehicle(world: &MasterWorld) {
    world.config.borrow_mut().num_vehicles = Some(vec![1]);
}

#[given("an odd cycle of three customers beside four customers covered by triples")]
fn given_cycle_and_triples(world: &MasterWorld) {
    world.graph.replace(unit_graph(1..=7));
    world.routes.replace(pool(&[
        ("x12", &[1, 2], 1.0),
        ("x13", &[1, 3], 1.0),
        ("x23", &[2, 3], 1.0),
        ("t456", &[4, 5, 6], 1.0),
        ("t457", &[4, 5, 7], 1.0),
        ("t467", &[4, 6, 7], 1.0),
        ("t567", &[5, 6, 7], 1.0),
    ]));
}

#[given("three customers on an odd cycle of unit-cost routes")]
fn given_odd_cycle(world: &MasterWorld) {
    world.graph.replace(unit_graph([1, 2, 3]));
    world.routes.replace(pool(&[
        ("A", &[1, 2], 1.0),
        ("B", &[2, 3], 1.0),
        ("C", &[1, 3], 1.0),
    ]));
}

#[when("the integer master is solved")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_integer_solved(world: &MasterWorld) {
    let graph = world.graph.borrow();
    let config = MasterConfig {
        relax: false,
        ..world.config.borrow().clone()
    };
    let master = MasterProblem::new(&graph, config).expect("valid configuration");
    let outcome = master.solve_integer(&world.routes.borrow());
    world.integer.replace(Some(outcome));
}

#[when("the relaxed master is solved")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_relaxed_solved(world: &MasterWorld) {
    let graph = world.graph.borrow();
    let master =
        MasterProblem::new(&graph, world.config.borrow().clone()).expect("valid configuration");
    let routes = world.routes.borrow();
    let relaxation = master.solve_relaxed(&routes).expect("relaxation is elastic");
    world.vehicle_slack.replace(Some(relaxation.vehicle_slack(0)));
    let values = routes
        .iter()
        .filter_map(|route| {
            relaxation
                .value(route.name())
                .map(|value| (route.name().to_owned(), value))
        })
        .collect();
    world.route_values.replace(values);
}

#[when("the master dives once")]
fn when_dived_once(world: &MasterWorld) {
    world.dive_repeatedly(1);
}

#[when("the master dives twice")]
fn when_dived_twice(world: &MasterWorld) {
    world.dive_repeatedly(2);
}

#[then("the selected routes are r1 and r2")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_two_routes(world: &MasterWorld) {
    let solution = world.expect_integer().expect("integer solve succeeds");
    assert_eq!(solution.route_names().collect::<Vec<_>>(), vec!["r1", "r2"]);
}

#[then("the selected routes are r3")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_single_route(world: &MasterWorld) {
    let solution = world.expect_integer().expect("integer solve succeeds");
    assert_eq!(solution.route_names().collect::<Vec<_>>(), vec!["r3"]);
}

#[then("the total cost is {expected:f64}")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
#[expect(clippy::float_arithmetic, reason = "cost comparison uses a tolerance")]
fn then_total_cost(world: &MasterWorld, expected: f64) {
    let solution = world.expect_integer().expect("integer solve succeeds");
    assert!((solution.total_cost - expected).abs() <= 1e-6);
}

#[then("the relaxation uses artificial vehicle slack")]
fn then_vehicle_slack(world: &MasterWorld) {
    let slack = world.vehicle_slack.borrow().unwrap_or_default();
    assert!(slack > 0.5, "expected positive slack, got {slack}");
}

#[then("the solve fails as infeasible")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_infeasible(world: &MasterWorld) {
    let err = world
        .expect_integer()
        .expect_err("two routes cannot share one vehicle");
    assert_eq!(
        err,
        MasterError::OptimizationFailure {
            status: SolveStatus::Infeasible
        }
    );
}

#[then("the cycle routes sit at one half and the triples at one third")]
#[expect(
    clippy::float_arithmetic,
    reason = "relaxed values are compared with a tolerance"
)]
fn then_halves_and_thirds(world: &MasterWorld) {
    for name in ["x12", "x13", "x23"] {
        let value = world.route_value(name);
        assert!((value - 0.5).abs() <= 1e-6, "{name} at {value}");
    }
    for name in ["t456", "t457", "t467", "t567"] {
        let value = world.route_value(name);
        assert!((value - 1.0 / 3.0).abs() <= 1e-6, "{name} at {value}");
    }
}

#[then("exactly route t456 is fixed")]
fn then_fixed_t456(world: &MasterWorld) {
    let dives = world.dives.borrow();
    let fixed: Vec<&str> = dives
        .iter()
        .flat_map(|outcome| outcome.fixed.iter().map(String::as_str))
        .collect();
    assert_eq!(fixed, vec!["t456"]);
}

#[then("no fractional route was closer to integral than the fixed route")]
fn then_fixed_was_closest(world: &MasterWorld) {
    let fixed_gap = distance_to_integral(world.route_value("t456"));
    let values = world.route_values.borrow();
    let gaps: Vec<f64> = values
        .iter()
        .map(|(_, value)| distance_to_integral(*value))
        .filter(|gap| *gap > 1e-6)
        .collect();
    assert!(gaps.iter().all(|gap| fixed_gap <= *gap));
    assert!(gaps.iter().any(|gap| fixed_gap < *gap));
}

#[then("the dive stopped because its budget ran out")]
fn then_exhausted(world: &MasterWorld) {
    let dives = world.dives.borrow();
    assert!(
        dives
            .iter()
            .all(|outcome| outcome.stopped == DiveStop::Exhausted && !outcome.stop_diving)
    );
}

#[then("the dives fixed A and then B")]
fn then_fixed_in_order(world: &MasterWorld) {
    let dives = world.dives.borrow();
    let fixed: Vec<Vec<String>> = dives.iter().map(|outcome| outcome.fixed.clone()).collect();
    assert_eq!(fixed, vec![vec!["A".to_owned()], vec!["B".to_owned()]]);
}

#[then("the tabu list holds A and B")]
fn then_tabu(world: &MasterWorld) {
    let tabu = world.tabu.borrow();
    assert_eq!(
        tabu.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["A", "B"]
    );
}

#[scenario(path = "tests/features/master_problem.feature", index = 0)]
fn two_routes_beat_expensive_cover(world: MasterWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/master_problem.feature", index = 1)]
fn cheap_cover_wins(world: MasterWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/master_problem.feature", index = 2)]
fn overfull_fleet(world: MasterWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/master_problem.feature", index = 3)]
fn dive_fixes_closest(world: MasterWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/master_problem.feature", index = 4)]
fn repeated_dives_respect_tabu(world: MasterWorld) {
    let _ = world;
}
