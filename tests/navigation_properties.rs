mod common;

use chart_router::{NavPath, RouteSpec, RouterError};
use common::{path, router_for, Call, Fault};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

fn deep_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::group(
            "A",
            vec![
                RouteSpec::group("a1", vec![RouteSpec::leaf("x", "x"), RouteSpec::leaf("y", "y")])
                    .with_panel("a1"),
                RouteSpec::leaf("a2", "a2"),
            ],
        )
        .with_panel("a"),
        RouteSpec::group("B", vec![RouteSpec::leaf("b1", "b1"), RouteSpec::leaf("b2", "b2")])
            .with_panel("b"),
    ]
}

const PANELS: [&str; 8] = ["a", "a1", "x", "y", "a2", "b", "b1", "b2"];

const TARGETS: [&str; 12] = [
    "/A", "/A/a1", "/A/a1/x", "/A/a1/y", "/A/a2", "/B", "/B/b1", "/B/b2",
    // unresolvable
    "/A/zz", "/C", "/B/b1/deeper", "/A/a1/x/y",
];

/// Every instance sees init first, destroy at most once, nothing after destroy.
fn assert_instance_histories(events: &[common::Event]) {
    let mut histories: HashMap<u64, Vec<Call>> = HashMap::new();
    for e in events {
        histories.entry(e.serial).or_default().push(e.call);
    }
    for (serial, calls) in histories {
        assert_eq!(calls[0], Call::Init, "instance {serial}: {calls:?}");
        assert_eq!(calls.iter().filter(|c| **c == Call::Init).count(), 1);
        if let Some(pos) = calls.iter().position(|c| *c == Call::Destroy) {
            assert_eq!(pos, calls.len() - 1, "instance {serial} used after destroy: {calls:?}");
        }
    }
}

#[test]
fn test_random_navigation_keeps_chain_consistent() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let (mut router, host, journal) = router_for(&deep_routes(), &PANELS);

    for step in 0..400 {
        let raw = TARGETS[rng.random_range(0..TARGETS.len())];
        let before = router.active_path();
        let before_mounts = host.attached_paths();

        match router.navigate(path(raw)) {
            Ok(outcome) => {
                assert_eq!(router.active_path(), Some(path(raw)), "step {step}");
                assert_eq!(outcome.path, path(raw));
                // every node on the path hosts a panel here
                let expected: Vec<String> = (1..=outcome.path.len())
                    .map(|n| NavPath::new(outcome.path.segments()[..n].to_vec()).unwrap().to_string())
                    .collect();
                assert_eq!(host.attached_paths(), expected, "step {step}");
            }
            Err(e) => {
                assert!(e.is_not_found(), "step {step}: {e}");
                assert_eq!(router.active_path(), before);
                assert_eq!(host.attached_paths(), before_mounts);
            }
        }
        assert_eq!(host.live_resources(), host.attached().len());
        assert_eq!(host.orphaned_resources(), 0);
    }

    router.shutdown();
    assert!(host.attached().is_empty());
    assert_instance_histories(&journal.events());
}

#[test]
fn test_shared_prefix_instances_survive() {
    let mut rng = StdRng::seed_from_u64(7);
    let (mut router, _host, journal) = router_for(&deep_routes(), &PANELS);
    router.navigate(path("/A/a1/x")).unwrap();
    let a = journal.instances_of("a");
    let a1 = journal.instances_of("a1");

    // bounce between the two leaves below a1
    for _ in 0..50 {
        let leaf = if rng.random_bool(0.5) { "/A/a1/x" } else { "/A/a1/y" };
        router.navigate(path(leaf)).unwrap();
    }

    assert_eq!(journal.instances_of("a"), a);
    assert_eq!(journal.instances_of("a1"), a1);
    assert_instance_histories(&journal.events());
}

#[test]
fn test_random_faults_never_leak() {
    let mut rng = StdRng::seed_from_u64(42);
    let (mut router, host, journal) = router_for(&deep_routes(), &PANELS);
    let faults = [Fault::Factory, Fault::Init, Fault::Update, Fault::Destroy];

    for _ in 0..300 {
        let panel = PANELS[rng.random_range(0..PANELS.len())];
        if rng.random_bool(0.2) {
            journal.fail(panel, faults[rng.random_range(0..faults.len())]);
        } else {
            journal.heal(panel);
        }

        let raw = TARGETS[rng.random_range(0..8)];
        match router.navigate(path(raw)) {
            Ok(_) => assert_eq!(router.active_path(), Some(path(raw))),
            Err(RouterError::Transition(e)) => {
                // settled on a prefix of the target (or stayed put)
                if e.degraded {
                    assert!(router.is_degraded());
                }
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
        assert_eq!(host.orphaned_resources(), 0);
        assert_eq!(host.live_resources(), host.attached().len());
    }

    for panel in PANELS {
        journal.heal(panel);
    }
    router.shutdown();
    assert!(host.attached().is_empty());
    assert_eq!(host.live_resources(), 0);
    assert_instance_histories(&journal.events());
}
