// Snowcap: Synthesizing Network-Wide Configuration Updates
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! End-to-end scenarios against `Engine`, exercising the full candidate -> strategy -> commit
//! pipeline rather than any single module in isolation.

use vne::engine::{Engine, EngineConfig, StrategyKind};
use vne::pso::PsoParams;
use vne::request::{VirtualLink, VirtualNetwork, VirtualNode, VirtualRequest};
use vne::substrate::Substrate;
use vne::Error;

fn pso_defaults(seed: u64) -> EngineConfig {
    EngineConfig { strategy: StrategyKind::Pso(PsoParams { seed, ..Default::default() }) }
}

fn single_domain_substrate() -> Substrate {
    let mut sub = Substrate::new();
    let d = sub.add_domain(0);
    let a = sub.add_node(d, 100.0, 1.0, 0.0);
    let b = sub.add_node(d, 100.0, 1.0, 0.0);
    let c = sub.add_node(d, 100.0, 1.0, 0.0);
    sub.add_intra_link(d, a, b, 1000.0, 1.0, 0.0).unwrap();
    sub.add_intra_link(d, b, c, 1000.0, 1.0, 0.0).unwrap();
    sub
}

fn two_node_request(lifetime: f64) -> VirtualRequest {
    VirtualRequest {
        vnetwork: VirtualNetwork {
            nodes: vec![
                VirtualNode { id: 0, cpu_demand: 10.0, permitted_domains: vec![] },
                VirtualNode { id: 1, cpu_demand: 20.0, permitted_domains: vec![] },
            ],
            links: vec![VirtualLink { src: 0, dst: 1, bandwidth: 50.0 }],
        },
        arrival_time: 0.0,
        lifetime,
    }
}

#[test]
fn scenario_single_domain_trivial_accepts_and_releases_exactly() {
    let mut engine = Engine::new(single_domain_substrate(), pso_defaults(42));
    let total_cpu_before: f64 =
        engine.substrate().domains()[0].nodes().iter().map(|&n| engine.substrate().node_data(n).unwrap().available_cpu).sum();

    let (id, cost, snapshot) = engine.handle_request(two_node_request(100.0), 0.0).unwrap();
    assert!(cost.is_finite());
    assert_eq!(snapshot.placement.len(), 2);

    let total_cpu_after: f64 =
        engine.substrate().domains()[0].nodes().iter().map(|&n| engine.substrate().node_data(n).unwrap().available_cpu).sum();
    assert_eq!(total_cpu_before - total_cpu_after, 30.0);

    engine.release_expired(100.0);
    assert!(engine.snapshot_of(id).is_none());
    let total_cpu_restored: f64 =
        engine.substrate().domains()[0].nodes().iter().map(|&n| engine.substrate().node_data(n).unwrap().available_cpu).sum();
    assert_eq!(total_cpu_restored, total_cpu_before);
}

#[test]
fn scenario_capacity_exhaustion_rejects_once_cpu_is_gone() {
    let mut engine = Engine::new(single_domain_substrate(), pso_defaults(1));
    let mut accepted = 0;
    for _ in 0..11 {
        let request = VirtualRequest {
            vnetwork: VirtualNetwork {
                nodes: vec![VirtualNode { id: 0, cpu_demand: 30.0, permitted_domains: vec![] }],
                links: vec![],
            },
            arrival_time: 0.0,
            lifetime: 1000.0,
        };
        if engine.handle_request(request, 0.0).is_ok() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 10);
    let last = engine.handle_request(
        VirtualRequest {
            vnetwork: VirtualNetwork {
                nodes: vec![VirtualNode { id: 0, cpu_demand: 30.0, permitted_domains: vec![] }],
                links: vec![],
            },
            arrival_time: 0.0,
            lifetime: 1000.0,
        },
        0.0,
    );
    assert!(matches!(last, Err(Error::NoCandidate(0))));
}

#[test]
fn scenario_cross_domain_stitch_routes_through_inter_link() {
    let mut sub = Substrate::new();
    let d0 = sub.add_domain(0);
    let d1 = sub.add_domain(1);
    let x0 = sub.add_node(d0, 100.0, 1.0, 0.0);
    let y0 = sub.add_node(d0, 100.0, 1.0, 0.0);
    let y1 = sub.add_node(d1, 100.0, 1.0, 0.0);
    let x1 = sub.add_node(d1, 100.0, 1.0, 0.0);
    sub.add_intra_link(d0, x0, y0, 1000.0, 1.0, 0.0).unwrap();
    let inter = sub.add_inter_link(y0, y1, 500.0, 1.0, 0.0).unwrap();
    sub.add_intra_link(d1, y1, x1, 1000.0, 1.0, 0.0).unwrap();

    let mut engine = Engine::new(sub, pso_defaults(7));
    let request = VirtualRequest {
        vnetwork: VirtualNetwork {
            nodes: vec![
                VirtualNode { id: 0, cpu_demand: 10.0, permitted_domains: vec![0] },
                VirtualNode { id: 1, cpu_demand: 10.0, permitted_domains: vec![1] },
            ],
            links: vec![VirtualLink { src: 0, dst: 1, bandwidth: 100.0 }],
        },
        arrival_time: 0.0,
        lifetime: 100.0,
    };
    let (_id, _cost, snapshot) = engine.handle_request(request, 0.0).unwrap();
    let (path, bandwidth) = &snapshot.vlink_paths[0];
    assert!(path.contains(&inter));
    assert_eq!(*bandwidth, 100.0);
    assert_eq!(engine.substrate().link_data(inter).unwrap().available_bw, 400.0);
}

#[test]
fn scenario_rollback_on_overcommit_restores_both_parallel_links() {
    let mut sub = Substrate::new();
    let d = sub.add_domain(0);
    let a = sub.add_node(d, 100.0, 1.0, 0.0);
    let b = sub.add_node(d, 100.0, 1.0, 0.0);
    sub.add_intra_link(d, a, b, 60.0, 1.0, 0.0).unwrap();
    sub.add_intra_link(d, a, b, 60.0, 1.0, 0.0).unwrap();

    let mut engine = Engine::new(sub, pso_defaults(3));
    let request = VirtualRequest {
        vnetwork: VirtualNetwork {
            nodes: vec![
                VirtualNode { id: 0, cpu_demand: 1.0, permitted_domains: vec![] },
                VirtualNode { id: 1, cpu_demand: 1.0, permitted_domains: vec![] },
            ],
            links: vec![
                VirtualLink { src: 0, dst: 1, bandwidth: 50.0 },
                VirtualLink { src: 0, dst: 1, bandwidth: 50.0 },
                VirtualLink { src: 0, dst: 1, bandwidth: 50.0 },
            ],
        },
        arrival_time: 0.0,
        lifetime: 100.0,
    };

    let before: f64 = engine.substrate().domains()[0]
        .links()
        .iter()
        .map(|&l| engine.substrate().link_data(l).unwrap().available_bw)
        .sum();
    let result = engine.handle_request(request, 0.0);
    assert!(result.is_err());
    let after: f64 = engine.substrate().domains()[0]
        .links()
        .iter()
        .map(|&l| engine.substrate().link_data(l).unwrap().available_bw)
        .sum();
    assert_eq!(before, after);
    assert_eq!(engine.active_ids().count(), 0);
}

#[test]
fn scenario_expiry_interleaving_releases_only_the_due_request() {
    let mut engine = Engine::new(single_domain_substrate(), pso_defaults(9));
    let (r1, _, _) = engine.handle_request(two_node_request(10.0), 0.0).unwrap();
    engine.release_expired(5.0);
    assert!(engine.snapshot_of(r1).is_some(), "R1 not yet due at t=5");

    let (r2, _, _) = engine.handle_request(two_node_request(50.0), 5.0).unwrap();
    engine.release_expired(15.0);
    assert!(engine.snapshot_of(r1).is_none(), "R1 should be released by t=15");
    assert!(engine.snapshot_of(r2).is_some(), "R2 should still be active at t=15");
}

#[test]
fn scenario_same_seed_is_byte_identical_across_independent_engines() {
    let mut engine_a = Engine::new(single_domain_substrate(), pso_defaults(42));
    let mut engine_b = Engine::new(single_domain_substrate(), pso_defaults(42));

    let (_, cost_a, snapshot_a) = engine_a.handle_request(two_node_request(100.0), 0.0).unwrap();
    let (_, cost_b, snapshot_b) = engine_b.handle_request(two_node_request(100.0), 0.0).unwrap();

    assert_eq!(cost_a, cost_b);
    assert_eq!(snapshot_a.placement, snapshot_b.placement);
    assert_eq!(snapshot_a.vlink_paths, snapshot_b.vlink_paths);
}

#[test]
fn greedy_kruskal_strategy_also_passes_the_trivial_scenario() {
    let mut engine = Engine::new(single_domain_substrate(), EngineConfig { strategy: StrategyKind::GreedyKruskal });
    let (_id, cost, snapshot) = engine.handle_request(two_node_request(100.0), 0.0).unwrap();
    assert!(cost.is_finite());
    assert_eq!(snapshot.placement.len(), 2);
}
