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

//! # Greedy + Kruskal-tree baseline strategy
//!
//! A cheap alternative to [`crate::pso`]: place the most CPU-hungry virtual nodes first, each on
//! its cheapest still-feasible candidate, then run a union-find pass over domain-level
//! reachability to short-circuit the case where the request is already provably disconnected on
//! the substrate, failing with [`Error::NoPath`] before the (expensive) per-link routing in
//! [`crate::strategy::fitness`] would otherwise discover the same thing one path at a time.

use crate::candidates::Candidates;
use crate::error::Error;
use crate::request::VirtualNetwork;
use crate::strategy::{Mapping, MappingStrategy};
use crate::substrate::{DomainId, NodeId, Substrate};

use itertools::Itertools;
use log::debug;
use std::collections::HashMap;

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }

    fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

/// Greedy-placement, union-find-checked [`MappingStrategy`].
#[derive(Debug, Default)]
pub struct GreedyKruskal;

impl GreedyKruskal {
    /// Construct the baseline strategy. It carries no tunable state.
    pub fn new() -> Self {
        Self
    }
}

fn domain_reachability(substrate: &Substrate) -> (HashMap<DomainId, usize>, UnionFind) {
    let domains = substrate.domains();
    let index: HashMap<DomainId, usize> =
        domains.iter().enumerate().map(|(i, d)| (d.id(), i)).collect();
    let mut uf = UnionFind::new(domains.len());
    for &link in substrate.inter_links() {
        if let Ok((a, b)) = substrate.link_endpoints(link) {
            let da = substrate.node_data(a).unwrap().domain;
            let db = substrate.node_data(b).unwrap().domain;
            uf.union(index[&da], index[&db]);
        }
    }
    (index, uf)
}

impl MappingStrategy for GreedyKruskal {
    fn search(
        &mut self,
        candidates: &Candidates,
        request: &VirtualNetwork,
        substrate: &Substrate,
    ) -> Result<Mapping, Error> {
        let n = request.nodes.len();
        let order: Vec<usize> = (0..n)
            .sorted_by(|&a, &b| {
                request.nodes[b]
                    .cpu_demand
                    .partial_cmp(&request.nodes[a].cpu_demand)
                    .unwrap()
                    .then(a.cmp(&b))
            })
            .collect();

        let mut deducted: HashMap<NodeId, f64> = HashMap::new();
        let mut mapping = vec![0usize; n];

        for v in order {
            let demand = request.nodes[v].cpu_demand;
            let list = &candidates[v];
            let mut best: Option<(usize, f64, NodeId)> = None;
            for (idx, &node) in list.iter().enumerate() {
                let data = substrate.node_data(node).expect("candidate node must exist");
                let avail = data.available_cpu - deducted.get(&node).copied().unwrap_or(0.0);
                if avail < demand {
                    continue;
                }
                let cost = demand * data.cost_per_unit;
                let replace = match best {
                    None => true,
                    Some((_, best_cost, best_node)) => {
                        cost < best_cost || (cost == best_cost && node.index() < best_node.index())
                    }
                };
                if replace {
                    best = Some((idx, cost, node));
                }
            }
            let chosen_idx = best.map(|(idx, _, _)| idx).unwrap_or_else(|| {
                // Nothing clears the current search-time bookkeeping: fall back to the globally
                // cheapest candidate and let commit-time validation reject the request.
                list.iter()
                    .enumerate()
                    .min_by(|(_, &a), (_, &b)| {
                        let ca = substrate.node_data(a).unwrap().cost_per_unit;
                        let cb = substrate.node_data(b).unwrap().cost_per_unit;
                        ca.partial_cmp(&cb).unwrap().then(a.index().cmp(&b.index()))
                    })
                    .map(|(idx, _)| idx)
                    .unwrap_or(0)
            });
            mapping[v] = chosen_idx;
            let node = list[chosen_idx];
            *deducted.entry(node).or_insert(0.0) += demand;
        }

        let placement: Vec<NodeId> =
            mapping.iter().zip(candidates.iter()).map(|(&idx, list)| list[idx]).collect();
        let (domain_index, mut uf) = domain_reachability(substrate);
        for link in &request.links {
            let src_idx = match request.node_index(link.src) {
                Some(i) => i,
                None => continue,
            };
            let dst_idx = match request.node_index(link.dst) {
                Some(i) => i,
                None => continue,
            };
            let src_domain = substrate.node_data(placement[src_idx]).unwrap().domain;
            let dst_domain = substrate.node_data(placement[dst_idx]).unwrap().domain;
            if src_domain != dst_domain
                && !uf.connected(domain_index[&src_domain], domain_index[&dst_domain])
            {
                debug!(
                    "greedy+kruskal: virtual link {}-{} maps across disconnected domains {:?}/{:?}, aborting search",
                    link.src, link.dst, src_domain, dst_domain
                );
                return Err(Error::NoPath(placement[src_idx], placement[dst_idx]));
            }
        }

        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{VirtualLink, VirtualNode};

    #[test]
    fn places_highest_demand_node_on_cheapest_candidate() {
        let mut sub = Substrate::new();
        let d = sub.add_domain(0);
        let cheap = sub.add_node(d, 100.0, 1.0, 0.0);
        let pricey = sub.add_node(d, 100.0, 5.0, 0.0);
        let request = VirtualNetwork {
            nodes: vec![VirtualNode { id: 0, cpu_demand: 20.0, permitted_domains: vec![] }],
            links: vec![],
        };
        let candidates = vec![vec![cheap, pricey]];
        let mut strategy = GreedyKruskal::new();
        let mapping = strategy.search(&candidates, &request, &sub).unwrap();
        assert_eq!(candidates[0][mapping[0]], cheap);
    }

    #[test]
    fn avoids_double_booking_within_one_search() {
        let mut sub = Substrate::new();
        let d = sub.add_domain(0);
        let only = sub.add_node(d, 30.0, 1.0, 0.0);
        let alt = sub.add_node(d, 30.0, 1.0, 0.0);
        let request = VirtualNetwork {
            nodes: vec![
                VirtualNode { id: 0, cpu_demand: 20.0, permitted_domains: vec![] },
                VirtualNode { id: 1, cpu_demand: 20.0, permitted_domains: vec![] },
            ],
            links: vec![VirtualLink { src: 0, dst: 1, bandwidth: 1.0 }],
        };
        let candidates = vec![vec![only, alt], vec![only, alt]];
        let mut strategy = GreedyKruskal::new();
        let mapping = strategy.search(&candidates, &request, &sub).unwrap();
        let placed_a = candidates[0][mapping[0]];
        let placed_b = candidates[1][mapping[1]];
        assert_ne!(placed_a, placed_b);
    }

    #[test]
    fn aborts_early_when_domains_are_provably_disconnected() {
        let mut sub = Substrate::new();
        let d0 = sub.add_domain(0);
        let d1 = sub.add_domain(1);
        let a = sub.add_node(d0, 100.0, 1.0, 0.0);
        let b = sub.add_node(d1, 100.0, 1.0, 0.0);
        // No inter-domain link at all: d0 and d1 are provably disconnected.
        let request = VirtualNetwork {
            nodes: vec![
                VirtualNode { id: 0, cpu_demand: 10.0, permitted_domains: vec![0] },
                VirtualNode { id: 1, cpu_demand: 10.0, permitted_domains: vec![1] },
            ],
            links: vec![VirtualLink { src: 0, dst: 1, bandwidth: 1.0 }],
        };
        let candidates = vec![vec![a], vec![b]];
        let mut strategy = GreedyKruskal::new();
        let err = strategy.search(&candidates, &request, &sub).unwrap_err();
        assert_eq!(err, Error::NoPath(a, b));
    }
}
