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

//! # Global (cross-domain) router
//!
//! When `src` and `dst` live in the same domain, this delegates to [`super::local`] directly.
//! Otherwise it builds a small composite graph whose nodes are `src`, `dst` and every domain's
//! boundary nodes, and whose edges are either a real inter-domain link or a precomputed
//! intra-domain shortest path between two boundary nodes of the same domain. Dijkstra runs over
//! that composite graph, and the winning path is re-expanded into concrete substrate links: the
//! composite graph is never itself treated as the routed path, since its boundary-to-boundary
//! edges only stand in for a full intra-domain path computed at materialization time.

use crate::routing::{local, MinScored};
use crate::substrate::{DomainId, LinkId, NodeId, Substrate};

use std::collections::{BinaryHeap, HashMap};

fn path_cost(substrate: &Substrate, path: &[LinkId], bw_floor: f64) -> f64 {
    path.iter()
        .map(|&link| {
            let data = substrate.link_data(link).expect("path link must exist in substrate");
            data.weight(bw_floor)
        })
        .sum()
}

/// Return the minimum-weight path from `src` to `dst` across domain boundaries, using only links
/// with `available_bw >= bw_floor`. Returns `Some(vec![])` if `src == dst`, `None` if no such
/// path exists.
pub fn shortest_path(
    substrate: &Substrate,
    src: NodeId,
    dst: NodeId,
    bw_floor: f64,
) -> Option<Vec<LinkId>> {
    if src == dst {
        return Some(Vec::new());
    }

    let src_domain = substrate.node_data(src).ok()?.domain;
    let dst_domain = substrate.node_data(dst).ok()?.domain;
    if src_domain == dst_domain {
        return local::shortest_path(substrate, src_domain, src, dst, bw_floor);
    }

    // Anchors: each domain's boundary nodes, plus src/dst for their own home domain.
    let mut anchors: HashMap<DomainId, Vec<NodeId>> = HashMap::new();
    for domain in substrate.domains() {
        let mut list: Vec<NodeId> = domain.boundary_nodes().collect();
        if domain.id() == src_domain && !list.contains(&src) {
            list.push(src);
        }
        if domain.id() == dst_domain && !list.contains(&dst) {
            list.push(dst);
        }
        anchors.insert(domain.id(), list);
    }

    let mut adj: HashMap<NodeId, Vec<(NodeId, f64, Vec<LinkId>)>> = HashMap::new();
    for domain in substrate.domains() {
        let list = &anchors[&domain.id()];
        for &p in list {
            for &q in list {
                if p == q {
                    continue;
                }
                if let Some(path) = local::shortest_path(substrate, domain.id(), p, q, bw_floor) {
                    let cost = path_cost(substrate, &path, bw_floor);
                    adj.entry(p).or_default().push((q, cost, path));
                }
            }
        }
    }
    for &link in substrate.inter_links() {
        let data = substrate.link_data(link).ok()?;
        if data.available_bw < bw_floor {
            continue;
        }
        let (a, b) = substrate.link_endpoints(link).ok()?;
        let weight = data.weight(bw_floor);
        adj.entry(a).or_default().push((b, weight, vec![link]));
        adj.entry(b).or_default().push((a, weight, vec![link]));
    }

    let mut dist: HashMap<NodeId, f64> = HashMap::new();
    let mut prev_segment: HashMap<NodeId, Vec<LinkId>> = HashMap::new();
    let mut prev_node: HashMap<NodeId, NodeId> = HashMap::new();
    let mut heap = BinaryHeap::new();
    dist.insert(src, 0.0);
    heap.push(MinScored(0.0, src));

    while let Some(MinScored(cost_u, u)) = heap.pop() {
        if u == dst {
            break;
        }
        if cost_u > *dist.get(&u).unwrap_or(&f64::INFINITY) {
            continue;
        }
        if let Some(edges) = adj.get(&u) {
            for (v, weight, segment) in edges {
                let alt = cost_u + weight;
                if alt < *dist.get(v).unwrap_or(&f64::INFINITY) {
                    dist.insert(*v, alt);
                    prev_segment.insert(*v, segment.clone());
                    prev_node.insert(*v, u);
                    heap.push(MinScored(alt, *v));
                }
            }
        }
    }

    if !dist.contains_key(&dst) {
        return None;
    }

    let mut segments = Vec::new();
    let mut node = dst;
    while node != src {
        segments.push(prev_segment.remove(&node)?);
        node = *prev_node.get(&node)?;
    }
    segments.reverse();
    Some(segments.into_iter().flatten().collect())
}
