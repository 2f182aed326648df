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

//! # Local (intra-domain) router
//!
//! Dijkstra shortest path restricted to the links of a single domain, filtered by a bandwidth
//! floor. Edge weight is `delay + cost_per_unit` (bandwidth is a filter, not a weight). Because a
//! domain may contain parallel links between the same pair of nodes, the search tracks the
//! predecessor *link* for every node, not just the predecessor node (a plain node-predecessor
//! table cannot disambiguate parallel edges).

use crate::routing::MinScored;
use crate::substrate::{DomainId, LinkId, LinkKind, NodeId, Substrate};

use petgraph::visit::EdgeRef;
use std::collections::{BinaryHeap, HashMap};

/// Return the minimum-weight simple path from `src` to `dst`, using only intra-domain links of
/// `domain` with `available_bw >= bw_floor`. Returns `Some(vec![])` if `src == dst`. Returns
/// `None` if no such path exists.
pub fn shortest_path(
    substrate: &Substrate,
    domain: DomainId,
    src: NodeId,
    dst: NodeId,
    bw_floor: f64,
) -> Option<Vec<LinkId>> {
    if src == dst {
        return Some(Vec::new());
    }

    let mut dist: HashMap<NodeId, f64> = HashMap::new();
    let mut prev_link: HashMap<NodeId, LinkId> = HashMap::new();
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
        for edge in substrate.graph().edges(u) {
            let link = edge.id();
            let data = edge.weight();
            if data.kind != LinkKind::Intra || data.available_bw < bw_floor {
                continue;
            }
            let v = if edge.source() == u { edge.target() } else { edge.source() };
            // stay within the domain: both endpoints of an intra-domain link always are, but the
            // defensive check keeps this function correct even if called with a link that
            // happens to connect two nodes that are (incorrectly) in different domains.
            if substrate.node_data(v).map(|n| n.domain) != Ok(domain) {
                continue;
            }
            let weight = data.delay + data.cost_per_unit;
            let alt = cost_u + weight;
            if alt < *dist.get(&v).unwrap_or(&f64::INFINITY) {
                dist.insert(v, alt);
                prev_link.insert(v, link);
                heap.push(MinScored(alt, v));
            }
        }
    }

    let mut path = Vec::new();
    let mut node = dst;
    while node != src {
        let link = *prev_link.get(&node)?;
        path.push(link);
        let (a, b) = substrate.link_endpoints(link).ok()?;
        node = if b == node { a } else { b };
    }
    path.reverse();
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_substrate() -> (Substrate, NodeId, NodeId, NodeId) {
        let mut sub = Substrate::new();
        let d = sub.add_domain(0);
        let a = sub.add_node(d, 100.0, 1.0, 0.0);
        let b = sub.add_node(d, 100.0, 1.0, 0.0);
        let c = sub.add_node(d, 100.0, 1.0, 0.0);
        sub.add_intra_link(d, a, b, 1000.0, 1.0, 0.0).unwrap();
        sub.add_intra_link(d, b, c, 1000.0, 1.0, 0.0).unwrap();
        (sub, a, b, c)
    }

    #[test]
    fn same_node_returns_empty_path() {
        let (sub, a, _b, _c) = line_substrate();
        assert_eq!(shortest_path(&sub, DomainId(0), a, a, 0.0), Some(vec![]));
    }

    #[test]
    fn finds_two_hop_path() {
        let (sub, a, _b, c) = line_substrate();
        let path = shortest_path(&sub, DomainId(0), a, c, 10.0).unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn bandwidth_floor_excludes_exhausted_link() {
        let mut sub = Substrate::new();
        let d = sub.add_domain(0);
        let a = sub.add_node(d, 10.0, 1.0, 0.0);
        let b = sub.add_node(d, 10.0, 1.0, 0.0);
        let link = sub.add_intra_link(d, a, b, 100.0, 1.0, 0.0).unwrap();
        sub.deduct_bw(link, 95.0).unwrap();
        assert_eq!(shortest_path(&sub, DomainId(0), a, b, 10.0), None);
        assert!(shortest_path(&sub, DomainId(0), a, b, 5.0).is_some());
    }

    #[test]
    fn unreachable_node_returns_none() {
        let mut sub = Substrate::new();
        let d = sub.add_domain(0);
        let a = sub.add_node(d, 10.0, 1.0, 0.0);
        let b = sub.add_node(d, 10.0, 1.0, 0.0);
        assert_eq!(shortest_path(&sub, DomainId(0), a, b, 0.0), None);
    }
}
