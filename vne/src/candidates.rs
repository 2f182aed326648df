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

//! # Candidate selector
//!
//! For each virtual node, lists the substrate nodes that could host it: the right domain (if the
//! request restricts it) with enough spare CPU. An empty list for any virtual node means the
//! request cannot be embedded at all.

use crate::request::VirtualNode;
use crate::substrate::{NodeId, Substrate};

/// Feasible substrate nodes for each virtual node, indexed the same way as
/// `request.vnetwork.nodes`.
pub type Candidates = Vec<Vec<NodeId>>;

/// Build the candidate lists for every virtual node of `nodes`, against the current residual
/// view of `substrate`. The index of a virtual node in `nodes` gives the index into the returned
/// outer `Vec`.
pub fn select(substrate: &Substrate, nodes: &[VirtualNode]) -> Candidates {
    nodes.iter().map(|node| select_one(substrate, node)).collect()
}

/// Feasible substrate nodes for a single virtual node: `domain ∈ permitted_domains` (or any
/// domain, if empty) and `available_cpu >= cpu_demand`.
pub fn select_one(substrate: &Substrate, node: &VirtualNode) -> Vec<NodeId> {
    let mut out = Vec::new();
    for domain in substrate.domains() {
        if !node.permitted_domains.is_empty() && !node.permitted_domains.contains(&domain.id().0) {
            continue;
        }
        for &candidate in domain.nodes() {
            let data = substrate.node_data(candidate).expect("domain-owned node must exist");
            if data.available_cpu >= node.cpu_demand {
                out.push(candidate);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_domain_substrate() -> Substrate {
        let mut sub = Substrate::new();
        let d0 = sub.add_domain(0);
        let d1 = sub.add_domain(1);
        sub.add_node(d0, 10.0, 1.0, 0.0);
        sub.add_node(d1, 100.0, 1.0, 0.0);
        sub
    }

    #[test]
    fn filters_by_cpu_headroom() {
        let sub = two_domain_substrate();
        let node = VirtualNode { id: 0, cpu_demand: 50.0, permitted_domains: vec![] };
        assert_eq!(select_one(&sub, &node).len(), 1);
    }

    #[test]
    fn filters_by_permitted_domain() {
        let sub = two_domain_substrate();
        let node = VirtualNode { id: 0, cpu_demand: 5.0, permitted_domains: vec![0] };
        let candidates = select_one(&sub, &node);
        assert_eq!(candidates.len(), 1);
        assert_eq!(sub.node_data(candidates[0]).unwrap().domain.0, 0);
    }

    #[test]
    fn empty_candidates_when_nothing_fits() {
        let sub = two_domain_substrate();
        let node = VirtualNode { id: 0, cpu_demand: 1000.0, permitted_domains: vec![] };
        assert!(select_one(&sub, &node).is_empty());
    }
}
