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

//! # Mapping strategies
//!
//! A [`Mapping`] is a pure index vector: entry `j` indexes into `candidates[j]`, never a
//! substrate node directly. This keeps search state cheap to copy and keeps the strategies
//! (`pso`, `baseline`) decoupled from the substrate's graph representation; only [`fitness`] and
//! [`materialise`] ever cross back into substrate-node space.

use crate::candidates::Candidates;
use crate::error::Error;
use crate::request::VirtualNetwork;
use crate::routing::global;
use crate::substrate::{NodeId, Substrate};

/// An index-per-virtual-node mapping: `mapping[v]` indexes into `candidates[v]`.
pub type Mapping = Vec<usize>;

/// Strategy used by the engine to search for a mapping. Implemented by [`crate::pso`] and
/// [`crate::baseline`].
pub trait MappingStrategy {
    /// Search for a mapping of `request`'s virtual nodes onto `candidates`, under the current
    /// residual view of `substrate`. The returned mapping is indicative, not reserved: the caller
    /// still validates and commits it through the resource manager. A strategy that can prove the
    /// request infeasible during search (e.g. a provably disconnected pair of virtual endpoints)
    /// may fail early with [`Error::NoPath`] instead of returning a mapping doomed to fail at
    /// commit time.
    fn search(
        &mut self,
        candidates: &Candidates,
        request: &VirtualNetwork,
        substrate: &Substrate,
    ) -> Result<Mapping, Error>;
}

/// Turn an index mapping into substrate node ids, one per virtual node.
pub fn materialise(mapping: &Mapping, candidates: &Candidates) -> Vec<NodeId> {
    mapping.iter().zip(candidates.iter()).map(|(&idx, list)| list[idx]).collect()
}

/// Node cost plus link cost of `mapping`, or `f64::INFINITY` if any virtual link has no feasible
/// path at the substrate's current residual capacities. Does not mutate the substrate: this is a
/// pure read used by both search loops and must never itself deduct resources.
pub fn fitness(
    mapping: &Mapping,
    candidates: &Candidates,
    request: &VirtualNetwork,
    substrate: &Substrate,
) -> f64 {
    let placement = materialise(mapping, candidates);

    let mut node_cost = 0.0;
    for (v, &node) in placement.iter().enumerate() {
        let data = match substrate.node_data(node) {
            Ok(d) => d,
            Err(_) => return f64::INFINITY,
        };
        node_cost += request.nodes[v].cpu_demand * data.cost_per_unit;
    }

    let mut link_cost = 0.0;
    for link in &request.links {
        let src_idx = match request.node_index(link.src) {
            Some(i) => i,
            None => return f64::INFINITY,
        };
        let dst_idx = match request.node_index(link.dst) {
            Some(i) => i,
            None => return f64::INFINITY,
        };
        let src = placement[src_idx];
        let dst = placement[dst_idx];
        let path = match global::shortest_path(substrate, src, dst, link.bandwidth) {
            Some(p) => p,
            None => return f64::INFINITY,
        };
        for hop in path {
            let data = match substrate.link_data(hop) {
                Ok(d) => d,
                Err(_) => return f64::INFINITY,
            };
            link_cost += data.weight(link.bandwidth);
        }
    }

    node_cost + link_cost
}
