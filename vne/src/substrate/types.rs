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

//! Module containing all substrate-level type definitions

use petgraph::stable_graph::StableGraph;
use petgraph::Undirected;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain identifier
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DomainId(pub u32);

/// Substrate node identifier (and index into the graph)
pub type NodeId = petgraph::stable_graph::NodeIndex<u32>;
/// Substrate link identifier (and index into the graph)
pub type LinkId = petgraph::stable_graph::EdgeIndex<u32>;

/// The substrate topology graph. Links are undirected: a single edge serves both traversal
/// directions and carries a single residual-bandwidth value.
pub type SubstrateGraph = StableGraph<NodeData, LinkData, Undirected, u32>;

/// Per-node residual and static data
#[derive(Debug, Clone, Copy)]
pub struct NodeData {
    /// Domain this node belongs to
    pub domain: DomainId,
    /// Total CPU capacity
    pub cpu_capacity: f64,
    /// Currently available CPU (`0 <= available_cpu <= cpu_capacity`)
    pub available_cpu: f64,
    /// Per-unit CPU cost
    pub cost_per_unit: f64,
    /// Node delay
    pub delay: f64,
}

/// Distinguishes an intra-domain link from an inter-domain one. The two differ only in whether
/// their endpoints lie in one domain or two; routers treat both uniformly once bandwidth-filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Both endpoints lie in the same domain
    Intra,
    /// Endpoints lie in two distinct domains; both endpoints are boundary nodes
    Inter,
}

/// Per-link residual and static data
#[derive(Debug, Clone, Copy)]
pub struct LinkData {
    /// Whether this link is intra- or inter-domain
    pub kind: LinkKind,
    /// Total bandwidth capacity
    pub bandwidth: f64,
    /// Currently available bandwidth (`0 <= available_bw <= bandwidth`)
    pub available_bw: f64,
    /// Per-unit bandwidth cost
    pub cost_per_unit: f64,
    /// Link delay
    pub delay: f64,
}

impl LinkData {
    /// Edge weight used by the routers: `delay + cost_per_unit * bw_floor`, i.e. the cost of
    /// reserving `bw_floor` bandwidth on this hop.
    pub fn weight(&self, bw_floor: f64) -> f64 {
        self.delay + self.cost_per_unit * bw_floor
    }
}

/// Substrate-level resource errors, raised only by the residual ledger primitives
#[derive(Error, Debug, PartialEq)]
pub enum SubstrateError {
    /// Deducting the requested CPU would make `available_cpu` negative
    #[error("Insufficient CPU on node {0:?}: requested {1}, available {2}")]
    InsufficientCpu(NodeId, f64, f64),
    /// Deducting the requested bandwidth would make `available_bw` negative
    #[error("Insufficient bandwidth on link {0:?}: requested {1}, available {2}")]
    InsufficientBandwidth(LinkId, f64, f64),
    /// Restoring more than was ever deducted would exceed capacity
    #[error("Restoring CPU on node {0:?} would exceed capacity ({1} > {2})")]
    CpuOverflow(NodeId, f64, f64),
    /// Restoring more than was ever deducted would exceed capacity
    #[error("Restoring bandwidth on link {0:?} would exceed capacity ({1} > {2})")]
    BandwidthOverflow(LinkId, f64, f64),
    /// The given node id is not present in this substrate
    #[error("Node {0:?} not found in substrate")]
    NodeNotFound(NodeId),
    /// The given link id is not present in this substrate
    #[error("Link {0:?} not found in substrate")]
    LinkNotFound(LinkId),
    /// The given domain id is not present in this substrate
    #[error("Domain {0:?} not found in substrate")]
    DomainNotFound(DomainId),
}
