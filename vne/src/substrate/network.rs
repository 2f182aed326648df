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

//! # Top-level substrate module
//!
//! This module represents the substrate topology and owns the residual-capacity ledger. It is
//! the only component permitted to mutate residual CPU and bandwidth; routers and strategies
//! only ever read it.

use crate::substrate::domain::Domain;
use crate::substrate::types::{
    DomainId, LinkData, LinkId, LinkKind, NodeData, NodeId, SubstrateError, SubstrateGraph,
};

use log::trace;
use std::collections::HashMap;

/// # Substrate struct
///
/// Holds the full multi-domain topology (as a single [`SubstrateGraph`]) along with the ordered
/// list of [`Domain`]s and the inter-domain links connecting them. CPU and bandwidth residuals
/// live directly on the graph's node and edge weights; [`deduct_cpu`](Substrate::deduct_cpu),
/// [`restore_cpu`](Substrate::restore_cpu), [`deduct_bw`](Substrate::deduct_bw) and
/// [`restore_bw`](Substrate::restore_bw) are the only functions allowed to change them.
#[derive(Debug, Clone)]
pub struct Substrate {
    graph: SubstrateGraph,
    domains: Vec<Domain>,
    domain_index: HashMap<DomainId, usize>,
    inter_links: Vec<LinkId>,
}

impl Default for Substrate {
    fn default() -> Self {
        Self::new()
    }
}

impl Substrate {
    /// Create an empty substrate, with no domains, nodes or links.
    pub fn new() -> Self {
        Self {
            graph: SubstrateGraph::with_capacity(0, 0),
            domains: Vec::new(),
            domain_index: HashMap::new(),
            inter_links: Vec::new(),
        }
    }

    /// Add a new, empty domain to the substrate and return its id.
    pub fn add_domain(&mut self, id: u32) -> DomainId {
        let id = DomainId(id);
        self.domain_index.insert(id, self.domains.len());
        self.domains.push(Domain::new(id));
        id
    }

    /// Add a substrate node to `domain`, with the given CPU capacity, per-unit CPU cost and
    /// delay. Returns the new node's id.
    pub fn add_node(
        &mut self,
        domain: DomainId,
        cpu_capacity: f64,
        cost_per_unit: f64,
        delay: f64,
    ) -> NodeId {
        let node = self.graph.add_node(NodeData {
            domain,
            cpu_capacity,
            available_cpu: cpu_capacity,
            cost_per_unit,
            delay,
        });
        self.domain_mut(domain).expect("domain must exist").push_node(node);
        node
    }

    /// Mark `node` as a boundary node of its domain.
    pub fn mark_boundary(&mut self, node: NodeId) -> Result<(), SubstrateError> {
        let domain = self.node_data(node)?.domain;
        self.domain_mut(domain).expect("domain must exist").mark_boundary(node);
        Ok(())
    }

    /// Add an intra-domain link between `src` and `dst`, both of which must belong to `domain`.
    pub fn add_intra_link(
        &mut self,
        domain: DomainId,
        src: NodeId,
        dst: NodeId,
        bandwidth: f64,
        cost_per_unit: f64,
        delay: f64,
    ) -> Result<LinkId, SubstrateError> {
        let link = self.graph.add_edge(
            src,
            dst,
            LinkData { kind: LinkKind::Intra, bandwidth, available_bw: bandwidth, cost_per_unit, delay },
        );
        self.domain_mut(domain).ok_or(SubstrateError::DomainNotFound(domain))?.push_link(link);
        Ok(link)
    }

    /// Add an inter-domain link between `src` and `dst`. Both endpoints are marked as boundary
    /// nodes of their respective domains.
    pub fn add_inter_link(
        &mut self,
        src: NodeId,
        dst: NodeId,
        bandwidth: f64,
        cost_per_unit: f64,
        delay: f64,
    ) -> Result<LinkId, SubstrateError> {
        let link = self.graph.add_edge(
            src,
            dst,
            LinkData { kind: LinkKind::Inter, bandwidth, available_bw: bandwidth, cost_per_unit, delay },
        );
        self.mark_boundary(src)?;
        self.mark_boundary(dst)?;
        self.inter_links.push(link);
        Ok(link)
    }

    // ********************
    // * Residual ledger  *
    // ********************

    /// Deduct `amount` of CPU from `node`. Fails with [`SubstrateError::InsufficientCpu`] if the
    /// result would be negative.
    pub fn deduct_cpu(&mut self, node: NodeId, amount: f64) -> Result<(), SubstrateError> {
        let data =
            self.graph.node_weight_mut(node).ok_or(SubstrateError::NodeNotFound(node))?;
        if data.available_cpu < amount {
            return Err(SubstrateError::InsufficientCpu(node, amount, data.available_cpu));
        }
        data.available_cpu -= amount;
        trace!("deduct_cpu({:?}, {}) -> available {}", node, amount, data.available_cpu);
        Ok(())
    }

    /// Restore `amount` of CPU to `node`. Fails with [`SubstrateError::CpuOverflow`] if the
    /// result would exceed the node's capacity.
    pub fn restore_cpu(&mut self, node: NodeId, amount: f64) -> Result<(), SubstrateError> {
        let data =
            self.graph.node_weight_mut(node).ok_or(SubstrateError::NodeNotFound(node))?;
        let restored = data.available_cpu + amount;
        if restored > data.cpu_capacity {
            return Err(SubstrateError::CpuOverflow(node, restored, data.cpu_capacity));
        }
        data.available_cpu = restored;
        trace!("restore_cpu({:?}, {}) -> available {}", node, amount, data.available_cpu);
        Ok(())
    }

    /// Deduct `amount` of bandwidth from `link`. Fails with
    /// [`SubstrateError::InsufficientBandwidth`] if the result would be negative.
    pub fn deduct_bw(&mut self, link: LinkId, amount: f64) -> Result<(), SubstrateError> {
        let data =
            self.graph.edge_weight_mut(link).ok_or(SubstrateError::LinkNotFound(link))?;
        if data.available_bw < amount {
            return Err(SubstrateError::InsufficientBandwidth(link, amount, data.available_bw));
        }
        data.available_bw -= amount;
        trace!("deduct_bw({:?}, {}) -> available {}", link, amount, data.available_bw);
        Ok(())
    }

    /// Restore `amount` of bandwidth to `link`. Fails with
    /// [`SubstrateError::BandwidthOverflow`] if the result would exceed the link's capacity.
    pub fn restore_bw(&mut self, link: LinkId, amount: f64) -> Result<(), SubstrateError> {
        let data =
            self.graph.edge_weight_mut(link).ok_or(SubstrateError::LinkNotFound(link))?;
        let restored = data.available_bw + amount;
        if restored > data.bandwidth {
            return Err(SubstrateError::BandwidthOverflow(link, restored, data.bandwidth));
        }
        data.available_bw = restored;
        trace!("restore_bw({:?}, {}) -> available {}", link, amount, data.available_bw);
        Ok(())
    }

    /// Restore every CPU and bandwidth resource to its capacity, unconditionally. This is a full
    /// wipe, not a graceful release of active mappings; callers must separately clear any
    /// committed-mapping table that refers to resources reset by this call.
    pub fn reset(&mut self) {
        for idx in self.graph.node_indices().collect::<Vec<_>>() {
            if let Some(data) = self.graph.node_weight_mut(idx) {
                data.available_cpu = data.cpu_capacity;
            }
        }
        for idx in self.graph.edge_indices().collect::<Vec<_>>() {
            if let Some(data) = self.graph.edge_weight_mut(idx) {
                data.available_bw = data.bandwidth;
            }
        }
    }

    // ********************
    // * Helper functions *
    // ********************

    /// Reference to the underlying topology graph
    pub fn graph(&self) -> &SubstrateGraph {
        &self.graph
    }

    /// All domains, in insertion order
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Look up a domain by id
    pub fn domain(&self, id: DomainId) -> Option<&Domain> {
        self.domain_index.get(&id).map(|&idx| &self.domains[idx])
    }

    fn domain_mut(&mut self, id: DomainId) -> Option<&mut Domain> {
        self.domain_index.get(&id).map(|&idx| &mut self.domains[idx])
    }

    /// All inter-domain links, in insertion order
    pub fn inter_links(&self) -> &[LinkId] {
        &self.inter_links
    }

    /// Read-only access to a node's static + residual data
    pub fn node_data(&self, node: NodeId) -> Result<&NodeData, SubstrateError> {
        self.graph.node_weight(node).ok_or(SubstrateError::NodeNotFound(node))
    }

    /// Read-only access to a link's static + residual data
    pub fn link_data(&self, link: LinkId) -> Result<&LinkData, SubstrateError> {
        self.graph.edge_weight(link).ok_or(SubstrateError::LinkNotFound(link))
    }

    /// The two endpoints of a link, in no particular order (the graph is undirected)
    pub fn link_endpoints(&self, link: LinkId) -> Result<(NodeId, NodeId), SubstrateError> {
        self.graph.edge_endpoints(link).ok_or(SubstrateError::LinkNotFound(link))
    }
}
