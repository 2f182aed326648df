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

//! # Dataset I/O
//!
//! `serde`-derived types for the JSON dataset format, plus [`build_substrate`] to turn a
//! deserialized [`SubstrateNetworkDoc`] into a live [`Substrate`]. The core engine never parses
//! this format itself; this module exists so the `vne_cli` driver and tests can produce and
//! consume it compatibly. Raw integer node ids in the document are not substrate [`NodeId`]s —
//! `build_substrate` returns the mapping from one to the other.

use crate::request::VirtualRequest;
use crate::substrate::{NodeId, Substrate, SubstrateError};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A full dataset file: the substrate topology plus the virtual requests to replay against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// The substrate topology
    pub substrate_network: SubstrateNetworkDoc,
    /// Virtual requests, in arbitrary order (the driver sorts by `arrival_time`)
    pub virtual_requests: Vec<VirtualRequest>,
}

/// On-disk substrate topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstrateNetworkDoc {
    /// Domains, each with its own nodes, intra-domain links and boundary node list
    pub domains: Vec<DomainDoc>,
    /// Links crossing domain boundaries
    pub inter_domain_links: Vec<InterLinkDoc>,
}

/// On-disk domain: its nodes, intra-domain links, and which of its nodes are boundary nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainDoc {
    /// Domain identifier
    pub domain_id: u32,
    /// This domain's nodes
    pub nodes: Vec<NodeDoc>,
    /// This domain's intra-domain links
    pub links: Vec<LinkDoc>,
    /// Node ids (from `nodes`) that are boundary nodes of this domain
    #[serde(default)]
    pub boundary_nodes: Vec<u32>,
}

/// On-disk substrate node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDoc {
    /// Raw node id, unique across the whole document
    pub node_id: u32,
    /// Total CPU capacity
    pub cpu_capacity: f64,
    /// Per-unit CPU cost
    pub cost_per_unit: f64,
    /// Node delay
    #[serde(default)]
    pub delay: f64,
    /// Available CPU, if the dataset pre-allocates some capacity; defaults to `cpu_capacity`
    pub available_cpu: Option<f64>,
}

/// On-disk substrate link (intra- or inter-domain; the two document shapes share this payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDoc {
    /// Source node id
    pub src: u32,
    /// Destination node id
    pub dst: u32,
    /// Total bandwidth capacity
    pub bandwidth: f64,
    /// Per-unit bandwidth cost
    pub cost_per_unit: f64,
    /// Link delay
    #[serde(default)]
    pub delay: f64,
    /// Available bandwidth, if the dataset pre-allocates some capacity; defaults to `bandwidth`
    pub available_bw: Option<f64>,
}

/// On-disk inter-domain link: a [`LinkDoc`] plus the domains it connects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterLinkDoc {
    /// Source domain id
    pub src_domain: u32,
    /// Destination domain id
    pub dst_domain: u32,
    /// The link payload
    #[serde(flatten)]
    pub link: LinkDoc,
}

/// Errors raised while turning a [`SubstrateNetworkDoc`] into a [`Substrate`].
#[derive(Error, Debug, PartialEq)]
pub enum DatasetError {
    /// A link referenced a `node_id` not declared in any domain's `nodes` list
    #[error("dataset link references unknown node id {0}")]
    UnknownNode(u32),
    /// A ledger error while applying a pre-allocated `available_*` override
    #[error("dataset substrate error: {0}")]
    Substrate(#[from] SubstrateError),
}

fn apply_available_cpu(sub: &mut Substrate, node: NodeId, doc: &NodeDoc) -> Result<(), DatasetError> {
    if let Some(available) = doc.available_cpu {
        let used = doc.cpu_capacity - available;
        if used > 0.0 {
            sub.deduct_cpu(node, used)?;
        }
    }
    Ok(())
}

/// Build a live [`Substrate`] from a parsed document, returning it alongside the map from raw
/// document node ids to substrate [`NodeId`]s (needed to resolve any further document references
/// that aren't already folded into this function, e.g. a driver's own node-centric reporting).
pub fn build_substrate(
    doc: &SubstrateNetworkDoc,
) -> Result<(Substrate, HashMap<u32, NodeId>), DatasetError> {
    let mut sub = Substrate::new();
    let mut node_ids: HashMap<u32, NodeId> = HashMap::new();
    let mut boundary_raw: Vec<Vec<u32>> = Vec::new();

    for domain_doc in &doc.domains {
        let domain = sub.add_domain(domain_doc.domain_id);
        for node_doc in &domain_doc.nodes {
            let node = sub.add_node(domain, node_doc.cpu_capacity, node_doc.cost_per_unit, node_doc.delay);
            node_ids.insert(node_doc.node_id, node);
            apply_available_cpu(&mut sub, node, node_doc)?;
        }
        for link_doc in &domain_doc.links {
            let src = *node_ids.get(&link_doc.src).ok_or(DatasetError::UnknownNode(link_doc.src))?;
            let dst = *node_ids.get(&link_doc.dst).ok_or(DatasetError::UnknownNode(link_doc.dst))?;
            let link = sub.add_intra_link(
                domain,
                src,
                dst,
                link_doc.bandwidth,
                link_doc.cost_per_unit,
                link_doc.delay,
            )?;
            if let Some(available) = link_doc.available_bw {
                let used = link_doc.bandwidth - available;
                if used > 0.0 {
                    sub.deduct_bw(link, used)?;
                }
            }
        }
        boundary_raw.push(domain_doc.boundary_nodes.clone());
    }

    for raw_ids in boundary_raw {
        for raw in raw_ids {
            if let Some(&node) = node_ids.get(&raw) {
                sub.mark_boundary(node)?;
            }
        }
    }

    for inter in &doc.inter_domain_links {
        let src = *node_ids.get(&inter.link.src).ok_or(DatasetError::UnknownNode(inter.link.src))?;
        let dst = *node_ids.get(&inter.link.dst).ok_or(DatasetError::UnknownNode(inter.link.dst))?;
        let link = sub.add_inter_link(
            src,
            dst,
            inter.link.bandwidth,
            inter.link.cost_per_unit,
            inter.link.delay,
        )?;
        if let Some(available) = inter.link.available_bw {
            let used = inter.link.bandwidth - available;
            if used > 0.0 {
                sub.deduct_bw(link, used)?;
            }
        }
    }

    Ok((sub, node_ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "substrate_network": {
                "domains": [
                    {
                        "domain_id": 0,
                        "nodes": [
                            {"node_id": 1, "cpu_capacity": 100.0, "cost_per_unit": 1.0, "delay": 0.0},
                            {"node_id": 2, "cpu_capacity": 100.0, "cost_per_unit": 1.0, "delay": 0.0, "available_cpu": 60.0}
                        ],
                        "links": [
                            {"src": 1, "dst": 2, "bandwidth": 50.0, "cost_per_unit": 1.0, "delay": 0.0}
                        ],
                        "boundary_nodes": [2]
                    },
                    {
                        "domain_id": 1,
                        "nodes": [
                            {"node_id": 3, "cpu_capacity": 100.0, "cost_per_unit": 2.0, "delay": 0.0}
                        ],
                        "links": [],
                        "boundary_nodes": [3]
                    }
                ],
                "inter_domain_links": [
                    {"src_domain": 0, "dst_domain": 1, "src": 2, "dst": 3, "bandwidth": 20.0, "cost_per_unit": 1.0, "delay": 0.0}
                ]
            },
            "virtual_requests": []
        }"#
    }

    #[test]
    fn parses_and_builds_substrate() {
        let dataset: Dataset = serde_json::from_str(sample_json()).unwrap();
        let (sub, node_ids) = build_substrate(&dataset.substrate_network).unwrap();
        assert_eq!(sub.domains().len(), 2);
        let node2 = node_ids[&2];
        assert_eq!(sub.node_data(node2).unwrap().available_cpu, 60.0);
    }

    #[test]
    fn unknown_node_reference_is_an_error() {
        let bad = r#"{
            "substrate_network": {
                "domains": [
                    {"domain_id": 0, "nodes": [], "links": [{"src": 1, "dst": 2, "bandwidth": 1.0, "cost_per_unit": 1.0, "delay": 0.0}], "boundary_nodes": []}
                ],
                "inter_domain_links": []
            },
            "virtual_requests": []
        }"#;
        let dataset: Dataset = serde_json::from_str(bad).unwrap();
        assert_eq!(build_substrate(&dataset.substrate_network).unwrap_err(), DatasetError::UnknownNode(1));
    }
}
