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

//! Module containing the virtual network request data model

use serde::{Deserialize, Serialize};

/// A virtual node of a request. `id` is only unique within its own request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualNode {
    /// Identifier, unique within the request
    pub id: u32,
    /// CPU demand
    pub cpu_demand: f64,
    /// Domains this virtual node may be placed in. Empty means "any domain".
    #[serde(default, rename = "domains")]
    pub permitted_domains: Vec<u32>,
}

/// A virtual link of a request, connecting two of the request's virtual nodes by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualLink {
    /// Source virtual node id
    pub src: u32,
    /// Destination virtual node id
    pub dst: u32,
    /// Bandwidth demand
    pub bandwidth: f64,
}

/// The payload of a virtual request: an ordered set of virtual nodes and a set of virtual links
/// between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualNetwork {
    /// Virtual nodes, in request order
    pub nodes: Vec<VirtualNode>,
    /// Virtual links
    pub links: Vec<VirtualLink>,
}

impl VirtualNetwork {
    /// Index of the virtual node with the given id within `self.nodes`, if present.
    pub fn node_index(&self, id: u32) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }
}

/// A full virtual request as submitted by a tenant: a virtual network, its arrival time, and its
/// lifetime. The engine assigns a fresh request identifier on admission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualRequest {
    /// The requested virtual network
    pub vnetwork: VirtualNetwork,
    /// Arrival time, in the caller's simulated time unit
    pub arrival_time: f64,
    /// Lifetime; the mapping expires at `arrival_time + lifetime`
    pub lifetime: f64,
}
