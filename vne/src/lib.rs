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

#![deny(missing_docs)]

//! # VNE: Virtual Network Embedding engine
//!
//! This crate embeds virtual network requests onto a shared, partitioned, multi-domain
//! substrate network, online and in arrival order. A request is a small graph of virtual
//! nodes (with CPU demand) and virtual links (with bandwidth demand); the engine decides
//! whether to admit it, and if so reserves substrate resources for the request's lifetime.
//!
//! ## Structure
//!
//! - **[`substrate`]**: the physical network model and its residual-capacity ledger. See the
//!   main structure [`Substrate`](substrate::Substrate).
//! - **[`request`]**: the virtual network request data model.
//! - **[`routing`]**: per-domain ([`routing::local`]) and cross-domain ([`routing::global`])
//!   shortest-path search under a bandwidth floor.
//! - **[`candidates`]**: per-virtual-node feasible substrate node lists.
//! - **[`strategy`]**: the [`MappingStrategy`](strategy::MappingStrategy) trait and the shared
//!   fitness function, implemented by [`pso`] (particle swarm search) and [`baseline`] (a
//!   greedy + Kruskal-style baseline).
//! - **[`resource_manager`]**: the transactional commit/release/release-expired ledger
//!   operations.
//! - **[`engine`]**: [`Engine`](engine::Engine), the request lifecycle tying everything
//!   together.
//! - **[`dataset`]**: `serde` types for the JSON dataset format used by external collaborators.
//!
//! ## Usage
//!
//! ```
//! use vne::substrate::Substrate;
//! use vne::engine::{Engine, EngineConfig};
//! use vne::request::{VirtualNode, VirtualLink, VirtualNetwork, VirtualRequest};
//!
//! let mut substrate = Substrate::new();
//! let d0 = substrate.add_domain(0);
//! let a = substrate.add_node(d0, 100.0, 1.0, 0.0);
//! let b = substrate.add_node(d0, 100.0, 1.0, 0.0);
//! substrate.add_intra_link(d0, a, b, 1000.0, 1.0, 0.0).unwrap();
//!
//! let mut engine = Engine::new(substrate, EngineConfig::default());
//!
//! let vnetwork = VirtualNetwork {
//!     nodes: vec![
//!         VirtualNode { id: 0, cpu_demand: 10.0, permitted_domains: vec![] },
//!         VirtualNode { id: 1, cpu_demand: 20.0, permitted_domains: vec![] },
//!     ],
//!     links: vec![VirtualLink { src: 0, dst: 1, bandwidth: 50.0 }],
//! };
//! let req = VirtualRequest { vnetwork, arrival_time: 0.0, lifetime: 100.0 };
//!
//! let (id, _cost, _snapshot) = engine.handle_request(req, 0.0).unwrap();
//! engine.release_expired(100.0);
//! assert!(engine.snapshot_of(id).is_none());
//! ```

pub mod candidates;
pub mod dataset;
mod error;
pub mod engine;
pub mod printer;
pub mod request;
pub mod resource_manager;
pub mod routing;
pub mod strategy;
pub mod substrate;

pub mod baseline;
pub mod pso;

pub use error::Error;
