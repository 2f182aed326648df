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

//! # Transactional resource manager
//!
//! [`Ledger`] is the table of currently-committed requests and the only place that turns a
//! mapping into actual ledger deductions on the [`Substrate`]. `commit` deducts CPU and
//! bandwidth and rolls every deduction back on the first failure; `release` restores resources
//! strictly from the stored snapshot and never recomputes a path, since residual capacities may
//! have drifted since the request was committed and the recomputed path need not match the one
//! actually holding the reservation.

use crate::error::Error;
use crate::request::VirtualNetwork;
use crate::routing::global;
use crate::substrate::{LinkId, NodeId, Substrate, SubstrateError};

use log::{info, trace};
use std::collections::BTreeMap;

/// A committed request's reservation snapshot: exactly what resources it holds, so that release
/// never has to re-derive them.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed {
    /// Substrate node hosting each virtual node, by virtual-node index
    pub placement: Vec<NodeId>,
    /// CPU deducted for each virtual node, by virtual-node index (mirrors the request at commit
    /// time; stored rather than re-read so release is unaffected by later mutation)
    pub node_demand: Vec<f64>,
    /// Substrate path and bandwidth deducted for each virtual link, by virtual-link index
    pub vlink_paths: Vec<(Vec<LinkId>, f64)>,
    /// Absolute time at which this reservation expires
    pub expire_time: f64,
    /// Fitness cost recorded at commit time
    pub cost: f64,
}

enum Applied {
    Cpu(NodeId, f64),
    Bw(LinkId, f64),
}

fn rollback(substrate: &mut Substrate, applied: &[Applied]) {
    for step in applied.iter().rev() {
        match step {
            Applied::Cpu(node, amount) => {
                let _ = substrate.restore_cpu(*node, *amount);
            }
            Applied::Bw(link, amount) => {
                let _ = substrate.restore_bw(*link, *amount);
            }
        }
    }
}

fn try_commit(
    substrate: &mut Substrate,
    placement: &[NodeId],
    request: &VirtualNetwork,
) -> Result<(Vec<f64>, Vec<(Vec<LinkId>, f64)>), Error> {
    let mut applied = Vec::new();

    for (v, &node) in placement.iter().enumerate() {
        let demand = request.nodes[v].cpu_demand;
        if let Err(e) = substrate.deduct_cpu(node, demand) {
            rollback(substrate, &applied);
            return Err(match e {
                SubstrateError::InsufficientCpu(n, ..) => Error::InsufficientCpu(n),
                other => other.into(),
            });
        }
        applied.push(Applied::Cpu(node, demand));
    }

    let mut vlink_paths = Vec::with_capacity(request.links.len());
    for link in &request.links {
        let src_idx = request.node_index(link.src).expect("virtual link references unknown node");
        let dst_idx = request.node_index(link.dst).expect("virtual link references unknown node");
        let src = placement[src_idx];
        let dst = placement[dst_idx];
        let path = match global::shortest_path(substrate, src, dst, link.bandwidth) {
            Some(p) => p,
            None => {
                rollback(substrate, &applied);
                return Err(Error::NoPath(src, dst));
            }
        };
        for &hop in &path {
            if let Err(e) = substrate.deduct_bw(hop, link.bandwidth) {
                rollback(substrate, &applied);
                return Err(match e {
                    SubstrateError::InsufficientBandwidth(l, ..) => Error::InsufficientBandwidth(l),
                    other => other.into(),
                });
            }
            applied.push(Applied::Bw(hop, link.bandwidth));
        }
        vlink_paths.push((path, link.bandwidth));
    }

    let node_demand = placement.iter().enumerate().map(|(v, _)| request.nodes[v].cpu_demand).collect();
    Ok((node_demand, vlink_paths))
}

/// The table of currently-committed requests, keyed by request id.
#[derive(Debug, Default)]
pub struct Ledger {
    committed: BTreeMap<u64, Committed>,
}

impl Ledger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self { committed: BTreeMap::new() }
    }

    /// Deduct resources for `placement`/`request` on `substrate` and, on success, record the
    /// reservation under `id`. On failure, every deduction already made for this call is rolled
    /// back and the substrate is left exactly as it was found.
    pub fn commit(
        &mut self,
        id: u64,
        substrate: &mut Substrate,
        placement: Vec<NodeId>,
        request: &VirtualNetwork,
        expire_time: f64,
        cost: f64,
    ) -> Result<(), Error> {
        let (node_demand, vlink_paths) = try_commit(substrate, &placement, request)?;
        trace!("commit({}): {} vlinks routed, cost {}", id, vlink_paths.len(), cost);
        self.committed.insert(id, Committed { placement, node_demand, vlink_paths, expire_time, cost });
        Ok(())
    }

    /// Restore every resource held by `id` and forget its reservation. Uses only the stored
    /// snapshot; never re-routes.
    pub fn release(&mut self, id: u64, substrate: &mut Substrate) -> Result<(), Error> {
        let committed = self.committed.remove(&id).ok_or(Error::UnknownRequest(id))?;
        for (&node, &demand) in committed.placement.iter().zip(committed.node_demand.iter()) {
            substrate.restore_cpu(node, demand)?;
        }
        for (path, bandwidth) in &committed.vlink_paths {
            for &hop in path {
                substrate.restore_bw(hop, *bandwidth)?;
            }
        }
        info!("released request {}", id);
        Ok(())
    }

    /// Release every reservation whose `expire_time <= now`, in ascending id (i.e. insertion)
    /// order.
    pub fn release_expired(&mut self, substrate: &mut Substrate, now: f64) {
        let expired: Vec<u64> = self
            .committed
            .iter()
            .filter(|(_, c)| c.expire_time <= now)
            .map(|(&id, _)| id)
            .collect();
        for id in expired {
            let _ = self.release(id, substrate);
        }
    }

    /// Unconditionally restore every substrate resource and forget every reservation. Intended
    /// for test fixtures and an explicit driver reset, not for normal operation.
    pub fn reset(&mut self, substrate: &mut Substrate) {
        substrate.reset();
        self.committed.clear();
    }

    /// Look up a still-active reservation by id.
    pub fn get(&self, id: u64) -> Option<&Committed> {
        self.committed.get(&id)
    }

    /// All currently-active request ids, in ascending (insertion) order.
    pub fn active_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.committed.keys().copied()
    }
}
