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

//! # Request lifecycle
//!
//! [`Engine`] ties the substrate, the candidate selector, a [`MappingStrategy`] and the
//! [`Ledger`] together into the request state machine:
//!
//! ```text
//! Unknown --handle_request--> Accepted --release_expired / cancel--> Released --> Unknown
//!             |
//!             +--(commit fails)--> Rejected  [terminal; no resources held]
//! ```

use crate::baseline::GreedyKruskal;
use crate::candidates;
use crate::error::Error;
use crate::pso::{Pso, PsoParams};
use crate::request::VirtualRequest;
use crate::resource_manager::{Committed, Ledger};
use crate::strategy::{self, MappingStrategy};
use crate::substrate::Substrate;

use log::{info, warn};

/// Which mapping strategy an [`Engine`] searches with.
#[derive(Debug, Clone)]
pub enum StrategyKind {
    /// Particle swarm search, see [`crate::pso`]
    Pso(PsoParams),
    /// Greedy placement + union-find reachability check, see [`crate::baseline`]
    GreedyKruskal,
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::Pso(PsoParams::default())
    }
}

/// Construction-time choices for an [`Engine`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// The mapping strategy to search with
    pub strategy: StrategyKind,
}

fn build_strategy(kind: &StrategyKind) -> Box<dyn MappingStrategy> {
    match kind {
        StrategyKind::Pso(params) => Box::new(Pso::new(*params)),
        StrategyKind::GreedyKruskal => Box::new(GreedyKruskal::new()),
    }
}

/// The request lifecycle: owns the substrate, the committed-request ledger, and the mapping
/// strategy across calls (so e.g. the PSO strategy's PRNG advances from one request to the
/// next, rather than being reseeded every time).
pub struct Engine {
    substrate: Substrate,
    ledger: Ledger,
    strategy: Box<dyn MappingStrategy>,
    next_id: u64,
}

impl Engine {
    /// Build an engine over `substrate`, configured per `config`.
    pub fn new(substrate: Substrate, config: EngineConfig) -> Self {
        Self { substrate, ledger: Ledger::new(), strategy: build_strategy(&config.strategy), next_id: 0 }
    }

    /// Attempt to admit `req` at logical time `now`. On success, resources are committed for the
    /// request's lifetime and `(request_id, cost, snapshot)` is returned. On failure, the ledger
    /// is left exactly as it was found.
    pub fn handle_request(
        &mut self,
        req: VirtualRequest,
        now: f64,
    ) -> Result<(u64, f64, Committed), Error> {
        let candidate_lists = candidates::select(&self.substrate, &req.vnetwork.nodes);
        if let Some((idx, _)) = candidate_lists.iter().enumerate().find(|(_, c)| c.is_empty()) {
            let node_id = req.vnetwork.nodes[idx].id;
            warn!("request has no candidate for virtual node {}", node_id);
            return Err(Error::NoCandidate(node_id));
        }

        let best = self.strategy.search(&candidate_lists, &req.vnetwork, &self.substrate)?;
        let cost = strategy::fitness(&best, &candidate_lists, &req.vnetwork, &self.substrate);
        if !cost.is_finite() {
            return Err(Error::InfeasibleEmbedding);
        }

        let placement = strategy::materialise(&best, &candidate_lists);
        let id = self.next_id;
        self.ledger.commit(id, &mut self.substrate, placement, &req.vnetwork, now + req.lifetime, cost)?;
        self.next_id += 1;

        let snapshot = self.ledger.get(id).expect("just committed").clone();
        info!("accepted request {} at cost {}", id, cost);
        Ok((id, cost, snapshot))
    }

    /// Explicitly release a still-active request outside the expiry path. Calling this with an
    /// id that is not currently active is a programmer error: a debug build aborts, a release
    /// build surfaces [`Error::UnknownRequest`].
    pub fn cancel(&mut self, id: u64) -> Result<(), Error> {
        debug_assert!(self.ledger.get(id).is_some(), "cancel called with unknown request id {}", id);
        self.ledger.release(id, &mut self.substrate)
    }

    /// Release every request whose expiry has passed `now`.
    pub fn release_expired(&mut self, now: f64) {
        self.ledger.release_expired(&mut self.substrate, now);
    }

    /// Unconditionally restore every substrate resource and forget every active request.
    pub fn reset(&mut self) {
        self.ledger.reset(&mut self.substrate);
        self.next_id = 0;
    }

    /// The reservation snapshot of a still-active request, if any.
    pub fn snapshot_of(&self, id: u64) -> Option<&Committed> {
        self.ledger.get(id)
    }

    /// All currently-active request ids, in ascending (admission) order.
    pub fn active_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.ledger.active_ids()
    }

    /// Read-only access to the substrate.
    pub fn substrate(&self) -> &Substrate {
        &self.substrate
    }
}
