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

//! Module containing all error types

use crate::substrate::{LinkId, NodeId, SubstrateError};
use thiserror::Error;

/// Main error type surfaced by the engine
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// No feasible substrate node exists for this virtual node (empty candidate list)
    #[error("No candidate substrate node for virtual node {0}")]
    NoCandidate(u32),
    /// The best mapping found by the strategy still has infinite fitness: some virtual link has
    /// no feasible path at search time
    #[error("No feasible embedding exists for this request")]
    InfeasibleEmbedding,
    /// Commit-time CPU deficit on a substrate node
    #[error("Insufficient CPU on node {0:?}")]
    InsufficientCpu(NodeId),
    /// Commit-time bandwidth deficit on a substrate link
    #[error("Insufficient bandwidth on link {0:?}")]
    InsufficientBandwidth(LinkId),
    /// Commit-time routing failure for a virtual link, even though it routed successfully during
    /// the search (residual capacities drifted in between)
    #[error("No path between {0:?} and {1:?}")]
    NoPath(NodeId, NodeId),
    /// A lower-level ledger error propagated unchanged (only reachable for programmer errors,
    /// since commit/release pre-check every deduction they make)
    #[error("Substrate error: {0}")]
    Substrate(#[from] SubstrateError),
    /// The given request id is not known to the engine
    #[error("Unknown request id {0}")]
    UnknownRequest(u64),
}
