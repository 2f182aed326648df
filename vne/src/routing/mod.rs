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

//! # Routing
//!
//! [`local`] computes shortest paths restricted to a single domain; [`global`] stitches a
//! cross-domain path out of local segments and inter-domain links. Both use [`MinScored`] as the
//! heap entry for Dijkstra, since path costs are `f64` and do not implement `Ord`.

pub mod global;
pub mod local;

use std::cmp::Ordering;

/// A `(cost, node)` pair ordered by `cost`, reversed so that [`std::collections::BinaryHeap`] (a
/// max-heap) pops the smallest cost first. `PartialOrd::partial_cmp` is unwrapped: costs are
/// always finite here because infeasible edges are filtered out before being pushed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MinScored<N>(pub f64, pub N);

impl<N: PartialEq> Eq for MinScored<N> {}

impl<N: PartialEq> PartialOrd for MinScored<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: PartialEq> Ord for MinScored<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.partial_cmp(&self.0).expect("path costs must never be NaN")
    }
}
