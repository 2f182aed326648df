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

//! # Mapping printer
//!
//! Human-readable rendering of an accepted request's node and link mapping, for the `vne_cli`
//! driver and debugging.

use crate::request::VirtualNetwork;
use crate::resource_manager::Committed;
use crate::substrate::Substrate;

use std::fmt::Write as _;

/// Render `committed`'s node and link mapping for `request_id` against `request` and
/// `substrate`, in the style of a two-section report: node placements, then link paths.
pub fn format_mapping(
    request_id: u64,
    request: &VirtualNetwork,
    committed: &Committed,
    substrate: &Substrate,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n=== Mapping for request {} (expires at t={}) ===",
        request_id, committed.expire_time
    );

    let _ = writeln!(out, "\n-- Node mapping --");
    for (v, &node) in committed.placement.iter().enumerate() {
        let vnode = &request.nodes[v];
        let available = substrate.node_data(node).map(|d| d.available_cpu).unwrap_or(f64::NAN);
        let _ = writeln!(
            out,
            "VNode {:>5} -> SNode {:>5} (CPU demand: {}, CPU available: {})",
            vnode.id,
            node.index(),
            vnode.cpu_demand,
            available
        );
    }

    let _ = writeln!(out, "\n-- Link mapping --");
    for (i, link) in request.links.iter().enumerate() {
        let (path, bandwidth) = &committed.vlink_paths[i];
        if path.is_empty() {
            let _ = writeln!(out, "VLink {} -> {}: co-located, no hops", link.src, link.dst);
            continue;
        }
        let mut hops = Vec::with_capacity(path.len());
        for &hop in path {
            if let Ok((a, b)) = substrate.link_endpoints(hop) {
                hops.push(format!("{}-{}", a.index(), b.index()));
            }
        }
        let _ = writeln!(out, "VLink {} -> {}: {} (BW: {})", link.src, link.dst, hops.join(" -> "), bandwidth);
    }

    let _ = writeln!(out, "{}", "=".repeat(60));
    out
}

/// Print `format_mapping`'s output to stdout.
pub fn print_mapping(request_id: u64, request: &VirtualNetwork, committed: &Committed, substrate: &Substrate) {
    print!("{}", format_mapping(request_id, request, committed, substrate));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{VirtualLink, VirtualNode};
    use crate::resource_manager::Ledger;

    #[test]
    fn formats_node_and_link_sections() {
        let mut sub = Substrate::new();
        let d = sub.add_domain(0);
        let a = sub.add_node(d, 100.0, 1.0, 0.0);
        let b = sub.add_node(d, 100.0, 1.0, 0.0);
        sub.add_intra_link(d, a, b, 100.0, 1.0, 0.0).unwrap();
        let request = VirtualNetwork {
            nodes: vec![
                VirtualNode { id: 0, cpu_demand: 10.0, permitted_domains: vec![] },
                VirtualNode { id: 1, cpu_demand: 10.0, permitted_domains: vec![] },
            ],
            links: vec![VirtualLink { src: 0, dst: 1, bandwidth: 5.0 }],
        };
        let mut ledger = Ledger::new();
        ledger.commit(0, &mut sub, vec![a, b], &request, 10.0, 2.0).unwrap();
        let committed = ledger.get(0).unwrap().clone();
        let text = format_mapping(0, &request, &committed, &sub);
        assert!(text.contains("Mapping for request 0"));
        assert!(text.contains("VNode"));
        assert!(text.contains("VLink 0 -> 1"));
    }
}
