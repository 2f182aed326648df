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

//! Thin replay driver: loads a dataset, builds an [`Engine`](vne::engine::Engine) over its
//! substrate, and replays its virtual requests in arrival-time order. Not where correctness is
//! proven — that lives in `vne`'s own tests.

use clap::Parser;
use log::info;
use vne::dataset::{self, Dataset};
use vne::engine::{Engine, EngineConfig, StrategyKind};
use vne::pso::PsoParams;

use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "vne_cli", about = "Replay a virtual network embedding dataset against a substrate")]
struct Args {
    /// Path to the dataset JSON file (see vne::dataset for the schema)
    dataset: PathBuf,

    /// Mapping strategy to use: "pso" or "greedy"
    #[clap(long, default_value = "pso")]
    strategy: String,

    /// PSO swarm size
    #[clap(long, default_value_t = 50)]
    particles: usize,

    /// PSO iteration budget
    #[clap(long, default_value_t = 30)]
    iterations: usize,

    /// PSO PRNG seed, for reproducible runs
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Wipe the substrate and ignore any pre-allocated `available_*` overrides before replay
    #[clap(long)]
    reset: bool,
}

fn build_strategy(args: &Args) -> StrategyKind {
    match args.strategy.as_str() {
        "greedy" | "greedy_kruskal" => StrategyKind::GreedyKruskal,
        _ => StrategyKind::Pso(PsoParams {
            particles: args.particles,
            iterations: args.iterations,
            seed: args.seed,
            ..Default::default()
        }),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.dataset)?;
    let dataset: Dataset = serde_json::from_str(&raw)?;
    let (substrate, _node_ids) = dataset::build_substrate(&dataset.substrate_network)?;

    let mut engine = Engine::new(substrate, EngineConfig { strategy: build_strategy(&args) });
    if args.reset {
        engine.reset();
    }

    let mut requests = dataset.virtual_requests;
    requests.sort_by(|a, b| a.arrival_time.partial_cmp(&b.arrival_time).unwrap());
    let total = requests.len();

    let mut accepted = 0usize;
    let mut total_cost = 0.0;

    for (i, request) in requests.into_iter().enumerate() {
        let now = request.arrival_time;
        engine.release_expired(now);

        let vnetwork = request.vnetwork.clone();
        match engine.handle_request(request, now) {
            Ok((id, cost, committed)) => {
                accepted += 1;
                total_cost += cost;
                info!("request {} accepted as id {} at cost {}", i, id, cost);
                println!("[t={:>8.2}] request {:>4} ACCEPTED (id={}, cost={:.3})", now, i, id, cost);
                vne::printer::print_mapping(id, &vnetwork, &committed, engine.substrate());
            }
            Err(e) => {
                println!("[t={:>8.2}] request {:>4} REJECTED: {}", now, i, e);
            }
        }
    }

    let ratio = if total > 0 { 100.0 * accepted as f64 / total as f64 } else { 0.0 };
    println!("\n=== Summary ===");
    println!("Accepted: {}/{} ({:.1}%)", accepted, total, ratio);
    println!("Total cost: {:.3}", total_cost);

    Ok(())
}
