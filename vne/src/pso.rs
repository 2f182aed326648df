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

//! # Particle swarm mapping search
//!
//! A particle is an integer vector, one entry per virtual node, indexing into that node's
//! candidate list. Velocities are real-valued and of the same shape. The swarm is seeded from a
//! caller-supplied `u64`, using [`rand::rngs::StdRng`] rather than thread-local randomness, so
//! that two runs against the same candidates and residual view reproduce the same best particle.

use crate::candidates::Candidates;
use crate::error::Error;
use crate::request::VirtualNetwork;
use crate::strategy::{fitness, Mapping, MappingStrategy};
use crate::substrate::Substrate;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tunable parameters of the PSO search, overridable at construction.
#[derive(Debug, Clone, Copy)]
pub struct PsoParams {
    /// Swarm size
    pub particles: usize,
    /// Number of iterations
    pub iterations: usize,
    /// Inertia weight
    pub w: f64,
    /// Cognitive (personal-best) coefficient
    pub c1: f64,
    /// Social (global-best) coefficient
    pub c2: f64,
    /// Per-dimension mutation probability applied once per particle per iteration
    pub mutation_rate: f64,
    /// PRNG seed; same seed + same candidates + same residual view reproduces the same output
    pub seed: u64,
}

impl Default for PsoParams {
    fn default() -> Self {
        Self { particles: 50, iterations: 30, w: 0.7, c1: 1.5, c2: 1.5, mutation_rate: 0.1, seed: 0 }
    }
}

struct Particle {
    position: Mapping,
    velocity: Vec<f64>,
    best_position: Mapping,
    best_fitness: f64,
}

/// PSO-based [`MappingStrategy`].
pub struct Pso {
    params: PsoParams,
    rng: StdRng,
}

impl Pso {
    /// Build a PSO strategy with the given parameters, seeding its PRNG from `params.seed`.
    pub fn new(params: PsoParams) -> Self {
        Self { rng: StdRng::seed_from_u64(params.seed), params }
    }
}

fn random_position(rng: &mut StdRng, candidates: &Candidates) -> Mapping {
    candidates.iter().map(|list| rng.gen_range(0, list.len())).collect()
}

fn clamp_index(x: f64, v: f64, len: usize) -> usize {
    let raw = (x + v).round() as i64;
    let len = len as i64;
    (((raw % len) + len) % len) as usize
}

impl MappingStrategy for Pso {
    fn search(
        &mut self,
        candidates: &Candidates,
        request: &VirtualNetwork,
        substrate: &Substrate,
    ) -> Result<Mapping, Error> {
        let dims = candidates.len();
        let mut swarm: Vec<Particle> = (0..self.params.particles)
            .map(|_| {
                let position = random_position(&mut self.rng, candidates);
                let best_fitness = fitness(&position, candidates, request, substrate);
                Particle {
                    velocity: vec![0.0; dims],
                    best_position: position.clone(),
                    position,
                    best_fitness,
                }
            })
            .collect();

        let mut global_best = swarm
            .iter()
            .min_by(|a, b| a.best_fitness.partial_cmp(&b.best_fitness).unwrap())
            .map(|p| (p.best_position.clone(), p.best_fitness))
            .expect("swarm is never empty");

        for iteration in 0..self.params.iterations {
            for particle in swarm.iter_mut() {
                for j in 0..dims {
                    let r1: f64 = self.rng.gen_range(0.0, 1.0);
                    let r2: f64 = self.rng.gen_range(0.0, 1.0);
                    let cognitive = self.params.c1 * r1 * (particle.best_position[j] as f64 - particle.position[j] as f64);
                    let social = self.params.c2 * r2 * (global_best.0[j] as f64 - particle.position[j] as f64);
                    particle.velocity[j] = self.params.w * particle.velocity[j] + cognitive + social;
                    particle.position[j] =
                        clamp_index(particle.position[j] as f64, particle.velocity[j], candidates[j].len());
                }
                if self.rng.gen_range(0.0, 1.0) < self.params.mutation_rate {
                    let dim = self.rng.gen_range(0, dims);
                    particle.position[dim] = self.rng.gen_range(0, candidates[dim].len());
                }

                let current_fitness = fitness(&particle.position, candidates, request, substrate);
                if current_fitness < particle.best_fitness {
                    particle.best_fitness = current_fitness;
                    particle.best_position = particle.position.clone();
                    if current_fitness < global_best.1 {
                        global_best = (particle.position.clone(), current_fitness);
                    }
                }
            }
            debug!("pso iteration {} best fitness {}", iteration, global_best.1);
        }

        Ok(global_best.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{VirtualLink, VirtualNode};
    use assert_approx_eq::assert_approx_eq;

    fn fixture() -> (Substrate, VirtualNetwork, Candidates) {
        let mut sub = Substrate::new();
        let d = sub.add_domain(0);
        let a = sub.add_node(d, 100.0, 1.0, 0.0);
        let b = sub.add_node(d, 100.0, 5.0, 0.0);
        sub.add_intra_link(d, a, b, 1000.0, 1.0, 0.0).unwrap();
        let request = VirtualNetwork {
            nodes: vec![VirtualNode { id: 0, cpu_demand: 10.0, permitted_domains: vec![] }],
            links: vec![],
        };
        let candidates = vec![vec![a, b]];
        (sub, request, candidates)
    }

    #[test]
    fn prefers_cheaper_candidate() {
        let (sub, request, candidates) = fixture();
        let mut pso = Pso::new(PsoParams { particles: 10, iterations: 10, seed: 42, ..Default::default() });
        let mapping = pso.search(&candidates, &request, &sub).unwrap();
        assert_eq!(candidates[0][mapping[0]], sub.domains()[0].nodes()[0]);
        // single node, no links: cost is cpu_demand(10) * cheap node's cost_per_unit(1.0).
        assert_approx_eq!(fitness(&mapping, &candidates, &request, &sub), 10.0);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let (sub, request, candidates) = fixture();
        let mut pso_a = Pso::new(PsoParams { seed: 7, ..Default::default() });
        let mut pso_b = Pso::new(PsoParams { seed: 7, ..Default::default() });
        let a = pso_a.search(&candidates, &request, &sub).unwrap();
        let b = pso_b.search(&candidates, &request, &sub).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_can_diverge_in_process() {
        let (sub, request, candidates) = fixture();
        let mut pso = Pso::new(PsoParams { seed: 1, ..Default::default() });
        let first = pso.search(&candidates, &request, &sub).unwrap();
        // Re-searching with the same already-advanced RNG should still produce a valid mapping.
        let second = pso.search(&candidates, &request, &sub).unwrap();
        assert_eq!(first.len(), second.len());
    }
}
