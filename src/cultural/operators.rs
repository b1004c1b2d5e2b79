//! Genetic operators: selection, crossover, and belief-guided mutation.

use std::collections::HashMap;

use rand::Rng;

use super::{BeliefSpace, Chromosome};

/// Which mutation a call to [`belief_guided_mutation`] applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Swapped two genes to match the best chromosome's relative order.
    Situational,
    /// Moved a critical job one position toward the front.
    Domain,
    /// Swapped two random genes.
    Swap,
    /// Left the chromosome unchanged.
    Unchanged,
}

// ======================== Selection ========================

/// Binary tournament: draws two indices uniformly (with replacement) and
/// returns the index of the fitter one. Ties go to the second draw.
///
/// Returns `None` for an empty population.
pub fn tournament_select<R: Rng>(population: &[Chromosome], rng: &mut R) -> Option<usize> {
    if population.is_empty() {
        return None;
    }
    let first = rng.random_range(0..population.len());
    let second = rng.random_range(0..population.len());
    Some(binary_tournament(population, first, second))
}

fn binary_tournament(population: &[Chromosome], first: usize, second: usize) -> usize {
    if population[first].fitness < population[second].fitness {
        first
    } else {
        second
    }
}

// ======================== Crossover ========================

/// Order crossover (OX1) for permutations with repetition.
///
/// Copies parent 1's slice `[start, end)` in place, then fills the rest of
/// the child starting at `end` and wrapping around, with parent 2's genes
/// taken left to right. Each gene of parent 2 that is matched by a copy in
/// the slice is skipped once, so the child keeps both parents' per-job
/// multiplicities.
///
/// Chromosomes shorter than 2, or parents of different lengths, yield a
/// copy of parent 1.
///
/// # Reference
/// Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
pub fn order_crossover<R: Rng>(p1: &Chromosome, p2: &Chromosome, rng: &mut R) -> Chromosome {
    let len = p1.len();
    if len < 2 || p2.len() != len {
        return Chromosome::from_genes(p1.genes.clone());
    }
    let (start, end) = distinct_pair(len, rng);
    order_crossover_at(p1, p2, start, end)
}

fn order_crossover_at(p1: &Chromosome, p2: &Chromosome, start: usize, end: usize) -> Chromosome {
    let len = p1.len();
    let mut child = p1.genes.clone();

    let mut covered: HashMap<usize, usize> = HashMap::new();
    for &job_id in &p1.genes[start..end] {
        *covered.entry(job_id).or_insert(0) += 1;
    }

    let mut donor = p2.genes.iter().copied().filter(|job_id| match covered.get_mut(job_id) {
        Some(count) if *count > 0 => {
            *count -= 1;
            false
        }
        _ => true,
    });

    for pos in (end..len).chain(0..start) {
        if let Some(job_id) = donor.next() {
            child[pos] = job_id;
        }
    }

    Chromosome::from_genes(child)
}

/// Two distinct indices in `0..len`, ascending. Requires `len >= 2`.
fn distinct_pair<R: Rng>(len: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..len);
    let mut b = rng.random_range(0..len - 1);
    if b >= a {
        b += 1;
    }
    (a.min(b), a.max(b))
}

// ======================== Mutation ========================

/// Swap mutation: exchanges two distinct random positions.
pub fn swap_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) {
    let len = chromosome.len();
    if len < 2 {
        return;
    }
    let (i, j) = distinct_pair(len, rng);
    chromosome.genes.swap(i, j);
}

/// Belief-guided mutation.
///
/// With probability `influence_rate` the belief space steers the change:
///
/// - if a best chromosome is recorded, two positions `i < j` are drawn and
///   swapped when the best chromosome schedules the job at `j` before the
///   job at `i` (compared by first occurrence);
/// - if no best is recorded or that pair is already aligned, a position in
///   `1..len` is drawn and, if it holds a critical job, that gene moves one
///   slot toward the front.
///
/// Influence never falls through to plain mutation. Otherwise, with
/// probability `mutation_rate`, two distinct random positions are swapped.
///
/// Chromosomes shorter than 2 are never changed.
pub fn belief_guided_mutation<R: Rng>(
    chromosome: &mut Chromosome,
    belief: &BeliefSpace,
    influence_rate: f64,
    mutation_rate: f64,
    rng: &mut R,
) -> Mutation {
    let len = chromosome.len();
    if len < 2 {
        return Mutation::Unchanged;
    }

    if chance(rng, influence_rate) {
        if let Some(leader) = belief.best() {
            if situational_influence(chromosome, leader, rng) == Mutation::Situational {
                return Mutation::Situational;
            }
        }
        return domain_influence(chromosome, belief, rng);
    }

    if chance(rng, mutation_rate) {
        swap_mutation(chromosome, rng);
        return Mutation::Swap;
    }
    Mutation::Unchanged
}

fn situational_influence<R: Rng>(
    chromosome: &mut Chromosome,
    leader: &Chromosome,
    rng: &mut R,
) -> Mutation {
    let (i, j) = distinct_pair(chromosome.len(), rng);
    let earlier = leader.first_position(chromosome.genes[i]);
    let later = leader.first_position(chromosome.genes[j]);
    match (earlier, later) {
        (Some(pos_i), Some(pos_j)) if pos_j < pos_i => {
            chromosome.genes.swap(i, j);
            Mutation::Situational
        }
        _ => Mutation::Unchanged,
    }
}

fn domain_influence<R: Rng>(
    chromosome: &mut Chromosome,
    belief: &BeliefSpace,
    rng: &mut R,
) -> Mutation {
    let idx = rng.random_range(1..chromosome.len());
    if belief.is_critical(chromosome.genes[idx]) {
        chromosome.genes.swap(idx, idx - 1);
        Mutation::Domain
    } else {
        Mutation::Unchanged
    }
}

/// Bernoulli draw that tolerates out-of-range and NaN probabilities.
fn chance<R: Rng>(rng: &mut R, probability: f64) -> bool {
    rng.random::<f64>() < probability
}
