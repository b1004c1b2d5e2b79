//! Operation-sequence chromosome.
//!
//! # Encoding
//!
//! A chromosome is a sequence of job IDs in which job `J` appears once per
//! operation of `J`. The k-th occurrence of `J` stands for `J`'s k-th
//! operation, so every permutation of the multiset is a valid order for the
//! operations of each job.
//!
//! # Decoding
//!
//! Dependencies are repaired while decoding: an occurrence of a job whose
//! prerequisites are not complete yet is deferred, and deferred occurrences
//! are released in their original order as soon as they become
//! dispatchable. Without dependencies the dispatch order is the gene
//! sequence itself.
//!
//! # Reference
//! Bierwirth (1995), "A generalized permutation approach to JSSP"

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::models::{ProblemModel, Schedule};
use crate::simulation::Timeline;

/// Fitness of a chromosome that has not been evaluated yet.
pub const UNEVALUATED: i64 = i64::MAX;

/// Permutation-with-repetition chromosome.
///
/// Lower fitness = better schedule (minimization convention).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chromosome {
    /// Job IDs in priority order.
    pub genes: Vec<usize>,
    /// Decoded makespan, or [`UNEVALUATED`].
    pub fitness: i64,
}

/// Result of decoding a chromosome.
#[derive(Debug, Clone)]
pub struct Decoded {
    /// Dispatch order actually simulated (genes after dependency repair).
    pub order: Vec<usize>,
    /// The timed schedule.
    pub schedule: Schedule,
    /// Schedule makespan.
    pub makespan: i64,
}

impl Chromosome {
    /// Wraps a gene sequence; fitness starts unevaluated.
    pub fn from_genes(genes: Vec<usize>) -> Self {
        Self {
            genes,
            fitness: UNEVALUATED,
        }
    }

    /// Creates a random chromosome with each job's operation multiplicity.
    pub fn random<R: Rng>(problem: &ProblemModel, rng: &mut R) -> Self {
        let mut genes: Vec<usize> = problem
            .jobs()
            .iter()
            .flat_map(|job| std::iter::repeat(job.id).take(job.operation_count()))
            .collect();
        genes.shuffle(rng);
        Self::from_genes(genes)
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Whether the fitness has been computed.
    pub fn is_evaluated(&self) -> bool {
        self.fitness != UNEVALUATED
    }

    /// Occurrence count per job ID.
    pub fn job_counts(&self) -> HashMap<usize, usize> {
        let mut counts = HashMap::new();
        for &job_id in &self.genes {
            *counts.entry(job_id).or_insert(0) += 1;
        }
        counts
    }

    /// Whether every job appears exactly once per operation.
    pub fn is_valid(&self, problem: &ProblemModel) -> bool {
        if self.genes.len() != problem.total_operation_count() {
            return false;
        }
        let counts = self.job_counts();
        counts.keys().all(|&id| id < problem.job_count())
            && problem
                .jobs()
                .iter()
                .all(|job| counts.get(&job.id).copied().unwrap_or(0) == job.operation_count())
    }

    /// Index of the first occurrence of `job_id`.
    pub fn first_position(&self, job_id: usize) -> Option<usize> {
        self.genes.iter().position(|&g| g == job_id)
    }

    /// Decodes into a dispatch order and schedule.
    ///
    /// Genes naming unknown or already finished jobs are ignored. Occurrences
    /// still blocked when the genes run out (only possible with cyclic
    /// dependencies) are left unscheduled.
    pub fn decode(&self, problem: &ProblemModel) -> Decoded {
        let mut timeline = Timeline::new(problem);
        let mut order = Vec::with_capacity(self.genes.len());
        let mut schedule = Schedule {
            assignments: Vec::with_capacity(self.genes.len()),
        };
        let mut deferred: Vec<usize> = Vec::new();

        for &job_id in &self.genes {
            if problem.is_job_complete(job_id, progress_of(&timeline, job_id)) {
                continue;
            }
            if !deferred.contains(&job_id) && timeline.is_dispatchable(job_id) {
                let (assignment, _) = timeline.dispatch(job_id);
                schedule.add_assignment(assignment);
                order.push(job_id);
                release_deferred(&mut timeline, &mut deferred, &mut order, &mut schedule);
            } else {
                deferred.push(job_id);
            }
        }

        let makespan = timeline.makespan();
        Decoded {
            order,
            schedule,
            makespan,
        }
    }

    /// Dispatch order after dependency repair.
    pub fn dispatch_order(&self, problem: &ProblemModel) -> Vec<usize> {
        self.decode(problem).order
    }

    /// Decodes, stores, and returns the fitness (makespan).
    pub fn evaluate(&mut self, problem: &ProblemModel) -> i64 {
        self.fitness = self.decode(problem).makespan;
        self.fitness
    }
}

fn progress_of(timeline: &Timeline<'_>, job_id: usize) -> usize {
    timeline.progress().get(job_id).copied().unwrap_or(0)
}

/// Dispatches deferred occurrences, in order, until none is dispatchable.
fn release_deferred(
    timeline: &mut Timeline<'_>,
    deferred: &mut Vec<usize>,
    order: &mut Vec<usize>,
    schedule: &mut Schedule,
) {
    loop {
        let Some(pos) = deferred
            .iter()
            .position(|&job_id| timeline.is_dispatchable(job_id))
        else {
            return;
        };
        let job_id = deferred.remove(pos);
        let (assignment, _) = timeline.dispatch(job_id);
        schedule.add_assignment(assignment);
        order.push(job_id);
    }
}
