//! Belief space: the shared knowledge layer of the cultural algorithm.
//!
//! Holds two kinds of knowledge that bias mutation:
//!
//! - **Situational**: the best chromosome seen so far. Its fitness only
//!   ever moves downward.
//! - **Domain**: the critical jobs, i.e. the jobs with the largest total
//!   processing time. Computed once per run.
//!
//! The record is owned by the generation loop and passed by reference to
//! the mutation operator; it is written once per generation.
//!
//! # Reference
//! Reynolds (1994), "An Introduction to Cultural Algorithms"

use std::cmp::Reverse;

use serde::Serialize;

use super::Chromosome;
use crate::models::ProblemModel;

/// Situational and domain knowledge shared across a population.
#[derive(Debug, Clone, Serialize)]
pub struct BeliefSpace {
    best: Option<Chromosome>,
    critical_jobs: Vec<usize>,
}

impl BeliefSpace {
    /// Creates an empty belief space for `problem`.
    ///
    /// The `max(1, floor(n * critical_fraction))` jobs with the largest
    /// total duration are marked critical (ties by ascending ID).
    pub fn new(problem: &ProblemModel, critical_fraction: f64) -> Self {
        Self {
            best: None,
            critical_jobs: critical_jobs(problem, critical_fraction),
        }
    }

    /// Best fitness recorded so far.
    pub fn best_fitness(&self) -> Option<i64> {
        self.best.as_ref().map(|c| c.fitness)
    }

    /// Best chromosome recorded so far.
    pub fn best(&self) -> Option<&Chromosome> {
        self.best.as_ref()
    }

    /// Critical job IDs, most critical first.
    pub fn critical_jobs(&self) -> &[usize] {
        &self.critical_jobs
    }

    /// Whether `job_id` is a critical job.
    pub fn is_critical(&self, job_id: usize) -> bool {
        self.critical_jobs.contains(&job_id)
    }

    /// Adopts the population's best individual if it beats the record.
    ///
    /// Picks the first individual on fitness ties. Returns whether the
    /// record improved.
    pub fn update(&mut self, population: &[Chromosome]) -> bool {
        let Some(candidate) = population.iter().min_by_key(|c| c.fitness) else {
            return false;
        };
        let improves = self
            .best_fitness()
            .map_or(true, |best| candidate.fitness < best);
        if improves {
            self.best = Some(candidate.clone());
        }
        improves
    }
}

fn critical_jobs(problem: &ProblemModel, fraction: f64) -> Vec<usize> {
    let n = problem.job_count();
    if n == 0 {
        return Vec::new();
    }
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let count = ((n as f64 * fraction).floor() as usize).clamp(1, n);

    let mut ranked: Vec<(usize, i64)> = problem
        .jobs()
        .iter()
        .map(|job| (job.id, job.total_duration()))
        .collect();
    ranked.sort_by_key(|&(id, total)| (Reverse(total), id));
    ranked.into_iter().take(count).map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobSpec;

    fn problem_with_durations(durations: &[i64]) -> ProblemModel {
        ProblemModel::new(
            1,
            durations
                .iter()
                .map(|&d| JobSpec::new().with_operation(0, d))
                .collect(),
        )
        .unwrap()
    }

    fn evaluated(genes: Vec<usize>, fitness: i64) -> Chromosome {
        let mut c = Chromosome::from_genes(genes);
        c.fitness = fitness;
        c
    }

    #[test]
    fn test_critical_job_count() {
        // 10 jobs at 0.2 → 2 critical
        let p = problem_with_durations(&[1, 9, 3, 9, 2, 1, 1, 1, 8, 1]);
        let belief = BeliefSpace::new(&p, 0.2);
        assert_eq!(belief.critical_jobs(), &[1, 3]);
        assert!(belief.is_critical(3));
        assert!(!belief.is_critical(8));
    }

    #[test]
    fn test_at_least_one_critical_job() {
        let p = problem_with_durations(&[4, 7, 2]);
        assert_eq!(BeliefSpace::new(&p, 0.2).critical_jobs(), &[1]);
        assert_eq!(BeliefSpace::new(&p, 0.0).critical_jobs(), &[1]);
        assert_eq!(BeliefSpace::new(&p, 5.0).critical_jobs(), &[1, 0, 2]);
    }

    #[test]
    fn test_no_jobs_no_critical() {
        let p = ProblemModel::new(1, vec![]).unwrap();
        assert!(BeliefSpace::new(&p, 0.2).critical_jobs().is_empty());
    }

    #[test]
    fn test_update_is_monotonic() {
        let p = problem_with_durations(&[1, 1]);
        let mut belief = BeliefSpace::new(&p, 0.2);
        assert_eq!(belief.best_fitness(), None);

        assert!(belief.update(&[evaluated(vec![0, 1], 9), evaluated(vec![1, 0], 7)]));
        assert_eq!(belief.best_fitness(), Some(7));

        // Worse population does not regress the record
        assert!(!belief.update(&[evaluated(vec![0, 1], 12)]));
        assert_eq!(belief.best_fitness(), Some(7));

        // Equal fitness is not an improvement
        assert!(!belief.update(&[evaluated(vec![0, 1], 7)]));
        assert_eq!(belief.best().map(|c| c.genes.clone()), Some(vec![1, 0]));

        assert!(belief.update(&[evaluated(vec![0, 1], 5)]));
        assert_eq!(belief.best_fitness(), Some(5));
    }

    #[test]
    fn test_update_takes_first_on_ties() {
        let p = problem_with_durations(&[1, 1]);
        let mut belief = BeliefSpace::new(&p, 0.2);
        belief.update(&[
            evaluated(vec![1, 0], 4),
            evaluated(vec![0, 1], 4),
        ]);
        assert_eq!(belief.best().map(|c| c.genes.clone()), Some(vec![1, 0]));
    }

    #[test]
    fn test_update_with_empty_population() {
        let p = problem_with_durations(&[1]);
        let mut belief = BeliefSpace::new(&p, 0.2);
        assert!(!belief.update(&[]));
        assert!(belief.best().is_none());
    }
}
