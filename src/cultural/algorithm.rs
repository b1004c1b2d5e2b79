//! Generation loop of the cultural algorithm.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, trace};

use super::operators::{belief_guided_mutation, order_crossover, tournament_select};
use super::{BeliefSpace, Chromosome, CulturalConfig};
use crate::models::{ProblemModel, Schedule};

/// Snapshot of one generation, taken right after the belief update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStats {
    /// Generation index (0-based).
    pub generation: usize,
    /// Belief-space best fitness after this generation's update.
    pub best_fitness: i64,
    /// Best fitness within this generation's population.
    pub population_best: i64,
    /// Mean fitness of this generation's population.
    pub population_mean: f64,
}

/// Outcome of a cultural algorithm run.
#[derive(Debug, Clone, Serialize)]
pub struct CulturalResult {
    /// Best chromosome ever recorded in the belief space.
    pub best: Chromosome,
    /// Decoded schedule of `best`, in dispatch order.
    pub schedule: Schedule,
    /// Makespan of `schedule`.
    pub makespan: i64,
    /// One entry per generation.
    pub history: Vec<GenerationStats>,
    /// Mean fitness of the final population.
    pub final_mean_fitness: f64,
    /// Number of chromosome evaluations performed.
    pub evaluations: u64,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

/// Genetic algorithm with a belief space steering mutation.
///
/// # Example
/// ```
/// use u_jobshop::cultural::{CulturalAlgorithm, CulturalConfig};
/// use u_jobshop::models::{JobSpec, ProblemModel};
///
/// let problem = ProblemModel::new(
///     2,
///     vec![
///         JobSpec::new().with_operation(0, 3).with_operation(1, 2),
///         JobSpec::new().with_operation(1, 4).with_operation(0, 1),
///     ],
/// )
/// .unwrap();
/// let config = CulturalConfig::default()
///     .with_population_size(20)
///     .with_generations(20)
///     .with_seed(42);
/// let result = CulturalAlgorithm::with_config(config).solve(&problem);
/// assert!(result.makespan >= 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CulturalAlgorithm {
    config: CulturalConfig,
}

impl CulturalAlgorithm {
    /// Creates a solver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver from a configuration.
    pub fn with_config(config: CulturalConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &CulturalConfig {
        &self.config
    }

    /// Runs the algorithm, seeding the RNG from the config (or the OS).
    pub fn solve(&self, problem: &ProblemModel) -> CulturalResult {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.solve_with_rng(problem, &mut rng)
    }

    /// Runs the algorithm with a caller-provided RNG.
    pub fn solve_with_rng<R: Rng>(&self, problem: &ProblemModel, rng: &mut R) -> CulturalResult {
        let config = self.config.normalized();
        let started = Instant::now();
        info!(
            jobs = problem.job_count(),
            operations = problem.total_operation_count(),
            population = config.population_size,
            generations = config.generations,
            "cultural algorithm started"
        );

        let mut evaluations = 0u64;
        let mut population: Vec<Chromosome> = (0..config.population_size)
            .map(|_| {
                let mut chromosome = Chromosome::random(problem, rng);
                chromosome.evaluate(problem);
                evaluations += 1;
                chromosome
            })
            .collect();

        let mut belief = BeliefSpace::new(problem, config.critical_fraction);
        let mut history = Vec::with_capacity(config.generations);

        for generation in 0..config.generations {
            if belief.update(&population) {
                debug!(
                    generation,
                    best_fitness = belief.best_fitness(),
                    "belief space improved"
                );
            }
            let stats = generation_stats(generation, &population, &belief);
            trace!(
                generation,
                best_fitness = stats.best_fitness,
                population_best = stats.population_best,
                population_mean = stats.population_mean,
                "generation"
            );
            history.push(stats);

            population = (0..config.population_size)
                .map(|_| {
                    let mut child = breed(&population, rng);
                    belief_guided_mutation(
                        &mut child,
                        &belief,
                        config.influence_rate,
                        config.mutation_rate,
                        rng,
                    );
                    child.evaluate(problem);
                    evaluations += 1;
                    child
                })
                .collect();
        }

        if belief.update(&population) {
            debug!(
                best_fitness = belief.best_fitness(),
                "belief space improved by final population"
            );
        }

        let best = match belief.best() {
            Some(best) => best.clone(),
            None => {
                let mut fallback = Chromosome::random(problem, rng);
                fallback.evaluate(problem);
                fallback
            }
        };
        let decoded = best.decode(problem);
        let elapsed = started.elapsed();

        info!(
            makespan = decoded.makespan,
            evaluations,
            elapsed_ms = elapsed.as_millis() as u64,
            "cultural algorithm finished"
        );

        CulturalResult {
            best,
            schedule: decoded.schedule,
            makespan: decoded.makespan,
            history,
            final_mean_fitness: mean_fitness(&population),
            evaluations,
            elapsed,
        }
    }
}

/// Two tournament-selected parents recombined by order crossover.
fn breed<R: Rng>(population: &[Chromosome], rng: &mut R) -> Chromosome {
    let p1 = tournament_select(population, rng).map(|i| &population[i]);
    let p2 = tournament_select(population, rng).map(|i| &population[i]);
    match (p1, p2) {
        (Some(p1), Some(p2)) => order_crossover(p1, p2, rng),
        _ => Chromosome::from_genes(Vec::new()),
    }
}

fn generation_stats(
    generation: usize,
    population: &[Chromosome],
    belief: &BeliefSpace,
) -> GenerationStats {
    let population_best = population.iter().map(|c| c.fitness).min().unwrap_or(0);
    GenerationStats {
        generation,
        best_fitness: belief.best_fitness().unwrap_or(population_best),
        population_best,
        population_mean: mean_fitness(population),
    }
}

fn mean_fitness(population: &[Chromosome]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    population.iter().map(|c| c.fitness as f64).sum::<f64>() / population.len() as f64
}

/// Runs the cultural algorithm with the given core parameters and returns
/// the best schedule with its makespan.
///
/// The remaining parameters keep their defaults and the RNG is seeded from
/// the OS; use [`CulturalAlgorithm`] for full control.
pub fn cultural_algorithm_solve(
    problem: &ProblemModel,
    population_size: usize,
    generations: usize,
    mutation_rate: f64,
) -> (Schedule, i64) {
    let config = CulturalConfig::default()
        .with_population_size(population_size)
        .with_generations(generations)
        .with_mutation_rate(mutation_rate);
    let result = CulturalAlgorithm::with_config(config).solve(problem);
    (result.schedule, result.makespan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bnb::BranchAndBound;
    use crate::models::JobSpec;

    fn two_by_two() -> ProblemModel {
        ProblemModel::new(
            2,
            vec![
                JobSpec::new().with_operation(0, 3).with_operation(1, 2),
                JobSpec::new().with_operation(1, 4).with_operation(0, 1),
            ],
        )
        .unwrap()
    }

    fn three_by_three() -> ProblemModel {
        ProblemModel::new(
            3,
            vec![
                JobSpec::new()
                    .with_operation(0, 3)
                    .with_operation(1, 2)
                    .with_operation(2, 2),
                JobSpec::new()
                    .with_operation(0, 2)
                    .with_operation(2, 1)
                    .with_operation(1, 4),
                JobSpec::new()
                    .with_operation(1, 4)
                    .with_operation(2, 3)
                    .with_operation(0, 1),
            ],
        )
        .unwrap()
    }

    fn seeded(population: usize, generations: usize) -> CulturalAlgorithm {
        CulturalAlgorithm::with_config(
            CulturalConfig::default()
                .with_population_size(population)
                .with_generations(generations)
                .with_seed(42),
        )
    }

    #[test]
    fn test_single_operation() {
        let p = ProblemModel::new(1, vec![JobSpec::new().with_operation(0, 5)]).unwrap();
        let result = seeded(10, 5).solve(&p);
        assert_eq!(result.makespan, 5);
        assert_eq!(result.schedule.assignment_count(), 1);

        let (schedule, makespan) = cultural_algorithm_solve(&p, 50, 100, 0.1);
        assert_eq!(makespan, 5);
        assert_eq!(schedule.makespan(), 5);
    }

    #[test]
    fn test_two_by_two_reaches_optimum() {
        let p = two_by_two();
        let result = seeded(20, 30).solve(&p);
        assert_eq!(result.makespan, 6);
        assert_eq!(result.best.fitness, 6);
        assert!(result.schedule.check(&p).is_empty());
    }

    #[test]
    fn test_history_is_monotonic() {
        let p = three_by_three();
        let result = seeded(30, 40).solve(&p);
        assert_eq!(result.history.len(), 40);
        assert!(result
            .history
            .windows(2)
            .all(|w| w[1].best_fitness <= w[0].best_fitness));
        for (g, stats) in result.history.iter().enumerate() {
            assert_eq!(stats.generation, g);
            assert!(stats.best_fitness <= stats.population_best);
            assert!(stats.population_best as f64 <= stats.population_mean);
        }
        let last = result.history.last().map(|s| s.best_fitness).unwrap();
        assert!(result.makespan <= last);
    }

    #[test]
    fn test_never_beats_exact_optimum() {
        let p = three_by_three();
        let optimum = BranchAndBound::new().solve(&p).makespan().unwrap();
        let result = seeded(30, 40).solve(&p);
        assert!(result.makespan >= optimum);
        assert!(result.best.is_valid(&p));
        assert!(result.schedule.check(&p).is_empty());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let p = three_by_three();
        let a = seeded(20, 15).solve(&p);
        let b = seeded(20, 15).solve(&p);
        assert_eq!(a.makespan, b.makespan);
        assert_eq!(a.best.genes, b.best.genes);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_dependency_instance_stays_feasible() {
        let p = ProblemModel::new(
            2,
            vec![
                JobSpec::new().with_operation(0, 2).with_operation(1, 3),
                JobSpec::new().with_operation(1, 2).with_operation(0, 2),
                JobSpec::new()
                    .with_operation(0, 1)
                    .with_operation(1, 1)
                    .with_dependency(0),
                JobSpec::new().with_operation(1, 2).with_dependency(1),
            ],
        )
        .unwrap();
        let result = seeded(20, 20).solve(&p);
        assert_eq!(result.schedule.assignment_count(), p.total_operation_count());
        assert!(result.schedule.check(&p).is_empty());
        assert_eq!(result.makespan, result.schedule.makespan());
    }

    #[test]
    fn test_zero_generations_still_returns() {
        let p = two_by_two();
        let result = seeded(5, 0).solve(&p);
        assert!(result.history.is_empty());
        assert_eq!(result.evaluations, 5);
        assert!(result.makespan >= 6);
        assert!(result.final_mean_fitness >= result.makespan as f64);
    }

    #[test]
    fn test_evaluation_count() {
        let result = seeded(8, 6).solve(&two_by_two());
        assert_eq!(result.evaluations, 8 * 7);
    }

    #[test]
    fn test_result_serializes() {
        let result = seeded(4, 2).solve(&two_by_two());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["history"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["makespan"].as_i64(), Some(result.makespan));
    }
}
