//! Cultural algorithm for job-shop scheduling.
//!
//! A generational genetic algorithm over operation-sequence chromosomes,
//! extended with a belief space that records the best schedule found and
//! the jobs with the most processing time. Mutation consults the belief
//! space to pull children toward the leader's job order or to move critical
//! jobs earlier.
//!
//! # Generation Loop
//!
//! 1. Update the belief space from the current population.
//! 2. Breed `P` children: two binary-tournament parents, order crossover,
//!    belief-guided mutation.
//! 3. Replace the population with the children and evaluate them.
//!
//! The result is the belief space's best, which never gets worse across
//! generations. The search always produces a schedule; it has no failure
//! mode once the problem has validated.
//!
//! # Submodules
//!
//! - [`operators`]: selection, crossover, and mutation functions
//!
//! # Reference
//! - Reynolds (1994), "An Introduction to Cultural Algorithms"
//! - Bierwirth (1995), "A generalized permutation approach to JSSP"

mod algorithm;
mod belief;
mod chromosome;
mod config;
pub mod operators;

pub use algorithm::{cultural_algorithm_solve, CulturalAlgorithm, CulturalResult, GenerationStats};
pub use belief::BeliefSpace;
pub use chromosome::{Chromosome, Decoded, UNEVALUATED};
pub use config::CulturalConfig;
