//! Cultural algorithm configuration.

use serde::{Deserialize, Serialize};

/// Cultural algorithm parameters.
///
/// # Example
/// ```
/// use u_jobshop::cultural::CulturalConfig;
///
/// let config = CulturalConfig::default()
///     .with_population_size(80)
///     .with_generations(200)
///     .with_seed(7);
/// assert_eq!(config.population_size, 80);
/// assert!((config.mutation_rate - 0.1).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CulturalConfig {
    /// Individuals per generation (at least 1).
    pub population_size: usize,
    /// Number of generations.
    pub generations: usize,
    /// Probability of a plain swap mutation.
    pub mutation_rate: f64,
    /// Probability of applying belief-space influence instead of plain mutation.
    pub influence_rate: f64,
    /// Share of jobs marked critical in the belief space.
    pub critical_fraction: f64,
    /// RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for CulturalConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            influence_rate: 0.3,
            critical_fraction: 0.2,
            seed: None,
        }
    }
}

impl CulturalConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(1);
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the plain mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = clamp_rate(rate);
        self
    }

    /// Sets the belief-space influence rate.
    pub fn with_influence_rate(mut self, rate: f64) -> Self {
        self.influence_rate = clamp_rate(rate);
        self
    }

    /// Sets the share of critical jobs.
    pub fn with_critical_fraction(mut self, fraction: f64) -> Self {
        self.critical_fraction = clamp_rate(fraction);
        self
    }

    /// Fixes the RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns a copy with every field in range.
    ///
    /// Deserialized configs bypass the builders, so the solver normalizes
    /// before running.
    pub fn normalized(&self) -> Self {
        Self {
            population_size: self.population_size.max(1),
            generations: self.generations,
            mutation_rate: clamp_rate(self.mutation_rate),
            influence_rate: clamp_rate(self.influence_rate),
            critical_fraction: clamp_rate(self.critical_fraction),
            seed: self.seed,
        }
    }
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = CulturalConfig::default();
        assert_eq!(c.population_size, 50);
        assert_eq!(c.generations, 100);
        assert!((c.mutation_rate - 0.1).abs() < 1e-10);
        assert!((c.influence_rate - 0.3).abs() < 1e-10);
        assert!((c.critical_fraction - 0.2).abs() < 1e-10);
        assert_eq!(c.seed, None);
    }

    #[test]
    fn test_builders_clamp() {
        let c = CulturalConfig::default()
            .with_population_size(0)
            .with_mutation_rate(1.5)
            .with_influence_rate(-0.2)
            .with_critical_fraction(f64::NAN);
        assert_eq!(c.population_size, 1);
        assert!((c.mutation_rate - 1.0).abs() < 1e-10);
        assert!((c.influence_rate - 0.0).abs() < 1e-10);
        assert!((c.critical_fraction - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: CulturalConfig =
            serde_json::from_str(r#"{"generations": 20, "seed": 3}"#).unwrap();
        assert_eq!(c.generations, 20);
        assert_eq!(c.seed, Some(3));
        assert_eq!(c.population_size, 50);
    }

    #[test]
    fn test_normalized() {
        let c: CulturalConfig =
            serde_json::from_str(r#"{"population_size": 0, "mutation_rate": 4.0}"#).unwrap();
        let n = c.normalized();
        assert_eq!(n.population_size, 1);
        assert!((n.mutation_rate - 1.0).abs() < 1e-10);
    }
}
