//! Named parameters and the algorithm factory.
//!
//! Solvers can be assembled from a flat string map such as one read from a
//! configuration section:
//!
//! | key | type | used by |
//! |---|---|---|
//! | `algorithm` | `bf` \| `bnb` \| `sa` \| `ga` | [`Parameters::algorithm`] |
//! | `temperature` | `f64` | sa |
//! | `epoch_size` | `u32` | sa |
//! | `cooling_coefficient` | `f64` in (0, 1) | sa |
//! | `population_size` | `usize` | ga |
//! | `crossover_probability` | `f64` in [0, 1] | ga |
//! | `mutation_probability` | `f64` in [0, 1] | ga |
//! | `max_generations` | `usize`, 0 = unbounded | ga |
//! | `seed` | `u64` | sa, ga |
//! | `timeout_seconds` | `u64`, 0 = none | [`Parameters::timeout`] |
//!
//! Absent tuning keys fall back to the solver defaults.

use crate::algorithm::Algorithm;
use crate::bnb::BranchAndBoundDfs;
use crate::error::{Result, TspError};
use crate::exhaustive::ExhaustiveSearch;
use crate::ga::{GaConfig, GeneticAlgorithm};
use crate::matrix::DistanceMatrix;
use crate::sa::{LinearCooling, SaConfig, SimulatedAnnealing};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Which solver to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgorithmKind {
    #[cfg_attr(feature = "serde", serde(rename = "bf"))]
    BruteForce,
    #[cfg_attr(feature = "serde", serde(rename = "bnb"))]
    BranchAndBound,
    #[cfg_attr(feature = "serde", serde(rename = "sa"))]
    SimulatedAnnealing,
    #[cfg_attr(feature = "serde", serde(rename = "ga"))]
    Genetic,
}

impl AlgorithmKind {
    /// The short identifier, identical to [`Algorithm::name`].
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmKind::BruteForce => "bf",
            AlgorithmKind::BranchAndBound => "bnb",
            AlgorithmKind::SimulatedAnnealing => "sa",
            AlgorithmKind::Genetic => "ga",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = TspError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "bf" => Ok(AlgorithmKind::BruteForce),
            "bnb" => Ok(AlgorithmKind::BranchAndBound),
            "sa" => Ok(AlgorithmKind::SimulatedAnnealing),
            "ga" => Ok(AlgorithmKind::Genetic),
            other => Err(TspError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// A flat `key -> value` parameter map.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_tsp::params::Parameters;
///
/// let params: Parameters = [("temperature", "250"), ("timeout_seconds", "3")]
///     .into_iter()
///     .collect();
/// assert_eq!(params.get::<f64>("temperature").unwrap(), 250.0);
/// assert_eq!(params.get_or("epoch_size", 100u32).unwrap(), 100);
/// assert_eq!(params.timeout().unwrap(), Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Parameters {
    values: BTreeMap<String, String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Reads and converts a required parameter.
    ///
    /// # Errors
    /// [`TspError::MissingParameter`] if absent,
    /// [`TspError::InvalidParameter`] if the value does not parse.
    pub fn get<T: FromStr>(&self, key: &str) -> Result<T> {
        match self.raw(key) {
            Some(value) => parse_value(key, value),
            None => Err(TspError::MissingParameter(key.to_string())),
        }
    }

    /// Reads and converts an optional parameter, using `default` when absent.
    ///
    /// # Errors
    /// [`TspError::InvalidParameter`] if present but malformed.
    pub fn get_or<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.raw(key) {
            Some(value) => parse_value(key, value),
            None => Ok(default),
        }
    }

    /// The required `algorithm` key.
    pub fn algorithm(&self) -> Result<AlgorithmKind> {
        self.get("algorithm")
    }

    /// The `timeout_seconds` key; absent or `0` means no deadline
    /// (`Duration::ZERO`).
    pub fn timeout(&self) -> Result<Duration> {
        self.get_or("timeout_seconds", 0u64).map(Duration::from_secs)
    }

    /// The optional `seed` key.
    pub fn seed(&self) -> Result<Option<u64>> {
        self.raw("seed").map(|v| parse_value("seed", v)).transpose()
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| TspError::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Builds the solver selected by `kind`, configured from `params`.
///
/// SA uses a swap neighborhood with linear cooling; GA uses roulette
/// selection, order crossover and swap mutation with a mating pool of half
/// the population.
///
/// # Errors
/// Propagates matrix validation errors, malformed parameters and invalid
/// solver configurations.
///
/// # Examples
///
/// ```
/// use u_tsp::params::{build_algorithm, Parameters};
/// use u_tsp::DistanceMatrix;
///
/// let m = DistanceMatrix::from_rows(vec![vec![0, 1], vec![1, 0]]).unwrap();
/// let params = Parameters::new().with("algorithm", "bnb");
/// let mut solver = build_algorithm(params.algorithm().unwrap(), m, &params).unwrap();
/// assert!(solver.solve());
/// assert_eq!(solver.solution().cost, 2);
/// ```
pub fn build_algorithm(
    kind: AlgorithmKind,
    distances: impl Into<Arc<DistanceMatrix>>,
    params: &Parameters,
) -> Result<Box<dyn Algorithm + Send>> {
    let solver: Box<dyn Algorithm + Send> = match kind {
        AlgorithmKind::BruteForce => Box::new(ExhaustiveSearch::new(distances)?),
        AlgorithmKind::BranchAndBound => Box::new(BranchAndBoundDfs::new(distances)?),
        AlgorithmKind::SimulatedAnnealing => {
            let defaults = SaConfig::default();
            let mut config = SaConfig::default()
                .with_initial_temperature(
                    params.get_or("temperature", defaults.initial_temperature)?,
                )
                .with_epoch_size(params.get_or("epoch_size", defaults.epoch_size as u32)? as usize);
            config.seed = params.seed()?;
            let cooling = LinearCooling::new(
                params.get_or("cooling_coefficient", LinearCooling::default().coefficient())?,
            )?;
            Box::new(SimulatedAnnealing::new(distances, config)?.with_cooling(cooling))
        }
        AlgorithmKind::Genetic => {
            let defaults = GaConfig::default();
            let population: usize = params.get_or("population_size", defaults.population_size)?;
            let mut config = GaConfig::default()
                .with_population_size(population)
                .with_pool_size((population / 2).max(1))
                .with_crossover_probability(
                    params.get_or("crossover_probability", defaults.crossover_probability)?,
                )
                .with_mutation_probability(
                    params.get_or("mutation_probability", defaults.mutation_probability)?,
                )
                .with_max_generations(params.get_or("max_generations", defaults.max_generations)?);
            config.seed = params.seed()?;
            Box::new(GeneticAlgorithm::new(distances, config)?)
        }
    };
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0, 10, 15, 20],
            vec![10, 0, 35, 25],
            vec![15, 35, 0, 30],
            vec![20, 25, 30, 0],
        ])
        .unwrap()
    }

    #[test]
    fn test_algorithm_kind_parse() {
        assert_eq!("bf".parse::<AlgorithmKind>(), Ok(AlgorithmKind::BruteForce));
        assert_eq!(" ga ".parse::<AlgorithmKind>(), Ok(AlgorithmKind::Genetic));
        assert_eq!(
            "tabu".parse::<AlgorithmKind>(),
            Err(TspError::UnknownAlgorithm("tabu".into()))
        );
        assert_eq!(AlgorithmKind::SimulatedAnnealing.to_string(), "sa");
    }

    #[test]
    fn test_get_errors() {
        let params = Parameters::new().with("epoch_size", "many");
        assert_eq!(
            params.get::<u32>("epoch_size"),
            Err(TspError::InvalidParameter {
                key: "epoch_size".into(),
                value: "many".into()
            })
        );
        assert_eq!(
            params.get::<f64>("temperature"),
            Err(TspError::MissingParameter("temperature".into()))
        );
        assert!(params.algorithm().is_err());
    }

    #[test]
    fn test_timeout_and_seed() {
        let params = Parameters::new();
        assert_eq!(params.timeout().unwrap(), Duration::ZERO);
        assert_eq!(params.seed().unwrap(), None);

        let params = params.with("timeout_seconds", "0").with("seed", "17");
        assert_eq!(params.timeout().unwrap(), Duration::ZERO);
        assert_eq!(params.seed().unwrap(), Some(17));
        assert!(Parameters::new().with("seed", "-1").seed().is_err());
    }

    #[test]
    fn test_build_every_kind_solves_classic() {
        let params = Parameters::new()
            .with("temperature", "100")
            .with("epoch_size", "50")
            .with("cooling_coefficient", "0.9")
            .with("population_size", "20")
            .with("crossover_probability", "0.8")
            .with("mutation_probability", "0.2")
            .with("max_generations", "50")
            .with("seed", "42");
        for kind in [
            AlgorithmKind::BruteForce,
            AlgorithmKind::BranchAndBound,
            AlgorithmKind::SimulatedAnnealing,
            AlgorithmKind::Genetic,
        ] {
            let mut solver = build_algorithm(kind, classic(), &params).unwrap();
            assert_eq!(solver.name(), kind.as_str());
            assert!(solver.solve(), "{kind} did not complete");
            assert_eq!(solver.solution().cost, 80, "{kind} missed the optimum");
        }
    }

    #[test]
    fn test_build_sa_at_stopping_threshold() {
        let params = Parameters::new().with("temperature", "0.1");
        let mut sa = build_algorithm(AlgorithmKind::SimulatedAnnealing, classic(), &params).unwrap();
        assert!(sa.solve());
        assert_eq!(sa.solution().path, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_build_rejects_bad_values() {
        let params = Parameters::new().with("cooling_coefficient", "1.5");
        assert!(matches!(
            build_algorithm(AlgorithmKind::SimulatedAnnealing, classic(), &params),
            Err(TspError::InvalidConfig(_))
        ));
        let params = Parameters::new().with("population_size", "1");
        assert!(build_algorithm(AlgorithmKind::Genetic, classic(), &params).is_err());
        let rect = DistanceMatrix::new(2, 1, vec![0, 0]).unwrap();
        assert!(build_algorithm(AlgorithmKind::BranchAndBound, rect, &Parameters::new()).is_err());
    }
}
