use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::genetic::GeneticAlgorithm;
use crate::solver::{Method, SolverConfig};
use crate::som::SelfOrganizingMap;
use crate::two_opt::TwoOpt;

/// Flat, method-indexed parameter record. Only the fields of the selected
/// method are read when building a [`SolverConfig`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// 0 = 2-opt, 1 = genetic algorithm, 2 = self-organizing map.
    pub method: u8,
    pub improvement_threshold: f64,
    /// Falls back to the method's own default (10 for GA, 100 for SOM).
    pub pop_size: Option<usize>,
    pub elite_size: usize,
    pub mutation_rate: f64,
    pub generations: usize,
    pub learning_rate: f64,
    pub decay: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        let two_opt = TwoOpt::default();
        let ga = GeneticAlgorithm::default();
        let som = SelfOrganizingMap::default();
        Self {
            method: Method::TwoOpt.id(),
            improvement_threshold: two_opt.improvement_threshold,
            pop_size: None,
            elite_size: ga.elite_size,
            mutation_rate: ga.mutation_rate,
            generations: ga.generations,
            learning_rate: som.learning_rate,
            decay: som.decay,
        }
    }
}

impl Parameters {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Picks the fields relevant to `method` and validates them.
    pub fn into_config(self) -> Result<SolverConfig> {
        let method = Method::try_from(self.method)?;
        let config = match method {
            Method::TwoOpt => SolverConfig::TwoOpt(TwoOpt {
                improvement_threshold: self.improvement_threshold,
            }),
            Method::GeneticAlgorithm => SolverConfig::GeneticAlgorithm(GeneticAlgorithm {
                population_size: self
                    .pop_size
                    .unwrap_or(GeneticAlgorithm::default().population_size),
                elite_size: self.elite_size,
                mutation_rate: self.mutation_rate,
                generations: self.generations,
            }),
            Method::SelfOrganizingMap => SolverConfig::SelfOrganizingMap(SelfOrganizingMap {
                population_size: self
                    .pop_size
                    .unwrap_or(SelfOrganizingMap::default().population_size),
                generations: self.generations,
                learning_rate: self.learning_rate,
                decay: self.decay,
            }),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults_select_two_opt() {
        let config = Parameters::default().into_config().unwrap();
        assert_eq!(config, SolverConfig::TwoOpt(TwoOpt::default()));
    }

    #[test]
    fn test_population_default_depends_on_method() {
        let ga = Parameters {
            method: 1,
            ..Parameters::default()
        };
        let som = Parameters {
            method: 2,
            ..Parameters::default()
        };
        match ga.into_config().unwrap() {
            SolverConfig::GeneticAlgorithm(cfg) => assert_eq!(cfg.population_size, 10),
            other => panic!("unexpected config {other:?}"),
        }
        match som.into_config().unwrap() {
            SolverConfig::SelfOrganizingMap(cfg) => assert_eq!(cfg.population_size, 100),
            other => panic!("unexpected config {other:?}"),
        }
    }

    #[test]
    fn test_unused_fields_are_not_validated() {
        let params = Parameters {
            method: 0,
            elite_size: 1_000,
            decay: 7.0,
            ..Parameters::default()
        };
        assert!(params.into_config().is_ok());
    }

    #[test]
    fn test_unsupported_method() {
        let params = Parameters {
            method: 9,
            ..Parameters::default()
        };
        assert!(matches!(params.into_config(), Err(Error::UnsupportedMethod(9))));
    }

    #[test]
    fn test_out_of_range_field() {
        let params = Parameters {
            method: 1,
            mutation_rate: 1.5,
            ..Parameters::default()
        };
        assert!(matches!(
            params.into_config(),
            Err(Error::InvalidParameter { name: "mutation_rate", .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: Parameters =
            serde_json::from_str(r#"{ "method": 2, "pop_size": 40, "decay": 0.0 }"#).unwrap();
        assert_eq!(params.generations, 500);
        assert_eq!(params.learning_rate, 0.8);
        match params.into_config().unwrap() {
            SolverConfig::SelfOrganizingMap(cfg) => {
                assert_eq!(cfg.population_size, 40);
                assert_eq!(cfg.decay, 0.0);
            }
            other => panic!("unexpected config {other:?}"),
        }
    }
}
