use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::genetic::GeneticAlgorithm;
use crate::problem::{CitySet, Point, Route};
use crate::som::SelfOrganizingMap;
use crate::two_opt::TwoOpt;

/// A route search strategy over a fixed city set.
pub trait RouteSolver {
    const METHOD: Method;

    /// Smallest city set the strategy can work on.
    const MIN_CITIES: usize = CitySet::MIN_CITIES;

    fn validate(&self) -> Result<()>;

    /// Parameter validation plus the city count check; every `run` starts with it.
    fn check(&self, cities: &CitySet) -> Result<()> {
        if cities.len() < Self::MIN_CITIES {
            return Err(Error::degenerate(format!(
                "{} needs at least {} cities, got {}",
                Self::METHOD,
                Self::MIN_CITIES,
                cities.len()
            )));
        }
        self.validate()
    }

    fn run<R: Rng>(&self, cities: &CitySet, rng: &mut R) -> Result<Solution>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    TwoOpt,
    GeneticAlgorithm,
    SelfOrganizingMap,
}

impl Method {
    pub fn id(self) -> u8 {
        match self {
            Self::TwoOpt => 0,
            Self::GeneticAlgorithm => 1,
            Self::SelfOrganizingMap => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TwoOpt => "2-opt",
            Self::GeneticAlgorithm => "Genetic Algorithm",
            Self::SelfOrganizingMap => "Self-Organizing Maps",
        }
    }
}

impl TryFrom<u8> for Method {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Self::TwoOpt),
            1 => Ok(Self::GeneticAlgorithm),
            2 => Ok(Self::SelfOrganizingMap),
            other => Err(Error::UnsupportedMethod(other)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-method configuration; each variant carries only its own fields.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverConfig {
    TwoOpt(TwoOpt),
    GeneticAlgorithm(GeneticAlgorithm),
    SelfOrganizingMap(SelfOrganizingMap),
}

impl SolverConfig {
    pub fn method(&self) -> Method {
        match self {
            Self::TwoOpt(_) => Method::TwoOpt,
            Self::GeneticAlgorithm(_) => Method::GeneticAlgorithm,
            Self::SelfOrganizingMap(_) => Method::SelfOrganizingMap,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::TwoOpt(cfg) => cfg.validate(),
            Self::GeneticAlgorithm(cfg) => cfg.validate(),
            Self::SelfOrganizingMap(cfg) => cfg.validate(),
        }
    }
}

/// Parallel per-iteration snapshots of a solve, starting with the initial configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trace {
    pub iterations: Vec<usize>,
    pub routes: Vec<Route>,
    pub distances: Vec<f64>,
}

impl Trace {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            iterations: Vec::with_capacity(capacity),
            routes: Vec::with_capacity(capacity),
            distances: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, iteration: usize, route: Route, distance: f64) {
        self.iterations.push(iteration);
        self.routes.push(route);
        self.distances.push(distance);
    }

    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    pub fn last_iteration(&self) -> Option<usize> {
        self.iterations.last().copied()
    }

    pub fn final_distance(&self) -> Option<f64> {
        self.distances.last().copied()
    }

    /// Index and distance of the shortest recorded route.
    pub fn best(&self) -> Option<(usize, f64)> {
        self.distances
            .iter()
            .copied()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Routes as closed point sequences (first point repeated at the end), one per entry.
    pub fn frames(&self, cities: &CitySet) -> Vec<Vec<Point>> {
        self.routes
            .iter()
            .map(|route| {
                route
                    .iter()
                    .chain(route.first())
                    .map(|&idx| cities.get(idx))
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecayCause {
    Radius,
    LearningRate,
}

impl fmt::Display for DecayCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radius => f.write_str("radius has completely decayed"),
            Self::LearningRate => f.write_str("learning rate has completely decayed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    Completed,
    /// Stopped early at `iteration`; the trace holds everything computed up to it.
    Decayed { iteration: usize, cause: DecayCause },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub trace: Trace,
    pub termination: Termination,
}

impl Solution {
    pub fn completed(trace: Trace) -> Self {
        Self {
            trace,
            termination: Termination::Completed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.termination == Termination::Completed
    }
}

/// Runs the configured strategy on `cities`, drawing all randomness from `rng`.
pub fn solve<R: Rng>(cities: &CitySet, config: &SolverConfig, rng: &mut R) -> Result<Solution> {
    let method = config.method();
    log::info!("solving {} cities with {method}", cities.len());

    let solution = match config {
        SolverConfig::TwoOpt(cfg) => cfg.run(cities, rng),
        SolverConfig::GeneticAlgorithm(cfg) => cfg.run(cities, rng),
        SolverConfig::SelfOrganizingMap(cfg) => cfg.run(cities, rng),
    }?;

    if let Some((idx, best)) = solution.trace.best() {
        log::info!(
            "{method}: {} entries, best distance {best:.4} at iteration {}",
            solution.trace.len(),
            solution.trace.iterations[idx]
        );
    }
    Ok(solution)
}

pub fn solve_seeded(cities: &CitySet, config: &SolverConfig, seed: u64) -> Result<Solution> {
    let mut rng = StdRng::seed_from_u64(seed);
    solve(cities, config, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::path_distance;
    use crate::problem::is_permutation;
    use crate::topology;
    use std::f64::consts::PI;

    fn pentagon_optimum() -> f64 {
        5.0 * 2.0 * (PI / 5.0).sin()
    }

    fn all_configs() -> Vec<SolverConfig> {
        vec![
            SolverConfig::TwoOpt(TwoOpt::default()),
            SolverConfig::GeneticAlgorithm(GeneticAlgorithm {
                population_size: 20,
                elite_size: 5,
                mutation_rate: 0.01,
                generations: 200,
            }),
            SolverConfig::SelfOrganizingMap(SelfOrganizingMap {
                population_size: 40,
                generations: 300,
                learning_rate: 0.8,
                decay: 0.0003,
            }),
        ]
    }

    #[test]
    fn test_unsupported_method() {
        assert_eq!(Method::try_from(1).unwrap(), Method::GeneticAlgorithm);
        let err = Method::try_from(3).unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod(3)));
    }

    #[test]
    fn test_every_trace_is_consistent() {
        let cities = topology::random(12, 3).unwrap();
        for config in all_configs() {
            let solution = solve_seeded(&cities, &config, 11).unwrap();
            let trace = &solution.trace;
            assert!(!trace.is_empty());
            assert_eq!(trace.iterations.len(), trace.routes.len());
            assert_eq!(trace.routes.len(), trace.distances.len());
            assert_eq!(trace.iterations[0], 0);
            for (route, &distance) in trace.routes.iter().zip(&trace.distances) {
                assert!(is_permutation(route, cities.len()), "{config:?}");
                assert!((path_distance(&cities, route) - distance).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_pentagon_lower_bound() {
        let cities = topology::circle(1.0, 5).unwrap();
        let optimum = pentagon_optimum();
        for config in all_configs() {
            let solution = solve_seeded(&cities, &config, 5).unwrap();
            for &d in &solution.trace.distances {
                assert!(d >= optimum - 1e-9, "{} below optimum {optimum}", d);
            }
        }
    }

    #[test]
    fn test_genetic_finds_pentagon_optimum() {
        let cities = topology::circle(1.0, 5).unwrap();
        let configs = all_configs();
        let solution = solve_seeded(&cities, &configs[1], 21).unwrap();
        let (_, best) = solution.trace.best().unwrap();
        assert!((best - pentagon_optimum()).abs() < 1e-9);
    }

    #[test]
    fn test_two_opt_rejects_triangle() {
        let cities = topology::circle(1.0, 3).unwrap();
        let err = solve_seeded(&cities, &SolverConfig::TwoOpt(TwoOpt::default()), 0).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(_)));
    }

    #[test]
    fn test_invalid_config_fails_before_solving() {
        let cities = topology::random(6, 1).unwrap();
        let config = SolverConfig::GeneticAlgorithm(GeneticAlgorithm {
            population_size: 4,
            elite_size: 5,
            ..GeneticAlgorithm::default()
        });
        let err = solve_seeded(&cities, &config, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "elite_size", .. }));
    }

    #[test]
    fn test_frames_are_closed() {
        let cities = topology::random(8, 2).unwrap();
        let solution = solve_seeded(&cities, &SolverConfig::TwoOpt(TwoOpt::default()), 0).unwrap();
        let frames = solution.trace.frames(&cities);
        assert_eq!(frames.len(), solution.trace.len());
        for (frame, route) in frames.iter().zip(&solution.trace.routes) {
            assert_eq!(frame.len(), cities.len() + 1);
            assert_eq!(frame[0], frame[cities.len()]);
            assert_eq!(frame[0], cities.get(route[0]));
        }
    }
}
