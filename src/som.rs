use rand::Rng;

use crate::distance::path_distance;
use crate::error::{Error, Result};
use crate::problem::{CitySet, Point, Route};
use crate::solver::{DecayCause, Method, RouteSolver, Solution, Termination, Trace};

/// Learning rate below which the network no longer moves meaningfully.
const MIN_LEARNING_RATE: f64 = 0.001;

/// Elastic ring of neurons pulled toward randomly sampled cities.
#[derive(Clone, Debug, PartialEq)]
pub struct SelfOrganizingMap {
    /// Number of neurons in the ring.
    pub population_size: usize,
    pub generations: usize,
    pub learning_rate: f64,
    /// Fraction by which learning rate and neighbourhood shrink every iteration.
    pub decay: f64,
}

impl Default for SelfOrganizingMap {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 500,
            learning_rate: 0.8,
            decay: 0.0003,
        }
    }
}

impl RouteSolver for SelfOrganizingMap {
    const METHOD: Method = Method::SelfOrganizingMap;

    fn validate(&self) -> Result<()> {
        if self.population_size < 1 {
            return Err(Error::invalid_parameter("population_size", "must be at least 1"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::invalid_parameter(
                "learning_rate",
                format!("must be in (0, 1], got {}", self.learning_rate),
            ));
        }
        if !(0.0..1.0).contains(&self.decay) {
            return Err(Error::invalid_parameter(
                "decay",
                format!("must be in [0, 1), got {}", self.decay),
            ));
        }
        Ok(())
    }

    fn run<R: Rng>(&self, cities: &CitySet, rng: &mut R) -> Result<Solution> {
        self.check(cities)?;
        let normalized = normalize(cities.points());
        let mut network = generate_network(self.population_size, rng);

        let mut learning_rate = self.learning_rate;
        let mut n_effective = self.population_size as f64;

        let mut trace = Trace::with_capacity(self.generations + 1);
        let route = get_route(&normalized, &network);
        let distance = path_distance(cities, &route);
        trace.push(0, route, distance);

        for it in 1..=self.generations {
            let city = normalized[rng.gen_range(0..normalized.len())];
            let winner = select_closest(&network, &city);
            let gaussian = get_neighborhood(winner, (n_effective / 10.0).floor(), network.len());

            for (neuron, weight) in network.iter_mut().zip(gaussian) {
                let pull = learning_rate * weight;
                neuron.x += pull * (city.x - neuron.x);
                neuron.y += pull * (city.y - neuron.y);
            }

            learning_rate *= 1.0 - self.decay;
            n_effective *= 1.0 - self.decay;

            let route = get_route(&normalized, &network);
            let distance = path_distance(cities, &route);
            log::debug!("som iteration {it}: distance {distance:.4}, learning rate {learning_rate:.5}");
            trace.push(it, route, distance);

            let cause = if it == self.generations {
                None
            } else if n_effective < 1.0 {
                Some(DecayCause::Radius)
            } else if learning_rate < MIN_LEARNING_RATE {
                Some(DecayCause::LearningRate)
            } else {
                None
            };
            if let Some(cause) = cause {
                log::warn!("{cause}, finishing execution at {it} iterations");
                return Ok(Solution {
                    trace,
                    termination: Termination::Decayed {
                        iteration: it,
                        cause,
                    },
                });
            }
        }

        Ok(Solution::completed(trace))
    }
}

/// Removes the offset and scales by the larger span, keeping the aspect ratio.
fn normalize(points: &[Point]) -> Vec<Point> {
    let (min_x, max_x) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.x), hi.max(p.x))
        });
    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    let span = (max_x - min_x).max(max_y - min_y);

    points
        .iter()
        .map(|p| Point::new((p.x - min_x) / span, (p.y - min_y) / span))
        .collect()
}

fn generate_network<R: Rng>(size: usize, rng: &mut R) -> Vec<Point> {
    (0..size)
        .map(|_| Point::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect()
}

fn select_closest(candidates: &[Point], origin: &Point) -> usize {
    candidates
        .iter()
        .map(|c| c.dist(origin))
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Gaussian weights around `center` over a ring of `domain` neurons.
fn get_neighborhood(center: usize, radix: f64, domain: usize) -> Vec<f64> {
    let radix = radix.max(1.0);
    (0..domain)
        .map(|idx| {
            let delta = center.abs_diff(idx);
            let distance = delta.min(domain - delta) as f64;
            (-(distance * distance) / (2.0 * radix * radix)).exp()
        })
        .collect()
}

/// Cities ordered by the ring index of their nearest neuron.
fn get_route(cities: &[Point], network: &[Point]) -> Route {
    let winners: Vec<usize> = cities.iter().map(|c| select_closest(network, c)).collect();
    let mut route: Route = (0..cities.len()).collect();
    route.sort_by_key(|&city| winners[city]);
    route
}
