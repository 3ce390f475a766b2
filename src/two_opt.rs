use rand::Rng;

use crate::distance::path_distance;
use crate::error::{Error, Result};
use crate::problem::{CitySet, Route};
use crate::solver::{Method, RouteSolver, Solution, Trace};

/// First-improvement 2-opt starting from the identity route.
/// The first city stays in place; segments `[i..=k]` with `i ≥ 1` are reversed.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoOpt {
    /// Stop once a full pass improves the tour by no more than this fraction.
    pub improvement_threshold: f64,
}

impl Default for TwoOpt {
    fn default() -> Self {
        Self {
            improvement_threshold: 0.001,
        }
    }
}

fn two_opt_swap(route: &[usize], i: usize, k: usize) -> Route {
    let mut swapped = route.to_vec();
    swapped[i..=k].reverse();
    swapped
}

impl RouteSolver for TwoOpt {
    const METHOD: Method = Method::TwoOpt;
    const MIN_CITIES: usize = 4;

    fn validate(&self) -> Result<()> {
        if self.improvement_threshold.is_nan() || self.improvement_threshold <= 0.0 {
            return Err(Error::invalid_parameter(
                "improvement_threshold",
                format!("must be > 0, got {}", self.improvement_threshold),
            ));
        }
        Ok(())
    }

    fn run<R: Rng>(&self, cities: &CitySet, _rng: &mut R) -> Result<Solution> {
        self.check(cities)?;
        let mut route = cities.identity_route();
        let mut best_distance = path_distance(cities, &route);
        let n = route.len();

        let mut trace = Trace::with_capacity(n);
        trace.push(0, route.clone(), best_distance);

        let mut improvement_factor = 1.0;
        let mut it = 0;
        while improvement_factor > self.improvement_threshold {
            it += 1;
            let distance_to_beat = best_distance;

            for swap_first in 1..n - 2 {
                for swap_last in swap_first + 1..n {
                    let candidate = two_opt_swap(&route, swap_first, swap_last);
                    let distance = path_distance(cities, &candidate);
                    if distance < best_distance {
                        route = candidate;
                        best_distance = distance;
                    }
                }
            }

            improvement_factor = 1.0 - best_distance / distance_to_beat;
            log::debug!("2-opt pass {it}: distance {best_distance:.4}, improvement {improvement_factor:.5}");
            trace.push(it, route.clone(), best_distance);
        }

        Ok(Solution::completed(trace))
    }
}
