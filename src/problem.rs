use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distance::ordered_distance;
use crate::error::{Error, Result};

/// Visiting order of a closed tour, a permutation of `0..n`.
pub type Route = Vec<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dist(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Ordered, validated set of cities. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CitySet {
    points: Vec<Point>,
}

impl CitySet {
    pub const MIN_CITIES: usize = 3;

    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < Self::MIN_CITIES {
            return Err(Error::degenerate(format!(
                "at least {} cities are required, got {}",
                Self::MIN_CITIES,
                points.len()
            )));
        }
        if let Some(idx) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(Error::degenerate(format!(
                "city {idx} has a non-finite coordinate"
            )));
        }
        let first = points[0];
        if points.iter().all(|p| *p == first) {
            return Err(Error::degenerate("all cities are coincident"));
        }
        if !ordered_distance(&points).is_finite() {
            return Err(Error::degenerate("tour length overflows, coordinates are too far apart"));
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, idx: usize) -> Point {
        self.points[idx]
    }

    pub fn identity_route(&self) -> Route {
        (0..self.len()).collect()
    }

    pub fn random_route<R: Rng>(&self, rng: &mut R) -> Route {
        let mut route = self.identity_route();
        route.shuffle(rng);
        route
    }
}

/// `true` iff `route` visits every city of an `n`-city set exactly once.
pub fn is_permutation(route: &[usize], n: usize) -> bool {
    if route.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &city in route {
        if city >= n || seen[city] {
            return false;
        }
        seen[city] = true;
    }
    true
}
