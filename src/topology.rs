use std::f64::consts::PI;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::problem::{CitySet, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Topology {
    /// Cities evenly spaced on a circle
    Circle,
    /// Cities uniformly scattered in the unit square
    Random,
}

/// `n` cities evenly spaced on a circle around the origin.
/// The order is shuffled with a fixed seed so the identity route is not already optimal.
pub fn circle(radius: f64, n: usize) -> Result<CitySet> {
    let mut points: Vec<Point> = (0..n)
        .map(|i| {
            let angle = 2.0 * PI / n as f64 * i as f64;
            Point::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect();
    points.shuffle(&mut StdRng::seed_from_u64(n as u64));
    CitySet::new(points)
}

/// `n` cities uniform in `[0, 1]²`; the same seed always yields the same set.
pub fn random(n: usize, seed: u64) -> Result<CitySet> {
    let mut rng = StdRng::seed_from_u64(seed);
    let points = (0..n)
        .map(|_| Point::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();
    CitySet::new(points)
}
