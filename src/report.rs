use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::problem::{CitySet, Point};
use crate::solver::{Method, Solution, Termination};

/// Plot-ready view of a solve: animation frames plus the convergence series.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub method: &'static str,
    pub termination: Termination,
    pub max_iteration: usize,
    pub calculated_distance: f64,
    pub topology_highscore: Option<f64>,
    pub iterations: Vec<usize>,
    pub distances: Vec<f64>,
    /// Closed point sequence per iteration.
    pub frames: Vec<Vec<Point>>,
}

impl Report {
    pub fn new(method: Method, cities: &CitySet, solution: &Solution) -> Self {
        let trace = &solution.trace;
        Self {
            method: method.name(),
            termination: solution.termination,
            max_iteration: trace.last_iteration().unwrap_or_default(),
            calculated_distance: trace.final_distance().unwrap_or_default(),
            topology_highscore: None,
            iterations: trace.iterations.clone(),
            distances: trace.distances.clone(),
            frames: trace.frames(cities),
        }
    }

    pub fn with_highscore(mut self, highscore: f64) -> Self {
        self.topology_highscore = Some(highscore);
        self
    }

    /// Pretty JSON to `path`, or stdout when no path is given.
    pub fn write(&self, path: Option<&Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        match path {
            Some(path) => fs::write(path, json)?,
            None => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{json}")?;
            }
        }
        Ok(())
    }
}
