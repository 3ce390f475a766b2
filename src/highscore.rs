use std::collections::BTreeMap;
use std::fs;
use std::hash::Hasher;
use std::io::ErrorKind;
use std::path::Path;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::problem::CitySet;
use crate::solver::Solution;

/// Stable key of a city set, derived from the exact coordinate bits in order.
pub fn topology_key(cities: &CitySet) -> String {
    let mut hasher = FxHasher::default();
    hasher.write_usize(cities.len());
    for p in cities.points() {
        hasher.write_u64(p.x.to_bits());
        hasher.write_u64(p.y.to_bits());
    }
    format!("{:016x}", hasher.finish())
}

/// Shortest distance ever recorded per topology.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighscoreStore {
    scores: BTreeMap<String, f64>,
}

impl HighscoreStore {
    /// Loads a store from `path`; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.scores.get(key).copied()
    }

    /// Records `distance` for `key` and returns the best score known afterwards.
    pub fn record(&mut self, key: &str, distance: f64) -> f64 {
        match self.scores.get(key) {
            Some(&best) if best <= distance => best,
            _ => {
                log::info!("new highscore {distance:.4} for topology {key}");
                self.scores.insert(key.to_owned(), distance);
                distance
            }
        }
    }

    /// Records the shortest distance anywhere in `solution`'s trace for the
    /// topology of `cities`. `None` when the trace is empty.
    pub fn record_solution(&mut self, cities: &CitySet, solution: &Solution) -> Option<f64> {
        let (_, distance) = solution.trace.best()?;
        Some(self.record(&topology_key(cities), distance))
    }
}
