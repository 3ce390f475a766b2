//! Traveling salesman route exploration with three heuristics (2-opt,
//! a genetic algorithm and a self-organizing map), each producing a
//! per-iteration trace of routes and distances.

pub mod config;
pub mod distance;
mod error;
pub mod genetic;
pub mod highscore;
pub mod logging;
pub mod problem;
pub mod report;
pub mod solver;
pub mod som;
pub mod topology;
pub mod two_opt;

pub use error::{Error, Result};
pub use problem::{CitySet, Point, Route};
pub use solver::{solve, solve_seeded, Method, Solution, SolverConfig, Termination, Trace};
