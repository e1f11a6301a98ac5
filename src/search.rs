//! Plumbing shared by the improvement drivers.

use crate::config::Config;
use crate::neighborhood::Candidate;
use crate::solution::Solution;
use std::time::{Duration, Instant};

/// Result of an improvement run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Solution,
    pub best_score: f64,
    pub iterations: u32,
    /// Best time score after every iteration, starting with the initial one
    pub trace: Vec<f64>,
    pub run_time: Duration,
}

/// A neighbor together with its time score.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub score: f64,
    pub candidate: Candidate,
}

/// Full neighborhood of a solution with charging stops re-planned and every
/// candidate scored.
pub fn scored_neighborhood(solution: &Solution, maximum_length_delta: f64) -> Vec<ScoredCandidate> {
    solution
        .neighborhood(maximum_length_delta, true)
        .into_iter()
        .map(|candidate| ScoredCandidate {
            score: candidate.solution.time_score(),
            candidate,
        })
        .collect()
}

/// Iteration, stagnation and wall-clock limits of a run.
#[derive(Debug, Clone)]
pub(crate) struct Termination {
    max_iterations: u32,
    max_iterations_without_improvement: u32,
    time_limit: Option<Duration>,
    start: Instant,
}

impl Termination {
    pub(crate) fn new(config: &Config) -> Self {
        Termination {
            max_iterations: config.max_iterations,
            max_iterations_without_improvement: config.max_iterations_without_improvement,
            time_limit: config.time_limit,
            start: Instant::now(),
        }
    }

    pub(crate) fn reached(&self, iterations: u32, iterations_without_improvement: u32) -> bool {
        if iterations >= self.max_iterations {
            return true;
        }

        if iterations_without_improvement >= self.max_iterations_without_improvement {
            return true;
        }

        if let Some(time_limit) = self.time_limit {
            if self.start.elapsed() >= time_limit {
                return true;
            }
        }

        false
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
