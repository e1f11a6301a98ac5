//! Random walk, threshold accepting and simulated annealing.
//!
//! All three draw one neighbor uniformly per iteration and differ only in the
//! rule deciding whether the walk moves to it.

use crate::config::Config;
use crate::search::{SearchOutcome, Termination};
use crate::solution::Solution;
use log::{debug, info};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Decides whether the walk moves from the current score to a candidate score.
pub trait AcceptanceRule {
    fn name(&self) -> &'static str;

    fn accept(&mut self, current: f64, candidate: f64, rng: &mut dyn RngCore) -> bool;

    /// Called once per iteration after the acceptance decision.
    fn cool(&mut self) {}
}

/// Always moves.
#[derive(Debug, Clone, Default)]
pub struct RandomWalk;

impl AcceptanceRule for RandomWalk {
    fn name(&self) -> &'static str {
        "random walk"
    }

    fn accept(&mut self, _current: f64, _candidate: f64, _rng: &mut dyn RngCore) -> bool {
        true
    }
}

/// Moves unless the candidate is worse by at least the threshold, which
/// decays geometrically.
#[derive(Debug, Clone)]
pub struct ThresholdAccepting {
    threshold: f64,
    decay: f64,
}

impl ThresholdAccepting {
    pub fn new(threshold: f64, decay: f64) -> Self {
        ThresholdAccepting { threshold, decay }
    }

    pub fn from_config(config: &Config) -> Self {
        ThresholdAccepting::new(config.initial_threshold, config.threshold_decay)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl AcceptanceRule for ThresholdAccepting {
    fn name(&self) -> &'static str {
        "threshold accepting"
    }

    fn accept(&mut self, current: f64, candidate: f64, _rng: &mut dyn RngCore) -> bool {
        candidate - current < self.threshold
    }

    fn cool(&mut self) {
        self.threshold *= self.decay;
    }
}

/// Metropolis acceptance with geometric cooling.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    temperature: f64,
    cooling_rate: f64,
}

impl SimulatedAnnealing {
    const MIN_TEMPERATURE: f64 = 1e-12;

    pub fn new(temperature: f64, cooling_rate: f64) -> Self {
        SimulatedAnnealing {
            temperature,
            cooling_rate,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        SimulatedAnnealing::new(config.initial_temperature, config.cooling_rate)
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

impl AcceptanceRule for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        "simulated annealing"
    }

    fn accept(&mut self, current: f64, candidate: f64, rng: &mut dyn RngCore) -> bool {
        if candidate <= current {
            return true;
        }
        let probability = (-(candidate - current) / self.temperature.max(Self::MIN_TEMPERATURE)).exp();
        rng.gen::<f64>() < probability
    }

    fn cool(&mut self) {
        self.temperature = (self.temperature * self.cooling_rate).max(Self::MIN_TEMPERATURE);
    }
}

/// Neighborhood walk driven by an acceptance rule.
pub struct AcceptanceSearch<A: AcceptanceRule> {
    rule: A,
    config: Config,
    rng: ChaCha8Rng,
}

impl<A: AcceptanceRule> AcceptanceSearch<A> {
    pub fn new(rule: A, config: &Config) -> Self {
        AcceptanceSearch {
            rule,
            config: config.clone(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    pub fn rule(&self) -> &A {
        &self.rule
    }

    pub fn run(&mut self, initial: Solution) -> SearchOutcome {
        let termination = Termination::new(&self.config);

        let mut current_score = initial.time_score();
        let mut best_score = current_score;
        let mut best = initial.clone();
        let mut current = initial;
        let mut trace = vec![best_score];
        let mut iterations = 0;
        let mut iterations_without_improvement = 0;

        info!("{} started at time score {:.2}", self.rule.name(), current_score);

        while !termination.reached(iterations, iterations_without_improvement) {
            let mut neighbors = current.neighborhood(self.config.length_delta_bound(), true);
            if neighbors.is_empty() {
                debug!("Empty neighborhood after {} iterations", iterations);
                break;
            }

            let drawn = neighbors.swap_remove(self.rng.gen_range(0..neighbors.len()));
            let score = drawn.solution.time_score();

            if self.rule.accept(current_score, score, &mut self.rng) {
                current = drawn.solution;
                current_score = score;
            }
            self.rule.cool();
            iterations += 1;

            if current_score < best_score {
                best_score = current_score;
                best = current.clone();
                iterations_without_improvement = 0;
                info!("Iteration {}: new best time score {:.2}", iterations, best_score);
            } else {
                iterations_without_improvement += 1;
            }

            trace.push(best_score);
        }

        info!(
            "{} finished after {} iterations at time score {:.2}",
            self.rule.name(),
            iterations,
            best_score
        );

        SearchOutcome {
            best,
            best_score,
            iterations,
            trace,
            run_time: termination.elapsed(),
        }
    }
}
