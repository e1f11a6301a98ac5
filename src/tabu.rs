//! Reactive tabu search.
//!
//! The tabu list holds fingerprints of recently visited solutions. Its length
//! reacts to cycling: revisiting a solution already in the long-term memory
//! grows the list, a long enough stretch without repetitions shrinks it.

use crate::config::{Aspiration, Config};
use crate::search::{scored_neighborhood, ScoredCandidate, SearchOutcome, Termination};
use crate::solution::{Solution, TabuKey};
use log::{debug, info};
use std::collections::{HashSet, VecDeque};

/// Short-term tabu list with adaptive length plus long-term memory.
#[derive(Debug, Clone)]
pub struct TabuMemory {
    recent: VecDeque<TabuKey>,
    seen: HashSet<TabuKey>,
    length: usize,
    min_length: usize,
    max_length: usize,
    increase_factor: f64,
    increase_step: f64,
    shrink_after: u32,
    iterations_since_repeat: u32,
}

impl TabuMemory {
    pub fn new(config: &Config) -> Self {
        let min_length = config.tabu_min_length.max(1);
        let max_length = config.tabu_max_length.max(min_length);

        TabuMemory {
            recent: VecDeque::with_capacity(max_length),
            seen: HashSet::new(),
            length: config.tabu_initial_length.clamp(min_length, max_length),
            min_length,
            max_length,
            increase_factor: config.tabu_increase_factor,
            increase_step: config.tabu_increase_step,
            shrink_after: config.tabu_shrink_after,
            iterations_since_repeat: 0,
        }
    }

    /// Current maximum number of entries in the tabu list.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn is_tabu(&self, key: &TabuKey) -> bool {
        self.recent.contains(key)
    }

    pub fn has_seen(&self, key: &TabuKey) -> bool {
        self.seen.contains(key)
    }

    /// Record a visit, adapting the list length. Returns whether the key was
    /// already in the long-term memory.
    pub fn visit(&mut self, key: TabuKey) -> bool {
        let repeated = self.seen.contains(&key);

        if repeated {
            self.grow();
            self.iterations_since_repeat = 0;
        } else {
            self.iterations_since_repeat += 1;
            if self.iterations_since_repeat >= self.shrink_after {
                self.shrink();
                self.iterations_since_repeat = 0;
            }
        }

        self.recent.push_back(key.clone());
        while self.recent.len() > self.length {
            self.recent.pop_front();
        }
        self.seen.insert(key);

        repeated
    }

    fn grow(&mut self) {
        let length = self.length as f64;
        let grown = (length * self.increase_factor).max(length + self.increase_step).ceil();
        self.length = (grown as usize).min(self.max_length);
        debug!("Tabu list grows to {}", self.length);
    }

    fn shrink(&mut self) {
        let length = self.length as f64;
        let shrunk = (length / self.increase_factor)
            .min(length - self.increase_step)
            .floor()
            .max(self.min_length as f64);
        self.length = shrunk as usize;
        debug!("Tabu list shrinks to {}", self.length);
    }
}

/// Reactive tabu search driver.
pub struct ReactiveTabuSearch {
    config: Config,
}

impl ReactiveTabuSearch {
    pub fn new(config: &Config) -> Self {
        ReactiveTabuSearch {
            config: config.clone(),
        }
    }

    pub fn run(&self, initial: Solution) -> SearchOutcome {
        let termination = Termination::new(&self.config);
        let mut memory = TabuMemory::new(&self.config);
        memory.visit(initial.tabu_key());

        let mut best_score = initial.time_score();
        let mut best = initial.clone();
        let mut current = initial;
        let mut trace = vec![best_score];
        let mut iterations = 0;
        let mut iterations_without_improvement = 0;

        info!("Reactive tabu search started at time score {:.2}", best_score);

        while !termination.reached(iterations, iterations_without_improvement) {
            let Some((selected, key)) = self.select(&current, &memory, best_score) else {
                debug!("Empty neighborhood after {} iterations", iterations);
                break;
            };

            if memory.visit(key) {
                debug!("Iteration {}: revisited a solution", iterations);
            }

            current = selected.candidate.solution;
            iterations += 1;

            if selected.score < best_score {
                best_score = selected.score;
                best = current.clone();
                iterations_without_improvement = 0;
                info!("Iteration {}: new best time score {:.2}", iterations, best_score);
            } else {
                iterations_without_improvement += 1;
            }

            trace.push(best_score);
        }

        info!(
            "Reactive tabu search finished after {} iterations at time score {:.2}",
            iterations, best_score
        );

        SearchOutcome {
            best,
            best_score,
            iterations,
            trace,
            run_time: termination.elapsed(),
        }
    }

    /// Best non-tabu neighbor, falling back to the best tabu one.
    fn select(
        &self,
        current: &Solution,
        memory: &TabuMemory,
        best_score: f64,
    ) -> Option<(ScoredCandidate, TabuKey)> {
        let mut best_free: Option<(ScoredCandidate, TabuKey)> = None;
        let mut best_tabu: Option<(ScoredCandidate, TabuKey)> = None;

        for neighbor in scored_neighborhood(current, self.config.length_delta_bound()) {
            let key = neighbor.candidate.solution.tabu_key();
            let slot = if memory.is_tabu(&key) {
                &mut best_tabu
            } else {
                &mut best_free
            };

            if slot.as_ref().map_or(true, |(kept, _)| neighbor.score < kept.score) {
                *slot = Some((neighbor, key));
            }
        }

        match (best_free, best_tabu) {
            (Some(free), Some(tabu))
                if self.config.aspiration == Aspiration::ImprovesBest
                    && tabu.0.score < best_score
                    && tabu.0.score < free.0.score =>
            {
                Some(tabu)
            }
            (Some(free), _) => Some(free),
            (None, tabu) => tabu,
        }
    }
}
