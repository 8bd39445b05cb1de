// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Progress logging through `tracing`.
//!
//! Emits one record per `log_interval` with elapsed time, nodes, depth, best
//! makespan, backtracks and prunings, at `info` unless configured otherwise.
//! The clock is only read when the node count matches `clock_check_mask`.
//! New incumbents are logged at `debug`.
//!
//! A monitor built `with_start` lives across many searches, typically one per
//! subproblem of a worker. It keeps its clock, node count and best makespan
//! between searches and reports the per-search summaries at `trace`.

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{model::Model, solution::Schedule};
use std::time::{Duration, Instant};
use tracing::{Level, debug};

/// Emits a `tracing` event at a level chosen at runtime.
macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            Level::ERROR => tracing::error!($($arg)+),
            Level::WARN => tracing::warn!($($arg)+),
            Level::INFO => tracing::info!($($arg)+),
            Level::DEBUG => tracing::debug!($($arg)+),
            _ => tracing::trace!($($arg)+),
        }
    };
}

#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    level: Level,
    shared_clock: bool,
    nodes: u64,
    best_makespan: Option<T>,
}

impl<T> LogTreeSearchMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            level: Level::INFO,
            shared_clock: false,
            nodes: 0,
            best_makespan: None,
        }
    }

    /// Emits the progress records at `level`.
    #[inline]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Measures elapsed time from `start_time` and keeps the monitor's state
    /// across searches.
    #[inline]
    pub fn with_start(mut self, start_time: Instant) -> Self {
        self.start_time = start_time;
        self.last_log_time = Instant::now();
        self.shared_clock = true;
        self
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the best makespan seen by this monitor.
    #[inline]
    pub fn best_makespan(&self) -> Option<T> {
        self.best_makespan
    }

    /// Returns the number of nodes entered while this monitor was attached.
    #[inline]
    pub fn nodes_seen(&self) -> u64 {
        self.nodes
    }

    fn best_str(&self) -> String {
        match self.best_makespan {
            Some(m) => m.to_string(),
            None => "inf".to_string(),
        }
    }

    fn summary_level(&self) -> Level {
        if self.shared_clock {
            Level::TRACE
        } else {
            self.level
        }
    }

    fn log_line(&mut self, state: &SearchState<T>, stats: &BnbSolverStatistics) {
        let now = Instant::now();
        event_at!(
            self.level,
            elapsed = %format!("{:.1}s", now.duration_since(self.start_time).as_secs_f32()),
            nodes = self.nodes,
            depth = state.num_scheduled(),
            best = %self.best_str(),
            backtracks = stats.backtracks,
            pruned = stats.prunings_bound,
            "search progress"
        );
        self.last_log_time = now;
    }
}

impl<T> Default for LogTreeSearchMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogTreeSearchMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogTreeSearchMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, model: &Model<T>, _stats: &BnbSolverStatistics) {
        if !self.shared_clock {
            self.start_time = Instant::now();
            self.last_log_time = self.start_time;
            self.nodes = 0;
            self.best_makespan = None;
        }
        event_at!(
            self.summary_level(),
            jobs = model.num_jobs(),
            machines = model.num_machines(),
            operations = model.num_operations(),
            "search started"
        );
    }

    fn on_exit_search(&mut self, stats: &BnbSolverStatistics) {
        event_at!(
            self.summary_level(),
            nodes = stats.nodes_explored,
            solutions = stats.solutions_found,
            best = %self.best_str(),
            elapsed = ?stats.time_total,
            "search finished"
        );
    }

    fn on_step(&mut self, _state: &SearchState<T>, _stats: &BnbSolverStatistics) {}

    fn on_lower_bound_computed(
        &mut self,
        _state: &SearchState<T>,
        _lower_bound: T,
        _stats: &BnbSolverStatistics,
    ) {
    }

    fn on_prune(
        &mut self,
        _state: &SearchState<T>,
        _reason: PruneReason,
        _stats: &BnbSolverStatistics,
    ) {
    }

    fn on_decisions_enqueued(
        &mut self,
        _state: &SearchState<T>,
        _count: usize,
        _stats: &BnbSolverStatistics,
    ) {
    }

    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        _decision: Decision<T>,
        stats: &BnbSolverStatistics,
    ) {
        self.nodes = self.nodes.wrapping_add(1);
        if (self.nodes & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(state, stats);
        }
    }

    fn on_backtrack(&mut self, _state: &SearchState<T>, _stats: &BnbSolverStatistics) {}

    fn on_solution_found(&mut self, schedule: &Schedule<T>, stats: &BnbSolverStatistics) {
        self.best_makespan = Some(schedule.makespan());
        debug!(
            makespan = %schedule.makespan(),
            nodes = stats.nodes_explored,
            "new incumbent"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_best_makespan() {
        let mut monitor = LogTreeSearchMonitor::<i64>::default();
        assert_eq!(monitor.best_makespan(), None);
        monitor.on_solution_found(&Schedule::new(12, vec![0]), &BnbSolverStatistics::default());
        monitor.on_solution_found(&Schedule::new(9, vec![0]), &BnbSolverStatistics::default());
        assert_eq!(monitor.best_makespan(), Some(9));
        assert_eq!(
            monitor.to_string(),
            "LogTreeSearchMonitor(log_interval: 1s, clock_check_mask: 4095)"
        );
    }

    #[test]
    fn test_shared_clock_keeps_state_between_searches() {
        let mut b = shopfloor_model::model::ModelBuilder::<i64>::new(1, 1);
        b.add_operation(
            shopfloor_model::index::JobIndex::new(0),
            shopfloor_model::index::MachineIndex::new(0),
            7,
        );
        let model = b.build().unwrap();
        let state = SearchState::new(&model);
        let stats = BnbSolverStatistics::default();
        let decision =
            Decision::for_job(&model, &state, shopfloor_model::index::JobIndex::new(0)).unwrap();

        let mut monitor = LogTreeSearchMonitor::<i64>::default()
            .with_level(Level::DEBUG)
            .with_start(Instant::now());
        assert_eq!(monitor.level(), Level::DEBUG);

        monitor.on_enter_search(&model, &stats);
        monitor.on_descend(&state, decision, &stats);
        monitor.on_solution_found(&Schedule::new(7, vec![0]), &stats);
        monitor.on_exit_search(&stats);

        monitor.on_enter_search(&model, &stats);
        monitor.on_descend(&state, decision, &stats);
        assert_eq!(monitor.nodes_seen(), 2);
        assert_eq!(monitor.best_makespan(), Some(7));

        let mut standalone = LogTreeSearchMonitor::<i64>::default();
        standalone.on_enter_search(&model, &stats);
        standalone.on_descend(&state, decision, &stats);
        standalone.on_enter_search(&model, &stats);
        assert_eq!(standalone.nodes_seen(), 0);
    }
}
