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

//! Solver configuration.
//!
//! `SolverConfig` is the immutable set of limits and parallelism knobs a
//! `Solver` runs with. It is assembled through `SolverBuilder`; every limit is
//! optional and an unset limit never stops the search.

use std::time::Duration;

/// How the coordinator hands subtrees to workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Expand the tree breadth-first up to the cutoff depth and deal the
    /// frontier round-robin before any worker starts.
    Static,
    /// Share a bounded queue of subproblems. Workers expand nodes above the
    /// cutoff and solve nodes at the cutoff to exhaustion.
    #[default]
    Dynamic,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Static => write!(f, "Static"),
            Strategy::Dynamic => write!(f, "Dynamic"),
        }
    }
}

/// Limits and parallelism of one solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub(crate) node_budget: Option<u64>,
    pub(crate) time_budget: Option<Duration>,
    pub(crate) solution_limit: Option<u64>,
    pub(crate) worker_count: usize,
    pub(crate) parallel_depth_cutoff: usize,
    pub(crate) strategy: Strategy,
    pub(crate) queue_capacity: usize,
}

impl SolverConfig {
    pub const DEFAULT_PARALLEL_DEPTH_CUTOFF: usize = 2;
    pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

    /// Total nodes all workers together may explore.
    #[inline]
    pub fn node_budget(&self) -> Option<u64> {
        self.node_budget
    }

    /// Wall-clock budget, measured from the start of `Solver::solve`.
    #[inline]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    /// Number of improving schedules after which the search stops.
    #[inline]
    pub fn solution_limit(&self) -> Option<u64> {
        self.solution_limit
    }

    /// Number of worker threads. Always at least one.
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Depth down to which the coordinator splits the tree.
    #[inline]
    pub fn parallel_depth_cutoff(&self) -> usize {
        self.parallel_depth_cutoff
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Capacity of the shared queue of the dynamic strategy. Always at least one.
    #[inline]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            node_budget: None,
            time_budget: None,
            solution_limit: None,
            worker_count: std::thread::available_parallelism().map_or(1, |n| n.get()),
            parallel_depth_cutoff: Self::DEFAULT_PARALLEL_DEPTH_CUTOFF,
            strategy: Strategy::default(),
            queue_capacity: Self::DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl std::fmt::Display for SolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn opt<V: std::fmt::Debug>(v: &Option<V>) -> String {
            v.as_ref().map_or_else(|| "none".to_string(), |v| format!("{:?}", v))
        }
        write!(
            f,
            "SolverConfig(strategy: {}, workers: {}, cutoff: {}, queue: {}, node_budget: {}, time_budget: {}, solution_limit: {})",
            self.strategy,
            self.worker_count,
            self.parallel_depth_cutoff,
            self.queue_capacity,
            opt(&self.node_budget),
            opt(&self.time_budget),
            opt(&self.solution_limit),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_limits() {
        let config = SolverConfig::default();
        assert!(config.node_budget().is_none());
        assert!(config.time_budget().is_none());
        assert!(config.solution_limit().is_none());
        assert!(config.worker_count() >= 1);
        assert_eq!(config.strategy(), Strategy::Dynamic);
        assert_eq!(config.parallel_depth_cutoff(), 2);
    }

    #[test]
    fn test_display() {
        let config = SolverConfig {
            worker_count: 4,
            node_budget: Some(10),
            ..SolverConfig::default()
        };
        assert_eq!(
            config.to_string(),
            "SolverConfig(strategy: Dynamic, workers: 4, cutoff: 2, queue: 1024, node_budget: 10, time_budget: none, solution_limit: none)"
        );
    }
}
