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

//! Aggregate statistics of a complete solve, summed over all workers.

use std::time::Duration;

/// Statistics reported in a `SolverOutcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Improving schedules found by the workers (seeds excluded).
    pub solutions_found: u64,
    /// Worker threads used.
    pub used_threads: usize,
    /// Search nodes explored over all workers.
    pub nodes_explored: u64,
    /// Subproblems handed to workers by the coordinator.
    pub subproblems_solved: u64,
    /// Wall-clock time of the solve.
    pub solve_duration: Duration,
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Statistics:")?;
        writeln!(f, "  Solutions Found: {}", self.solutions_found)?;
        writeln!(f, "  Used Threads: {}", self.used_threads)?;
        writeln!(f, "  Nodes Explored: {}", self.nodes_explored)?;
        writeln!(f, "  Subproblems Solved: {}", self.subproblems_solved)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

/// Builder for `SolverStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatisticsBuilder {
    solutions_found: u64,
    used_threads: usize,
    nodes_explored: u64,
    subproblems_solved: u64,
    solve_duration: Duration,
}

impl Default for SolverStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverStatisticsBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            solutions_found: 0,
            used_threads: 1,
            nodes_explored: 0,
            subproblems_solved: 0,
            solve_duration: Duration::ZERO,
        }
    }

    #[inline]
    pub fn solutions_found(mut self, solutions_found: u64) -> Self {
        self.solutions_found = solutions_found;
        self
    }

    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.used_threads = used_threads;
        self
    }

    #[inline]
    pub fn nodes_explored(mut self, nodes_explored: u64) -> Self {
        self.nodes_explored = nodes_explored;
        self
    }

    #[inline]
    pub fn subproblems_solved(mut self, subproblems_solved: u64) -> Self {
        self.subproblems_solved = subproblems_solved;
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: Duration) -> Self {
        self.solve_duration = solve_duration;
        self
    }

    #[inline]
    pub fn build(self) -> SolverStatistics {
        SolverStatistics {
            solutions_found: self.solutions_found,
            used_threads: self.used_threads,
            nodes_explored: self.nodes_explored,
            subproblems_solved: self.subproblems_solved,
            solve_duration: self.solve_duration,
        }
    }
}
