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

use std::time::Duration;

/// Statistics collected during one run of the branch-and-bound engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BnbSolverStatistics {
    /// Total nodes entered, including the root.
    pub nodes_explored: u64,
    /// Total returns from a node to its parent.
    pub backtracks: u64,
    /// Total children taken from the decision stack.
    pub decisions_generated: u64,
    /// The deepest level reached in the tree.
    pub max_depth: u64,
    /// Nodes cut because their bound reached the incumbent. Includes leaves
    /// whose makespan did not improve on it.
    pub prunings_bound: u64,
    /// Improving complete schedules found by this run.
    pub solutions_found: u64,
    /// Total time spent in the engine.
    pub time_total: Duration,
    /// The bound at the starting node. Used to report the optimality gap.
    pub root_lower_bound: i64,
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_decision_generated(&mut self) {
        self.decisions_generated = self.decisions_generated.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn set_root_lower_bound(&mut self, bound: i64) {
        self.root_lower_bound = bound;
    }

    /// Accumulates the counters of another run into `self`.
    ///
    /// Counters and time add up and depth takes the maximum. The root bound
    /// keeps the smallest value among runs that explored anything.
    pub fn merge(&mut self, other: &BnbSolverStatistics) {
        if other.nodes_explored > 0 {
            self.root_lower_bound = if self.nodes_explored == 0 {
                other.root_lower_bound
            } else {
                self.root_lower_bound.min(other.root_lower_bound)
            };
        }
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.backtracks = self.backtracks.saturating_add(other.backtracks);
        self.decisions_generated = self
            .decisions_generated
            .saturating_add(other.decisions_generated);
        self.max_depth = self.max_depth.max(other.max_depth);
        self.prunings_bound = self.prunings_bound.saturating_add(other.prunings_bound);
        self.solutions_found = self.solutions_found.saturating_add(other.solutions_found);
        self.time_total = self.time_total.saturating_add(other.time_total);
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Shopfloor-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Decisions generated:  {}", self.decisions_generated)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Root Lower Bound:     {}", self.root_lower_bound)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
