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

//! Global node budget.
//!
//! All workers of a solve share one counter, so the budget bounds the total
//! number of nodes explored across the pool rather than per worker. A worker
//! may overshoot by the few nodes the others explore between two checks.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{model::Model, solution::Schedule};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts explored nodes into a shared counter and terminates once it reaches `node_limit`.
#[derive(Debug)]
pub struct NodeLimitMonitor<'a, T> {
    nodes_explored: &'a AtomicU64,
    node_limit: u64,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> NodeLimitMonitor<'a, T> {
    #[inline]
    pub fn new(nodes_explored: &'a AtomicU64, node_limit: u64) -> Self {
        Self {
            nodes_explored,
            node_limit,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Returns the configured budget.
    #[inline]
    pub fn node_limit(&self) -> u64 {
        self.node_limit
    }
}

impl<'a, T> SearchMonitor<T> for NodeLimitMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>) {}
    fn on_exit_search(&mut self) {}
    fn on_solution_found(&mut self, _schedule: &Schedule<T>) {}
    fn on_step(&mut self) {}

    #[inline(always)]
    fn on_node_explored(&mut self) {
        self.nodes_explored.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if self.nodes_explored.load(Ordering::Relaxed) >= self.node_limit {
            SearchCommand::Terminate("node budget exhausted".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NodeLimitMonitor;
    use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_terminates_when_budget_is_reached() {
        let counter = AtomicU64::new(0);
        let mut monitor = NodeLimitMonitor::<i64>::new(&counter, 3);
        monitor.on_node_explored();
        monitor.on_node_explored();
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
        monitor.on_node_explored();
        assert_eq!(
            monitor.search_command(),
            SearchCommand::Terminate("node budget exhausted".to_string())
        );
        assert_eq!(counter.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_workers_share_one_budget() {
        let counter = AtomicU64::new(0);
        let mut a = NodeLimitMonitor::<i64>::new(&counter, 4);
        let mut b = NodeLimitMonitor::<i64>::new(&counter, 4);
        a.on_node_explored();
        b.on_node_explored();
        a.on_node_explored();
        assert_eq!(b.search_command(), SearchCommand::Continue);
        b.on_node_explored();
        assert!(matches!(a.search_command(), SearchCommand::Terminate(_)));
        assert!(matches!(b.search_command(), SearchCommand::Terminate(_)));
    }

    #[test]
    fn test_steps_alone_do_not_consume_budget() {
        let counter = AtomicU64::new(0);
        let mut monitor = NodeLimitMonitor::<i64>::new(&counter, 1);
        for _ in 0..100 {
            monitor.on_step();
        }
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }
}
