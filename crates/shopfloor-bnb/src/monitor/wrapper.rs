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

//! Adapter for worker-level search monitors
//!
//! `WrapperMonitor` lets the engine drive a `SearchMonitor` from
//! `shopfloor_search`. It forwards the lifecycle, steps, solutions and the
//! stop command, and maps every entered child (`on_descend`) to
//! `on_node_explored`, which is what node budgets count. Prune, bound and
//! enqueue events have no counterpart and are dropped.

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{model::Model, solution::Schedule};
use shopfloor_search::monitor::search_monitor::{SearchCommand, SearchMonitor};

/// A tree search monitor that drives a general search monitor.
pub struct WrapperMonitor<'a, T> {
    inner: &'a mut dyn SearchMonitor<T>,
    name: String,
}

impl<'a, T> WrapperMonitor<'a, T> {
    #[inline(always)]
    pub fn new(inner: &'a mut dyn SearchMonitor<T>) -> Self
    where
        T: PrimInt + Signed,
    {
        let name = format!("WrapperMonitor({})", inner.name());
        Self { inner, name }
    }
}

impl<'a, T> TreeSearchMonitor<T> for WrapperMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    #[inline(always)]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    fn on_enter_search(&mut self, model: &Model<T>, _statistics: &BnbSolverStatistics) {
        self.inner.on_enter_search(model);
    }

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {
        self.inner.on_exit_search();
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        self.inner.search_command()
    }

    #[inline(always)]
    fn on_step(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics) {
        self.inner.on_step();
    }

    #[inline(always)]
    fn on_lower_bound_computed(
        &mut self,
        _state: &SearchState<T>,
        _lower_bound: T,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        _state: &SearchState<T>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    #[inline(always)]
    fn on_decisions_enqueued(
        &mut self,
        _state: &SearchState<T>,
        _count: usize,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    #[inline(always)]
    fn on_descend(
        &mut self,
        _state: &SearchState<T>,
        _decision: Decision<T>,
        _statistics: &BnbSolverStatistics,
    ) {
        self.inner.on_node_explored();
    }

    #[inline(always)]
    fn on_backtrack(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics) {}

    #[inline(always)]
    fn on_solution_found(&mut self, schedule: &Schedule<T>, _statistics: &BnbSolverStatistics) {
        self.inner.on_solution_found(schedule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfloor_model::{
        index::{JobIndex, MachineIndex},
        model::ModelBuilder,
    };
    use shopfloor_search::monitor::node_limit::NodeLimitMonitor;
    use std::sync::atomic::{AtomicU64, Ordering};

    type IntegerType = i64;

    #[test]
    fn test_descend_feeds_node_budget() {
        let mut b = ModelBuilder::<IntegerType>::new(1, 1);
        b.add_operation(JobIndex::new(0), MachineIndex::new(0), 1);
        let model = b.build().unwrap();
        let state = SearchState::new(&model);
        let stats = BnbSolverStatistics::default();
        let decision = Decision::for_job(&model, &state, JobIndex::new(0)).unwrap();

        let counter = AtomicU64::new(0);
        let mut inner = NodeLimitMonitor::<IntegerType>::new(&counter, 2);
        let mut wrapper = WrapperMonitor::new(&mut inner);
        assert_eq!(wrapper.name(), "WrapperMonitor(NodeLimitMonitor)");

        wrapper.on_descend(&state, decision, &stats);
        assert_eq!(wrapper.search_command(&state, &stats), SearchCommand::Continue);
        wrapper.on_descend(&state, decision, &stats);
        assert!(matches!(
            wrapper.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
        assert_eq!(counter.load(Ordering::Relaxed), 2);
    }
}
