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

//! Monitoring combinators for tree search
//!
//! `CompositeTreeSearchMonitor` forwards every event to its children in
//! insertion order. `search_command` short-circuits on the first
//! non-`Continue` response, so put stricter stop conditions first.

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{model::Model, solution::Schedule};
use shopfloor_search::monitor::search_monitor::SearchCommand;

/// Fans every event out to a list of monitors.
pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTreeSearchMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a monitor at the end of the list.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor at the end of the list.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, model: &Model<T>, statistics: &BnbSolverStatistics) {
        for m in self.monitors.iter_mut() {
            m.on_enter_search(model, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        for m in self.monitors.iter_mut() {
            m.on_exit_search(statistics);
        }
    }

    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        for m in self.monitors.iter_mut() {
            let command = m.search_command(state, statistics);
            if command != SearchCommand::Continue {
                return command;
            }
        }
        SearchCommand::Continue
    }

    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        for m in self.monitors.iter_mut() {
            m.on_step(state, statistics);
        }
    }

    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: T,
        statistics: &BnbSolverStatistics,
    ) {
        for m in self.monitors.iter_mut() {
            m.on_lower_bound_computed(state, lower_bound, statistics);
        }
    }

    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    ) {
        for m in self.monitors.iter_mut() {
            m.on_prune(state, reason, statistics);
        }
    }

    fn on_decisions_enqueued(
        &mut self,
        state: &SearchState<T>,
        count: usize,
        statistics: &BnbSolverStatistics,
    ) {
        for m in self.monitors.iter_mut() {
            m.on_decisions_enqueued(state, count, statistics);
        }
    }

    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        decision: Decision<T>,
        statistics: &BnbSolverStatistics,
    ) {
        for m in self.monitors.iter_mut() {
            m.on_descend(state, decision, statistics);
        }
    }

    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        for m in self.monitors.iter_mut() {
            m.on_backtrack(state, statistics);
        }
    }

    fn on_solution_found(&mut self, schedule: &Schedule<T>, statistics: &BnbSolverStatistics) {
        for m in self.monitors.iter_mut() {
            m.on_solution_found(schedule, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::no_op::NoOperationMonitor;
    use shopfloor_model::{
        index::{JobIndex, MachineIndex},
        model::ModelBuilder,
    };
    use std::{cell::Cell, rc::Rc};

    type IntegerType = i64;

    /// Counts steps and stops after `limit` of them.
    struct StopAfter {
        steps: Rc<Cell<u64>>,
        limit: u64,
    }

    impl TreeSearchMonitor<IntegerType> for StopAfter {
        fn name(&self) -> &str {
            "StopAfter"
        }
        fn on_enter_search(&mut self, _: &Model<IntegerType>, _: &BnbSolverStatistics) {}
        fn on_exit_search(&mut self, _: &BnbSolverStatistics) {}
        fn search_command(
            &mut self,
            _: &SearchState<IntegerType>,
            _: &BnbSolverStatistics,
        ) -> SearchCommand {
            if self.steps.get() >= self.limit {
                SearchCommand::Terminate(format!("stopped after {}", self.limit))
            } else {
                SearchCommand::Continue
            }
        }
        fn on_step(&mut self, _: &SearchState<IntegerType>, _: &BnbSolverStatistics) {
            self.steps.set(self.steps.get() + 1);
        }
        fn on_lower_bound_computed(
            &mut self,
            _: &SearchState<IntegerType>,
            _: IntegerType,
            _: &BnbSolverStatistics,
        ) {
        }
        fn on_prune(
            &mut self,
            _: &SearchState<IntegerType>,
            _: PruneReason,
            _: &BnbSolverStatistics,
        ) {
        }
        fn on_decisions_enqueued(
            &mut self,
            _: &SearchState<IntegerType>,
            _: usize,
            _: &BnbSolverStatistics,
        ) {
        }
        fn on_descend(
            &mut self,
            _: &SearchState<IntegerType>,
            _: Decision<IntegerType>,
            _: &BnbSolverStatistics,
        ) {
        }
        fn on_backtrack(&mut self, _: &SearchState<IntegerType>, _: &BnbSolverStatistics) {}
        fn on_solution_found(&mut self, _: &Schedule<IntegerType>, _: &BnbSolverStatistics) {}
    }

    #[test]
    fn test_forwards_and_short_circuits_in_order() {
        let mut b = ModelBuilder::<IntegerType>::new(1, 1);
        b.add_operation(JobIndex::new(0), MachineIndex::new(0), 1);
        let model = b.build().unwrap();
        let state = SearchState::new(&model);
        let stats = BnbSolverStatistics::default();

        let (a, c) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        let mut composite = CompositeTreeSearchMonitor::with_capacity(3);
        composite.add_monitor(NoOperationMonitor::new());
        composite.add_monitor(StopAfter { steps: Rc::clone(&a), limit: 1 });
        composite.add_monitor_boxed(Box::new(StopAfter { steps: Rc::clone(&c), limit: 5 }));
        assert_eq!(composite.len(), 3);

        assert_eq!(composite.search_command(&state, &stats), SearchCommand::Continue);
        composite.on_step(&state, &stats);
        assert_eq!((a.get(), c.get()), (1, 1));
        assert_eq!(
            composite.search_command(&state, &stats),
            SearchCommand::Terminate("stopped after 1".into())
        );
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut b = ModelBuilder::<IntegerType>::new(1, 1);
        b.add_operation(JobIndex::new(0), MachineIndex::new(0), 1);
        let model = b.build().unwrap();
        let state = SearchState::new(&model);
        let mut composite = CompositeTreeSearchMonitor::<IntegerType>::default();
        assert!(composite.is_empty());
        assert_eq!(
            composite.search_command(&state, &BnbSolverStatistics::default()),
            SearchCommand::Continue
        );
    }
}
