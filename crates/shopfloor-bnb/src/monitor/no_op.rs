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

//! A monitor that does nothing.
//!
//! Every callback is an empty inline function, so the engine monomorphized
//! with `NoOperationMonitor` carries no monitoring cost at all.

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{model::Model, solution::Schedule};
use std::marker::PhantomData;

/// Ignores every event and never stops the search.
#[derive(Debug, Clone, Copy)]
pub struct NoOperationMonitor<T>(PhantomData<T>);

impl<T> Default for NoOperationMonitor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NoOperationMonitor<T> {
    #[inline(always)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> TreeSearchMonitor<T> for NoOperationMonitor<T>
where
    T: PrimInt + Signed,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _model: &Model<T>, _statistics: &BnbSolverStatistics) {}

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    #[inline(always)]
    fn on_step(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics) {}

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
    }

    #[inline(always)]
    fn on_backtrack(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics) {}

    #[inline(always)]
    fn on_solution_found(&mut self, _schedule: &Schedule<T>, _statistics: &BnbSolverStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfloor_search::monitor::search_monitor::SearchCommand;

    #[test]
    fn test_no_op_never_stops() {
        let mut monitor = NoOperationMonitor::<i64>::new();
        let model = {
            let mut b = shopfloor_model::model::ModelBuilder::<i64>::new(1, 1);
            b.add_operation(
                shopfloor_model::index::JobIndex::new(0),
                shopfloor_model::index::MachineIndex::new(0),
                1,
            );
            b.build().unwrap()
        };
        let state = SearchState::new(&model);
        let stats = BnbSolverStatistics::default();
        monitor.on_enter_search(&model, &stats);
        monitor.on_step(&state, &stats);
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        assert_eq!(monitor.name(), "NoOperationMonitor");
    }
}
