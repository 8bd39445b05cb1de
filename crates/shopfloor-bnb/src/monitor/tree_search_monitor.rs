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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait and `PruneReason`. Callbacks follow
//! the engine's lifecycle:
//!
//! enter → step → {descend → lower bound → prune | decisions enqueued} | backtrack → solution → exit
//!
//! `BnbSolverStatistics` is passed to every callback. A monitor can stop the
//! run through `search_command`, which the engine polls once per step.

use crate::{
    branching::decision::Decision, state::SearchState, stats::BnbSolverStatistics,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{model::Model, solution::Schedule};
use shopfloor_search::monitor::search_monitor::SearchCommand;

/// Reasons for cutting a node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// The node's lower bound reached the incumbent.
    BoundDominated,
    /// A complete schedule that does not beat the incumbent.
    NotImproving,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
            PruneReason::NotImproving => write!(f, "NotImproving"),
        }
    }
}

/// Observes and controls one run of the engine.
pub trait TreeSearchMonitor<T>
where
    T: PrimInt + Signed,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, model: &Model<T>, statistics: &BnbSolverStatistics);
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics);
    /// Called once per step to decide whether the search continues.
    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called at each step of the search.
    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics);
    /// Called after the bound of a node was computed.
    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: T,
        statistics: &BnbSolverStatistics,
    );
    /// Called when a node is cut.
    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    );
    /// Called after the children of a node were pushed.
    fn on_decisions_enqueued(
        &mut self,
        state: &SearchState<T>,
        count: usize,
        statistics: &BnbSolverStatistics,
    );
    /// Called after the engine entered a child.
    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        decision: Decision<T>,
        statistics: &BnbSolverStatistics,
    );
    /// Called before the engine returns to the parent.
    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics);
    /// Called when the run finds an improving schedule.
    fn on_solution_found(&mut self, schedule: &Schedule<T>, statistics: &BnbSolverStatistics);
}

/// Lends a long-lived monitor to a single search.
impl<T, M> TreeSearchMonitor<T> for &mut M
where
    T: PrimInt + Signed,
    M: TreeSearchMonitor<T> + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn on_enter_search(&mut self, model: &Model<T>, statistics: &BnbSolverStatistics) {
        (**self).on_enter_search(model, statistics);
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        (**self).on_exit_search(statistics);
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        (**self).search_command(state, statistics)
    }

    #[inline(always)]
    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        (**self).on_step(state, statistics);
    }

    #[inline(always)]
    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: T,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_lower_bound_computed(state, lower_bound, statistics);
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_prune(state, reason, statistics);
    }

    #[inline(always)]
    fn on_decisions_enqueued(
        &mut self,
        state: &SearchState<T>,
        count: usize,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_decisions_enqueued(state, count, statistics);
    }

    #[inline(always)]
    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        decision: Decision<T>,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_descend(state, decision, statistics);
    }

    #[inline(always)]
    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        (**self).on_backtrack(state, statistics);
    }

    #[inline(always)]
    fn on_solution_found(&mut self, schedule: &Schedule<T>, statistics: &BnbSolverStatistics) {
        (**self).on_solution_found(schedule, statistics);
    }
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
