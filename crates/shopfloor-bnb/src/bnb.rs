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

//! Depth-first branch-and-bound for the job-shop scheduling problem.
//!
//! `BnbSolver` is the execution engine. It owns the reusable search
//! structures (the undo trail and the decision stack) and runs one search
//! session per call. The construction of the tree is delegated to a
//! `DecisionBuilder`, which orders the children of a node, and pruning to a
//! `BoundEvaluator`, which gives a lower bound on every completion of a node.
//!
//! A node is pruned once its bound reaches the best known makespan. A
//! complete schedule is installed only if it is strictly better, so a search
//! seeded with the optimum never reports an improvement. Monitors can stop a
//! session at any step; the outcome then carries the best schedule found so
//! far without a proof of optimality.
//!
//! Every session leaves the trail and the stack empty, and the capacities are
//! kept, so repeated solves (for example one per subproblem in a worker) do
//! not allocate.

use crate::{
    branching::decision::{Decision, DecisionBuilder},
    eval::{self, evaluator::BoundEvaluator},
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    result::BnbSolverOutcome,
    stack::SearchStack,
    state::SearchState,
    stats::BnbSolverStatistics,
    subproblem::Subproblem,
    trail::SearchTrail,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{model::Model, solution::Schedule};
use shopfloor_search::{
    incumbent::SharedIncumbent, monitor::search_monitor::SearchCommand, num::SolverNumeric,
};

/// Number of nodes the debug-build admissibility check may visit per solve.
const DEBUG_ADMISSIBILITY_NODES: usize = 2_000;

/// A depth-first branch-and-bound engine for the job-shop problem.
#[derive(Debug, Clone)]
pub struct BnbSolver<T>
where
    T: PrimInt + Signed,
{
    trail: SearchTrail<T>,
    stack: SearchStack<T>,
}

impl<T> Default for BnbSolver<T>
where
    T: PrimInt + Signed,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T>
where
    T: PrimInt + Signed,
{
    /// Creates a new engine.
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
        }
    }

    /// Creates a new engine with storage for models of the given size.
    ///
    /// # Note
    ///
    /// Every solve grows the storage to fit its model anyway. Preallocating
    /// only moves the allocations to construction time.
    #[inline]
    pub fn preallocated(num_jobs: usize, num_operations: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_operations),
            stack: SearchStack::preallocated(num_jobs, num_operations),
        }
    }

    /// Solves `model` on its own, starting without an upper bound.
    #[inline]
    pub fn solve<B, E, S>(
        &mut self,
        model: &Model<T>,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T>,
        E: BoundEvaluator<T>,
        S: TreeSearchMonitor<T>,
        T: SolverNumeric,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(model, &Subproblem::root(), builder, evaluator, monitor, backing)
    }

    /// Solves `model`, pruning against and publishing to `incumbent`.
    ///
    /// A seeded incumbent acts as the initial upper bound. If nothing beats
    /// it, the outcome carries no schedule even though the search finished.
    #[inline]
    pub fn solve_with_incumbent<B, E, S>(
        &mut self,
        model: &Model<T>,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T>,
        E: BoundEvaluator<T>,
        S: TreeSearchMonitor<T>,
        T: SolverNumeric,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(model, &Subproblem::root(), builder, evaluator, monitor, backing)
    }

    /// Searches only the subtree below `subproblem`, pruning against and
    /// publishing to `incumbent`.
    ///
    /// An exhausted outcome proves that no schedule below the subproblem
    /// beats the returned one (or the incumbent, if none is returned).
    #[inline]
    pub fn solve_subproblem<B, E, S>(
        &mut self,
        model: &Model<T>,
        subproblem: &Subproblem,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T>,
        E: BoundEvaluator<T>,
        S: TreeSearchMonitor<T>,
        T: SolverNumeric,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(model, subproblem, builder, evaluator, monitor, backing)
    }

    /// # Panics
    ///
    /// In debug builds, panics if the evaluator overestimates the best
    /// makespan below some node visited by a capped brute-force check.
    #[inline(always)]
    fn solve_internal<B, E, S, I>(
        &mut self,
        model: &Model<T>,
        subproblem: &Subproblem,
        builder: &mut B,
        evaluator: &mut E,
        mut monitor: S,
        backing: I,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T>,
        E: BoundEvaluator<T>,
        S: TreeSearchMonitor<T>,
        I: IncumbentStore<T>,
        T: SolverNumeric,
    {
        debug_assert!(
            subproblem.depth() > 0
                || eval::validation::is_admissible_exhaustive(
                    evaluator,
                    model,
                    DEBUG_ADMISSIBILITY_NODES
                ),
            "BoundEvaluator '{}' overestimates the optimal completion of some node",
            evaluator.name()
        );

        let session = BnbSolverSearchSession::new(
            self,
            model,
            subproblem,
            builder,
            evaluator,
            &mut monitor,
            backing,
        );
        let res = session.run();
        self.reset();
        res
    }

    /// Clears the trail and the stack, keeping their capacity.
    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
    }
}

/// Why a session ended.
enum SessionEnd {
    Exhausted,
    Aborted(String),
}

/// The state and logic of a single search run.
struct BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: SolverNumeric,
    I: IncumbentStore<T>,
{
    solver: &'a mut BnbSolver<T>,
    model: &'a Model<T>,
    subproblem: &'a Subproblem,
    builder: &'a mut B,
    evaluator: &'a mut E,
    monitor: &'a mut S,
    incumbent: I,
    state: SearchState<T>,
    best_makespan: T,
    best_schedule: Option<Schedule<T>>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<'a, T, B, E, S, I> std::fmt::Debug for BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: SolverNumeric,
    I: IncumbentStore<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("subproblem", &self.subproblem)
            .field("state", &self.state)
            .field("best_makespan", &self.best_makespan)
            .field("best_schedule", &self.best_schedule)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T, B, E, S, I> BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: SolverNumeric,
    B: DecisionBuilder<T>,
    E: BoundEvaluator<T>,
    S: TreeSearchMonitor<T>,
    I: IncumbentStore<T>,
{
    #[inline]
    fn new(
        solver: &'a mut BnbSolver<T>,
        model: &'a Model<T>,
        subproblem: &'a Subproblem,
        builder: &'a mut B,
        evaluator: &'a mut E,
        monitor: &'a mut S,
        incumbent_backing: I,
    ) -> Self {
        let state = SearchState::new(model);
        let best_makespan = incumbent_backing.initial_upper_bound();

        Self {
            solver,
            model,
            subproblem,
            builder,
            evaluator,
            monitor,
            incumbent: incumbent_backing,
            state,
            best_makespan,
            best_schedule: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome<T> {
        self.monitor.on_enter_search(self.model, &self.stats);

        let end = match self.initialize() {
            Some(end) => end,
            None => loop {
                self.best_makespan = self.incumbent.tighten(self.best_makespan);
                self.monitor.on_step(&self.state, &self.stats);

                if let SearchCommand::Terminate(msg) =
                    self.monitor.search_command(&self.state, &self.stats)
                {
                    break SessionEnd::Aborted(msg);
                }

                if self.solver.stack.is_current_level_empty() {
                    if self.solver.stack.depth() <= 1 {
                        break SessionEnd::Exhausted;
                    }
                    self.backtrack_step();
                } else {
                    // SAFETY: the current level is not empty.
                    unsafe {
                        self.process_next_decision();
                    }
                }
            },
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        match end {
            SessionEnd::Exhausted => BnbSolverOutcome::exhausted(self.best_schedule, self.stats),
            SessionEnd::Aborted(msg) => {
                BnbSolverOutcome::aborted(self.best_schedule, msg, self.stats)
            }
        }
    }

    /// Replays the subproblem, evaluates its root and enqueues the first
    /// decisions. Returns `Some` if the session is already over.
    fn initialize(&mut self) -> Option<SessionEnd> {
        let (num_jobs, num_operations) = (self.model.num_jobs(), self.model.num_operations());
        self.solver.trail.ensure_capacity(num_operations);
        self.solver.stack.ensure_capacity(num_jobs, num_operations);

        if !self.subproblem.is_valid_for(self.model) {
            return Some(SessionEnd::Aborted(format!(
                "{} does not fit the model",
                self.subproblem
            )));
        }

        // The replayed operations stay below the root frame and are never undone.
        let replayed = self
            .subproblem
            .replay(self.model, &mut self.state, &mut self.solver.trail);
        debug_assert!(replayed, "validated subproblem failed to replay");

        self.best_makespan = self.incumbent.tighten(self.best_makespan);
        self.stats.on_node_explored();
        self.stats.on_depth_update(self.state.num_scheduled() as u64);

        if self.state.is_complete() {
            self.handle_complete_schedule();
            return Some(SessionEnd::Exhausted);
        }

        let root_bound = self.evaluator.lower_bound(self.model, &self.state);
        self.stats.set_root_lower_bound(root_bound.into());
        self.monitor
            .on_lower_bound_computed(&self.state, root_bound, &self.stats);
        if root_bound >= self.best_makespan {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return Some(SessionEnd::Exhausted);
        }

        // Root frame. Must exist before the first decisions are pushed.
        self.solver.trail.push_frame();
        self.solver.stack.push_frame();
        self.enqueue_children();
        None
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);

        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    /// Takes the best remaining decision of the current level and enters it,
    /// unless the operation alone already ends at the incumbent.
    ///
    /// # Safety
    ///
    /// The current level of the decision stack must not be empty.
    #[inline(always)]
    unsafe fn process_next_decision(&mut self) {
        debug_assert!(
            !self.solver.stack.is_current_level_empty(),
            "called `BnbSolverSearchSession::process_next_decision` with empty decision stack"
        );

        let decision = unsafe { self.solver.stack.pop().unwrap_unchecked() };
        self.stats.on_decision_generated();

        // The child's makespan is at least the end of the fixed operation.
        if decision.end_time() >= self.best_makespan {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return;
        }

        self.descend(decision);
    }

    #[inline(always)]
    fn descend(&mut self, decision: Decision<T>) {
        self.solver.trail.push_frame();
        self.solver
            .trail
            .apply(&mut self.state, self.model, &decision);
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_update(self.state.num_scheduled() as u64);
        self.monitor.on_descend(&self.state, decision, &self.stats);

        if self.state.is_complete() {
            self.handle_complete_schedule();
            return;
        }

        let bound = self.evaluator.lower_bound(self.model, &self.state);
        self.monitor
            .on_lower_bound_computed(&self.state, bound, &self.stats);
        if bound >= self.best_makespan {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            self.backtrack_step();
            return;
        }

        self.enqueue_children();
    }

    #[inline(always)]
    fn enqueue_children(&mut self) {
        let decisions = self.builder.next_decision(self.model, &self.state);
        let added = self.solver.stack.extend(decisions);
        self.monitor
            .on_decisions_enqueued(&self.state, added, &self.stats);
    }

    /// Installs the schedule at the current (complete) node if it improves
    /// on the best makespan. The node's empty level is left for the main
    /// loop to backtrack from.
    ///
    /// Solution hooks only fire if the incumbent store accepts the schedule.
    /// A schedule that lost against a concurrent install is dropped.
    #[inline(always)]
    fn handle_complete_schedule(&mut self) {
        let makespan = self.state.makespan();
        if makespan >= self.best_makespan {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::NotImproving, &self.stats);
            return;
        }

        let Some(schedule) = self.state.to_schedule() else {
            return;
        };
        if !self.incumbent.install(&schedule) {
            self.best_makespan = self.incumbent.tighten(makespan);
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::NotImproving, &self.stats);
            return;
        }

        self.best_makespan = makespan;
        self.stats.on_solution_found();
        self.monitor.on_solution_found(&schedule, &self.stats);
        self.best_schedule = Some(schedule);
    }
}
